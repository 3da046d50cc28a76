use miette::SourceSpan;
use serde::Deserialize;
use serde::Serialize;

/// A single location in the source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
	/// 1-based line number.
	pub line: usize,
	/// 1-based column, counted in characters.
	pub column: usize,
	/// 0-based byte offset.
	pub offset: usize,
}

impl Point {
	pub fn new(line: usize, column: usize, offset: usize) -> Self {
		Self {
			line,
			column,
			offset,
		}
	}

	/// The first character of a document.
	pub fn start() -> Self {
		Self::new(1, 1, 0)
	}

	/// Move the point past `text`.
	pub fn advance_str(&mut self, text: &str) {
		for ch in text.chars() {
			if ch == '\n' {
				self.line += 1;
				self.column = 1;
			} else {
				self.column += 1;
			}

			self.offset += ch.len_utf8();
		}
	}
}

/// The start (inclusive) and end (exclusive) of a region of source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
	pub start: Point,
	pub end: Point,
}

impl Position {
	pub fn new(
		start_line: usize,
		start_column: usize,
		start_offset: usize,
		end_line: usize,
		end_column: usize,
		end_offset: usize,
	) -> Self {
		Self {
			start: Point::new(start_line, start_column, start_offset),
			end: Point::new(end_line, end_column, end_offset),
		}
	}

	/// Create a position covering `text` when it begins at `start`.
	pub fn spanning(start: Point, text: &str) -> Self {
		let mut end = start;
		end.advance_str(text);

		Self { start, end }
	}

	/// Length in bytes.
	pub fn len(&self) -> usize {
		self.end.offset.saturating_sub(self.start.offset)
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl From<Position> for SourceSpan {
	fn from(position: Position) -> Self {
		(position.start.offset, position.len()).into()
	}
}
