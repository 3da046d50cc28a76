use std::ops::Range;

use logos::Logos;

use crate::Point;
use crate::Position;
use crate::tokens::Token;
use crate::tokens::TokenStream;

/// Raw tokens produced by logos. Only the shapes that matter for
/// recognising delimiter lines are named; every other byte is a logos error
/// and treated as ordinary content.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum RawToken {
	#[regex(r":::+")]
	Colons,
	#[regex(r"```+")]
	Backticks,
	#[regex(r"~~~+")]
	Tildes,
	#[regex(r"[a-zA-Z_][a-zA-Z0-9_-]*")]
	Ident,
	#[regex(r"[ \t\r]+")]
	Blank,
	#[token("\n")]
	Newline,
}

/// The kind of a single source line.
enum LineKind {
	/// `:::key title`
	Open { key: String, title: String },
	/// `:::`
	Close,
	Text,
}

/// An open fenced code block. Delimiters inside it are plain text.
struct CodeFence {
	marker: RawToken,
	len: usize,
}

/// Walks the logos token stream one line at a time, emitting block
/// delimiters and coalescing everything else into text tokens.
struct LineWalker<'a> {
	/// The full document.
	source: &'a str,
	/// The collected raw tokens and their byte spans.
	raw_tokens: Vec<(Result<RawToken, ()>, Range<usize>)>,
	/// Current index into `raw_tokens`.
	cursor: usize,
	/// Location of the next unprocessed byte.
	point: Point,
	/// Start of the text run currently being accumulated.
	pending_text: Option<(usize, Point)>,
	/// Set while inside a fenced code block.
	fence: Option<CodeFence>,
	tokens: Vec<Token>,
}

impl<'a> LineWalker<'a> {
	fn new(source: &'a str) -> Self {
		let raw_tokens: Vec<_> = RawToken::lexer(source).spanned().collect();

		Self {
			source,
			raw_tokens,
			cursor: 0,
			point: Point::start(),
			pending_text: None,
			fence: None,
			tokens: vec![],
		}
	}

	/// Advance the cursor past the next line (including its newline) and
	/// return the raw token indices it covers.
	fn next_line(&mut self) -> Range<usize> {
		let start = self.cursor;

		while self.cursor < self.raw_tokens.len() {
			let is_newline = matches!(self.raw_tokens[self.cursor].0, Ok(RawToken::Newline));
			self.cursor += 1;

			if is_newline {
				break;
			}
		}

		start..self.cursor
	}

	/// Byte range of the source covered by a range of raw tokens.
	fn byte_range(&self, line: &Range<usize>) -> Range<usize> {
		let start = self.raw_tokens[line.start].1.start;
		let end = self.raw_tokens[line.end - 1].1.end;
		start..end
	}

	/// Tokens on the line that are not blanks or the trailing newline.
	fn significant(&self, line: &Range<usize>) -> Vec<(Result<RawToken, ()>, Range<usize>)> {
		self.raw_tokens[line.clone()]
			.iter()
			.filter(|(token, _)| !matches!(token, Ok(RawToken::Blank | RawToken::Newline)))
			.cloned()
			.collect()
	}

	/// Width of the leading blanks of a line, with tabs advancing to the
	/// next multiple of four.
	fn indent(&self, line: &Range<usize>) -> usize {
		let bytes = self.byte_range(line);
		let mut width = 0;

		for ch in self.source[bytes].chars() {
			match ch {
				' ' => width += 1,
				'\t' => width += 4 - width % 4,
				_ => break,
			}
		}

		width
	}

	fn classify(&mut self, line: &Range<usize>) -> LineKind {
		// Four columns of indentation is an indented code block or a
		// paragraph continuation, never a delimiter or fence.
		if self.indent(line) >= 4 {
			return LineKind::Text;
		}

		let significant = self.significant(line);
		let line_end = self.byte_range(line).end;

		if let Some(fence) = &self.fence {
			let closes = match significant.as_slice() {
				[(Ok(marker), span)] => *marker == fence.marker && span.len() >= fence.len,
				_ => false,
			};

			if closes {
				self.fence = None;
			}

			return LineKind::Text;
		}

		match significant.as_slice() {
			[(Ok(marker @ (RawToken::Backticks | RawToken::Tildes)), span), ..] => {
				// A backtick in the info string makes the line inline code.
				if *marker == RawToken::Backticks && self.source[span.end..line_end].contains('`') {
					return LineKind::Text;
				}

				self.fence = Some(CodeFence {
					marker: *marker,
					len: span.len(),
				});
				LineKind::Text
			}
			[(Ok(RawToken::Colons), _)] => LineKind::Close,
			[(Ok(RawToken::Colons), _), (Ok(RawToken::Ident), key_span), ..] => {
				let rest = &self.source[key_span.end..line_end];

				// `:::note.x` is not a delimiter, the key must end the word.
				if rest.chars().next().is_some_and(|ch| !ch.is_whitespace()) {
					return LineKind::Text;
				}

				LineKind::Open {
					key: self.source[key_span.clone()].to_string(),
					title: rest.trim().to_string(),
				}
			}
			_ => LineKind::Text,
		}
	}

	fn push_text(&mut self, bytes: &Range<usize>) {
		if self.pending_text.is_none() {
			self.pending_text = Some((bytes.start, self.point));
		}

		self.point.advance_str(&self.source[bytes.clone()]);
	}

	fn flush_text(&mut self) {
		let Some((start, start_point)) = self.pending_text.take() else {
			return;
		};

		let value = self.source[start..self.point.offset].to_string();
		self.tokens.push(Token::Text {
			value,
			position: Position {
				start: start_point,
				end: self.point,
			},
		});
	}

	fn process(&mut self) {
		while self.cursor < self.raw_tokens.len() {
			let line = self.next_line();
			let bytes = self.byte_range(&line);

			match self.classify(&line) {
				LineKind::Text => self.push_text(&bytes),
				LineKind::Open { key, title } => {
					self.flush_text();
					let raw = self.source[bytes].to_string();
					let position = Position::spanning(self.point, &raw);
					self.point = position.end;
					self.tokens.push(Token::BlockStart {
						key,
						title,
						raw,
						position,
					});
				}
				LineKind::Close => {
					self.flush_text();
					let raw = self.source[bytes].to_string();
					let position = Position::spanning(self.point, &raw);
					self.point = position.end;
					self.tokens.push(Token::BlockEnd { raw, position });
				}
			}
		}

		self.flush_text();
	}
}

/// Split `source` into block delimiters and text.
///
/// The scan is a single left-to-right pass over lines. A delimiter is only
/// recognised when it is the first non-blank content of a line and outside
/// any fenced code block. Concatenating the `raw` text of every token
/// reproduces `source` exactly.
pub fn tokenize(source: &str) -> TokenStream {
	let mut walker = LineWalker::new(source);
	walker.process();
	TokenStream::new(walker.tokens)
}
