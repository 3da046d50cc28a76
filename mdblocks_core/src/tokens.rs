use std::fmt::Display;

use derive_more::Deref;

use crate::Position;

/// A flat, source-ordered token produced by the tokenizer.
///
/// Tokens only describe block structure. Everything between delimiters is
/// carried as opaque [`Token::Text`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
	/// `:::key optional title`
	BlockStart {
		/// The block key, e.g. `note`.
		key: String,
		/// Trimmed text following the key on the delimiter line. Empty when
		/// nothing follows the key.
		title: String,
		/// The delimiter line exactly as written, including its line
		/// terminator.
		raw: String,
		position: Position,
	},
	/// `:::`
	BlockEnd { raw: String, position: Position },
	/// A run of lines that are not block delimiters.
	Text { value: String, position: Position },
}

impl Token {
	pub fn position(&self) -> Position {
		match self {
			Self::BlockStart { position, .. }
			| Self::BlockEnd { position, .. }
			| Self::Text { position, .. } => *position,
		}
	}

	/// The verbatim source text covered by this token.
	pub fn raw(&self) -> &str {
		match self {
			Self::BlockStart { raw, .. } | Self::BlockEnd { raw, .. } => raw,
			Self::Text { value, .. } => value,
		}
	}
}

impl Display for Token {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.raw())
	}
}

/// The tokens of a single document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref)]
pub struct TokenStream(Vec<Token>);

impl TokenStream {
	pub fn new(tokens: Vec<Token>) -> Self {
		Self(tokens)
	}

	pub fn into_inner(self) -> Vec<Token> {
		self.0
	}

	/// Rebuild the source the stream was produced from.
	pub fn to_source(&self) -> String {
		self.0.iter().map(Token::raw).collect()
	}
}

impl From<Vec<Token>> for TokenStream {
	fn from(tokens: Vec<Token>) -> Self {
		Self(tokens)
	}
}

impl IntoIterator for TokenStream {
	type IntoIter = std::vec::IntoIter<Token>;
	type Item = Token;

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}

impl<'a> IntoIterator for &'a TokenStream {
	type IntoIter = std::slice::Iter<'a, Token>;
	type Item = &'a Token;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}
