use miette::LabeledSpan;
use miette::Severity;
use miette::SourceSpan;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::MdblocksError;
use crate::MdblocksResult;
use crate::Position;
use crate::SchemaRegistry;
use crate::TitlePolicy;
use crate::tokens::Token;

/// A non-fatal finding produced while parsing. Parsing always completes;
/// diagnostics travel alongside the tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseDiagnostic {
	/// A block used a key that is not in the schema. The block was kept as
	/// literal text.
	#[error("unknown block key `{key}`")]
	UnknownBlockKey { key: String, position: Position },
	/// A block whose key requires a title was opened without one.
	#[error("block `{key}` requires a title")]
	MissingRequiredTitle { key: String, position: Position },
	/// A block was still open at the end of the document and was closed
	/// there.
	#[error("block `{key}` is never closed")]
	UnterminatedBlock {
		key: String,
		position: Position,
		/// Reported as an error rather than a warning.
		strict: bool,
	},
	/// A closing delimiter with no open block.
	#[error("closing delimiter without an open block")]
	StrayBlockEnd { position: Position },
	/// A block opened deeper than [`ParseOptions::max_depth`]. It was kept
	/// as literal text.
	#[error("block `{key}` is nested deeper than {limit} levels")]
	NestingTooDeep {
		key: String,
		position: Position,
		limit: usize,
	},
}

impl ParseDiagnostic {
	pub fn position(&self) -> Position {
		match self {
			Self::UnknownBlockKey { position, .. }
			| Self::MissingRequiredTitle { position, .. }
			| Self::UnterminatedBlock { position, .. }
			| Self::StrayBlockEnd { position }
			| Self::NestingTooDeep { position, .. } => *position,
		}
	}

	pub fn line(&self) -> usize {
		self.position().start.line
	}

	pub fn column(&self) -> usize {
		self.position().start.column
	}

	/// The block key the diagnostic refers to, if any.
	pub fn key(&self) -> Option<&str> {
		match self {
			Self::UnknownBlockKey { key, .. }
			| Self::MissingRequiredTitle { key, .. }
			| Self::UnterminatedBlock { key, .. }
			| Self::NestingTooDeep { key, .. } => Some(key),
			Self::StrayBlockEnd { .. } => None,
		}
	}

	pub fn level(&self) -> Severity {
		match self {
			Self::UnknownBlockKey { .. }
			| Self::UnterminatedBlock { strict: false, .. }
			| Self::NestingTooDeep { .. } => Severity::Warning,
			Self::MissingRequiredTitle { .. } | Self::UnterminatedBlock { strict: true, .. } => {
				Severity::Error
			}
			Self::StrayBlockEnd { .. } => Severity::Advice,
		}
	}

	pub fn is_error(&self) -> bool {
		self.level() == Severity::Error
	}

	/// A stable identifier for the kind of diagnostic.
	pub fn code_str(&self) -> &'static str {
		match self {
			Self::UnknownBlockKey { .. } => "mdblocks::unknown_block_key",
			Self::MissingRequiredTitle { .. } => "mdblocks::missing_required_title",
			Self::UnterminatedBlock { .. } => "mdblocks::unterminated_block",
			Self::StrayBlockEnd { .. } => "mdblocks::stray_block_end",
			Self::NestingTooDeep { .. } => "mdblocks::nesting_too_deep",
		}
	}

	fn help_text(&self) -> String {
		match self {
			Self::UnknownBlockKey { key, .. } => {
				format!("register `{key}` in the block schema, or the block is shown as plain text")
			}
			Self::MissingRequiredTitle { key, .. } => {
				format!("write a title after the key, e.g. `:::{key} Title`")
			}
			Self::UnterminatedBlock { .. } => "add a `:::` line to close this block".to_string(),
			Self::StrayBlockEnd { .. } => "remove this line or open a block before it".to_string(),
			Self::NestingTooDeep { .. } => {
				"close some of the enclosing blocks, or raise `max_depth`".to_string()
			}
		}
	}

	fn label_text(&self) -> &'static str {
		match self {
			Self::UnknownBlockKey { .. } => "not in the block schema",
			Self::MissingRequiredTitle { .. } => "title expected here",
			Self::UnterminatedBlock { .. } => "opened here",
			Self::StrayBlockEnd { .. } => "nothing to close",
			Self::NestingTooDeep { .. } => "too deeply nested",
		}
	}
}

impl miette::Diagnostic for ParseDiagnostic {
	fn code<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
		Some(Box::new(self.code_str()))
	}

	fn severity(&self) -> Option<Severity> {
		Some(self.level())
	}

	fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
		Some(Box::new(self.help_text()))
	}

	fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
		let span: SourceSpan = self.position().into();
		let label = LabeledSpan::new_with_span(Some(self.label_text().to_string()), span);

		Some(Box::new(std::iter::once(label)))
	}
}

/// The default for [`ParseOptions::max_depth`].
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// What to do with blocks still open at the end of the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum UnterminatedPolicy {
	/// Close them at the end of input and report a warning.
	#[default]
	AutoClose,
	/// Close them at the end of input and report an error.
	Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
	pub unterminated: UnterminatedPolicy,
	/// Report closing delimiters that have no open block. When disabled they
	/// are only logged.
	pub report_stray_ends: bool,
	/// The deepest level at which a block may open. Blocks beyond it are
	/// kept as text so the tree stays shallow enough to walk recursively.
	pub max_depth: usize,
}

impl Default for ParseOptions {
	fn default() -> Self {
		Self {
			unterminated: UnterminatedPolicy::AutoClose,
			report_stray_ends: true,
			max_depth: DEFAULT_MAX_DEPTH,
		}
	}
}

/// A node of the parsed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockNode {
	Block(CustomBlock),
	Text(TextNode),
}

/// A recognised block with its resolved title and nested content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomBlock {
	pub key: String,
	/// The resolved title. Blocks with a required title that was not
	/// written have `Some("")`.
	pub title: Option<String>,
	/// Initial presentation state. `None` for blocks that are not
	/// collapsible.
	pub collapsed: Option<bool>,
	/// Position of the opening delimiter.
	pub opening: Position,
	/// Position of the closing delimiter, `None` when the block was closed
	/// implicitly at the end of the document.
	pub closing: Option<Position>,
	pub children: Vec<BlockNode>,
}

/// Text handed to the generic markup renderer unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextNode {
	pub value: String,
	pub position: Position,
}

/// The result of a parse: the document tree and everything worth telling the
/// author about it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutput {
	pub nodes: Vec<BlockNode>,
	pub diagnostics: Vec<ParseDiagnostic>,
}

impl ParseOutput {
	pub fn has_errors(&self) -> bool {
		self.diagnostics.iter().any(ParseDiagnostic::is_error)
	}

	/// Return the tree, or the first error-severity diagnostic.
	pub fn into_result(self) -> MdblocksResult<Vec<BlockNode>> {
		match self.diagnostics.into_iter().find(ParseDiagnostic::is_error) {
			Some(diagnostic) => Err(MdblocksError::Block(diagnostic)),
			None => Ok(self.nodes),
		}
	}
}

struct BlockCreator {
	key: String,
	title: Option<String>,
	collapsed: Option<bool>,
	opening: Position,
	children: Vec<BlockNode>,
	/// Delimiters kept as literal text that are still open inside this
	/// block. Their closing delimiters are kept as text too.
	passthrough: usize,
}

impl BlockCreator {
	fn into_block(self, closing: Option<Position>) -> CustomBlock {
		CustomBlock {
			key: self.key,
			title: self.title,
			collapsed: self.collapsed,
			opening: self.opening,
			closing,
			children: self.children,
		}
	}
}

struct TreeBuilder<'a> {
	schema: &'a SchemaRegistry,
	options: ParseOptions,
	/// Open blocks, innermost last.
	stack: Vec<BlockCreator>,
	root: Vec<BlockNode>,
	/// Literal delimiters still open outside every block.
	root_passthrough: usize,
	diagnostics: Vec<ParseDiagnostic>,
}

impl<'a> TreeBuilder<'a> {
	fn new(schema: &'a SchemaRegistry, options: ParseOptions) -> Self {
		Self {
			schema,
			options,
			stack: vec![],
			root: vec![],
			root_passthrough: 0,
			diagnostics: vec![],
		}
	}

	/// Append a node to the innermost open block, or the root. Text that
	/// directly follows the previous text in the source is merged into it.
	fn push_node(&mut self, node: BlockNode) {
		let children = match self.stack.last_mut() {
			Some(creator) => &mut creator.children,
			None => &mut self.root,
		};

		match (children.last_mut(), &node) {
			(Some(BlockNode::Text(last)), BlockNode::Text(text))
				if last.position.end == text.position.start =>
			{
				last.value.push_str(&text.value);
				last.position.end = text.position.end;
			}
			_ => children.push(node),
		}
	}

	fn push_text(&mut self, value: &str, position: Position) {
		self.push_node(BlockNode::Text(TextNode {
			value: value.to_string(),
			position,
		}));
	}

	fn passthrough_mut(&mut self) -> &mut usize {
		match self.stack.last_mut() {
			Some(creator) => &mut creator.passthrough,
			None => &mut self.root_passthrough,
		}
	}

	/// Keep an opening delimiter as literal text. Its matching close is kept
	/// as text too.
	fn pass_through(&mut self, raw: &str, position: Position) {
		self.push_text(raw, position);
		*self.passthrough_mut() += 1;
	}

	fn open(&mut self, key: &str, title: &str, raw: &str, position: Position) {
		let Some(config) = self.schema.lookup(key) else {
			tracing::debug!(key, line = position.start.line, "unknown block key kept as text");
			self.diagnostics.push(ParseDiagnostic::UnknownBlockKey {
				key: key.to_string(),
				position,
			});
			self.pass_through(raw, position);
			return;
		};

		if self.stack.len() >= self.options.max_depth {
			tracing::debug!(key, depth = self.stack.len(), "block nested too deeply kept as text");
			self.diagnostics.push(ParseDiagnostic::NestingTooDeep {
				key: key.to_string(),
				position,
				limit: self.options.max_depth,
			});
			self.pass_through(raw, position);
			return;
		}

		let title = match config.title_policy() {
			TitlePolicy::None => {
				if !title.is_empty() {
					tracing::debug!(key, title, "ignoring title on untitled block");
				}
				None
			}
			TitlePolicy::Optional { default } => {
				if title.is_empty() {
					default.clone()
				} else {
					Some(title.to_string())
				}
			}
			TitlePolicy::Required => {
				if title.is_empty() {
					self.diagnostics.push(ParseDiagnostic::MissingRequiredTitle {
						key: key.to_string(),
						position,
					});
				}
				Some(title.to_string())
			}
		};

		self.stack.push(BlockCreator {
			key: key.to_string(),
			title,
			collapsed: config.collapsible().then_some(true),
			opening: position,
			children: vec![],
			passthrough: 0,
		});
	}

	fn close(&mut self, raw: &str, position: Position) {
		let passthrough = self.passthrough_mut();
		if *passthrough > 0 {
			*passthrough -= 1;
			self.push_text(raw, position);
			return;
		}

		match self.stack.pop() {
			Some(creator) => {
				let block = creator.into_block(Some(position));
				self.push_node(BlockNode::Block(block));
			}
			None => {
				tracing::debug!(line = position.start.line, "ignoring stray closing delimiter");
				if self.options.report_stray_ends {
					self.diagnostics
						.push(ParseDiagnostic::StrayBlockEnd { position });
				}
			}
		}
	}

	/// Close everything still open, innermost first.
	fn finish(mut self) -> ParseOutput {
		while let Some(creator) = self.stack.pop() {
			self.diagnostics.push(ParseDiagnostic::UnterminatedBlock {
				key: creator.key.clone(),
				position: creator.opening,
				strict: self.options.unterminated == UnterminatedPolicy::Strict,
			});

			let block = creator.into_block(None);
			self.push_node(BlockNode::Block(block));
		}

		ParseOutput {
			nodes: self.root,
			diagnostics: self.diagnostics,
		}
	}
}

/// Build the block tree for `tokens` using the default [`ParseOptions`].
pub fn parse<'a>(
	tokens: impl IntoIterator<Item = &'a Token>,
	schema: &SchemaRegistry,
) -> ParseOutput {
	parse_with_options(tokens, schema, ParseOptions::default())
}

/// Build the block tree for `tokens`.
///
/// Unknown keys, missing titles, unterminated blocks, stray closing
/// delimiters and blocks nested past [`ParseOptions::max_depth`] never stop
/// the pass. They are collected in
/// [`ParseOutput::diagnostics`].
#[tracing::instrument(level = "debug", skip_all)]
pub fn parse_with_options<'a>(
	tokens: impl IntoIterator<Item = &'a Token>,
	schema: &SchemaRegistry,
	options: ParseOptions,
) -> ParseOutput {
	let mut builder = TreeBuilder::new(schema, options);

	for token in tokens {
		match token {
			Token::BlockStart {
				key,
				title,
				raw,
				position,
			} => builder.open(key, title, raw, *position),
			Token::BlockEnd { raw, position } => builder.close(raw, *position),
			Token::Text { value, position } => builder.push_text(value, *position),
		}
	}

	builder.finish()
}
