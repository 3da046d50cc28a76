use crate::ParseDiagnostic;
use crate::ParseOptions;
use crate::RenderNode;
use crate::SchemaRegistry;
use crate::TextRenderer;
use crate::lexer::tokenize;
use crate::parse_with_options;
use crate::render;

/// A rendered document together with the diagnostics found while parsing
/// it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered<F> {
	pub nodes: Vec<RenderNode<F>>,
	pub diagnostics: Vec<ParseDiagnostic>,
}

impl<F> Rendered<F> {
	pub fn has_errors(&self) -> bool {
		self.diagnostics.iter().any(ParseDiagnostic::is_error)
	}
}

/// Tokenize, parse and render `source` in one pass with the default
/// [`ParseOptions`].
pub fn process<R>(source: &str, schema: &SchemaRegistry, renderer: &R) -> Rendered<R::Fragment>
where
	R: TextRenderer + ?Sized,
{
	process_with_options(source, schema, renderer, ParseOptions::default())
}

/// Tokenize, parse and render `source` in one pass.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn process_with_options<R>(
	source: &str,
	schema: &SchemaRegistry,
	renderer: &R,
	options: ParseOptions,
) -> Rendered<R::Fragment>
where
	R: TextRenderer + ?Sized,
{
	let tokens = tokenize(source);
	let parsed = parse_with_options(&tokens, schema, options);
	let nodes = render(&parsed.nodes, schema, renderer);

	if !parsed.diagnostics.is_empty() {
		tracing::debug!(count = parsed.diagnostics.len(), "document has diagnostics");
	}

	Rendered {
		nodes,
		diagnostics: parsed.diagnostics,
	}
}
