use markdown::Options;
use serde::Serialize;

use crate::BlockConfig;
use crate::BlockNode;
use crate::CustomBlock;
use crate::SchemaRegistry;

/// The generic markup renderer that plain text is handed to.
///
/// It is called once per text node with the raw text and returns an opaque
/// fragment which is placed in the render tree unchanged.
pub trait TextRenderer {
	type Fragment;

	fn render_text(&self, text: &str) -> Self::Fragment;
}

impl<T: TextRenderer + ?Sized> TextRenderer for &T {
	type Fragment = T::Fragment;

	fn render_text(&self, text: &str) -> Self::Fragment {
		(**self).render_text(text)
	}
}

/// Passes text through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainText;

impl TextRenderer for PlainText {
	type Fragment = String;

	fn render_text(&self, text: &str) -> Self::Fragment {
		text.to_string()
	}
}

/// Renders text as GitHub flavored markdown to HTML.
pub struct MarkdownRenderer {
	options: Options,
}

impl Default for MarkdownRenderer {
	fn default() -> Self {
		Self {
			options: Options::gfm(),
		}
	}
}

impl MarkdownRenderer {
	pub fn new(options: Options) -> Self {
		Self { options }
	}
}

impl TextRenderer for MarkdownRenderer {
	type Fragment = String;

	fn render_text(&self, text: &str) -> Self::Fragment {
		markdown::to_html_with_options(text, &self.options).unwrap_or_else(|message| {
			tracing::warn!(%message, "markdown rendering failed, escaping text instead");
			html_escape::encode_text(text).into_owned()
		})
	}
}

/// A node of the rendered output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderNode<F> {
	Container(Container<F>),
	/// Output of the [`TextRenderer`] for a text node.
	Fragment(F),
}

/// The element wrapping a rendered block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Container<F> {
	pub key: String,
	pub element: String,
	/// Initial collapsed state, only present for collapsible blocks.
	pub collapsed: Option<bool>,
	pub title: Option<TitleElement>,
	pub contents: ContentsElement<F>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitleElement {
	pub element: String,
	pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentsElement<F> {
	pub element: String,
	pub children: Vec<RenderNode<F>>,
}

/// Map a parsed tree to its rendered form.
///
/// Each call builds a new tree; neither `nodes` nor `schema` is modified.
pub fn render<R>(
	nodes: &[BlockNode],
	schema: &SchemaRegistry,
	renderer: &R,
) -> Vec<RenderNode<R::Fragment>>
where
	R: TextRenderer + ?Sized,
{
	nodes
		.iter()
		.map(|node| render_node(node, schema, renderer))
		.collect()
}

fn render_node<R>(node: &BlockNode, schema: &SchemaRegistry, renderer: &R) -> RenderNode<R::Fragment>
where
	R: TextRenderer + ?Sized,
{
	match node {
		BlockNode::Text(text) => RenderNode::Fragment(renderer.render_text(&text.value)),
		BlockNode::Block(block) => RenderNode::Container(render_block(block, schema, renderer)),
	}
}

fn render_block<R>(block: &CustomBlock, schema: &SchemaRegistry, renderer: &R) -> Container<R::Fragment>
where
	R: TextRenderer + ?Sized,
{
	let fallback;
	let config = if let Some(config) = schema.lookup(&block.key) {
		config
	} else {
		tracing::warn!(key = %block.key, "block key missing from render schema, using defaults");
		fallback = BlockConfig::default();
		&fallback
	};

	let collapsed = config
		.collapsible()
		.then(|| block.collapsed.unwrap_or(true));

	let title = block.title.as_ref().map(|text| {
		TitleElement {
			element: config.title_element().to_string(),
			text: text.clone(),
		}
	});

	Container {
		key: block.key.clone(),
		element: config.container_element().to_string(),
		collapsed,
		title,
		contents: ContentsElement {
			element: config.contents_element().to_string(),
			children: render(&block.children, schema, renderer),
		},
	}
}

/// Serialize a rendered tree whose fragments are already HTML.
///
/// Containers carry `data-block` with their key. Collapsible containers also
/// carry `data-collapsed`, and `details` containers that start expanded get
/// the `open` attribute.
pub fn to_html(nodes: &[RenderNode<String>]) -> String {
	let mut html = String::new();

	for node in nodes {
		write_node(&mut html, node);
	}

	html
}

fn write_node(html: &mut String, node: &RenderNode<String>) {
	match node {
		RenderNode::Fragment(fragment) => html.push_str(fragment),
		RenderNode::Container(container) => {
			html.push('<');
			html.push_str(&container.element);
			push_attribute(html, "data-block", &container.key);

			if let Some(collapsed) = container.collapsed {
				push_attribute(html, "data-collapsed", if collapsed { "true" } else { "false" });

				if !collapsed && container.element == "details" {
					html.push_str(" open");
				}
			}

			html.push('>');

			if let Some(title) = &container.title {
				html.push_str(&format!(
					"<{0}>{1}</{0}>",
					title.element,
					html_escape::encode_text(&title.text)
				));
			}

			let contents = &container.contents;
			html.push_str(&format!("<{}>", contents.element));
			for child in &contents.children {
				write_node(html, child);
			}
			html.push_str(&format!("</{}>", contents.element));

			html.push_str(&format!("</{}>", container.element));
		}
	}
}

fn push_attribute(html: &mut String, name: &str, value: &str) {
	html.push_str(&format!(
		" {name}=\"{}\"",
		html_escape::encode_double_quoted_attribute(value)
	));
}
