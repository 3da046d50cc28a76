use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::PoisonError;
use std::sync::RwLock;

use crate::MdblocksError;
use crate::MdblocksResult;

pub const DEFAULT_CONTAINER_ELEMENT: &str = "div";
pub const DEFAULT_TITLE_ELEMENT: &str = "strong";
pub const DEFAULT_CONTENTS_ELEMENT: &str = "div";

/// How a block treats the text following its key on the opening line.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TitlePolicy {
	/// The block never has a title. Any text after the key is ignored.
	None,
	/// The written title is used when present, otherwise `default`.
	Optional { default: Option<String> },
	/// A title must be written. A missing title is reported as a
	/// diagnostic and rendered empty.
	Required,
}

impl TitlePolicy {
	/// An optional title that falls back to `default`.
	pub fn optional(default: impl Into<String>) -> Self {
		Self::Optional {
			default: Some(default.into()),
		}
	}

	/// An optional title with no fallback.
	pub fn optional_without_default() -> Self {
		Self::Optional { default: None }
	}
}

impl std::fmt::Display for TitlePolicy {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::None => write!(f, "none"),
			Self::Optional { .. } => write!(f, "optional"),
			Self::Required => write!(f, "required"),
		}
	}
}

/// The configuration for a single block key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockConfig {
	title_policy: TitlePolicy,
	collapsible: bool,
	container_element: String,
	title_element: String,
	contents_element: String,
}

impl Default for BlockConfig {
	fn default() -> Self {
		Self::new(TitlePolicy::optional_without_default())
	}
}

impl BlockConfig {
	/// A non-collapsible block using the default element names.
	pub fn new(title_policy: TitlePolicy) -> Self {
		Self {
			title_policy,
			collapsible: false,
			container_element: DEFAULT_CONTAINER_ELEMENT.to_string(),
			title_element: DEFAULT_TITLE_ELEMENT.to_string(),
			contents_element: DEFAULT_CONTENTS_ELEMENT.to_string(),
		}
	}

	#[must_use]
	pub fn with_collapsible(mut self, collapsible: bool) -> Self {
		self.collapsible = collapsible;
		self
	}

	/// Set the container, title and contents element names.
	pub fn with_elements(
		mut self,
		container: impl Into<String>,
		title: impl Into<String>,
		contents: impl Into<String>,
	) -> MdblocksResult<Self> {
		self.container_element = validate_element_name(container.into())?;
		self.title_element = validate_element_name(title.into())?;
		self.contents_element = validate_element_name(contents.into())?;

		Ok(self)
	}

	pub fn title_policy(&self) -> &TitlePolicy {
		&self.title_policy
	}

	/// Collapsible blocks start collapsed.
	pub fn collapsible(&self) -> bool {
		self.collapsible
	}

	pub fn container_element(&self) -> &str {
		&self.container_element
	}

	pub fn title_element(&self) -> &str {
		&self.title_element
	}

	pub fn contents_element(&self) -> &str {
		&self.contents_element
	}
}

/// Returns true when `key` can be written after a `:::` delimiter.
pub fn is_valid_block_key(key: &str) -> bool {
	let mut chars = key.chars();

	chars
		.next()
		.is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
		&& chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-')
}

fn validate_element_name(name: String) -> MdblocksResult<String> {
	let mut chars = name.chars();
	let valid = chars.next().is_some_and(|first| first.is_ascii_alphabetic())
		&& chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '-');

	if valid {
		Ok(name)
	} else {
		Err(MdblocksError::InvalidElementName(name))
	}
}

/// An immutable mapping from block key to [`BlockConfig`].
///
/// Keys are case-sensitive. Iteration is in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaRegistry {
	blocks: BTreeMap<String, BlockConfig>,
}

impl SchemaRegistry {
	pub fn builder() -> SchemaBuilder {
		SchemaBuilder::default()
	}

	pub fn lookup(&self, key: &str) -> Option<&BlockConfig> {
		self.blocks.get(key)
	}

	pub fn contains(&self, key: &str) -> bool {
		self.blocks.contains_key(key)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &BlockConfig)> {
		self.blocks
			.iter()
			.map(|(key, config)| (key.as_str(), config))
	}

	pub fn len(&self) -> usize {
		self.blocks.len()
	}

	pub fn is_empty(&self) -> bool {
		self.blocks.is_empty()
	}
}

/// Collects block definitions and validates them into a [`SchemaRegistry`].
#[derive(Debug, Default)]
pub struct SchemaBuilder {
	blocks: Vec<(String, BlockConfig)>,
}

impl SchemaBuilder {
	#[must_use]
	pub fn block(mut self, key: impl Into<String>, config: BlockConfig) -> Self {
		self.blocks.push((key.into(), config));
		self
	}

	pub fn build(self) -> MdblocksResult<SchemaRegistry> {
		let mut blocks = BTreeMap::new();

		for (key, config) in self.blocks {
			if !is_valid_block_key(&key) {
				return Err(MdblocksError::InvalidBlockKey(key));
			}

			if blocks.contains_key(&key) {
				return Err(MdblocksError::DuplicateBlockKey(key));
			}

			blocks.insert(key, config);
		}

		Ok(SchemaRegistry { blocks })
	}
}

/// A schema that can be swapped at runtime.
///
/// Readers take a [`snapshot`](SharedSchema::snapshot) before parsing and
/// keep using it for the whole pass, so a concurrent
/// [`replace`](SharedSchema::replace) is observed either entirely or not at
/// all.
#[derive(Debug, Default)]
pub struct SharedSchema {
	current: RwLock<Arc<SchemaRegistry>>,
}

impl SharedSchema {
	pub fn new(schema: SchemaRegistry) -> Self {
		Self {
			current: RwLock::new(Arc::new(schema)),
		}
	}

	pub fn snapshot(&self) -> Arc<SchemaRegistry> {
		let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
		Arc::clone(&guard)
	}

	/// Install `schema` and return the schema it replaced.
	pub fn replace(&self, schema: SchemaRegistry) -> Arc<SchemaRegistry> {
		let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
		std::mem::replace(&mut *guard, Arc::new(schema))
	}
}
