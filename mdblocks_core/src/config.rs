use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::BlockConfig;
use crate::MdblocksError;
use crate::MdblocksResult;
use crate::ParseOptions;
use crate::SchemaRegistry;
use crate::TitlePolicy;
use crate::schema::DEFAULT_CONTAINER_ELEMENT;
use crate::schema::DEFAULT_CONTENTS_ELEMENT;
use crate::schema::DEFAULT_TITLE_ELEMENT;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = [
	"mdblocks.toml",
	".mdblocks.toml",
	".config/mdblocks.toml",
];

/// The `title` setting of a block entry.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TitleMode {
	None,
	#[default]
	Optional,
	Required,
}

/// A single `[blocks.<key>]` table.
///
/// ```toml
/// [blocks.warning]
/// title = "required"
/// collapsible = true
/// container = "details"
/// title_element = "summary"
/// contents = "div"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlockEntry {
	#[serde(default)]
	pub title: TitleMode,
	/// Fallback for `optional` titles. Ignored for other modes.
	#[serde(default)]
	pub default_title: Option<String>,
	#[serde(default)]
	pub collapsible: bool,
	#[serde(default = "default_container")]
	pub container: String,
	#[serde(default = "default_title_element")]
	pub title_element: String,
	#[serde(default = "default_contents")]
	pub contents: String,
}

fn default_container() -> String {
	DEFAULT_CONTAINER_ELEMENT.to_string()
}

fn default_title_element() -> String {
	DEFAULT_TITLE_ELEMENT.to_string()
}

fn default_contents() -> String {
	DEFAULT_CONTENTS_ELEMENT.to_string()
}

impl BlockEntry {
	fn to_block_config(&self, key: &str) -> MdblocksResult<BlockConfig> {
		let title_policy = match self.title {
			TitleMode::None => TitlePolicy::None,
			TitleMode::Optional => {
				TitlePolicy::Optional {
					default: self.default_title.clone(),
				}
			}
			TitleMode::Required => TitlePolicy::Required,
		};

		if self.title != TitleMode::Optional && self.default_title.is_some() {
			tracing::warn!(key, "`default_title` only applies to optional titles, ignoring it");
		}

		BlockConfig::new(title_policy)
			.with_collapsible(self.collapsible)
			.with_elements(&self.container, &self.title_element, &self.contents)
	}
}

/// Configuration loaded from an `mdblocks.toml` file.
///
/// ```toml
/// [parse]
/// unterminated = "auto-close"
/// report_stray_ends = true
/// max_depth = 64
///
/// [blocks.note]
/// title = "optional"
/// default_title = "Note"
/// container = "div"
/// title_element = "strong"
/// contents = "p"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MdblocksConfig {
	/// Parser behaviour for malformed documents.
	#[serde(default)]
	pub parse: ParseOptions,
	/// Block definitions keyed by block key.
	#[serde(default)]
	pub blocks: BTreeMap<String, BlockEntry>,
}

impl MdblocksConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> MdblocksResult<Option<MdblocksConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		tracing::debug!(path = %config_path.display(), "loading config");
		let content = std::fs::read_to_string(&config_path)?;

		Self::from_toml_str(&content).map(Some)
	}

	pub fn from_toml_str(content: &str) -> MdblocksResult<MdblocksConfig> {
		toml::from_str(content).map_err(|e| MdblocksError::ConfigParse(e.to_string()))
	}

	/// Parse the same shape from JSON, for hosts that store block
	/// definitions as documents.
	pub fn from_json_str(content: &str) -> MdblocksResult<MdblocksConfig> {
		serde_json::from_str(content).map_err(|e| MdblocksError::ConfigParse(e.to_string()))
	}

	/// Build the immutable registry described by `[blocks]`.
	pub fn schema(&self) -> MdblocksResult<SchemaRegistry> {
		let mut builder = SchemaRegistry::builder();

		for (key, entry) in &self.blocks {
			builder = builder.block(key, entry.to_block_config(key)?);
		}

		builder.build()
	}
}
