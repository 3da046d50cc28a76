use crate::BlockConfig;
use crate::SchemaRegistry;
use crate::TextRenderer;
use crate::TitlePolicy;

/// `note` with an optional title defaulting to `Note`.
pub fn note_config() -> BlockConfig {
	BlockConfig::new(TitlePolicy::optional("Note"))
		.with_elements("div", "strong", "p")
		.unwrap()
}

/// `warning` requires a title and renders as a collapsible `details`.
pub fn warning_config() -> BlockConfig {
	BlockConfig::new(TitlePolicy::Required)
		.with_collapsible(true)
		.with_elements("details", "summary", "div")
		.unwrap()
}

/// `aside` never has a title.
pub fn aside_config() -> BlockConfig {
	BlockConfig::new(TitlePolicy::None)
		.with_elements("aside", "h4", "section")
		.unwrap()
}

pub fn note_schema() -> SchemaRegistry {
	SchemaRegistry::builder()
		.block("note", note_config())
		.build()
		.unwrap()
}

pub fn callout_schema() -> SchemaRegistry {
	SchemaRegistry::builder()
		.block("note", note_config())
		.block("warning", warning_config())
		.block("aside", aside_config())
		.block("tip", BlockConfig::new(TitlePolicy::optional_without_default()))
		.build()
		.unwrap()
}

/// Renders text with surrounding whitespace removed so html output fits on a
/// single line.
pub struct Trimmed;

impl TextRenderer for Trimmed {
	type Fragment = String;

	fn render_text(&self, text: &str) -> Self::Fragment {
		text.trim().to_string()
	}
}

pub const CALLOUT_CONFIG_TOML: &str = r#"
[parse]
unterminated = "strict"
report_stray_ends = false
max_depth = 8

[blocks.note]
title = "optional"
default_title = "Note"
container = "div"
title_element = "strong"
contents = "p"

[blocks.warning]
title = "required"
default_title = "Ignored"
collapsible = true
container = "details"
title_element = "summary"

[blocks.aside]
title = "none"
"#;
