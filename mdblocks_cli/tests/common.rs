use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub const CONFIG: &str = r#"
[blocks.note]
title = "optional"
default_title = "Note"
container = "div"
title_element = "strong"
contents = "p"

[blocks.warning]
title = "required"
collapsible = true
container = "details"
title_element = "summary"
"#;

pub fn mdblocks_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("mdblocks"));
	cmd.env("NO_COLOR", "1");
	cmd
}

/// A project directory with `mdblocks.toml` and a single `doc.md`.
pub fn project(document: &str) -> std::io::Result<tempfile::TempDir> {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("mdblocks.toml"), CONFIG)?;
	std::fs::write(tmp.path().join("doc.md"), document)?;

	Ok(tmp)
}
