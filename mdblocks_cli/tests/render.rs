mod common;

use mdblocks_core::AnyEmptyResult;
use serde_json::Value;

#[test]
fn render_outputs_html_with_markdown() -> AnyEmptyResult {
	let tmp = common::project(":::note My Title\nHello *world*\n:::\n")?;

	common::mdblocks_cmd()
		.arg("render")
		.arg(tmp.path().join("doc.md"))
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(
			r#"<div data-block="note"><strong>My Title</strong><p>"#,
		))
		.stdout(predicates::str::contains("<em>world</em>"));

	Ok(())
}

#[test]
fn render_plain_passes_text_through() -> AnyEmptyResult {
	let tmp = common::project(":::note\nHello *world*\n:::\n")?;

	common::mdblocks_cmd()
		.arg("render")
		.arg("--plain")
		.arg(tmp.path().join("doc.md"))
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(
			"<strong>Note</strong><p>Hello *world*\n</p>",
		));

	Ok(())
}

#[test]
fn render_json_prints_tree() -> AnyEmptyResult {
	let tmp = common::project(":::warning Careful\nBody\n:::\n")?;

	let output = common::mdblocks_cmd()
		.arg("render")
		.arg("--format")
		.arg("json")
		.arg(tmp.path().join("doc.md"))
		.arg("--path")
		.arg(tmp.path())
		.output()?;

	assert!(output.status.success());
	let value: Value = serde_json::from_slice(&output.stdout)?;
	let container = &value[0]["container"];
	assert_eq!(container["key"], "warning");
	assert_eq!(container["element"], "details");
	assert_eq!(container["collapsed"], true);
	assert_eq!(container["title"]["text"], "Careful");

	Ok(())
}

#[test]
fn render_reports_unknown_keys_and_keeps_text() -> AnyEmptyResult {
	let tmp = common::project(":::missing\nHello\n:::\n")?;

	common::mdblocks_cmd()
		.arg("render")
		.arg("--plain")
		.arg(tmp.path().join("doc.md"))
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(":::missing\nHello\n:::\n"))
		.stderr(predicates::str::contains("unknown block key `missing`"));

	Ok(())
}

#[test]
fn render_missing_file_fails() -> AnyEmptyResult {
	let tmp = common::project("")?;

	common::mdblocks_cmd()
		.arg("render")
		.arg(tmp.path().join("absent.md"))
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2);

	Ok(())
}

#[test]
fn render_invalid_config_fails() -> AnyEmptyResult {
	let tmp = common::project("text\n")?;
	std::fs::write(
		tmp.path().join("mdblocks.toml"),
		"[blocks.note]\ntitle = \"sometimes\"\n",
	)?;

	common::mdblocks_cmd()
		.arg("render")
		.arg(tmp.path().join("doc.md"))
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("failed to parse config file"));

	Ok(())
}

#[test]
fn blocks_lists_configured_keys() -> AnyEmptyResult {
	let tmp = common::project("")?;

	common::mdblocks_cmd()
		.arg("blocks")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("optional (default: Note)"))
		.stdout(predicates::str::contains("title=required collapsible=true"));

	Ok(())
}

#[test]
fn blocks_pads_keys_before_coloring() -> AnyEmptyResult {
	let tmp = common::project("")?;

	common::mdblocks_cmd()
		.env_remove("NO_COLOR")
		.env("FORCE_COLOR", "1")
		.arg("blocks")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(
			"\u{1b}[1mnote            \u{1b}[0m title=optional",
		))
		.stdout(predicates::str::contains(
			"\u{1b}[1mwarning         \u{1b}[0m title=required",
		));

	Ok(())
}

#[test]
fn blocks_without_config_explains_setup() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::mdblocks_cmd()
		.arg("blocks")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("No blocks configured"));

	Ok(())
}
