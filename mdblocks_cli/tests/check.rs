mod common;

use mdblocks_core::AnyEmptyResult;
use rstest::rstest;
use serde_json::Value;

#[test]
fn check_passes_for_well_formed_document() -> AnyEmptyResult {
	let tmp = common::project(":::warning Careful\nBody\n:::\n")?;

	common::mdblocks_cmd()
		.arg("check")
		.arg(tmp.path().join("doc.md"))
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("no problems found"));

	Ok(())
}

#[test]
fn check_fails_for_missing_required_title() -> AnyEmptyResult {
	let tmp = common::project(":::warning\nBody\n:::\n")?;

	common::mdblocks_cmd()
		.arg("check")
		.arg(tmp.path().join("doc.md"))
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stdout(predicates::str::contains("1 error(s), 0 warning(s)"))
		.stderr(predicates::str::contains("block `warning` requires a title"));

	Ok(())
}

#[test]
fn check_json_lists_diagnostics() -> AnyEmptyResult {
	let tmp = common::project("intro\n:::warning\nBody\n:::\n:::missing\n")?;

	let output = common::mdblocks_cmd()
		.arg("check")
		.arg("--format")
		.arg("json")
		.arg(tmp.path().join("doc.md"))
		.arg("--path")
		.arg(tmp.path())
		.output()?;

	assert_eq!(output.status.code(), Some(1));
	let value: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(value["ok"], false);

	let diagnostics = value["diagnostics"].as_array().cloned().unwrap_or_default();
	assert_eq!(diagnostics.len(), 2);
	assert_eq!(diagnostics[0]["code"], "mdblocks::missing_required_title");
	assert_eq!(diagnostics[0]["severity"], "error");
	assert_eq!(diagnostics[0]["line"], 2);
	assert_eq!(diagnostics[1]["code"], "mdblocks::unknown_block_key");
	assert_eq!(diagnostics[1]["key"], "missing");

	Ok(())
}

#[test]
fn check_github_emits_annotations() -> AnyEmptyResult {
	let tmp = common::project(":::warning\nBody\n:::\n")?;

	common::mdblocks_cmd()
		.arg("check")
		.arg("--format")
		.arg("github")
		.arg(tmp.path().join("doc.md"))
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stdout(predicates::str::contains("::error file="))
		.stdout(predicates::str::contains(
			"line=1,col=1::block `warning` requires a title",
		));

	Ok(())
}

#[rstest]
#[case::lenient(false, 0)]
#[case::strict(true, 1)]
fn check_unterminated_block(#[case] strict: bool, #[case] code: i32) -> AnyEmptyResult {
	let tmp = common::project(":::note\nnever closed\n")?;

	let mut cmd = common::mdblocks_cmd();
	cmd.arg("check")
		.arg(tmp.path().join("doc.md"))
		.arg("--path")
		.arg(tmp.path());

	if strict {
		cmd.arg("--strict");
	}

	cmd.assert()
		.code(code)
		.stderr(predicates::str::contains("block `note` is never closed"));

	Ok(())
}
