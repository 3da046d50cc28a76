use miette::Diagnostic;
use thiserror::Error;

use crate::ParseDiagnostic;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum MdblocksError {
	#[error(transparent)]
	#[diagnostic(code(mdblocks::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(mdblocks::config_parse),
		help("check that mdblocks.toml is valid TOML with [parse] and/or [blocks.<key>] sections")
	)]
	ConfigParse(String),

	#[error("invalid block key: `{0}`")]
	#[diagnostic(
		code(mdblocks::invalid_block_key),
		help("block keys start with a letter or `_` and contain only letters, digits, `_` or `-`")
	)]
	InvalidBlockKey(String),

	#[error("duplicate block key: `{0}`")]
	#[diagnostic(
		code(mdblocks::duplicate_block_key),
		help("each block key can only be registered once")
	)]
	DuplicateBlockKey(String),

	#[error("invalid element name: `{0}`")]
	#[diagnostic(
		code(mdblocks::invalid_element_name),
		help("element names start with an ASCII letter and contain only letters, digits or `-`")
	)]
	InvalidElementName(String),

	#[error(transparent)]
	#[diagnostic(transparent)]
	Block(#[from] ParseDiagnostic),
}

pub type MdblocksResult<T> = Result<T, MdblocksError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
