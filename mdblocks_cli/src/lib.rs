use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Render markdown documents containing custom `:::` blocks.",
	long_about = "mdblocks recognises custom blocks such as notes, warnings and collapsible \
	              callouts inside markdown and renders them using the block definitions in \
	              mdblocks.toml.\n\nQuick start:\n  mdblocks render doc.md   Render a document \
	              to HTML\n  mdblocks check doc.md    Report malformed blocks\n  mdblocks blocks          \
	              List the configured blocks"
)]
pub struct MdblocksCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Directory to search for `mdblocks.toml`.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,

	/// Treat blocks that are never closed as errors.
	#[arg(long, global = true, default_value_t = false)]
	pub strict: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Render a document.
	///
	/// Prints the rendered document to stdout and any diagnostics to stderr.
	/// Rendering always completes, even when the document contains
	/// malformed blocks.
	Render {
		/// The markdown file to render.
		file: PathBuf,

		/// Output format. `html` serializes the render tree, `json` prints
		/// the tree itself.
		#[arg(long, value_enum, default_value_t = RenderFormat::Html)]
		format: RenderFormat,

		/// Pass text through unchanged instead of rendering it as markdown.
		#[arg(long, default_value_t = false)]
		plain: bool,
	},
	/// Check a document for malformed blocks.
	///
	/// Exits with a non-zero status code when any error is found, such as a
	/// block missing a required title.
	Check {
		/// The markdown file to check.
		file: PathBuf,

		/// Output format for diagnostics. Use `text` for human-readable
		/// output, `json` for programmatic consumption, or `github` for
		/// GitHub Actions annotations.
		#[arg(long, value_enum, default_value_t = CheckFormat::Text)]
		format: CheckFormat,
	},
	/// List the configured block keys.
	Blocks,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RenderFormat {
	/// HTML markup.
	Html,
	/// The render tree as JSON.
	Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CheckFormat {
	/// Human-readable reports with source excerpts.
	Text,
	/// JSON output for programmatic consumption.
	Json,
	/// GitHub Actions annotation format.
	Github,
}
