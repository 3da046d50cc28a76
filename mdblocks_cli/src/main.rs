use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use mdblocks_cli::CheckFormat;
use mdblocks_cli::Commands;
use mdblocks_cli::MdblocksCli;
use mdblocks_cli::RenderFormat;
use mdblocks_core::MarkdownRenderer;
use mdblocks_core::MdblocksConfig;
use mdblocks_core::MdblocksError;
use mdblocks_core::ParseDiagnostic;
use mdblocks_core::ParseOptions;
use mdblocks_core::PlainText;
use mdblocks_core::SchemaRegistry;
use mdblocks_core::TextRenderer;
use mdblocks_core::TitlePolicy;
use mdblocks_core::UnterminatedPolicy;
use mdblocks_core::parse_with_options;
use mdblocks_core::process_with_options;
use mdblocks_core::to_html;
use mdblocks_core::tokenize;
use miette::NamedSource;
use miette::Severity;
use owo_colors::OwoColorize;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = MdblocksCli::parse();

	init_tracing(args.verbose);

	// Respect NO_COLOR env var, --no-color flag and terminal support.
	let use_color = !args.no_color
		&& std::env::var_os("NO_COLOR").is_none()
		&& supports_color::on(supports_color::Stream::Stderr).is_some();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match &args.command {
		Some(Commands::Render {
			file,
			format,
			plain,
		}) => run_render(&args, file, *format, *plain),
		Some(Commands::Check { file, format }) => run_check(&args, file, *format),
		Some(Commands::Blocks) => run_blocks(&args),
		None => {
			eprintln!("No subcommand specified. Run `mdblocks --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<MdblocksError>() {
			Ok(error) => {
				let report: miette::Report = (*error).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

fn init_tracing(verbose: bool) {
	use tracing_subscriber::layer::SubscriberExt;
	use tracing_subscriber::util::SubscriberInitExt;

	let level = if verbose {
		tracing::Level::DEBUG
	} else {
		tracing::Level::WARN
	};

	let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());
	let fmt_layer = tracing_subscriber::fmt::layer()
		.with_target(false)
		.with_writer(std::io::stderr);

	tracing_subscriber::registry()
		.with(filter)
		.with(fmt_layer)
		.init();
}

fn resolve_root(args: &MdblocksCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// The schema and parser options in effect for this invocation.
struct Settings {
	schema: SchemaRegistry,
	options: ParseOptions,
}

fn load_settings(args: &MdblocksCli) -> Result<Settings, MdblocksError> {
	let root = resolve_root(args);
	let config = MdblocksConfig::load(&root)?.unwrap_or_default();
	let schema = config.schema()?;

	let mut options = config.parse;
	if args.strict {
		options.unterminated = UnterminatedPolicy::Strict;
	}

	tracing::debug!(blocks = schema.len(), "loaded block schema");

	Ok(Settings { schema, options })
}

fn read_document(file: &Path) -> Result<String, MdblocksError> {
	Ok(std::fs::read_to_string(file)?)
}

/// Print each diagnostic as a miette report pointing into the document.
fn print_reports(file: &Path, source: &str, diagnostics: &[ParseDiagnostic]) {
	for diagnostic in diagnostics {
		let report = miette::Report::new(diagnostic.clone()).with_source_code(NamedSource::new(
			file.display().to_string(),
			source.to_string(),
		));
		eprintln!("{report:?}");
	}
}

fn run_render(
	args: &MdblocksCli,
	file: &Path,
	format: RenderFormat,
	plain: bool,
) -> Result<(), Box<dyn std::error::Error>> {
	let settings = load_settings(args)?;
	let source = read_document(file)?;

	let markdown = MarkdownRenderer::default();
	let renderer: &dyn TextRenderer<Fragment = String> = if plain { &PlainText } else { &markdown };

	let rendered = process_with_options(&source, &settings.schema, renderer, settings.options);
	print_reports(file, &source, &rendered.diagnostics);

	match format {
		RenderFormat::Html => println!("{}", to_html(&rendered.nodes)),
		RenderFormat::Json => println!("{}", serde_json::to_string_pretty(&rendered.nodes)?),
	}

	Ok(())
}

fn severity_label(severity: Severity) -> &'static str {
	match severity {
		Severity::Error => "error",
		Severity::Warning => "warning",
		Severity::Advice => "advice",
	}
}

fn run_check(
	args: &MdblocksCli,
	file: &Path,
	format: CheckFormat,
) -> Result<(), Box<dyn std::error::Error>> {
	let settings = load_settings(args)?;
	let source = read_document(file)?;
	let tokens = tokenize(&source);
	let parsed = parse_with_options(&tokens, &settings.schema, settings.options);
	let has_errors = parsed.has_errors();

	match format {
		CheckFormat::Json => {
			let diagnostics: Vec<serde_json::Value> = parsed
				.diagnostics
				.iter()
				.map(|diagnostic| {
					serde_json::json!({
						"code": diagnostic.code_str(),
						"severity": severity_label(diagnostic.level()),
						"message": diagnostic.to_string(),
						"key": diagnostic.key(),
						"line": diagnostic.line(),
						"column": diagnostic.column(),
					})
				})
				.collect();
			let output = serde_json::json!({
				"ok": !has_errors,
				"diagnostics": diagnostics,
			});
			println!("{}", serde_json::to_string_pretty(&output)?);
		}
		CheckFormat::Github => {
			for diagnostic in &parsed.diagnostics {
				let level = match diagnostic.level() {
					Severity::Error => "error",
					Severity::Warning => "warning",
					Severity::Advice => "notice",
				};
				println!(
					"::{level} file={},line={},col={}::{diagnostic}",
					file.display(),
					diagnostic.line(),
					diagnostic.column()
				);
			}
		}
		CheckFormat::Text => {
			print_reports(file, &source, &parsed.diagnostics);

			let errors = parsed
				.diagnostics
				.iter()
				.filter(|diagnostic| diagnostic.is_error())
				.count();
			let others = parsed.diagnostics.len() - errors;

			if parsed.diagnostics.is_empty() {
				println!(
					"{} no problems found in {}",
					colored!("ok:", green),
					file.display()
				);
			} else {
				println!(
					"{} {errors} error(s), {others} warning(s) in {}",
					colored!("checked:", bold),
					file.display()
				);
			}
		}
	}

	if has_errors {
		process::exit(1);
	}

	Ok(())
}

fn run_blocks(args: &MdblocksCli) -> Result<(), Box<dyn std::error::Error>> {
	let settings = load_settings(args)?;

	if settings.schema.is_empty() {
		println!("No blocks configured. Add [blocks.<key>] tables to mdblocks.toml.");
		return Ok(());
	}

	for (key, config) in settings.schema.iter() {
		let title = match config.title_policy() {
			TitlePolicy::Optional {
				default: Some(default),
			} => format!("optional (default: {default})"),
			policy => policy.to_string(),
		};

		let key = format!("{key:<16}");
		println!(
			"{} title={title} collapsible={} <{}> <{}> <{}>",
			colored!(key, bold),
			config.collapsible(),
			config.container_element(),
			config.title_element(),
			config.contents_element()
		);
	}

	Ok(())
}
