//! awsm-md - Convert extended Markdown documents to HTML
//!
//! Entry point for the command line tool. Handles CLI argument parsing,
//! logging initialization, and the conversion itself.

use anyhow::{bail, Context};
use awsm_md::config::{Config, ThemePreference};
use awsm_md::error::AppError;
use awsm_md::file_handler::{read_document, read_stream, write_file_atomic};
use awsm_md::markdown::{ExportFormat, MarkdownExporter, MarkdownRenderer};
use std::path::{Path, PathBuf};

/// Application name for logging
const APP_NAME: &str = "awsm-md";

/// Input path meaning standard input
const STDIN_PATH: &str = "-";

fn main() {
    init_logging();

    let action = match parse_args(std::env::args().skip(1)) {
        Ok(action) => action,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            eprintln!("Use --help for usage information");
            std::process::exit(2);
        }
    };

    match action {
        CliAction::Help => print_help(),
        CliAction::Version => print_version(),
        CliAction::Convert(args) => {
            if let Err(err) = run(&args) {
                report_error(&err);
                std::process::exit(1);
            }
        }
    }
}

/// Initialize the logging system
fn init_logging() {
    // Set default log level if not specified
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info,awsm_md=debug");
    }

    env_logger::Builder::from_default_env()
        .format_timestamp_millis()
        .init();
}

/// What the command line asked for
#[derive(Debug, Clone, PartialEq, Eq)]
enum CliAction {
    Help,
    Version,
    Convert(CliArgs),
}

/// Options for a conversion run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct CliArgs {
    input: PathBuf,
    output: Option<PathBuf>,
    format: Option<String>,
    theme: Option<ThemePreference>,
    config: Option<PathBuf>,
    preprocess_only: bool,
    toc_only: bool,
    no_styles: bool,
}

/// Parse command line arguments (without the program name)
fn parse_args<I>(args: I) -> anyhow::Result<CliAction>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut parsed = CliArgs::default();
    let mut input = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(CliAction::Help),
            "-v" | "--version" => return Ok(CliAction::Version),
            "-o" | "--output" => {
                parsed.output = Some(PathBuf::from(value_for(&arg, args.next())?));
            }
            "-f" | "--format" => {
                parsed.format = Some(value_for(&arg, args.next())?);
            }
            "-t" | "--theme" => {
                let value = value_for(&arg, args.next())?;
                parsed.theme = Some(
                    ThemePreference::parse(&value)
                        .with_context(|| format!("Unknown theme '{}' (expected light or dark)", value))?,
                );
            }
            "-c" | "--config" => {
                parsed.config = Some(PathBuf::from(value_for(&arg, args.next())?));
            }
            "--preprocess" => parsed.preprocess_only = true,
            "--toc" => parsed.toc_only = true,
            "--no-styles" => parsed.no_styles = true,
            flag if flag.starts_with('-') && flag != STDIN_PATH => {
                bail!("Unknown option: {}", flag);
            }
            _ => {
                if input.is_some() {
                    bail!("Only one input file may be given (extra: {})", arg);
                }
                input = Some(PathBuf::from(arg));
            }
        }
    }

    if parsed.preprocess_only && parsed.toc_only {
        bail!("--preprocess and --toc cannot be combined");
    }

    parsed.input = input.context("Missing input file")?;
    Ok(CliAction::Convert(parsed))
}

fn value_for(flag: &str, value: Option<String>) -> anyhow::Result<String> {
    value.with_context(|| format!("{} requires an argument", flag))
}

/// Run one conversion
fn run(args: &CliArgs) -> anyhow::Result<()> {
    let mut config = Config::load(args.config.as_deref())
        .map_err(AppError::from)
        .context("Failed to load configuration")?;

    if let Some(theme) = args.theme {
        config.ui.theme = theme;
    }
    if args.no_styles {
        config.export.include_styles = false;
    }

    let markdown = read_input(&args.input, config.files.max_file_size)?;
    let renderer = MarkdownRenderer::new(config.color_table(), config.render_options());

    let output = if args.toc_only {
        renderer.toc(&markdown, 1)
    } else {
        let format = if args.preprocess_only {
            ExportFormat::Markdown
        } else {
            resolve_format(args, &config)?
        };
        log::debug!("Converting {} as {}", args.input.display(), format.display_name());

        let exporter = MarkdownExporter::new(renderer);
        let options = config.export_options(document_title(&args.input));
        exporter.export(&markdown, format, &options)
    };

    match args.output {
        Some(ref path) => write_file_atomic(path, &output)
            .map_err(AppError::from)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{}", output),
    }

    Ok(())
}

fn read_input(path: &Path, max_size: u64) -> anyhow::Result<String> {
    let result = if path.as_os_str() == STDIN_PATH {
        read_stream(std::io::stdin().lock(), path, max_size)
            .map_err(AppError::from)
            .context("Failed to read standard input")?
    } else {
        read_document(path, max_size)
            .map_err(AppError::from)
            .with_context(|| format!("Failed to read {}", path.display()))?
    };
    Ok(result.content)
}

/// `--format`, else the output file's extension, else the configured default
fn resolve_format(args: &CliArgs, config: &Config) -> anyhow::Result<ExportFormat> {
    let format = match (&args.format, &args.output) {
        (Some(name), _) => Some(ExportFormat::from_name(name)),
        (None, Some(path)) if path.extension().is_some() => Some(ExportFormat::from_path(path)),
        _ => None,
    };

    match format {
        Some(format) => Ok(format.map_err(AppError::from)?),
        None => Ok(config.export.default_format),
    }
}

fn document_title(input: &Path) -> Option<String> {
    if input.as_os_str() == STDIN_PATH {
        return None;
    }
    input
        .file_stem()
        .and_then(|s| s.to_str())
        .map(String::from)
}

/// Print the error chain, preferring the friendly message of our own errors
fn report_error(err: &anyhow::Error) {
    eprintln!("Error: {:#}", err);

    if let Some(app_err) = err.chain().find_map(|cause| cause.downcast_ref::<AppError>()) {
        eprintln!("{}", app_err.user_message());
    }
}

/// Print help message
fn print_help() {
    println!(
        r#"awsm-md - Extended Markdown to HTML converter

USAGE:
    {} [OPTIONS] <INPUT>

ARGS:
    <INPUT>             Markdown file to convert ('-' reads standard input)

OPTIONS:
    -h, --help          Show this help message
    -v, --version       Show version information
    -o, --output PATH   Write the result to PATH instead of standard output
    -f, --format FMT    Output format: html or md
    -t, --theme THEME   Stylesheet theme: light or dark
    -c, --config PATH   Use this configuration file
        --preprocess    Print the preprocessed Markdown
        --toc           Print the table of contents of the input
        --no-styles     Do not embed the stylesheet in HTML output

EXAMPLES:
    awsm-md notes.md                    Print notes.md as HTML
    awsm-md notes.md -o notes.html      Write a standalone HTML file
    awsm-md -t dark notes.md -o out.html
    awsm-md --preprocess notes.md       Show the expanded Markdown
"#,
        APP_NAME
    );
}

/// Print version information
fn print_version() {
    println!("{} {}", APP_NAME, env!("CARGO_PKG_VERSION"));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> anyhow::Result<CliAction> {
        parse_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_help_and_version() {
        assert_eq!(parse(&["-h"]).unwrap(), CliAction::Help);
        assert_eq!(parse(&["in.md", "--version"]).unwrap(), CliAction::Version);
    }

    #[test]
    fn test_parse_convert() {
        let action = parse(&["notes.md", "-o", "out.html", "-t", "dark", "--no-styles"]).unwrap();
        let CliAction::Convert(args) = action else {
            panic!("expected convert");
        };
        assert_eq!(args.input, PathBuf::from("notes.md"));
        assert_eq!(args.output, Some(PathBuf::from("out.html")));
        assert_eq!(args.theme, Some(ThemePreference::Dark));
        assert!(args.no_styles);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["a.md", "b.md"]).is_err());
        assert!(parse(&["a.md", "--bogus"]).is_err());
        assert!(parse(&["a.md", "-o"]).is_err());
        assert!(parse(&["a.md", "-t", "sepia"]).is_err());
        assert!(parse(&["a.md", "--toc", "--preprocess"]).is_err());
    }

    #[test]
    fn test_parse_stdin_input() {
        let CliAction::Convert(args) = parse(&["-"]).unwrap() else {
            panic!("expected convert");
        };
        assert_eq!(args.input, PathBuf::from("-"));
        assert_eq!(document_title(&args.input), None);
    }

    #[test]
    fn test_resolve_format() {
        let config = Config::default();
        let mut args = CliArgs {
            output: Some(PathBuf::from("out.md")),
            ..Default::default()
        };
        assert_eq!(resolve_format(&args, &config).unwrap(), ExportFormat::Markdown);

        args.format = Some("html".to_string());
        assert_eq!(resolve_format(&args, &config).unwrap(), ExportFormat::Html);

        args.format = Some("pdf".to_string());
        assert!(resolve_format(&args, &config).is_err());

        let args = CliArgs::default();
        assert_eq!(resolve_format(&args, &config).unwrap(), ExportFormat::Html);
    }
}
