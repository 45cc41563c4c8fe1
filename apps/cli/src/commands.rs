//! CLI command definitions, routing, and tracing setup.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use automl_catalog_core::pipeline::{self, ValidateReport};
use automl_catalog_core::schema;
use automl_catalog_markdown::MarkdownRenderer;
use automl_catalog_shared::{
    AppConfig, CatalogConfig, config_file_path, init_config, load_config, load_config_from,
};
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// automl-catalog: check and publish the AutoML systems catalog.
#[derive(Parser)]
#[command(
    name = "automl-catalog",
    version,
    about = "Validate AutoML system records and compile them into Markdown documents.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (defaults to automl-catalog.toml in the working directory).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config_file: Option<PathBuf>,

    /// Directory holding the record files.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Directory the documents are written to.
    #[arg(long, global = true)]
    pub out_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Compile the valid records into Markdown documents.
    Compile,

    /// Check every record and report the ones that fail.
    Validate,

    /// Print the JSON Schema of a record file.
    Schema,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
///
/// Warnings are always shown; `-v` and up raise the workspace crates only.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "warn",
        1 => "warn,automl_catalog=info",
        2 => "warn,automl_catalog=debug",
        _ => "warn,automl_catalog=trace",
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<ExitCode> {
    let explicit = cli.config_file.is_some();
    let config_path = match cli.config_file {
        Some(path) => path,
        None => config_file_path()?,
    };

    match cli.command {
        Command::Compile => {
            cmd_compile(&resolve(&config_path, explicit, cli.data_dir, cli.out_dir)?)
        }
        Command::Validate => {
            cmd_validate(&resolve(&config_path, explicit, cli.data_dir, cli.out_dir)?)
        }
        Command::Schema => cmd_schema(),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(&config_path),
            ConfigAction::Show => cmd_config_show(&config_path, explicit),
        },
    }
}

/// Read the config file; an explicitly named file must exist.
fn read_config(path: &Path, explicit: bool) -> Result<AppConfig> {
    let config = if explicit {
        load_config_from(path)
    } else {
        load_config(path)
    };
    config.wrap_err_with(|| format!("cannot load configuration from {}", path.display()))
}

/// Merge flags over the config file over defaults.
fn resolve(
    config_path: &Path,
    explicit: bool,
    data_dir: Option<PathBuf>,
    out_dir: Option<PathBuf>,
) -> Result<CatalogConfig> {
    let app = read_config(config_path, explicit)?;
    let config = CatalogConfig::from(&app)
        .with_overrides(data_dir, out_dir)
        .wrap_err("invalid --data-dir/--out-dir")?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_compile(config: &CatalogConfig) -> Result<ExitCode> {
    let report = pipeline::compile_catalog(config, &MarkdownRenderer)
        .wrap_err("catalog compilation failed")?;

    info!(
        entries = report.entries,
        skipped = report.failures.len(),
        documents = report.documents.len(),
        output_dir = %config.output_dir.display(),
        elapsed_ms = report.elapsed.as_millis() as u64,
        "compile finished"
    );

    Ok(ExitCode::SUCCESS)
}

fn cmd_validate(config: &CatalogConfig) -> Result<ExitCode> {
    let report = pipeline::validate_catalog(config).wrap_err("catalog validation failed")?;

    print_validation(&report, &mut std::io::stdout(), &mut std::io::stderr())?;

    Ok(ExitCode::from(exit_status(&report)))
}

/// Process status of a validate run: non-zero as soon as one record failed.
fn exit_status(report: &ValidateReport) -> u8 {
    if report.is_ok() { 0 } else { 1 }
}

/// `✅ All OK` on `out` when clean, otherwise one block per failing record
/// on `err`.
fn print_validation(
    report: &ValidateReport,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> std::io::Result<()> {
    if report.is_ok() {
        return writeln!(out, "✅ All OK");
    }

    for failure in &report.failures {
        writeln!(
            err,
            "🔴 {} : {} validation error(s)",
            failure.key,
            failure.errors.len()
        )?;
        write!(err, "{}", failure.report())?;
        writeln!(err)?;
    }

    Ok(())
}

fn cmd_schema() -> Result<ExitCode> {
    let schema = serde_json::to_string_pretty(&schema::record_schema())?;
    println!("{schema}");
    Ok(ExitCode::SUCCESS)
}

fn cmd_config_init(path: &Path) -> Result<ExitCode> {
    init_config(path)?;
    println!("Config initialized at: {}", path.display());
    Ok(ExitCode::SUCCESS)
}

fn cmd_config_show(path: &Path, explicit: bool) -> Result<ExitCode> {
    let config = read_config(path, explicit)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(ExitCode::SUCCESS)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use automl_catalog_core::validate::{FieldError, ValidationError, Violation};
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "automl-catalog",
            "validate",
            "--data-dir",
            "records",
            "-vv",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Validate));
        assert_eq!(cli.data_dir, Some(PathBuf::from("records")));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn clean_report_prints_all_ok() {
        let report = ValidateReport {
            checked: 3,
            failures: vec![],
        };
        let (mut out, mut err) = (Vec::new(), Vec::new());
        print_validation(&report, &mut out, &mut err).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "✅ All OK\n");
        assert!(err.is_empty());
    }

    #[test]
    fn failures_print_key_count_and_paths() {
        let failure = ValidationError::new(
            "tpot",
            vec![
                FieldError::new("name", Violation::Missing),
                FieldError::new(
                    "open_source",
                    Violation::WrongType {
                        expected: "bool",
                        found: "string",
                    },
                ),
            ],
        );
        let report = ValidateReport {
            checked: 3,
            failures: vec![failure],
        };
        let (mut out, mut err) = (Vec::new(), Vec::new());
        print_validation(&report, &mut out, &mut err).unwrap();

        assert!(out.is_empty());
        assert_eq!(
            String::from_utf8(err).unwrap(),
            "🔴 tpot : 2 validation error(s)\n  name\n    field required\n  open_source\n    expected bool, found string\n\n"
        );
    }

    #[test]
    fn exit_status_follows_failures() {
        let clean = ValidateReport {
            checked: 2,
            failures: vec![],
        };
        assert_eq!(exit_status(&clean), 0);

        let failing = ValidateReport {
            checked: 2,
            failures: vec![ValidationError::new(
                "broken",
                vec![FieldError::new("name", Violation::Missing)],
            )],
        };
        assert_eq!(exit_status(&failing), 1);
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("automl-catalog.toml");
        std::fs::write(&path, "[paths]\ndata_dir = \"records\"\noutput_dir = \"site\"\n").unwrap();

        let config = resolve(&path, true, None, Some(PathBuf::from("public"))).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("records"));
        assert_eq!(config.output_dir, PathBuf::from("public"));
        assert_eq!(config.template_file, "_template.yml");
    }

    #[test]
    fn explicit_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        assert!(resolve(&path, true, None, None).is_err());

        let defaults = resolve(&path, false, None, None).unwrap();
        assert_eq!(defaults.output_dir, PathBuf::from("docs"));
    }

    #[test]
    fn out_dir_flag_cannot_target_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("automl-catalog.toml");
        std::fs::write(&path, "[paths]\ndata_dir = \"records\"\n").unwrap();

        assert!(resolve(&path, true, None, Some(PathBuf::from("records"))).is_err());
    }
}
