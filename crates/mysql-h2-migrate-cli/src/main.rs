//! mysql-h2-migrate CLI - run MySQL migration scripts against H2.

use clap::{Parser, Subcommand};
use mysql_h2_migrate::{
    strategy_for, Config, DialectTranslator, DirectoryTarget, MigrateError, Migrator,
};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::level_filters::LevelFilter;
use tracing::{info, info_span, Level};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mysql-h2-migrate")]
#[command(about = "Run MySQL migration scripts against H2")]
#[command(version)]
struct Cli {
    /// Path to YAML configuration file
    #[arg(short, long, default_value = "migrate.yaml")]
    config: PathBuf,

    /// Output JSON result to stdout
    #[arg(long)]
    output_json: bool,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "info")]
    verbosity: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate a MySQL script to H2 (no configuration needed)
    Translate {
        /// Script to translate, or "-" for stdin
        input: PathBuf,

        /// Write the result here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Apply pending migrations
    Migrate {
        /// Clean the target before migrating
        #[arg(long)]
        clean: bool,
    },

    /// Remove all applied migrations from the target
    Clean,

    /// List migrations and their status
    Info,
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

fn run() -> Result<(), MigrateError> {
    let cli = Cli::parse();

    setup_logging(&cli.verbosity, &cli.log_format)
        .map_err(|e| MigrateError::Config(e.to_string()))?;

    // Translate works on a single script and ignores the config file
    if let Commands::Translate { input, output } = &cli.command {
        return translate(input, output.as_deref());
    }

    let mut config = Config::load(&cli.config)?;
    info!("Loaded configuration from {:?}", cli.config);

    let span = info_span!("migrator", dialect = %config.migration.dialect);
    let mut target = DirectoryTarget::with_span(&config.target, span.clone());

    match cli.command {
        Commands::Translate { .. } => unreachable!(), // Handled above
        Commands::Migrate { clean } => {
            if !config.migration.enabled {
                println!("Migrations are disabled (migration.enabled: false), nothing to do");
                return Ok(());
            }
            if clean {
                config.migration.clean_before_migrate = true;
            }

            let strategy = strategy_for(&config.migration);
            let mut migrator = Migrator::with_span(config.migration, span);
            let report = strategy.run(&mut migrator, &mut target)?;

            if cli.output_json {
                println!("{}", report.to_json()?);
            } else {
                println!("Migration completed ({})", report.strategy);
                println!("  Run ID: {}", report.run_id);
                if let Some(cleaned) = report.cleaned {
                    println!("  Cleaned: {} migrations", cleaned);
                }
                println!("  Scripts resolved: {}", report.scripts_resolved);
                println!("  Scripts applied: {}", report.scripts_applied);
                for version in &report.applied_versions {
                    println!("    - {}", version);
                }
                println!("  Rewired resolvers: {}", report.rewired_resolvers);
                println!("  Duration: {:.2}s", report.duration_seconds);
            }
        }
        Commands::Clean => {
            if !config.migration.enabled {
                println!("Migrations are disabled (migration.enabled: false), nothing to do");
                return Ok(());
            }

            let migrator = Migrator::with_span(config.migration, span);
            let removed = migrator.clean(&mut target)?.output;

            if cli.output_json {
                let result = serde_json::json!({ "removed": removed });
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("Removed {} migrations from {:?}", removed, target.output_dir());
            }
        }
        Commands::Info => {
            let migrator = Migrator::with_span(config.migration, span);
            let rows = migrator.info(&mut target)?.output;

            if cli.output_json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else if rows.is_empty() {
                println!("No migrations found");
            } else {
                println!("{:<12} {:<10} {:<26} Description", "Version", "Status", "Applied at");
                for row in &rows {
                    let applied_at = row
                        .applied_at
                        .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
                        .unwrap_or_default();
                    println!(
                        "{:<12} {:<10} {:<26} {}",
                        row.version.to_string(),
                        row.status.to_string(),
                        applied_at,
                        row.description
                    );
                }
            }
        }
    }
    Ok(())
}

fn translate(input: &Path, output: Option<&Path>) -> Result<(), MigrateError> {
    let source = if input.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(input)?
    };

    let translated = DialectTranslator::mysql_to_h2()?.translate(&source);

    match output {
        Some(path) => {
            std::fs::write(path, &translated)?;
            info!("Wrote translated script to {:?}", path);
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(translated.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn setup_logging(verbosity: &str, format: &str) -> Result<(), String> {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // RUST_LOG takes precedence over --verbosity
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(LevelFilter::from_level(level).into()));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(std::io::stderr);

    if format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    Ok(())
}
