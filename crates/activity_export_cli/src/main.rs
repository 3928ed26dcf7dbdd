//! activity-export CLI - command-line interface for site user activity exports.

mod commands;
mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::Term;
use tracing_subscriber::EnvFilter;

use crate::commands::report::OutputFormat;

#[derive(Parser)]
#[command(name = "activity-export")]
#[command(version)]
#[command(about = "Export user activity for a site and mail it to its managers")]
#[command(
    long_about = "activity-export classifies every user on a site as active (created a \
challenge, idea or idea vote) or inactive, writes the result to a two-sheet \
spreadsheet, and emails it to a recipient when the site has at least one manager."
)]
#[command(after_long_help = r#"EXAMPLES
    Export example.com and mail it to a manager:
        $ activity-export export example.com manager@example.com

    See what would be sent without contacting the mail server:
        $ activity-export export example.com manager@example.com --dry-run

    Print the classification as JSON:
        $ activity-export report example.com --output json

    Prepare a local database:
        $ activity-export migrate up

CONFIGURATION
    activity-export reads configuration from:
      1. ~/.config/activity-export/config.toml (or $XDG_CONFIG_HOME/activity-export/config.toml)
      2. ./activity-export.toml
      3. Environment variables (ACTIVITY_EXPORT_* prefix)
      4. .env file in current directory

ENVIRONMENT VARIABLES
    ACTIVITY_EXPORT_DATABASE_URL    Database connection string (default: ~/.local/state/activity-export/activity-export.db)
    ACTIVITY_EXPORT_MAIL_FROM       Sender address (default: noreply@localhost)
    ACTIVITY_EXPORT_SMTP_HOST       SMTP relay host (default: localhost)
    ACTIVITY_EXPORT_SMTP_PORT       SMTP relay port (default: 25)
    ACTIVITY_EXPORT_SMTP_USERNAME   SMTP username
    ACTIVITY_EXPORT_SMTP_PASSWORD   SMTP password
    ACTIVITY_EXPORT_SMTP_SECURITY   none, starttls or tls (default: none)
    ACTIVITY_EXPORT_EXPORT_OUTPUT   Workbook path (default: user_activity_export.xlsx)
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a site's user activity and mail it
    Export(ExportArgs),
    /// Print a site's user activity without writing files or sending mail
    Report {
        /// Domain of the site (e.g. example.com)
        site_domain: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
    /// Generate man page(s)
    Man {
        /// Output directory for man pages (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Options for the export command.
#[derive(Debug, Clone, clap::Args)]
struct ExportArgs {
    /// Domain of the site to export (e.g. example.com)
    site_domain: String,

    /// Address the export is mailed to
    recipient: String,

    /// Workbook path (default from config or ./user_activity_export.xlsx)
    #[arg(short, long, conflicts_with = "no_file")]
    output: Option<PathBuf>,

    /// Keep the workbook in memory; only attach it to the email
    #[arg(long)]
    no_file: bool,

    /// Dry run - build the email but don't send it
    #[arg(short = 'n', long)]
    dry_run: bool,
}

#[derive(Subcommand)]
enum MigrateAction {
    /// Apply all pending migrations
    Up,
    /// Rollback the last migration
    Down,
    /// Show migration status
    Status,
    /// Fresh install - drop all tables and reapply migrations
    Fresh,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new("activity_export=info,activity_export_cli=info"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(Term::stderr().is_term())
        .with_writer(std::io::stderr)
        .init();

    // Load configuration (config file -> env vars -> defaults)
    let config = config::Config::load();

    let cli = Cli::parse();

    // Handle commands that don't require database access first
    match &cli.command {
        Commands::Completions { shell } => {
            commands::meta::handle_completions(*shell)?;
            return Ok(());
        }
        Commands::Man { output } => {
            commands::meta::handle_man(output.clone())?;
            return Ok(());
        }
        _ => {}
    }

    let database_url = config
        .database_url()
        .ok_or("Could not determine a database URL; set ACTIVITY_EXPORT_DATABASE_URL")?;

    // Ensure the database directory exists for SQLite
    if database_url.starts_with("sqlite://") {
        let db_path = database_url.trim_start_matches("sqlite://");
        // Strip query parameters (e.g., ?mode=rwc) before path operations
        let db_path = db_path.split('?').next().unwrap_or(db_path);
        let db_path = std::path::Path::new(db_path);

        if db_path.is_relative() && !db_path.as_os_str().is_empty() {
            tracing::warn!(
                "Database path '{}' is relative - behavior depends on current directory. \
                 Consider using an absolute path.",
                db_path.display()
            );
        }

        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
    }

    let result = match cli.command {
        Commands::Export(args) => {
            commands::export::handle_export(args, &config, &database_url).await
        }
        Commands::Report {
            site_domain,
            output,
        } => commands::report::handle_report(&site_domain, output, &database_url).await,
        Commands::Migrate { action } => {
            commands::migrate::handle_migrate(action, &database_url).await
        }
        Commands::Completions { .. } | Commands::Man { .. } => Ok(()),
    };

    // Bad input gets a one-line message instead of the debug-formatted error
    if let Err(err) = &result
        && let Some(message) = user_error_message(&**err)
    {
        eprintln!("{} {message}", console::style("error:").red().bold());
        std::process::exit(2);
    }

    result
}

/// The message for errors caused by the caller's arguments, if `err` is one.
fn user_error_message(err: &(dyn std::error::Error + 'static)) -> Option<String> {
    err.downcast_ref::<activity_export::ExportError>()
        .filter(|export_err| export_err.is_user_error())
        .map(ToString::to_string)
}
