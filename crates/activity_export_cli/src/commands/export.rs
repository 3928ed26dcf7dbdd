use activity_export::{
    ExportOptions, ExportSummary, Mailer, MemoryMailer, NotifyOutcome, db, run_export,
};

use crate::ExportArgs;
use crate::config::Config;

fn export_options(args: &ExportArgs, config: &Config) -> ExportOptions {
    let output_path = if args.no_file {
        None
    } else {
        args.output.clone().or_else(|| config.export.output.clone())
    };

    ExportOptions {
        output_path,
        from: config.mail.from.clone(),
    }
}

#[cfg(feature = "smtp")]
fn build_mailer(config: &Config) -> Result<Box<dyn Mailer>, Box<dyn std::error::Error>> {
    let settings = config.smtp_settings()?;
    tracing::debug!(host = %settings.host, port = settings.port, "Using SMTP relay");
    Ok(Box::new(activity_export::mail::SmtpMailer::new(&settings)?))
}

#[cfg(not(feature = "smtp"))]
fn build_mailer(_config: &Config) -> Result<Box<dyn Mailer>, Box<dyn std::error::Error>> {
    Err("this build has no SMTP support; rerun with --dry-run".into())
}

fn summary_lines(summary: &ExportSummary) -> Vec<String> {
    let mut lines = vec![format!(
        "{}: {} active, {} without activity",
        summary.site_domain, summary.active, summary.inactive
    )];
    if let Some(path) = &summary.output_path {
        lines.push(format!("Workbook written to {}", path.display()));
    }
    lines.push(match summary.notify {
        NotifyOutcome::NoManagers => "No managers on site; email not sent.".to_string(),
        NotifyOutcome::Sent { managers } => {
            format!("Email sent ({managers} manager(s) on site).")
        }
    });
    lines
}

pub(crate) async fn handle_export(
    args: ExportArgs,
    config: &Config,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = db::connect(database_url).await?;
    let options = export_options(&args, config);

    if args.dry_run {
        let mailer = MemoryMailer::new();
        let summary =
            run_export(&db, &mailer, &args.site_domain, &args.recipient, &options).await?;

        for line in summary_lines(&summary) {
            println!("{line}");
        }
        for email in mailer.outbox() {
            println!(
                "[dry run] Would send \"{}\" from {} to {} with {} attachment(s)",
                email.subject,
                email.from,
                email.to.join(", "),
                email.attachments.len()
            );
        }
        return Ok(());
    }

    let mailer = build_mailer(config)?;
    let summary = run_export(
        &db,
        mailer.as_ref(),
        &args.site_domain,
        &args.recipient,
        &options,
    )
    .await?;

    for line in summary_lines(&summary) {
        println!("{line}");
    }

    Ok(())
}
