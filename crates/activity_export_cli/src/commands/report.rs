use activity_export::{ActivityReport, build_report, db};
use clap::ValueEnum;

/// Output format for the activity report.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Display as a formatted table (default)
    #[default]
    Table,
    /// Display as JSON
    Json,
}

/// One user in the printed report.
#[derive(Debug, Clone, serde::Serialize, tabled::Tabled)]
pub(crate) struct ActivityRow {
    #[tabled(rename = "Email")]
    pub email: String,
    #[tabled(rename = "Role")]
    pub role: String,
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "Activity")]
    pub activity: String,
    #[tabled(rename = "Records")]
    pub records: usize,
}

impl ActivityRow {
    /// Active users first, then inactive ones, each in report order.
    pub(crate) fn from_report(report: &ActivityReport) -> Vec<Self> {
        let active = report.active.iter().map(|entry| Self {
            email: entry.user.email.clone(),
            role: entry.user.role().to_string(),
            status: "active".to_string(),
            activity: entry.activity.label.clone(),
            records: entry.activity_count,
        });
        let inactive = report.inactive.iter().map(|user| Self {
            email: user.email.clone(),
            role: user.role().to_string(),
            status: "inactive".to_string(),
            activity: String::new(),
            records: 0,
        });
        active.chain(inactive).collect()
    }

    pub(crate) fn render(rows: Vec<Self>, format: OutputFormat) -> Result<String, serde_json::Error> {
        match format {
            OutputFormat::Table => {
                let mut table = tabled::Table::new(rows);
                table.with(tabled::settings::Style::rounded());
                Ok(table.to_string())
            }
            OutputFormat::Json => serde_json::to_string_pretty(&rows),
        }
    }
}

pub(crate) async fn handle_report(
    site_domain: &str,
    format: OutputFormat,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = db::connect(database_url).await?;
    let report = build_report(&db, site_domain).await?;

    println!(
        "{}",
        ActivityRow::render(ActivityRow::from_report(&report), format)?
    );
    if matches!(format, OutputFormat::Table) {
        println!(
            "{} active, {} without activity",
            report.active_count(),
            report.inactive_count()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use activity_export::entity::user;
    use activity_export::{ActiveUser, Activity, ActivityKind};
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;

    fn make_user(email: &str, is_manager: bool) -> user::Model {
        user::Model {
            id: Uuid::new_v4(),
            site_id: Uuid::nil(),
            username: email.to_string(),
            email: email.to_string(),
            first_name: String::new(),
            last_name: String::new(),
            is_contributor: !is_manager,
            is_manager,
            created_at: Utc::now().fixed_offset(),
        }
    }

    fn sample_report() -> ActivityReport {
        ActivityReport {
            active: vec![ActiveUser {
                user: make_user("manager@example.com", true),
                activity: Activity {
                    kind: ActivityKind::Challenge,
                    label: "Example challenge".to_string(),
                    record_id: Uuid::new_v4(),
                    created_at: Utc::now().fixed_offset(),
                },
                activity_count: 3,
            }],
            inactive: vec![make_user("idle@example.com", false)],
        }
    }

    #[test]
    fn rows_list_active_before_inactive() {
        let rows = ActivityRow::from_report(&sample_report());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].email, "manager@example.com");
        assert_eq!(rows[0].role, "manager");
        assert_eq!(rows[0].status, "active");
        assert_eq!(rows[0].records, 3);
        assert_eq!(rows[1].email, "idle@example.com");
        assert_eq!(rows[1].status, "inactive");
        assert!(rows[1].activity.is_empty());
    }

    #[test]
    fn table_output_has_headers() {
        let rows = ActivityRow::from_report(&sample_report());
        let out = ActivityRow::render(rows, OutputFormat::Table).unwrap();
        assert!(out.contains("Email"));
        assert!(out.contains("Activity"));
        assert!(out.contains("Example challenge"));
    }

    #[test]
    fn json_output_is_an_array_of_rows() {
        let rows = ActivityRow::from_report(&sample_report());
        let out = ActivityRow::render(rows, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(2));
        assert_eq!(value[0]["status"], "active");
        assert_eq!(value[1]["email"], "idle@example.com");
    }
}
