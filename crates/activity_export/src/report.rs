//! Spreadsheet rendering for activity reports.
//!
//! The workbook always has two sheets:
//! - `Active users` with an `Email` / `Activity` header row
//! - `Inactive users` with a single `Users with no activity` header column

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::activity::ActivityReport;
use crate::error::Result;

/// Name of the sheet listing active users.
pub const ACTIVE_SHEET: &str = "Active users";

/// Name of the sheet listing inactive users.
pub const INACTIVE_SHEET: &str = "Inactive users";

/// File name used for the workbook when attached to an email.
pub const DEFAULT_FILENAME: &str = "user_activity_export.xlsx";

/// MIME type of an `.xlsx` workbook.
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const EMAIL_COLUMN_WIDTH: f64 = 40.0;
const ACTIVITY_COLUMN_WIDTH: f64 = 60.0;

/// Cell contents of one worksheet, header row first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SheetData {
    pub name: &'static str,
    pub rows: Vec<Vec<String>>,
}

impl SheetData {
    /// Rows after the header.
    pub fn body(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or_default()
    }
}

/// Lay out the report as the two sheets written to the workbook.
pub fn sheets(report: &ActivityReport) -> [SheetData; 2] {
    let mut active_rows = vec![vec!["Email".to_string(), "Activity".to_string()]];
    active_rows.extend(
        report
            .active
            .iter()
            .map(|entry| vec![entry.user.email.clone(), entry.activity.label.clone()]),
    );

    let mut inactive_rows = vec![vec!["Users with no activity".to_string()]];
    inactive_rows.extend(report.inactive.iter().map(|user| vec![user.email.clone()]));

    [
        SheetData {
            name: ACTIVE_SHEET,
            rows: active_rows,
        },
        SheetData {
            name: INACTIVE_SHEET,
            rows: inactive_rows,
        },
    ]
}

/// Widths of the populated columns of a sheet.
fn column_widths(sheet_name: &str) -> &'static [f64] {
    match sheet_name {
        ACTIVE_SHEET => &[EMAIL_COLUMN_WIDTH, ACTIVITY_COLUMN_WIDTH],
        _ => &[EMAIL_COLUMN_WIDTH],
    }
}

fn build_workbook(report: &ActivityReport) -> std::result::Result<Workbook, XlsxError> {
    let header = Format::new().set_bold();
    let mut workbook = Workbook::new();

    for sheet in sheets(report) {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet.name)?;
        for (col_idx, width) in column_widths(sheet.name).iter().enumerate() {
            let col_num = u16::try_from(col_idx).map_err(|_| XlsxError::RowColumnLimitError)?;
            worksheet.set_column_width(col_num, *width)?;
        }

        for (row_idx, row) in sheet.rows.iter().enumerate() {
            let row_num = u32::try_from(row_idx).map_err(|_| XlsxError::RowColumnLimitError)?;
            for (col_idx, value) in row.iter().enumerate() {
                let col_num =
                    u16::try_from(col_idx).map_err(|_| XlsxError::RowColumnLimitError)?;
                if row_num == 0 {
                    worksheet.write_string_with_format(row_num, col_num, value, &header)?;
                } else {
                    worksheet.write_string(row_num, col_num, value)?;
                }
            }
        }
    }

    Ok(workbook)
}

/// Render the report as `.xlsx` bytes.
///
/// # Errors
/// Returns `ExportError::Workbook` if the report exceeds the sheet limits.
pub fn render_workbook(report: &ActivityReport) -> Result<Vec<u8>> {
    let mut workbook = build_workbook(report)?;
    Ok(workbook.save_to_buffer()?)
}

/// Render the report and write it to `path`.
///
/// Returns the rendered bytes so the caller can attach them without reading
/// the file back.
pub fn write_workbook(report: &ActivityReport, path: &Path) -> Result<Vec<u8>> {
    let bytes = render_workbook(report)?;
    std::fs::write(path, &bytes)?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "Wrote activity workbook");
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use sea_orm::prelude::Uuid;

    use super::*;
    use crate::activity::{ActiveUser, Activity, ActivityKind};
    use crate::entity::user;

    fn make_user(email: &str) -> user::Model {
        user::Model {
            id: Uuid::new_v4(),
            site_id: Uuid::nil(),
            username: email.to_string(),
            email: email.to_string(),
            first_name: String::new(),
            last_name: String::new(),
            is_contributor: true,
            is_manager: false,
            created_at: Utc::now().fixed_offset(),
        }
    }

    fn active(email: &str, label: &str, kind: ActivityKind) -> ActiveUser {
        ActiveUser {
            user: make_user(email),
            activity: Activity {
                kind,
                label: label.to_string(),
                record_id: Uuid::new_v4(),
                created_at: Utc::now().fixed_offset(),
            },
            activity_count: 1,
        }
    }

    fn sample_report() -> ActivityReport {
        ActivityReport {
            active: vec![
                active(
                    "contributor@example.com",
                    "Test idea for our challenge",
                    ActivityKind::Idea,
                ),
                active(
                    "manager@example.com",
                    "Example challenge",
                    ActivityKind::Challenge,
                ),
            ],
            inactive: vec![],
        }
    }

    #[test]
    fn active_sheet_has_header_and_one_row_per_user() {
        let [active_sheet, _] = sheets(&sample_report());

        assert_eq!(active_sheet.name, "Active users");
        assert_eq!(active_sheet.rows[0], ["Email", "Activity"]);
        assert_eq!(
            active_sheet.body(),
            [
                vec![
                    "contributor@example.com".to_string(),
                    "Test idea for our challenge".to_string()
                ],
                vec![
                    "manager@example.com".to_string(),
                    "Example challenge".to_string()
                ],
            ]
        );
    }

    #[test]
    fn inactive_sheet_is_header_only_when_everyone_is_active() {
        let [_, inactive_sheet] = sheets(&sample_report());

        assert_eq!(inactive_sheet.name, "Inactive users");
        assert_eq!(inactive_sheet.rows, [vec!["Users with no activity"]]);
        assert!(inactive_sheet.body().is_empty());
    }

    #[test]
    fn inactive_sheet_lists_emails() {
        let report = ActivityReport {
            active: vec![],
            inactive: vec![make_user("idle@example.com"), make_user("away@example.com")],
        };
        let [active_sheet, inactive_sheet] = sheets(&report);

        assert!(active_sheet.body().is_empty());
        assert_eq!(
            inactive_sheet.body(),
            [
                vec!["idle@example.com".to_string()],
                vec!["away@example.com".to_string()]
            ]
        );
    }

    #[test]
    fn column_widths_match_sheet_columns() {
        for sheet in sheets(&sample_report()) {
            assert_eq!(
                column_widths(sheet.name).len(),
                sheet.rows[0].len(),
                "{}",
                sheet.name
            );
        }
        assert_eq!(
            column_widths(INACTIVE_SHEET),
            [EMAIL_COLUMN_WIDTH].as_slice()
        );
    }

    #[test]
    fn render_workbook_produces_zip_container() {
        let bytes = render_workbook(&sample_report()).expect("render should succeed");
        // xlsx files are zip archives
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn write_workbook_writes_to_given_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("activity.xlsx");

        let bytes = write_workbook(&ActivityReport::default(), &path).expect("write");

        let on_disk = std::fs::read(&path).expect("file should exist");
        assert_eq!(on_disk, bytes);
    }

    #[test]
    fn write_workbook_fails_for_missing_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing").join("activity.xlsx");

        let err = write_workbook(&ActivityReport::default(), &path).unwrap_err();
        assert!(matches!(err, crate::ExportError::Io(_)));
    }
}
