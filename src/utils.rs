//! Utility functions for filenames and value formatting

use chrono::NaiveDate;

/// Turn a display name into a lowercase, dash-separated filename component
///
/// ASCII letters and digits are kept, every other run of characters becomes a
/// single `-`, and leading/trailing dashes are dropped.
///
/// # Examples
///
/// ```
/// use org_reports::utils::slugify;
///
/// assert_eq!(slugify("Time Bank: Barcelona!"), "time-bank-barcelona");
/// ```
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Format an amount of seconds as hours and minutes (`H:MM`)
///
/// Negative amounts keep their sign; leftover seconds are truncated.
///
/// # Examples
///
/// ```
/// use org_reports::utils::format_hours;
///
/// assert_eq!(format_hours(5400), "1:30");
/// assert_eq!(format_hours(-900), "-0:15");
/// ```
pub fn format_hours(seconds: i64) -> String {
    let sign = if seconds < 0 { "-" } else { "" };
    let total_minutes = seconds.unsigned_abs() / 60;
    format!("{}{}:{:02}", sign, total_minutes / 60, total_minutes % 60)
}

/// Download filename for a single report, e.g. `time-bank_members_2024-05-01.csv`
pub fn report_filename(
    organization_name: &str,
    report_slug: &str,
    date: NaiveDate,
    extension: &str,
) -> String {
    format!(
        "{}_{}_{}.{}",
        organization_slug(organization_name),
        report_slug,
        date.format("%Y-%m-%d"),
        extension
    )
}

/// Download filename for the bundled archive, e.g. `time-bank_2024-05-01.zip`
pub fn archive_filename(organization_name: &str, date: NaiveDate) -> String {
    format!(
        "{}_{}.zip",
        organization_slug(organization_name),
        date.format("%Y-%m-%d")
    )
}

fn organization_slug(name: &str) -> String {
    let slug = slugify(name);
    if slug.is_empty() {
        "organization".to_string()
    } else {
        slug
    }
}
