//! Report formatting and the interactive prompt loop for the `suauth` binary.

use chrono::{DateTime, Utc};
use std::io::{self, BufRead, Write};
use suauth_client::{ExpiresAt, ValidationResult};

/// Prompt shown before each license key.
pub const PROMPT: &str = "enter ur license key (or 'q' to quit): ";

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Describes an expiration relative to `now`.
pub fn format_expiration(expires_at: Option<&str>, now: DateTime<Utc>) -> String {
    let Some(raw) = expires_at.filter(|s| !s.trim().is_empty()) else {
        return "Never".to_string();
    };
    let Ok(expires) = ExpiresAt::parse(raw) else {
        return "Unknown".to_string();
    };

    let date = expires.wall_clock().format(DISPLAY_FORMAT);
    if expires.has_passed_at(now) {
        return format!("Expired on {date}");
    }

    let remaining = expires.remaining_at(now);
    let days = remaining.num_days();
    let hours = remaining.num_hours() % 24;
    let minutes = remaining.num_minutes() % 60;

    if days > 0 {
        format!("Expires in {days} days, {hours} hours ({date})")
    } else if hours > 0 {
        format!("Expires in {hours} hours, {minutes} minutes")
    } else {
        format!("Expires in {minutes} minutes")
    }
}

fn or_na(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("N/A")
}

/// Renders a human-readable report for one validation.
pub fn render_report(result: &ValidationResult, now: DateTime<Utc>) -> String {
    let message = result
        .message()
        .unwrap_or_else(|| "Unknown error".to_string());

    if result.expired() {
        return format!("\nLicense has expired!\nReason: {message}\n");
    }

    if !result.success() {
        return format!("\nvalidation failed: {message}\n");
    }

    let mut out = String::from("\nLicense is valid!\n");
    let Some(license) = result.license() else {
        return out;
    };
    out.push_str(&format!("Key: {}\n", or_na(license.key.as_deref())));
    out.push_str(&format!("Status: {}\n", or_na(license.status.as_deref())));
    out.push_str(&format!(
        "Expiration: {}\n",
        format_expiration(license.expires_at.as_deref(), now)
    ));
    out.push_str(&format!("HWID Limit: {}\n", license.hwid_limit()));

    if !license.hwids.is_empty() {
        out.push_str("\nRegistered Devices:\n");
        for (i, hwid) in license.hwids.iter().enumerate() {
            out.push_str(&format!("  {}. {hwid}\n", i + 1));
        }
    }
    out
}

/// Prompts for keys until `q` or end of input, validating each one.
///
/// # Errors
///
/// Returns an error only if reading input or writing output fails.
pub fn run_interactive<R, W, F>(mut input: R, mut output: W, mut validate: F) -> io::Result<()>
where
    R: BufRead,
    W: Write,
    F: FnMut(&str) -> ValidationResult,
{
    let mut line = String::new();
    loop {
        write!(output, "{PROMPT}")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            return Ok(());
        }

        let license_key = line.trim();
        if license_key.eq_ignore_ascii_case("q") {
            return Ok(());
        }
        if license_key.is_empty() {
            writeln!(output, "pls enter a valid license key.\n")?;
            continue;
        }

        let result = validate(license_key);
        write!(output, "{}", render_report(&result, Utc::now()))?;
        writeln!(output, "\n{}\n", "=".repeat(50))?;
    }
}
