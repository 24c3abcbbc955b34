//! User-facing error message formatting.
//!
//! Matches on typed errors (PolarsError variants, io::ErrorKind, ureq errors)
//! rather than parsing strings, so load failures read the same whichever layer
//! produced them.

use polars::prelude::PolarsError;
use std::io;

/// Format a PolarsError (CSV parse failure) as a user-facing message.
pub fn user_message_from_polars(err: &PolarsError) -> String {
    use polars::prelude::PolarsError as PE;

    match err {
        PE::ColumnNotFound(msg) => format!("Column not found: {}", msg),
        PE::Duplicate(msg) => format!("Duplicate column name in header: {}", msg),
        PE::IO { error, msg } => {
            user_message_from_io(error.as_ref(), msg.as_ref().map(|m| m.as_ref()))
        }
        PE::NoData(msg) => format!("No data: {}", msg),
        PE::SchemaMismatch(msg) => format!("Schema mismatch: {}", msg),
        PE::ShapeMismatch(msg) => format!("Row shape mismatch: {}", msg),
        PE::ComputeError(msg) => format!("Could not parse CSV: {}", msg),
        PE::Context { error, msg } => {
            let inner = user_message_from_polars(error);
            format!("{}: {}", msg, inner)
        }
        #[allow(unreachable_patterns)]
        _ => err.to_string(),
    }
}

/// Format an io::Error as a user-facing message by matching on ErrorKind.
pub fn user_message_from_io(err: &io::Error, context: Option<&str>) -> String {
    use std::io::ErrorKind;

    let base: String = match err.kind() {
        ErrorKind::NotFound => "File or directory not found.".to_string(),
        ErrorKind::PermissionDenied => "Permission denied. Check read access.".to_string(),
        ErrorKind::ConnectionRefused => "Connection refused.".to_string(),
        ErrorKind::ConnectionReset => "Connection reset.".to_string(),
        ErrorKind::TimedOut => "Timed out.".to_string(),
        ErrorKind::InvalidData | ErrorKind::InvalidInput => {
            "Invalid or corrupted data.".to_string()
        }
        ErrorKind::UnexpectedEof => "Unexpected end of file.".to_string(),
        ErrorKind::Interrupted => "Operation interrupted.".to_string(),
        ErrorKind::OutOfMemory => "Out of memory.".to_string(),
        _ => err.to_string(),
    };

    match context {
        Some(ctx) if !ctx.is_empty() => format!("{} {}", base, ctx),
        _ => base,
    }
}

/// Format an HTTP error. Status errors name the code; transport errors keep
/// ureq's own description (DNS, TLS, connect, timeout).
pub fn user_message_from_http(err: &ureq::Error) -> String {
    match err {
        ureq::Error::Status(code, response) => format!(
            "Server returned {} {}. Check the URL.",
            code,
            response.status_text()
        ),
        ureq::Error::Transport(transport) => {
            format!("Download failed. Check the URL and your connection: {}", transport)
        }
    }
}

/// Format a color_eyre Report by downcasting to known error types.
/// Walks the cause chain to find PolarsError, ureq::Error or io::Error.
pub fn user_message_from_report(report: &color_eyre::eyre::Report, source: Option<&str>) -> String {
    let with_source = |msg: String| match source {
        Some(s) => format!("Failed to load {}: {}", s, msg),
        None => msg,
    };

    for cause in report.chain() {
        if let Some(pe) = cause.downcast_ref::<PolarsError>() {
            return with_source(user_message_from_polars(pe));
        }
        if let Some(he) = cause.downcast_ref::<ureq::Error>() {
            return with_source(user_message_from_http(he));
        }
        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            return with_source(user_message_from_io(io_err, None));
        }
    }

    // Fallback: first line of the display, to avoid long tracebacks
    let display = report.to_string();
    let first_line = display.lines().next().unwrap_or("An error occurred");
    with_source(first_line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use color_eyre::eyre::eyre;

    #[test]
    fn test_user_message_from_io_not_found() {
        let err = io::Error::new(io::ErrorKind::NotFound, "No such file");
        let msg = user_message_from_io(&err, None);
        assert!(
            msg.contains("not found"),
            "expected 'not found', got: {}",
            msg
        );
    }

    #[test]
    fn test_user_message_from_polars_compute_error() {
        let err = PolarsError::ComputeError("found more fields than defined in 'Schema'".into());
        let msg = user_message_from_polars(&err);
        assert!(msg.starts_with("Could not parse CSV"), "got: {}", msg);
    }

    #[test]
    fn test_report_names_source() {
        let report = color_eyre::eyre::Report::new(io::Error::new(
            io::ErrorKind::PermissionDenied,
            "denied",
        ));
        let msg = user_message_from_report(&report, Some("data/a.csv"));
        assert_eq!(
            msg,
            "Failed to load data/a.csv: Permission denied. Check read access."
        );
    }

    #[test]
    fn test_report_fallback_uses_first_line() {
        let report = eyre!("first line\nsecond line");
        assert_eq!(user_message_from_report(&report, None), "first line");
    }
}
