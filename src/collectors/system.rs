//! Session information that needs no external tool (terminal, date/time)

use chrono::{DateTime, Local, TimeZone};

/// Terminal program from `TERM_PROGRAM`
pub fn get_terminal() -> String {
    terminal_from(std::env::var("TERM_PROGRAM").ok())
}

fn terminal_from(term_program: Option<String>) -> String {
    term_program
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Current local time, RFC 1123 style with a numeric zone:
/// "Mon, 02 Jan 2006 15:04:05 +01:00"
pub fn get_datetime() -> String {
    format_datetime(&Local::now())
}

fn format_datetime<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("%a, %d %b %Y %H:%M:%S %Z").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn terminal_falls_back_to_unknown() {
        assert_eq!(terminal_from(None), "Unknown");
        assert_eq!(terminal_from(Some(String::new())), "Unknown");
        assert_eq!(terminal_from(Some("iTerm.app".into())), "iTerm.app");
    }

    #[test]
    fn datetime_uses_rfc1123_layout() {
        let instant = Utc.with_ymd_and_hms(2024, 11, 5, 9, 3, 7).unwrap();
        assert_eq!(format_datetime(&instant), "Tue, 05 Nov 2024 09:03:07 UTC");
    }

    #[test]
    fn local_zone_is_printed_as_an_offset() {
        let paris = FixedOffset::east_opt(3600).unwrap();
        let instant = paris.with_ymd_and_hms(2024, 11, 5, 9, 3, 7).unwrap();
        assert_eq!(format_datetime(&instant), "Tue, 05 Nov 2024 09:03:07 +01:00");
    }
}
