//! String parsing and formatting utilities

use regex::Regex;
use std::sync::OnceLock;

/// Capitalize the first letter, e.g. "enabled" -> "Enabled"
pub fn capitalize_first_letter(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn count_non_empty_lines(output: &str) -> i64 {
    output.lines().filter(|line| !line.trim().is_empty()).count() as i64
}

/// Round to the nearest 0.5 (temperatures)
pub fn round_to_nearest_half(x: f64) -> f64 {
    (x * 2.0).round() / 2.0
}

/// One decimal, dropping a trailing ".0"
pub fn format_float(x: f64) -> String {
    let formatted = format!("{:.1}", x);
    match formatted.strip_suffix(".0") {
        Some(whole) => whole.to_string(),
        None => formatted,
    }
}

/// Arrow pointing where the wind blows to, from the direction it comes from
pub fn wind_arrow(degrees: i32) -> &'static str {
    const ARROWS: [&str; 8] = ["↓", "↙", "←", "↖", "↑", "↗", "→", "↘"];
    let index = ((degrees + 22).rem_euclid(360) / 45) as usize;
    ARROWS[index % ARROWS.len()]
}

/// Remove ANSI escape sequences (for width computations)
pub fn strip_ansi(s: &str) -> String {
    static ANSI: OnceLock<Regex> = OnceLock::new();
    let re = ANSI.get_or_init(|| {
        Regex::new(r"[\x1b\x9b][\[\]()#;?]*(?:(?:(?:[a-zA-Z\d]*(?:;[a-zA-Z\d]*)*)?\x07)|(?:(?:\d{1,4}(?:;\d{0,4})*)?[\dA-PRZcf-ntqry=><~]))")
            .expect("ANSI pattern is valid")
    });
    re.replace_all(s, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_floats_without_useless_decimal() {
        assert_eq!(format_float(12.0), "12");
        assert_eq!(format_float(12.5), "12.5");
        assert_eq!(format_float(7.36), "7.4");
    }

    #[test]
    fn rounds_to_half() {
        assert_eq!(round_to_nearest_half(12.3), 12.5);
        assert_eq!(round_to_nearest_half(12.2), 12.0);
        assert_eq!(round_to_nearest_half(-3.8), -4.0);
    }

    #[test]
    fn wind_arrows_cover_the_compass() {
        assert_eq!(wind_arrow(0), "↓");
        assert_eq!(wind_arrow(90), "←");
        assert_eq!(wind_arrow(180), "↑");
        assert_eq!(wind_arrow(270), "→");
        assert_eq!(wind_arrow(359), "↓");
    }

    #[test]
    fn strips_colour_codes() {
        assert_eq!(strip_ansi("\x1b[38;5;039mUser\x1b[0m"), "User");
        assert_eq!(strip_ansi("plain"), "plain");
    }

    #[test]
    fn capitalizes_and_counts() {
        assert_eq!(capitalize_first_letter("enabled"), "Enabled");
        assert_eq!(capitalize_first_letter(""), "");
        assert_eq!(count_non_empty_lines("git\n\nwget\n  \nripgrep\n"), 3);
    }
}
