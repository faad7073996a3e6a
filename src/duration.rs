// Copyright 2023 Remi Bernotavicius

//! Best-effort conversion of the free-text timing fields ("1 hr 15 mins",
//! "45 mins") into ISO-8601 durations (`PT1H15M`) for the structured-data
//! consumer. Text with no recognizable hour or minute token yields nothing.

use regex::Regex;
use std::sync::OnceLock;

fn hours_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(?:hrs?|hours?)").expect("static pattern")
    })
}

fn minutes_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)(\d+)\s*(?:mins?|minutes?)").expect("static pattern"))
}

fn bare_number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d+$").expect("static pattern"))
}

pub fn to_iso8601(text: &str) -> Option<String> {
    let mut hours = 0f64;
    let mut minutes: u32 = 0;

    if let Some(captures) = hours_pattern().captures(text) {
        hours = captures[1].parse().ok()?;
    }
    if let Some(captures) = minutes_pattern().captures(text) {
        minutes = captures[1].parse().ok()?;
    }

    if hours == 0.0 && minutes == 0 {
        // A bare number is taken as minutes.
        let trimmed = text.trim();
        if !bare_number_pattern().is_match(trimmed) {
            return None;
        }
        minutes = trimmed.parse().ok()?;
    }

    let mut iso = String::from("PT");
    if hours > 0.0 {
        let whole = hours.trunc() as u32;
        let extra = ((hours - hours.trunc()) * 60.0).round() as u32;
        if whole > 0 {
            iso.push_str(&format!("{whole}H"));
        }
        minutes += extra;
    }
    if minutes > 0 {
        iso.push_str(&format!("{minutes}M"));
    }
    (iso != "PT").then_some(iso)
}
