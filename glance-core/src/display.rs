//! Pure, render-time mapping from stored values to display strings.

use chrono::{NaiveDateTime, Timelike};
use std::convert::TryFrom;

use crate::model::ConditionCategory;

const KELVIN_OFFSET: f64 = 273.15;
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const INVALID_DATE: &str = "Invalid Date";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    #[default]
    Korean,
    English,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::Korean => "ko",
            Locale::English => "en",
        }
    }

    pub const fn all() -> &'static [Locale] {
        &[Locale::Korean, Locale::English]
    }

    /// City placeholder shown before the first current-weather response.
    pub fn loading_placeholder(&self) -> &'static str {
        match self {
            Locale::Korean => "로딩 중...",
            Locale::English => "Loading...",
        }
    }

    pub fn search_placeholder(&self) -> &'static str {
        match self {
            Locale::Korean => "도시를 검색하세요",
            Locale::English => "Search for a city",
        }
    }

    pub fn search_label(&self) -> &'static str {
        match self {
            Locale::Korean => "검색",
            Locale::English => "Search",
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Locale {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "ko" | "ko-kr" | "korean" => Ok(Locale::Korean),
            "en" | "en-us" | "english" => Ok(Locale::English),
            _ => Err(anyhow::anyhow!("Unknown locale '{value}'. Supported locales: ko, en.")),
        }
    }
}

pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - KELVIN_OFFSET
}

/// `300.0` renders as `26.9°C`; a missing reading (`NaN`) as `NaN°C`.
///
/// Halves round away from zero (`298.4` is `25.3°C`), everything else to
/// the nearest tenth of the exact value.
pub fn celsius_label(kelvin: f64) -> String {
    let celsius = kelvin_to_celsius(kelvin);
    let tenths = celsius * 10.0;

    // Only quarter values can sit exactly on a .x5 tie.
    if (celsius * 4.0).fract() == 0.0 && tenths.fract().abs() == 0.5 {
        return format!("{:.1}°C", tenths.round() / 10.0);
    }

    format!("{celsius:.1}°C")
}

/// Icon key for a condition category. Categories outside the fixed
/// table have no icon.
pub fn icon_for(category: &ConditionCategory) -> Option<&'static str> {
    match category {
        ConditionCategory::Clouds => Some("cloudy"),
        ConditionCategory::Clear => Some("day-sunny"),
        ConditionCategory::Atmosphere => Some("cloudy-gusts"),
        ConditionCategory::Snow => Some("snow"),
        ConditionCategory::Rain => Some("rains"),
        ConditionCategory::Drizzle => Some("rain"),
        ConditionCategory::Thunderstorm => Some("lightning"),
        ConditionCategory::Other(_) => None,
    }
}

fn parse_timestamp(timestamp: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(timestamp.trim(), TIMESTAMP_FORMAT).ok()
}

/// Short month and day: `1월 1일` or `Jan 1`.
pub fn date_label(timestamp: &str, locale: Locale) -> String {
    let Some(dt) = parse_timestamp(timestamp) else {
        return INVALID_DATE.to_string();
    };

    match locale {
        Locale::Korean => dt.format("%-m월 %-d일").to_string(),
        Locale::English => dt.format("%b %-d").to_string(),
    }
}

/// Hour and two-digit minute on a 12-hour clock: `오후 3:00` or `3:00 PM`.
pub fn time_label(timestamp: &str, locale: Locale) -> String {
    let Some(dt) = parse_timestamp(timestamp) else {
        return INVALID_DATE.to_string();
    };

    let (pm, hour) = dt.hour12();
    let minute = dt.minute();

    match locale {
        Locale::Korean => {
            let marker = if pm { "오후" } else { "오전" };
            format!("{marker} {hour}:{minute:02}")
        }
        Locale::English => {
            let marker = if pm { "PM" } else { "AM" };
            format!("{hour}:{minute:02} {marker}")
        }
    }
}
