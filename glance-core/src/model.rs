/// A single position reading, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Coarse weather classification reported in `weather[].main`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConditionCategory {
    Clouds,
    Clear,
    Atmosphere,
    Snow,
    Rain,
    Drizzle,
    Thunderstorm,
    /// Anything outside the table above, kept verbatim.
    Other(String),
}

impl ConditionCategory {
    pub fn from_main(value: &str) -> Self {
        match value {
            "Clouds" => Self::Clouds,
            "Clear" => Self::Clear,
            "Atmosphere" => Self::Atmosphere,
            "Snow" => Self::Snow,
            "Rain" => Self::Rain,
            "Drizzle" => Self::Drizzle,
            "Thunderstorm" => Self::Thunderstorm,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Clouds => "Clouds",
            Self::Clear => "Clear",
            Self::Atmosphere => "Atmosphere",
            Self::Snow => "Snow",
            Self::Rain => "Rain",
            Self::Drizzle => "Drizzle",
            Self::Thunderstorm => "Thunderstorm",
            Self::Other(other) => other,
        }
    }
}

impl std::fmt::Display for ConditionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub category: ConditionCategory,
    pub description: String,
}

/// Snapshot returned by the current-weather endpoint.
///
/// Temperatures stay in Kelvin. `None` means the payload had no `main`
/// block; `Some(NaN)` means `main` came without `temp`.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    pub city: Option<String>,
    pub temperature_k: Option<f64>,
    pub condition: Option<Condition>,
}

/// One timestamped row of the forecast list.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastEntry {
    /// Raw `dt_txt`, e.g. `2024-01-01 15:00:00`.
    pub timestamp: String,
    pub temperature_k: f64,
    pub condition: Option<Condition>,
}
