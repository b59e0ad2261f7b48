//! Screen model: what the presentation layer draws for a given state.

use crate::{
    display::{Locale, celsius_label, date_label, icon_for, time_label},
    model::{CurrentConditions, ForecastEntry},
    state::{Phase, ViewState},
};

#[derive(Debug, Clone, PartialEq)]
pub struct SearchBar {
    pub query: String,
    pub placeholder: &'static str,
    pub submit_label: &'static str,
}

/// Fields are `None` where there is nothing to show yet.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CurrentPanel {
    pub city: String,
    pub temperature: Option<String>,
    pub condition: Option<String>,
    pub description: Option<String>,
    pub icon: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRow {
    pub index: usize,
    pub date: String,
    pub time: String,
    pub temperature: String,
    pub icon: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForecastBody {
    /// Indeterminate progress indicator.
    Loading,
    Entries(Vec<ForecastRow>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    pub search_bar: SearchBar,
    pub current: CurrentPanel,
    pub forecast: ForecastBody,
    pub failure: Option<String>,
}

impl Screen {
    pub fn from_state(state: &ViewState, locale: Locale) -> Self {
        let forecast = if state.is_loading() {
            ForecastBody::Loading
        } else {
            ForecastBody::Entries(
                state
                    .forecast_entries()
                    .iter()
                    .enumerate()
                    .map(|(index, entry)| ForecastRow::new(index, entry, locale))
                    .collect(),
            )
        };

        let failure = match state.phase() {
            Phase::Failed { reason } => Some(reason.clone()),
            _ => None,
        };

        Screen {
            search_bar: SearchBar {
                query: state.search_query().to_string(),
                placeholder: locale.search_placeholder(),
                submit_label: locale.search_label(),
            },
            current: CurrentPanel::new(state.city(), state.current_conditions()),
            forecast,
            failure,
        }
    }
}

impl CurrentPanel {
    fn new(city: &str, conditions: Option<&CurrentConditions>) -> Self {
        let Some(conditions) = conditions else {
            return CurrentPanel { city: city.to_string(), ..CurrentPanel::default() };
        };

        // No line without `main`; `main` without `temp` shows NaN.
        let temperature = conditions.temperature_k.map(celsius_label);
        let condition = conditions.condition.as_ref();

        CurrentPanel {
            city: city.to_string(),
            temperature,
            condition: condition.map(|c| c.category.to_string()),
            description: condition.map(|c| c.description.clone()),
            icon: condition.and_then(|c| icon_for(&c.category)),
        }
    }
}

impl ForecastRow {
    fn new(index: usize, entry: &ForecastEntry, locale: Locale) -> Self {
        ForecastRow {
            index,
            date: date_label(&entry.timestamp, locale),
            time: time_label(&entry.timestamp, locale),
            temperature: celsius_label(entry.temperature_k),
            icon: entry.condition.as_ref().and_then(|c| icon_for(&c.category)),
        }
    }
}
