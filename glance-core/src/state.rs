//! View state and the reducer every fetch-chain stage goes through.

use crate::{
    display::Locale,
    model::{Coordinates, CurrentConditions, ForecastEntry},
};

/// Identifies one mount, reload or search run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChainId(pub u64);

impl std::fmt::Display for ChainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Loaded,
    /// The chain's outer handler caught an error. Data from earlier
    /// chains is left in place.
    Failed { reason: String },
}

#[derive(Debug, Clone)]
pub enum Action {
    /// Mount or reload: enters `Loading`.
    Reload { chain: ChainId },
    QueryChanged(String),
    /// Search submitted: enters `Loading`.
    SearchSubmitted { chain: ChainId },
    PositionResolved { chain: ChainId, coords: Coordinates },
    CurrentLoaded { chain: ChainId, conditions: CurrentConditions },
    ForecastLoaded { chain: ChainId, entries: Vec<ForecastEntry> },
    ChainFinished { chain: ChainId },
    ChainFailed { chain: ChainId, reason: String },
}

impl Action {
    pub fn chain(&self) -> Option<ChainId> {
        match self {
            Action::QueryChanged(_) => None,
            Action::Reload { chain }
            | Action::SearchSubmitted { chain }
            | Action::PositionResolved { chain, .. }
            | Action::CurrentLoaded { chain, .. }
            | Action::ForecastLoaded { chain, .. }
            | Action::ChainFinished { chain }
            | Action::ChainFailed { chain, .. } => Some(*chain),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ViewState {
    city: String,
    search_query: String,
    forecast_entries: Vec<ForecastEntry>,
    current_conditions: Option<CurrentConditions>,
    phase: Phase,
    last_coordinates: Option<Coordinates>,
    last_writer: Option<ChainId>,
}

impl ViewState {
    pub fn new(locale: Locale) -> Self {
        Self {
            city: locale.loading_placeholder().to_string(),
            search_query: String::new(),
            forecast_entries: Vec::new(),
            current_conditions: None,
            phase: Phase::Loading,
            last_coordinates: None,
            last_writer: None,
        }
    }

    /// Apply one action. Writes are unconditional: there is no check that
    /// `chain` is the most recent one, so overlapping chains interleave and
    /// the last write wins.
    pub fn apply(&mut self, action: Action) {
        let chain = action.chain();

        match action {
            Action::Reload { .. } | Action::SearchSubmitted { .. } => {
                self.phase = Phase::Loading;
            }
            Action::QueryChanged(query) => {
                self.search_query = query;
            }
            Action::PositionResolved { coords, .. } => {
                self.last_coordinates = Some(coords);
            }
            Action::CurrentLoaded { conditions, .. } => {
                self.city = conditions.city.clone().unwrap_or_default();
                self.current_conditions = Some(conditions);
            }
            Action::ForecastLoaded { entries, .. } => {
                self.forecast_entries = entries;
            }
            Action::ChainFinished { .. } => {
                self.phase = Phase::Loaded;
            }
            Action::ChainFailed { reason, .. } => {
                self.phase = Phase::Failed { reason };
            }
        }

        if chain.is_some() {
            self.last_writer = chain;
        }
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn forecast_entries(&self) -> &[ForecastEntry] {
        &self.forecast_entries
    }

    pub fn current_conditions(&self) -> Option<&CurrentConditions> {
        self.current_conditions.as_ref()
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn last_coordinates(&self) -> Option<Coordinates> {
        self.last_coordinates
    }

    pub fn last_writer(&self) -> Option<ChainId> {
        self.last_writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Condition, ConditionCategory};

    fn conditions(city: &str, kelvin: f64) -> CurrentConditions {
        CurrentConditions {
            city: Some(city.to_string()),
            temperature_k: Some(kelvin),
            condition: Some(Condition {
                category: ConditionCategory::Rain,
                description: "light rain".into(),
            }),
        }
    }

    #[test]
    fn starts_loading_with_placeholder() {
        let state = ViewState::new(Locale::Korean);

        assert!(state.is_loading());
        assert_eq!(state.city(), "로딩 중...");
        assert!(state.forecast_entries().is_empty());
        assert!(state.current_conditions().is_none());
        assert!(state.last_writer().is_none());
    }

    #[test]
    fn current_loaded_sets_city_and_conditions() {
        let mut state = ViewState::new(Locale::English);
        state.apply(Action::CurrentLoaded { chain: ChainId(1), conditions: conditions("Busan", 290.0) });

        assert_eq!(state.city(), "Busan");
        assert_eq!(state.current_conditions().unwrap().temperature_k, Some(290.0));
        assert_eq!(state.last_writer(), Some(ChainId(1)));
    }

    #[test]
    fn nameless_response_blanks_the_city() {
        let mut state = ViewState::new(Locale::English);
        let empty = CurrentConditions { city: None, temperature_k: None, condition: None };
        state.apply(Action::CurrentLoaded { chain: ChainId(1), conditions: empty });

        assert_eq!(state.city(), "");
        assert!(state.current_conditions().is_some());
    }

    #[test]
    fn failure_keeps_previous_data() {
        let mut state = ViewState::new(Locale::English);
        state.apply(Action::CurrentLoaded { chain: ChainId(1), conditions: conditions("Busan", 290.0) });
        state.apply(Action::ChainFinished { chain: ChainId(1) });

        state.apply(Action::Reload { chain: ChainId(2) });
        assert!(state.is_loading());

        state.apply(Action::ChainFailed { chain: ChainId(2), reason: "offline".into() });
        assert!(!state.is_loading());
        assert_eq!(state.phase(), &Phase::Failed { reason: "offline".into() });
        assert_eq!(state.city(), "Busan");
        assert_eq!(state.last_writer(), Some(ChainId(2)));
    }

    #[test]
    fn stale_chain_still_writes() {
        let mut state = ViewState::new(Locale::English);
        state.apply(Action::SearchSubmitted { chain: ChainId(1) });
        state.apply(Action::SearchSubmitted { chain: ChainId(2) });
        state.apply(Action::CurrentLoaded { chain: ChainId(2), conditions: conditions("Tokyo", 280.0) });
        state.apply(Action::CurrentLoaded { chain: ChainId(1), conditions: conditions("Osaka", 281.0) });

        assert_eq!(state.city(), "Osaka");
        assert_eq!(state.last_writer(), Some(ChainId(1)));
    }

    #[test]
    fn query_change_does_not_touch_phase_or_writer() {
        let mut state = ViewState::new(Locale::English);
        state.apply(Action::QueryChanged("Seoul".into()));

        assert_eq!(state.search_query(), "Seoul");
        assert!(state.is_loading());
        assert!(state.last_writer().is_none());
    }
}
