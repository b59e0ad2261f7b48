//! Fetch chains: mount/reload by location and city search.
//!
//! Every stage result goes through [`ViewState::apply`]. Stages are awaited
//! one after another; nothing stops two chains from running at once.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::{
    display::Locale,
    error::WeatherError,
    location::{LocationProvider, PermissionStatus},
    model::{Coordinates, ForecastEntry},
    provider::WeatherService,
    state::{Action, ChainId, ViewState},
    view::Screen,
};

/// How a chain ended when no error was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainOutcome {
    Completed,
    /// Location permission was denied; state is left in `Loading`.
    Stalled,
}

#[derive(Debug)]
pub struct WeatherApp {
    service: Box<dyn WeatherService>,
    location: Box<dyn LocationProvider>,
    locale: Locale,
    state: Mutex<ViewState>,
    next_chain: AtomicU64,
}

impl WeatherApp {
    pub fn new(
        service: Box<dyn WeatherService>,
        location: Box<dyn LocationProvider>,
        locale: Locale,
    ) -> Self {
        Self {
            service,
            location,
            locale,
            state: Mutex::new(ViewState::new(locale)),
            next_chain: AtomicU64::new(1),
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn snapshot(&self) -> ViewState {
        self.state.lock().clone()
    }

    pub fn screen(&self) -> Screen {
        Screen::from_state(&self.state.lock(), self.locale)
    }

    pub fn dispatch(&self, action: Action) {
        tracing::trace!(?action, "dispatch");
        self.state.lock().apply(action);
    }

    pub fn set_query(&self, query: impl Into<String>) {
        self.dispatch(Action::QueryChanged(query.into()));
    }

    fn next_chain(&self) -> ChainId {
        ChainId(self.next_chain.fetch_add(1, Ordering::Relaxed))
    }

    /// Mount or reload: resolve the position, then fetch current weather and
    /// the forecast for it.
    pub async fn reload(&self) -> Result<ChainOutcome, WeatherError> {
        let chain = self.next_chain();
        self.dispatch(Action::Reload { chain });

        let result = self.location_chain(chain).await;
        self.finish(chain, result)
    }

    async fn location_chain(&self, chain: ChainId) -> Result<ChainOutcome, WeatherError> {
        if self.location.request_permission().await? == PermissionStatus::Denied {
            tracing::error!(%chain, "location permission denied");
            return Ok(ChainOutcome::Stalled);
        }

        let coords = self.location.current_position().await?;
        tracing::debug!(%chain, %coords, "position resolved");
        self.dispatch(Action::PositionResolved { chain, coords });

        let conditions = self.service.current_by_coords(coords).await?;
        tracing::debug!(%chain, ?conditions, "current weather");
        self.dispatch(Action::CurrentLoaded { chain, conditions });

        self.load_forecast(chain, coords).await?;
        Ok(ChainOutcome::Completed)
    }

    /// Search for the current query. Only current conditions follow the
    /// searched city; the forecast is fetched for the last resolved position.
    /// A blank query falls back to the location chain.
    pub async fn submit_search(&self) -> Result<ChainOutcome, WeatherError> {
        let chain = self.next_chain();
        let query = self.state.lock().search_query().to_string();
        self.dispatch(Action::SearchSubmitted { chain });

        let result = if query.trim().is_empty() {
            self.location_chain(chain).await
        } else {
            self.search_chain(chain, &query).await
        };
        self.finish(chain, result)
    }

    /// Replace the query and submit it.
    pub async fn search(&self, city: &str) -> Result<ChainOutcome, WeatherError> {
        self.set_query(city);
        self.submit_search().await
    }

    async fn search_chain(&self, chain: ChainId, query: &str) -> Result<ChainOutcome, WeatherError> {
        let conditions = self.service.current_by_city(query).await?;
        tracing::debug!(%chain, query, ?conditions, "search weather");
        self.dispatch(Action::CurrentLoaded { chain, conditions });

        let last = self.state.lock().last_coordinates();
        let coords = last.unwrap_or_else(|| {
            tracing::warn!(%chain, "no resolved position yet; forecast uses 0, 0");
            Coordinates::default()
        });

        self.load_forecast(chain, coords).await?;
        Ok(ChainOutcome::Completed)
    }

    async fn load_forecast(&self, chain: ChainId, coords: Coordinates) -> Result<(), WeatherError> {
        let entries = self.service.forecast_by_coords(coords).await?;
        tracing::debug!(%chain, count = entries.len(), "forecast");
        self.dispatch(Action::ForecastLoaded { chain, entries });
        Ok(())
    }

    /// Outer boundary of a chain: errors are logged and recorded as
    /// `Failed`, then handed back to the caller.
    fn finish(
        &self,
        chain: ChainId,
        result: Result<ChainOutcome, WeatherError>,
    ) -> Result<ChainOutcome, WeatherError> {
        match &result {
            Ok(ChainOutcome::Completed) => self.dispatch(Action::ChainFinished { chain }),
            Ok(ChainOutcome::Stalled) => {}
            Err(err) => {
                tracing::error!(%chain, error = %err, "failed to fetch weather data");
                self.dispatch(Action::ChainFailed { chain, reason: err.to_string() });
            }
        }
        result
    }

    /// Selecting a row only logs it.
    pub fn select_entry(&self, index: usize) -> Option<ForecastEntry> {
        let entry = self.state.lock().forecast_entries().get(index).cloned();
        match &entry {
            Some(entry) => tracing::info!(index, ?entry, "selected forecast entry"),
            None => tracing::warn!(index, "no forecast entry at index"),
        }
        entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::LocationError,
        location::StaticLocation,
        model::{Condition, ConditionCategory, CurrentConditions},
        state::Phase,
    };
    use async_trait::async_trait;
    use std::{collections::HashMap, sync::Arc, time::Duration};

    const HOME: Coordinates = Coordinates { latitude: 37.5, longitude: 127.0 };

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        CurrentByCoords(Coordinates),
        CurrentByCity(String),
        ForecastByCoords(Coordinates),
    }

    /// In-memory service: cities map to conditions, every forecast is
    /// tagged with the coordinates it was requested for.
    #[derive(Debug, Default)]
    struct FakeService {
        calls: Arc<Mutex<Vec<Call>>>,
        cities: HashMap<String, (f64, Duration)>,
        fail_forecast: bool,
    }

    fn conditions(city: &str, kelvin: f64) -> CurrentConditions {
        CurrentConditions {
            city: Some(city.to_string()),
            temperature_k: Some(kelvin),
            condition: Some(Condition {
                category: ConditionCategory::Clouds,
                description: "overcast clouds".into(),
            }),
        }
    }

    fn forecast_for(coords: Coordinates) -> Vec<ForecastEntry> {
        vec![ForecastEntry {
            timestamp: format!("2024-01-01 15:00:00 @{},{}", coords.latitude, coords.longitude),
            temperature_k: 280.0,
            condition: None,
        }]
    }

    fn offline() -> WeatherError {
        WeatherError::Location(LocationError::Unavailable("offline".into()))
    }

    #[async_trait]
    impl WeatherService for FakeService {
        async fn current_by_coords(
            &self,
            coords: Coordinates,
        ) -> Result<CurrentConditions, WeatherError> {
            self.calls.lock().push(Call::CurrentByCoords(coords));
            Ok(conditions("Home", 290.0))
        }

        async fn current_by_city(&self, city: &str) -> Result<CurrentConditions, WeatherError> {
            self.calls.lock().push(Call::CurrentByCity(city.to_string()));
            let (kelvin, delay) = self.cities.get(city).copied().ok_or_else(offline)?;
            tokio::time::sleep(delay).await;
            Ok(conditions(city, kelvin))
        }

        async fn forecast_by_coords(
            &self,
            coords: Coordinates,
        ) -> Result<Vec<ForecastEntry>, WeatherError> {
            self.calls.lock().push(Call::ForecastByCoords(coords));
            if self.fail_forecast {
                return Err(offline());
            }
            Ok(forecast_for(coords))
        }
    }

    fn app_with(service: FakeService, coords: Option<Coordinates>) -> WeatherApp {
        WeatherApp::new(Box::new(service), Box::new(StaticLocation::new(coords)), Locale::Korean)
    }

    #[tokio::test]
    async fn mount_loads_current_and_forecast() {
        let service = FakeService::default();
        let calls = service.calls.clone();
        let app = app_with(service, Some(HOME));

        let outcome = app.reload().await.unwrap();
        assert_eq!(outcome, ChainOutcome::Completed);

        let state = app.snapshot();
        assert_eq!(state.phase(), &Phase::Loaded);
        assert_eq!(state.city(), "Home");
        assert_eq!(state.last_coordinates(), Some(HOME));
        assert_eq!(state.forecast_entries(), forecast_for(HOME).as_slice());
        assert_eq!(
            *calls.lock(),
            vec![Call::CurrentByCoords(HOME), Call::ForecastByCoords(HOME)]
        );
    }

    #[tokio::test]
    async fn permission_denied_stalls_without_fetching() {
        let service = FakeService::default();
        let calls = service.calls.clone();
        let app = app_with(service, None);

        let outcome = app.reload().await.unwrap();
        assert_eq!(outcome, ChainOutcome::Stalled);

        let state = app.snapshot();
        assert!(state.is_loading());
        assert_eq!(state.city(), "로딩 중...");
        assert!(calls.lock().is_empty());
    }

    #[tokio::test]
    async fn search_keeps_forecast_on_last_position() {
        let mut service = FakeService::default();
        service.cities.insert("Seoul".into(), (300.0, Duration::ZERO));
        let calls = service.calls.clone();
        let app = app_with(service, Some(HOME));

        app.reload().await.unwrap();
        app.search("Seoul").await.unwrap();

        let state = app.snapshot();
        assert!(!state.is_loading());
        assert_eq!(state.city(), "Seoul");
        assert_eq!(state.current_conditions().unwrap().temperature_k, Some(300.0));
        assert_eq!(state.forecast_entries(), forecast_for(HOME).as_slice());
        assert_eq!(calls.lock().last(), Some(&Call::ForecastByCoords(HOME)));
    }

    #[tokio::test]
    async fn search_before_any_position_uses_origin() {
        let mut service = FakeService::default();
        service.cities.insert("Seoul".into(), (300.0, Duration::ZERO));
        let calls = service.calls.clone();
        let app = app_with(service, None);

        app.search("Seoul").await.unwrap();

        assert_eq!(calls.lock().last(), Some(&Call::ForecastByCoords(Coordinates::default())));
        assert_eq!(app.snapshot().city(), "Seoul");
    }

    #[tokio::test]
    async fn blank_search_reloads_location_weather() {
        let mut service = FakeService::default();
        service.cities.insert("Seoul".into(), (300.0, Duration::ZERO));
        let calls = service.calls.clone();
        let app = app_with(service, Some(HOME));

        app.reload().await.unwrap();
        app.search("Seoul").await.unwrap();
        calls.lock().clear();

        let outcome = app.search("  ").await.unwrap();
        assert_eq!(outcome, ChainOutcome::Completed);
        assert_eq!(
            *calls.lock(),
            vec![Call::CurrentByCoords(HOME), Call::ForecastByCoords(HOME)]
        );

        let state = app.snapshot();
        assert_eq!(state.city(), "Home");
        assert_eq!(state.phase(), &Phase::Loaded);
    }

    #[tokio::test]
    async fn blank_search_with_denied_location_stalls() {
        let service = FakeService::default();
        let calls = service.calls.clone();
        let app = app_with(service, None);

        assert_eq!(app.search("").await.unwrap(), ChainOutcome::Stalled);
        assert!(app.snapshot().is_loading());
        assert!(calls.lock().is_empty());
    }

    #[tokio::test]
    async fn network_failure_leaves_stale_data() {
        let mut service = FakeService::default();
        service.cities.insert("Seoul".into(), (300.0, Duration::ZERO));
        let app = app_with(service, Some(HOME));

        app.reload().await.unwrap();
        let before = app.snapshot();

        // Unknown city: the fake fails the request.
        let err = app.search("Atlantis").await.unwrap_err();
        assert!(err.to_string().contains("offline"));

        let state = app.snapshot();
        assert!(!state.is_loading());
        assert!(matches!(state.phase(), Phase::Failed { .. }));
        assert_eq!(state.city(), before.city());
        assert_eq!(state.current_conditions(), before.current_conditions());
        assert_eq!(state.forecast_entries(), before.forecast_entries());
    }

    #[tokio::test]
    async fn forecast_failure_after_current_desynchronizes() {
        let mut service = FakeService::default();
        service.fail_forecast = true;
        let app = app_with(service, Some(HOME));

        assert!(app.reload().await.is_err());

        let state = app.snapshot();
        assert_eq!(state.city(), "Home");
        assert!(state.forecast_entries().is_empty());
        assert!(!state.is_loading());
    }

    #[tokio::test]
    async fn overlapping_searches_end_on_one_of_them() {
        let mut service = FakeService::default();
        service.cities.insert("Tokyo".into(), (280.0, Duration::from_millis(30)));
        service.cities.insert("Paris".into(), (285.0, Duration::from_millis(5)));
        let app = app_with(service, Some(HOME));

        app.reload().await.unwrap();

        let first = async {
            app.search("Tokyo").await
        };
        let second = async {
            tokio::time::sleep(Duration::from_millis(1)).await;
            app.search("Paris").await
        };
        let (a, b) = tokio::join!(first, second);
        assert!(a.is_ok() && b.is_ok());

        let state = app.snapshot();
        assert!(["Tokyo", "Paris"].contains(&state.city()));
        let kelvin = state.current_conditions().unwrap().temperature_k;
        assert!(kelvin == Some(280.0) || kelvin == Some(285.0));
        assert_eq!(state.phase(), &Phase::Loaded);
    }

    #[tokio::test]
    async fn select_entry_returns_row() {
        let app = app_with(FakeService::default(), Some(HOME));
        app.reload().await.unwrap();

        assert_eq!(app.select_entry(0), forecast_for(HOME).into_iter().next());
        assert_eq!(app.select_entry(5), None);
    }

    #[tokio::test]
    async fn screen_reflects_loading_then_rows() {
        let app = app_with(FakeService::default(), Some(HOME));
        assert_eq!(app.screen().forecast, crate::view::ForecastBody::Loading);

        app.reload().await.unwrap();
        assert!(matches!(app.screen().forecast, crate::view::ForecastBody::Entries(ref rows) if rows.len() == 1));
    }
}
