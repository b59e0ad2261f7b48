//! Text layout for the screen model.

use glance_core::view::{CurrentPanel, ForecastBody, ForecastRow, Screen, SearchBar};
use std::fmt::Write;

const RULE: &str = "────────────────────────────────";

pub fn print(screen: &Screen) {
    print!("{}", to_text(screen));
}

pub fn to_text(screen: &Screen) -> String {
    let mut out = String::new();

    search_bar(&mut out, &screen.search_bar);
    out.push_str(RULE);
    out.push('\n');
    current_panel(&mut out, &screen.current);
    out.push_str(RULE);
    out.push('\n');

    match &screen.forecast {
        ForecastBody::Loading => out.push_str("  ⠋ ...\n"),
        ForecastBody::Entries(rows) => rows.iter().for_each(|row| forecast_row(&mut out, row)),
    }

    if let Some(reason) = &screen.failure {
        let _ = writeln!(out, "! {reason}");
    }

    out
}

fn search_bar(out: &mut String, bar: &SearchBar) {
    let text = if bar.query.is_empty() { bar.placeholder } else { bar.query.as_str() };
    let _ = writeln!(out, "[ {text} ]  ({})", bar.submit_label);
}

fn current_panel(out: &mut String, panel: &CurrentPanel) {
    let _ = writeln!(out, "{}", panel.city);
    if let Some(temperature) = &panel.temperature {
        let _ = writeln!(out, "{temperature}");
    }
    if let Some(condition) = &panel.condition {
        let _ = writeln!(out, "{condition}");
    }
    if let Some(description) = &panel.description {
        let _ = writeln!(out, "{description}");
    }
    if let Some(icon) = panel.icon {
        let _ = writeln!(out, "<{icon}>");
    }
}

pub fn row_label(row: &ForecastRow) -> String {
    let icon = row.icon.map(|i| format!("<{i}>")).unwrap_or_default();
    format!("{} {}  {}  {}", row.date, row.time, row.temperature, icon).trim_end().to_string()
}

fn forecast_row(out: &mut String, row: &ForecastRow) {
    let _ = writeln!(out, "  {}", row_label(row));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar() -> SearchBar {
        SearchBar { query: String::new(), placeholder: "Search for a city", submit_label: "Search" }
    }

    #[test]
    fn loading_screen_shows_placeholder_and_spinner() {
        let screen = Screen {
            search_bar: bar(),
            current: CurrentPanel { city: "Loading...".into(), ..CurrentPanel::default() },
            forecast: ForecastBody::Loading,
            failure: None,
        };

        let text = to_text(&screen);
        assert!(text.starts_with("[ Search for a city ]  (Search)\n"));
        assert!(text.contains("Loading...\n"));
        assert!(text.contains("⠋"));
    }

    #[test]
    fn rows_and_failure_are_listed() {
        let screen = Screen {
            search_bar: SearchBar { query: "Seoul".into(), ..bar() },
            current: CurrentPanel {
                city: "Seoul".into(),
                temperature: Some("26.9°C".into()),
                condition: Some("Clear".into()),
                description: Some("clear sky".into()),
                icon: Some("day-sunny"),
            },
            forecast: ForecastBody::Entries(vec![
                ForecastRow {
                    index: 0,
                    date: "Jan 1".into(),
                    time: "3:00 PM".into(),
                    temperature: "26.9°C".into(),
                    icon: Some("rains"),
                },
                ForecastRow {
                    index: 1,
                    date: "Jan 1".into(),
                    time: "6:00 PM".into(),
                    temperature: "20.0°C".into(),
                    icon: None,
                },
            ]),
            failure: Some("offline".into()),
        };

        let text = to_text(&screen);
        assert!(text.starts_with("[ Seoul ]"));
        assert!(text.contains("26.9°C\nClear\nclear sky\n<day-sunny>\n"));
        assert!(text.contains("  Jan 1 3:00 PM  26.9°C  <rains>\n"));
        assert!(text.contains("  Jan 1 6:00 PM  20.0°C\n"));
        assert!(text.ends_with("! offline\n"));
    }
}
