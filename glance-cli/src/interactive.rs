use glance_core::{WeatherApp, view::ForecastBody};
use inquire::{InquireError, Select, Text};

use crate::{cli::mount, render};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    Search,
    Select,
    Reload,
    Quit,
}

impl std::fmt::Display for Choice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Choice::Search => "Search a city",
            Choice::Select => "Select a forecast entry",
            Choice::Reload => "Reload current location",
            Choice::Quit => "Quit",
        })
    }
}

/// Escape or Ctrl-C on a prompt ends the session.
fn cancelled(err: &InquireError) -> bool {
    matches!(err, InquireError::OperationCanceled | InquireError::OperationInterrupted)
}

pub async fn run(app: &WeatherApp) -> anyhow::Result<()> {
    mount(app).await;

    loop {
        render::print(&app.screen());

        let choices = vec![Choice::Search, Choice::Select, Choice::Reload, Choice::Quit];
        let choice = match Select::new("What next?", choices).prompt() {
            Ok(choice) => choice,
            Err(err) if cancelled(&err) => return Ok(()),
            Err(err) => return Err(err.into()),
        };

        match choice {
            Choice::Search => {
                let screen = app.screen();
                let query = Text::new(screen.search_bar.submit_label)
                    .with_placeholder(screen.search_bar.placeholder)
                    .with_initial_value(&screen.search_bar.query)
                    .prompt();
                match query {
                    Ok(query) => {
                        app.set_query(query);
                        if let Err(err) = app.submit_search().await {
                            tracing::debug!(%err, "search failed; shown on next render");
                        }
                    }
                    Err(err) if cancelled(&err) => continue,
                    Err(err) => return Err(err.into()),
                }
            }
            Choice::Select => {
                let ForecastBody::Entries(rows) = app.screen().forecast else {
                    continue;
                };
                if rows.is_empty() {
                    println!("No forecast entries yet.");
                    continue;
                }
                let labels: Vec<String> = rows.iter().map(render::row_label).collect();
                match Select::new("Forecast entry:", labels).raw_prompt() {
                    Ok(selected) => {
                        app.select_entry(selected.index);
                    }
                    Err(err) if cancelled(&err) => continue,
                    Err(err) => return Err(err.into()),
                }
            }
            Choice::Reload => mount(app).await,
            Choice::Quit => return Ok(()),
        }
    }
}
