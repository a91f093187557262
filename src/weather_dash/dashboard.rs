// weather_dash - Terminal weather dashboard for the Visual Crossing forecast API
//
// Copyright 2022 Nick Pillitteri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.
//

//! Plain-text rendering of the weather dashboard.

use crate::background::Category;
use crate::client::WeatherSnapshot;
use crate::clock::DisplayTime;
use crate::state::WeatherState;
use chrono::DateTime;

/// Number of upcoming days listed under the current conditions.
pub const FORECAST_DAYS: usize = 6;

const MISSING: &str = "-";

/// Render the dashboard for the current weather, background and time.
pub fn render(state: &WeatherState, background: Category, now: &DisplayTime) -> String {
    let mut lines = Vec::new();
    let title = if state.this_location.is_empty() {
        &state.place
    } else {
        &state.this_location
    };

    lines.push(format!("== {} ==", title));
    lines.push(format!("{}  {}", now.date, now.time));
    lines.push(format!("Background: {} ({})", background, background.image()));
    lines.push(String::new());

    match state.weather() {
        Some(current) => {
            lines.push(format!(
                "  {}  {}",
                measure(current.temp, "°C"),
                current.conditions.as_deref().unwrap_or(MISSING)
            ));
            lines.push(format!(
                "  Humidity {}   Wind {}   Heat index {}",
                measure(current.humidity, "%"),
                measure(current.wspd, "km/h"),
                measure(current.heatindex, "°C"),
            ));

            let upcoming: Vec<String> = state.values.iter().skip(1).take(FORECAST_DAYS).map(day_line).collect();
            if !upcoming.is_empty() {
                lines.push(String::new());
                lines.extend(upcoming);
            }
        }
        None => lines.push(format!("  No weather for {} yet", state.place)),
    }

    lines.join("\n")
}

fn day_line(snapshot: &WeatherSnapshot) -> String {
    format!(
        "  {:<6}  {:>8}  {}",
        day_label(snapshot.datetime_str.as_deref()),
        measure(snapshot.temp, "°C"),
        snapshot.conditions.as_deref().unwrap_or(MISSING)
    )
}

fn day_label(datetime: Option<&str>) -> String {
    match datetime {
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.format("%a %-d").to_string())
            .unwrap_or_else(|_| s.to_owned()),
        None => MISSING.to_owned(),
    }
}

fn measure(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{:.1} {}", v, unit),
        None => MISSING.to_owned(),
    }
}
