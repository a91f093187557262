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

use crate::client::WeatherSnapshot;
use std::fmt;

/// Background image categories a forecast condition can be classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    #[default]
    Clear,
    Cloudy,
    Rainy,
    Snow,
    Fog,
    Stormy,
    Sunny,
}

impl Category {
    /// Image asset displayed behind the dashboard for this category.
    pub fn image(&self) -> &'static str {
        match self {
            Self::Clear => "Clear.jpg",
            Self::Cloudy => "Cloudy.jpg",
            Self::Rainy => "Rainy.jpg",
            Self::Snow => "snow.jpg",
            Self::Fog => "fog.png",
            Self::Stormy => "Stormy.jpg",
            Self::Sunny => "Sunny.jpg",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::Cloudy => "Cloudy",
            Self::Rainy => "Rainy",
            Self::Snow => "Snow",
            Self::Fog => "Fog",
            Self::Stormy => "Stormy",
            Self::Sunny => "Sunny",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Checked in order, first match wins.
const RULES: &[(&[&str], Category)] = &[
    (&["clear"], Category::Clear),
    (&["cloud"], Category::Cloudy),
    (&["rain", "shower"], Category::Rainy),
    (&["snow"], Category::Snow),
    (&["fog"], Category::Fog),
    (&["thunder", "storm"], Category::Stormy),
    (&["sunny"], Category::Sunny),
];

/// Classify free-text forecast conditions into a background `Category`.
///
/// Matching is a case-insensitive substring search over a fixed priority order, so
/// "Cloudy with rain" is `Cloudy` rather than `Rainy`. When `conditions` is absent,
/// empty, or matches no keyword, `previous` is returned unchanged.
pub fn classify(previous: Category, conditions: Option<&str>) -> Category {
    let text = match conditions {
        Some(t) if !t.is_empty() => t.to_lowercase(),
        _ => return previous,
    };

    RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| text.contains(k)))
        .map(|(_, category)| *category)
        .unwrap_or(previous)
}

/// Currently displayed background, updated each time the weather changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Backdrop {
    category: Category,
}

impl Backdrop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn update(&mut self, weather: Option<&WeatherSnapshot>) -> Category {
        let conditions = weather.and_then(|w| w.conditions.as_deref());
        let next = classify(self.category, conditions);
        if next != self.category {
            tracing::debug!(message = "background changed", from = %self.category, to = %next);
        }

        self.category = next;
        next
    }
}
