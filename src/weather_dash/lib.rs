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

//! Terminal weather dashboard for the Visual Crossing forecast API
//!
//! ## Features
//!
//! `weather_dash` fetches the 24 hour aggregated forecast for a place using the [Visual Crossing]
//! weather API (through [RapidAPI]) and renders it as a small text dashboard. The dashboard shows:
//!
//! * The resolved location name, e.g. `Jaipur, Rajasthan, India`.
//! * The current date and time, refreshed every minute.
//! * A background image category picked from the current conditions (clear, cloudy, rainy,
//!   snow, fog, stormy or sunny).
//! * Current temperature, conditions, humidity, wind speed and heat index.
//! * The conditions for the next few days.
//!
//! [Visual Crossing]: https://www.visualcrossing.com/weather-api
//! [RapidAPI]: https://rapidapi.com/visual-crossing-corporation-visual-crossing-corporation-default/api/visual-crossing-weather
//!
//! ## Build
//!
//! `weather_dash` is a Rust program and must be built from source using a [Rust toolchain](https://rustup.rs/).
//!
//! ```text
//! cargo build --release
//! ```
//!
//! ## Usage
//!
//! `weather_dash` needs a RapidAPI key. It can be passed with `--api-key` or, to keep it out of
//! your shell history, with the `RAPIDAPI_KEY` environment variable.
//!
//! ```text
//! export RAPIDAPI_KEY=your-key
//! ./weather_dash --place Jaipur
//! ```
//!
//! Type the name of another place and press enter to switch to it. If the API cannot find
//! the place (or cannot be reached) an alert is printed and the previous forecast stays on
//! screen. Press `Ctrl-D` or `Ctrl-C` to exit.
//!

pub mod background;
pub mod client;
pub mod clock;
pub mod dashboard;
pub mod state;
