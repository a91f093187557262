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

use crate::client::{ForecastClient, WeatherSnapshot};
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{Instrument, Level};

/// Message shown to the user whenever a forecast cannot be fetched.
pub const FETCH_FAILED_MESSAGE: &str = "This place does not exist";

/// User-facing notification for failed fetches.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Weather currently shared with every consumer of a `WeatherStore`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherState {
    pub place: String,
    pub this_location: String,
    pub values: Vec<WeatherSnapshot>,
}

impl WeatherState {
    fn new<S: Into<String>>(place: S) -> Self {
        WeatherState {
            place: place.into(),
            ..Self::default()
        }
    }

    /// The current reading: the first entry of the forecast series, if any.
    pub fn weather(&self) -> Option<&WeatherSnapshot> {
        self.values.first()
    }
}

/// Shared weather state for a selected place.
///
/// Setting a place stores it immediately and spawns one fetch for it. Fetches are
/// never de-duplicated or cancelled: when several overlap, each successful one
/// replaces the location and series as it completes, so the last to complete wins.
/// A failed fetch leaves the previous weather in place and notifies the user once.
///
/// Cloning the store is cheap and every clone refers to the same state.
#[derive(Clone)]
pub struct WeatherStore {
    inner: Arc<Inner>,
}

struct Inner {
    client: ForecastClient,
    notifier: Arc<dyn Notifier>,
    state: watch::Sender<WeatherState>,
}

impl WeatherStore {
    pub const DEFAULT_PLACE: &'static str = "Jaipur";

    pub fn new(client: ForecastClient, notifier: Arc<dyn Notifier>) -> Self {
        Self::with_place(client, notifier, Self::DEFAULT_PLACE)
    }

    pub fn with_place<S: Into<String>>(client: ForecastClient, notifier: Arc<dyn Notifier>, place: S) -> Self {
        let (state, _) = watch::channel(WeatherState::new(place));
        WeatherStore {
            inner: Arc::new(Inner {
                client,
                notifier,
                state,
            }),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<WeatherState> {
        self.inner.state.subscribe()
    }

    pub fn snapshot(&self) -> WeatherState {
        self.inner.state.borrow().clone()
    }

    pub fn place(&self) -> String {
        self.inner.state.borrow().place.clone()
    }

    /// Select a new place and start fetching its forecast in the background.
    ///
    /// Must be called from within a tokio runtime. The returned handle completes once
    /// the fetch has been applied (or reported as failed); callers are free to drop it.
    pub fn set_place<S: Into<String>>(&self, place: S) -> JoinHandle<()> {
        let place = place.into();
        self.inner.state.send_modify(|s| s.place = place.clone());
        tracing::debug!(message = "place selected", place = %place);

        let inner = self.inner.clone();
        tokio::spawn(async move { inner.fetch(place).await })
    }

    /// Fetch the forecast for the current place and wait for it to be applied.
    pub async fn refresh(&self) {
        let place = self.place();
        self.inner.fetch(place).await
    }
}

impl fmt::Debug for WeatherStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherStore")
            .field("client", &self.inner.client)
            .field("state", &*self.inner.state.borrow())
            .finish()
    }
}

impl Inner {
    async fn fetch(&self, place: String) {
        match self
            .client
            .forecast(&place)
            .instrument(tracing::span!(Level::DEBUG, "forecast_fetch", place = %place))
            .await
        {
            Ok(location) => {
                tracing::info!(
                    message = "fetched new forecast",
                    place = %place,
                    location = %location.address,
                    values = location.values.len(),
                );

                self.state.send_modify(|s| {
                    s.this_location = location.address;
                    s.values = location.values;
                });
            }
            Err(e) => {
                tracing::error!(message = "failed to fetch forecast", place = %place, error = %e);
                self.notifier.notify(FETCH_FAILED_MESSAGE);
            }
        }
    }
}
