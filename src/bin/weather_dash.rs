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

use clap::Parser;
use reqwest::{Client, Url};
use std::error::Error;
use std::io::{self, BufRead};
use std::process;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tokio::signal::unix::{self, SignalKind};
use tokio::sync::mpsc;
use tracing::Level;
use weather_dash::background::Backdrop;
use weather_dash::client::{Credentials, ForecastClient};
use weather_dash::clock::{LocalClock, Ticker};
use weather_dash::dashboard;
use weather_dash::state::{Notifier, WeatherStore};

const DEFAULT_LOG_LEVEL: Level = Level::INFO;
const DEFAULT_TIMEOUT_MILLIS: u64 = 5000;

#[derive(Debug, Parser)]
#[clap(name = "weather_dash", version = clap::crate_version!())]
struct WeatherDashApplication {
    /// Place to show the forecast for on startup. Type another place name on stdin to switch.
    #[clap(long, default_value_t = WeatherStore::DEFAULT_PLACE.into())]
    place: String,

    /// RapidAPI key used to authenticate with the Visual Crossing weather API
    #[clap(long, env = "RAPIDAPI_KEY", hide_env_values = true)]
    api_key: String,

    /// RapidAPI host header sent along with the key
    #[clap(long, default_value_t = Credentials::DEFAULT_HOST.into())]
    api_host: String,

    /// Base URL for the Visual Crossing weather API
    #[clap(long, default_value = ForecastClient::DEFAULT_API_URL)]
    api_url: Url,

    /// Logging verbosity. Allowed values are 'trace', 'debug', 'info', 'warn', and 'error'
    /// (case insensitive)
    #[clap(long, default_value_t = DEFAULT_LOG_LEVEL)]
    log_level: Level,

    /// Timeout for fetching forecasts from the weather API, in milliseconds.
    #[clap(long, default_value_t = DEFAULT_TIMEOUT_MILLIS)]
    timeout_millis: u64,
}

/// Alerts are written to the terminal, separate from the dashboard on stdout.
struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, message: &str) {
        eprintln!("\x07!! {}", message);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let opts = WeatherDashApplication::parse();
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(opts.log_level)
            .with_writer(io::stderr)
            .finish(),
    )
    .expect("failed to set tracing subscriber");

    let timeout = Duration::from_millis(opts.timeout_millis);
    let http_client = Client::builder().timeout(timeout).build().unwrap_or_else(|e| {
        tracing::error!(message = "unable to initialize HTTP client", error = %e);
        process::exit(1)
    });

    let credentials = Credentials::new(opts.api_key, opts.api_host);
    let client = ForecastClient::new(http_client, opts.api_url.clone(), credentials).unwrap_or_else(|e| {
        tracing::error!(message = "unable to initialize forecast client", api_url = %opts.api_url, error = %e);
        process::exit(1)
    });

    let store = WeatherStore::new(client, Arc::new(TerminalNotifier));
    let _ = store.set_place(opts.place);
    tracing::info!(message = "dashboard started", api_url = %opts.api_url, place = %store.place());

    let ticker = Ticker::start(LocalClock);
    let mut weather_rx = store.subscribe();
    let mut time_rx = ticker.subscribe();
    let mut backdrop = Backdrop::new();
    let mut places = read_places();

    let shutdown = async {
        // Wait for either SIGTERM or SIGINT to shutdown
        tokio::select! {
            _ = sigterm() => {}
            _ = sigint() => {}
        }
    };
    tokio::pin!(shutdown);

    loop {
        let state = weather_rx.borrow_and_update().clone();
        let category = backdrop.update(state.weather());
        let now = time_rx.borrow_and_update().clone();
        println!("\n{}\n", dashboard::render(&state, category, &now));

        tokio::select! {
            res = weather_rx.changed() => {
                if res.is_err() {
                    break;
                }
            }
            res = time_rx.changed() => {
                if res.is_err() {
                    break;
                }
            }
            place = places.recv() => match place {
                Some(place) => {
                    let _ = store.set_place(place);
                }
                None => break,
            },
            _ = &mut shutdown => break,
        }
    }

    ticker.stop();
    tracing::info!("dashboard shutdown");
    Ok(())
}

/// Forward each non-blank line from stdin, trimmed, until EOF or a read error.
///
/// Reads happen on a plain thread rather than the runtime's blocking pool so that a
/// pending read never holds up shutdown.
fn read_places() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);

    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    tracing::error!(message = "unable to read place from stdin", error = %e);
                    break;
                }
            };

            let place = line.trim();
            if !place.is_empty() && tx.blocking_send(place.to_owned()).is_err() {
                break;
            }
        }
    });

    rx
}

/// Return after the first SIGTERM signal received by this process
async fn sigterm() -> io::Result<()> {
    unix::signal(SignalKind::terminate())?.recv().await;
    Ok(())
}

/// Return after the first SIGINT signal received by this process
async fn sigint() -> io::Result<()> {
    unix::signal(SignalKind::interrupt())?.recv().await;
    Ok(())
}
