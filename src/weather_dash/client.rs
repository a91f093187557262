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

use reqwest::header::ACCEPT;
use reqwest::{Client, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::error;
use std::fmt;

const AGGREGATE_HOURS: &str = "24";
const CONTENT_TYPE: &str = "json";
const UNIT_GROUP: &str = "metric";
const SHORT_COLUMN_NAMES: &str = "0";

#[derive(Debug)]
pub enum ClientError {
    Internal(reqwest::Error),
    UnknownPlace(String),
    Malformed(serde_json::Error),
    Unexpected(StatusCode, Url),
    InvalidBaseUrl(Url),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Internal(e) => write!(f, "{}", e),
            Self::UnknownPlace(p) => write!(f, "unknown place {}", p),
            Self::Malformed(e) => write!(f, "malformed forecast response: {}", e),
            Self::Unexpected(status, url) => write!(f, "unexpected status {} for {}", status, url),
            Self::InvalidBaseUrl(url) => write!(f, "cannot build forecast URL from {}", url),
        }
    }
}

impl error::Error for ClientError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Internal(e) => Some(e),
            Self::Malformed(e) => Some(e),
            _ => None,
        }
    }
}

/// Static RapidAPI credential pair attached to every forecast request.
#[derive(Clone)]
pub struct Credentials {
    key: String,
    host: String,
}

impl Credentials {
    pub const DEFAULT_HOST: &'static str = "visual-crossing-weather.p.rapidapi.com";

    pub fn new<K: Into<String>, H: Into<String>>(key: K, host: H) -> Self {
        Credentials {
            key: key.into(),
            host: host.into(),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }
}

// Never print the key itself.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &"<redacted>")
            .field("host", &self.host)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ForecastClient {
    client: Client,
    forecast_url: Url,
    credentials: Credentials,
}

impl ForecastClient {
    pub const DEFAULT_API_URL: &'static str = "https://visual-crossing-weather.p.rapidapi.com/";
    const JSON_RESPONSE: &'static str = "application/json";
    const KEY_HEADER: &'static str = "X-RapidAPI-Key";
    const HOST_HEADER: &'static str = "X-RapidAPI-Host";

    pub fn new(client: Client, base_url: Url, credentials: Credentials) -> Result<Self, ClientError> {
        let forecast_url = Self::forecast_url(base_url)?;
        Ok(ForecastClient {
            client,
            forecast_url,
            credentials,
        })
    }

    /// Fetch the 24 hour aggregated forecast for `place`, returning the first location
    /// the API resolved it to.
    pub async fn forecast(&self, place: &str) -> Result<ForecastLocation, ClientError> {
        tracing::debug!(message = "making forecast request", url = %self.forecast_url, place = %place);

        let res = self.make_request(place).await?;
        let text = res.text().await.map_err(ClientError::Internal)?;
        let body = serde_json::from_str::<ForecastResponse>(&text).map_err(ClientError::Malformed)?;
        tracing::debug!(message = "received forecast response", locations = body.locations.len(), response = ?body);

        let ForecastResponse { locations, message } = body;
        let Some((_, first)) = locations.into_iter().next() else {
            tracing::debug!(message = "forecast response has no locations", place = %place, api_message = ?message);
            return Err(ClientError::UnknownPlace(place.to_owned()));
        };

        serde_json::from_value::<ForecastLocation>(first).map_err(ClientError::Malformed)
    }

    async fn make_request(&self, place: &str) -> Result<Response, ClientError> {
        let res = self
            .client
            .get(self.forecast_url.clone())
            .query(&[
                ("aggregateHours", AGGREGATE_HOURS),
                ("location", place),
                ("contentType", CONTENT_TYPE),
                ("unitGroup", UNIT_GROUP),
                ("shortColumnNames", SHORT_COLUMN_NAMES),
            ])
            .header(ACCEPT, Self::JSON_RESPONSE)
            .header(Self::KEY_HEADER, &self.credentials.key)
            .header(Self::HOST_HEADER, &self.credentials.host)
            .send()
            .await
            .map_err(ClientError::Internal)?;

        let status = res.status();
        if status.is_success() {
            Ok(res)
        } else if status == StatusCode::NOT_FOUND || status == StatusCode::BAD_REQUEST {
            Err(ClientError::UnknownPlace(place.to_owned()))
        } else {
            Err(ClientError::Unexpected(status, res.url().clone()))
        }
    }

    fn forecast_url(base_url: Url) -> Result<Url, ClientError> {
        let mut url = base_url.clone();
        match url.path_segments_mut() {
            Ok(mut p) => {
                p.pop_if_empty().push("forecast");
            }
            Err(_) => return Err(ClientError::InvalidBaseUrl(base_url)),
        }

        Ok(url)
    }
}

#[derive(Deserialize, Debug)]
struct ForecastResponse {
    #[serde(alias = "locations", default)]
    locations: Map<String, Value>,
    #[serde(alias = "message")]
    message: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ForecastLocation {
    #[serde(alias = "address")]
    pub address: String,
    #[serde(alias = "tz")]
    pub tz: Option<String>,
    #[serde(alias = "latitude")]
    pub latitude: Option<f64>,
    #[serde(alias = "longitude")]
    pub longitude: Option<f64>,
    #[serde(alias = "values", default)]
    pub values: Vec<WeatherSnapshot>,
}

/// One aggregated reading. Everything apart from the shape of the record is
/// decided by the upstream API, so every field is optional.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct WeatherSnapshot {
    #[serde(alias = "datetimeStr")]
    pub datetime_str: Option<String>,
    #[serde(alias = "conditions")]
    pub conditions: Option<String>,
    #[serde(alias = "temp")]
    pub temp: Option<f64>,
    #[serde(alias = "maxt")]
    pub maxt: Option<f64>,
    #[serde(alias = "mint")]
    pub mint: Option<f64>,
    #[serde(alias = "humidity")]
    pub humidity: Option<f64>,
    #[serde(alias = "wspd")]
    pub wspd: Option<f64>,
    #[serde(alias = "wdir")]
    pub wdir: Option<f64>,
    #[serde(alias = "wgust")]
    pub wgust: Option<f64>,
    #[serde(alias = "heatindex")]
    pub heatindex: Option<f64>,
    #[serde(alias = "windchill")]
    pub windchill: Option<f64>,
    #[serde(alias = "precip")]
    pub precip: Option<f64>,
    #[serde(alias = "pop")]
    pub pop: Option<f64>,
    #[serde(alias = "cloudcover")]
    pub cloudcover: Option<f64>,
    #[serde(alias = "visibility")]
    pub visibility: Option<f64>,
    #[serde(alias = "sealevelpressure")]
    pub sealevelpressure: Option<f64>,
    #[serde(alias = "dew")]
    pub dew: Option<f64>,
    #[serde(alias = "snow")]
    pub snow: Option<f64>,
    #[serde(alias = "snowdepth")]
    pub snowdepth: Option<f64>,
}
