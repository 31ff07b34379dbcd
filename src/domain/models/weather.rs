//! City weather domain model and the OpenWeather response envelope.

use serde::{Deserialize, Serialize};

/// Weather details for a city.
///
/// Field names mirror the OpenWeather JSON payload; nested structures
/// default to zero values when absent from the provider response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub coord: Coord,
    #[serde(rename = "weather", default)]
    pub conditions: Vec<WeatherCondition>,
    #[serde(rename = "main", default)]
    pub main_data: WeatherMain,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    #[serde(default)]
    pub lon: f64,
    #[serde(default)]
    pub lat: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherCondition {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub main: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherMain {
    #[serde(default)]
    pub temp: f64,
    #[serde(default)]
    pub feels_like: f64,
    #[serde(default)]
    pub temp_min: f64,
    #[serde(default)]
    pub temp_max: f64,
    #[serde(default)]
    pub humidity: f64,
}

/// Raw OpenWeather response: the weather payload plus the `cod` status
/// marker. OpenWeather reports "no data for this city" in-band with a
/// non-200 `cod` value.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenWeatherResponse {
    #[serde(flatten)]
    pub weather: Weather,
    #[serde(rename = "cod", default, deserialize_with = "deserialize_cod")]
    pub code: i64,
}

/// OpenWeather encodes `cod` as a number on success but as a string on
/// error responses ("404"). Accept both; unparseable values fall back
/// to 0, which reads as no-result.
fn deserialize_cod<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Code {
        Number(i64),
        Text(String),
    }

    Ok(match Code::deserialize(deserializer)? {
        Code::Number(code) => code,
        Code::Text(text) => text.parse().unwrap_or(0),
    })
}

impl OpenWeatherResponse {
    const GOOD_RESPONSE: i64 = 200;

    /// True when OpenWeather explicitly reported no result for the city.
    pub fn is_no_result(&self) -> bool {
        self.code != Self::GOOD_RESPONSE
    }
}
