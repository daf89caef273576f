//! Domain model shared by the session controllers.

use serde::{Deserialize, Serialize};

/// Description shown when a weather lookup could not be completed.
pub const UNAVAILABLE_DESCRIPTION: &str = "Unavailable";

/// A photo as delivered by the search provider.
///
/// Photos are immutable once received; favorites keep the snapshot taken at
/// the time they were saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: String,
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumb: Option<String>,
    pub alt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_link: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

impl Photo {
    /// Location as a usable place name (blank locations count as absent).
    pub fn place_name(&self) -> Option<&str> {
        self.location
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// One page of search results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    #[serde(default)]
    pub results: Vec<Photo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u32>,
}

/// Raw weather observation returned by the weather provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherObservation {
    pub name: String,
    pub temperature_celsius: f64,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_id: Option<String>,
}

/// Normalized weather shown by the lookup panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    pub display_name: String,
    /// Whole degrees Celsius; `None` when the temperature is unavailable.
    pub temperature_celsius: Option<i32>,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_id: Option<String>,
}

impl WeatherReport {
    /// Normalize a provider observation: round the temperature to whole
    /// degrees and treat non-finite readings as unavailable.
    pub fn from_observation(obs: WeatherObservation) -> Self {
        let temperature_celsius = if obs.temperature_celsius.is_finite() {
            Some(obs.temperature_celsius.round() as i32)
        } else {
            None
        };
        Self {
            display_name: obs.name,
            temperature_celsius,
            description: obs.description,
            icon_id: obs.icon_id.filter(|icon| !icon.trim().is_empty()),
        }
    }

    /// Synthetic report used when the lookup for `city` failed.
    pub fn unavailable(city: &str) -> Self {
        Self {
            display_name: city.to_string(),
            temperature_celsius: None,
            description: UNAVAILABLE_DESCRIPTION.to_string(),
            icon_id: None,
        }
    }

    /// `"21°C"`, or an em dash when the temperature is unavailable.
    pub fn temperature_label(&self) -> String {
        match self.temperature_celsius {
            Some(t) => format!("{t}°C"),
            None => "—".to_string(),
        }
    }

    /// Icon image URL for reports that carry an icon id.
    pub fn icon_url(&self) -> Option<String> {
        self.icon_id
            .as_deref()
            .map(|icon| format!("https://openweathermap.org/img/wn/{icon}@2x.png"))
    }
}
