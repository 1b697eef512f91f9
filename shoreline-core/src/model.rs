use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// View-model for one successful refresh. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temperature_celsius: f64,
    pub forecast_text: String,
    pub area_name: String,
    pub observed_at: DateTime<FixedOffset>,
}

impl WeatherSnapshot {
    /// Temperature rounded to one decimal place.
    pub fn rounded_temperature(&self) -> f64 {
        (self.temperature_celsius * 10.0).round() / 10.0
    }

    /// e.g. "17 Oct 2026, 2:05 PM"
    pub fn observed_at_display(&self) -> String {
        self.observed_at.format("%-d %b %Y, %-I:%M %p").to_string()
    }
}

/// What the widget container currently shows.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum WidgetState {
    #[default]
    Loading,
    Ready(WeatherSnapshot),
    /// `reason` is kept for diagnostics and is not shown to the user.
    Failed { reason: String },
}

impl WidgetState {
    pub fn is_loading(&self) -> bool {
        matches!(self, WidgetState::Loading)
    }

    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        match self {
            WidgetState::Ready(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, WidgetState::Failed { .. })
    }
}

/// Envelope shared by the forecast and temperature endpoints.
///
/// A body without `items` decodes to an empty list, so the caller decides
/// whether that is an error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub forecasts: Vec<AreaForecast>,
    #[serde(default)]
    pub readings: Vec<Reading>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AreaForecast {
    pub area: String,
    pub forecast: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Reading {
    pub value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(temp: f64) -> WeatherSnapshot {
        WeatherSnapshot {
            temperature_celsius: temp,
            forecast_text: "Partly Cloudy (Day)".into(),
            area_name: "Pasir Ris".into(),
            observed_at: DateTime::parse_from_rfc3339("2026-10-17T14:05:00+08:00")
                .expect("valid timestamp"),
        }
    }

    #[test]
    fn rounds_to_one_decimal() {
        assert_eq!(snapshot(28.46).rounded_temperature(), 28.5);
        assert_eq!(snapshot(28.44).rounded_temperature(), 28.4);
        assert_eq!(snapshot(30.0).rounded_temperature(), 30.0);
    }

    #[test]
    fn observed_at_is_human_readable() {
        assert_eq!(snapshot(28.0).observed_at_display(), "17 Oct 2026, 2:05 PM");
    }

    #[test]
    fn envelope_tolerates_missing_arrays() {
        let env: Envelope = serde_json::from_str(r#"{"items":[{"timestamp":"x"}]}"#)
            .expect("envelope should parse");
        assert_eq!(env.items.len(), 1);
        assert!(env.items[0].forecasts.is_empty());
        assert!(env.items[0].readings.is_empty());

        let empty: Envelope = serde_json::from_str("{}").expect("empty object parses");
        assert!(empty.items.is_empty());
    }

    #[test]
    fn default_state_is_loading() {
        let state = WidgetState::default();
        assert!(state.is_loading());
        assert!(state.snapshot().is_none());
    }
}
