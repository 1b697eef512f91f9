use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Local};

use crate::{
    error::WeatherError,
    model::{AreaForecast, Envelope, Item, WeatherSnapshot, WidgetState},
    provider::WeatherProvider,
    widget::WidgetContainer,
};

/// Fetches, selects and renders weather into a [`WidgetContainer`].
///
/// Refreshes are not guarded against each other: two overlapping calls both
/// run to completion and the later write wins.
#[derive(Debug, Clone)]
pub struct WeatherUpdater {
    provider: Arc<dyn WeatherProvider>,
    container: WidgetContainer,
    target_area: Arc<str>,
}

impl WeatherUpdater {
    pub fn new(
        provider: Arc<dyn WeatherProvider>,
        container: WidgetContainer,
        target_area: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            provider,
            container,
            target_area: target_area.into(),
        }
    }

    pub fn container(&self) -> &WidgetContainer {
        &self.container
    }

    /// Run one full refresh: loading, fetch, then success or failure view.
    pub async fn refresh_weather(&self) {
        self.container.set(WidgetState::Loading);

        match self.fetch_snapshot().await {
            Ok(snapshot) => {
                tracing::info!(
                    area = %snapshot.area_name,
                    temperature = snapshot.rounded_temperature(),
                    "weather updated"
                );
                self.container.set(WidgetState::Ready(snapshot));
            }
            Err(err) => {
                tracing::warn!(kind = err.kind(), "error fetching weather data: {err}");
                let reason = err.to_string();
                self.container.set(WidgetState::Failed { reason });
            }
        }
    }

    /// What the retry control does: the same sequence again, from loading.
    pub async fn retry(&self) {
        self.refresh_weather().await;
    }

    pub async fn fetch_snapshot(&self) -> Result<WeatherSnapshot, WeatherError> {
        let provider = &self.provider;
        let (forecast, temperature) =
            tokio::join!(provider.fetch_forecast(), provider.fetch_temperature());

        let now = Local::now().fixed_offset();
        build_snapshot(&forecast?, &temperature?, &self.target_area, now)
    }
}

/// Turn a forecast/temperature response pair into a snapshot.
///
/// `now` is used as the observation time only when neither response carries a
/// parseable timestamp.
pub fn build_snapshot(
    forecast: &Envelope,
    temperature: &Envelope,
    target_area: &str,
    now: DateTime<FixedOffset>,
) -> Result<WeatherSnapshot, WeatherError> {
    let forecast_item = first_item(forecast, "forecast")?;
    let temperature_item = first_item(temperature, "temperature")?;

    let Some(area) = select_forecast(forecast_item, target_area) else {
        return Err(WeatherError::NotFound {
            area: target_area.to_string(),
        });
    };

    let Some(reading) = temperature_item.readings.first() else {
        let msg = "temperature response has no readings";
        return Err(WeatherError::DataFormat(msg.to_string()));
    };

    let observed_at = parse_timestamp(temperature_item)
        .or_else(|| parse_timestamp(forecast_item))
        .unwrap_or(now);

    Ok(WeatherSnapshot {
        temperature_celsius: reading.value,
        forecast_text: area.forecast.clone(),
        area_name: area.area.clone(),
        observed_at,
    })
}

/// First forecast whose area contains `target` (case-insensitive).
pub fn select_forecast<'a>(item: &'a Item, target: &str) -> Option<&'a AreaForecast> {
    let needle = target.to_lowercase();
    let matches = |f: &&AreaForecast| f.area.to_lowercase().contains(&needle);
    item.forecasts.iter().find(matches)
}

fn first_item<'a>(envelope: &'a Envelope, what: &str) -> Result<&'a Item, WeatherError> {
    let Some(item) = envelope.items.first() else {
        let msg = format!("{what} response has no items");
        return Err(WeatherError::DataFormat(msg));
    };
    Ok(item)
}

fn parse_timestamp(item: &Item) -> Option<DateTime<FixedOffset>> {
    let ts = item.timestamp.as_deref()?;
    DateTime::parse_from_rfc3339(ts).ok()
}
