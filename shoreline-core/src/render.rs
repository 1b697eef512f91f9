//! Views of the widget container.
//!
//! [`html`] produces the fragment that goes inside the page's
//! `#weather-widget` element; [`text`] is the same three states for a
//! terminal.

use crate::model::{WeatherSnapshot, WidgetState};

pub const ATTRIBUTION: &str = "Source: data.gov.sg";
pub const LOADING_MESSAGE: &str = "Loading weather data...";
pub const FAILURE_MESSAGE: &str = "Unable to load weather data. Please try again later.";
pub const RETRY_ACTION: &str = "retry-weather";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Text,
    Html,
}

pub fn render(state: &WidgetState, format: Format) -> String {
    match format {
        Format::Text => text(state),
        Format::Html => html(state),
    }
}

pub fn html(state: &WidgetState) -> String {
    match state {
        WidgetState::Loading => format!(
            "<div class=\"weather-loading\"><p>{LOADING_MESSAGE}</p></div>"
        ),
        WidgetState::Ready(snapshot) => html_ready(snapshot),
        WidgetState::Failed { .. } => format!(
            "<div class=\"weather-error\">\
             <p>{FAILURE_MESSAGE}</p>\
             <button class=\"retry-button\" data-action=\"{RETRY_ACTION}\">Retry</button>\
             </div>"
        ),
    }
}

fn html_ready(snapshot: &WeatherSnapshot) -> String {
    let temperature = snapshot.rounded_temperature();
    let forecast = escape_html(&snapshot.forecast_text);
    let area = escape_html(&snapshot.area_name);
    let updated = escape_html(&snapshot.observed_at_display());

    format!(
        "<div class=\"weather-info\">\
         <div class=\"weather-temp\">{temperature:.1}°C</div>\
         <div class=\"weather-desc\">{forecast}</div>\
         <div class=\"weather-location\">{area}</div>\
         <div class=\"weather-updated\">Last updated: {updated}</div>\
         <div class=\"weather-source\">{ATTRIBUTION}</div>\
         </div>"
    )
}

pub fn text(state: &WidgetState) -> String {
    match state {
        WidgetState::Loading => LOADING_MESSAGE.to_string(),
        WidgetState::Ready(snapshot) => format!(
            "{:.1}°C  {}\n{}\nLast updated: {}\n{ATTRIBUTION}",
            snapshot.rounded_temperature(),
            snapshot.forecast_text,
            snapshot.area_name,
            snapshot.observed_at_display(),
        ),
        WidgetState::Failed { .. } => format!("{FAILURE_MESSAGE}\n[r] Retry"),
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn ready(temp: f64, forecast: &str) -> WidgetState {
        WidgetState::Ready(WeatherSnapshot {
            temperature_celsius: temp,
            forecast_text: forecast.into(),
            area_name: "Pasir Ris".into(),
            observed_at: DateTime::parse_from_rfc3339("2026-10-17T09:30:00+08:00")
                .expect("valid timestamp"),
        })
    }

    #[test]
    fn html_success_has_all_fields() {
        let out = html(&ready(28.46, "Partly Cloudy (Day)"));

        assert!(out.contains("28.5°C"));
        assert!(out.contains("Partly Cloudy (Day)"));
        assert!(out.contains("Pasir Ris"));
        assert!(out.contains("Last updated: 17 Oct 2026, 9:30 AM"));
        assert!(out.contains(ATTRIBUTION));
        assert!(!out.contains("retry-button"));
    }

    #[test]
    fn html_failure_has_retry_control() {
        let failed = WidgetState::Failed {
            reason: "status 500".into(),
        };
        let out = html(&failed);

        assert!(out.contains("weather-error"));
        assert!(out.contains("data-action=\"retry-weather\""));
        assert!(!out.contains("status 500"), "error kinds are not surfaced");
    }

    #[test]
    fn html_success_is_one_wrapped_fragment() {
        let out = html(&ready(28.0, "Fair"));
        assert!(out.starts_with("<div class=\"weather-info\">"));
        assert!(out.ends_with("</div></div>"));
        assert_eq!(out.matches("<div").count(), out.matches("</div>").count());
    }

    #[test]
    fn html_loading() {
        assert!(html(&WidgetState::Loading).contains("weather-loading"));
    }

    #[test]
    fn html_escapes_api_text() {
        let out = html(&ready(27.0, "<b>Rain</b> & wind"));
        assert!(out.contains("&lt;b&gt;Rain&lt;/b&gt; &amp; wind"));
    }

    #[test]
    fn text_success_rounds_to_one_decimal() {
        let out = text(&ready(30.0, "Fair"));
        assert!(out.starts_with("30.0°C  Fair"));
        assert!(out.ends_with(ATTRIBUTION));
    }

    #[test]
    fn text_failure_offers_retry() {
        let failed = WidgetState::Failed {
            reason: String::new(),
        };
        let out = render(&failed, Format::Text);
        assert!(out.contains("Retry"));
    }
}
