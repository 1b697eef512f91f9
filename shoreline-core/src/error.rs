use reqwest::StatusCode;

/// Why a refresh could not produce a snapshot.
///
/// Every variant ends up as the same failure view; the kind only shows up in
/// logs.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("{endpoint} request failed with status {status}")]
    Fetch {
        endpoint: &'static str,
        status: StatusCode,
    },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unexpected data format: {0}")]
    DataFormat(String),

    #[error("no forecast found for area '{area}'")]
    NotFound { area: String },
}

impl WeatherError {
    /// Short, stable label for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            WeatherError::Fetch { .. } | WeatherError::Network(_) => "fetch",
            WeatherError::DataFormat(_) => "data_format",
            WeatherError::NotFound { .. } => "not_found",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_names_endpoint_and_status() {
        let err = WeatherError::Fetch {
            endpoint: "air-temperature",
            status: StatusCode::SERVICE_UNAVAILABLE,
        };

        let msg = err.to_string();
        assert!(msg.contains("air-temperature"));
        assert!(msg.contains("503"));
        assert_eq!(err.kind(), "fetch");
    }

    #[test]
    fn not_found_names_area() {
        let err = WeatherError::NotFound {
            area: "Pasir Ris".into(),
        };
        assert_eq!(err.to_string(), "no forecast found for area 'Pasir Ris'");
        assert_eq!(err.kind(), "not_found");
    }
}
