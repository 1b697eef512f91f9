use crate::{Config, error::WeatherError, model::Envelope, provider::datagov::DataGovProvider};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod datagov;

/// Source of the two raw responses a refresh needs.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_forecast(&self) -> Result<Envelope, WeatherError>;

    async fn fetch_temperature(&self) -> Result<Envelope, WeatherError>;
}

/// Construct the provider described by config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let provider = DataGovProvider::from_config(&config.weather)?;
    Ok(Arc::new(provider))
}
