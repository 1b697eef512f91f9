//! Core library for the beach-cleanup site's `shoreline` tool.
//!
//! This crate defines:
//! - Configuration handling
//! - The data.gov.sg weather provider and the widget updater
//! - Widget views (HTML fragment and terminal text)
//! - The refresh scheduler and the impact counters
//!
//! It is used by `shoreline-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod counter;
pub mod error;
pub mod model;
pub mod provider;
pub mod render;
pub mod scheduler;
pub mod updater;
pub mod widget;

pub use config::{Config, ImpactConfig, WeatherConfig};
pub use error::WeatherError;
pub use model::{WeatherSnapshot, WidgetState};
pub use provider::{WeatherProvider, datagov::DataGovProvider, provider_from_config};
pub use scheduler::{Scheduler, Trigger, Visibility, VisibilityTracker};
pub use updater::WeatherUpdater;
pub use widget::WidgetContainer;
