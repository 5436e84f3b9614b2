//! Headless core of the Social Sync client: backend API, observable state and
//! the widget controller shared by the desktop front ends.

pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod store;

pub use api::{HttpRecommendationApi, RecommendationApi};
pub use config::{load_settings, Settings};
pub use controller::{WidgetController, EMPTY_TAG_MESSAGE, NO_SELECTION_MESSAGE};
pub use error::{ClientError, ConfigError, RequestError};
pub use store::{StateStore, WidgetState};
