//! Upstream provider clients

pub mod gemini_client;
pub mod itunes_client;
pub mod openweather_client;

pub use gemini_client::{GeminiClient, GeminiError, InlineImage};
pub use itunes_client::{CatalogError, ItunesClient};
pub use openweather_client::{OpenWeatherClient, WeatherApiError};
