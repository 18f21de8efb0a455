pub mod config;
pub mod extract;
pub mod feed;
pub mod i18n;
pub mod models;
pub mod placement;
pub mod render;
pub mod templates;

pub use config::{Config, ConfigError};
pub use extract::{extract_records, Extraction, SkipReason, SkippedObject};
pub use feed::{fetch_with_config, FeedResponse, FetchError, NeoFeedClient};
pub use i18n::Locale;
pub use models::*;
pub use placement::{place_all, place_on_sphere, SphereSampling};
pub use render::{render, FigureSink, HtmlFileSink, RenderError, RenderOutcome};
pub use templates::AsteroidSceneTemplate;
