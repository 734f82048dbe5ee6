mod config;
mod models;
mod render;
mod requests;
mod state;
pub mod utils;
mod view;

pub use config::{Config, ConfigError, DEFAULT_BASE_URL, DEFAULT_INTERVAL, DEFAULT_TIMEOUT};
pub use models::{Health, PingRecord};
pub use render::{DisplayZone, Renderer, LOADING_TEXT, NO_DATA_TEXT, TITLE};
pub use requests::{build_client, check_health, fetch_records, FetchError, HttpSource, RecordSource};
pub use state::{FetchOutcome, Phase, ViewState, FETCH_ERROR_MESSAGE};
pub use view::PingStatusView;
