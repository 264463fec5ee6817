//! Registry client: configuration, endpoint translation, HTTP transport and
//! error normalization.

pub mod config;
pub mod error;
pub mod http;
pub mod params;

pub use config::{ClientConfig, ConfigError};
pub use error::{ApiError, ErrorKind};
pub use http::{ApiClient, TipTransport};
