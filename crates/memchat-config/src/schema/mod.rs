//! Configuration schema types for memchat.
//!
//! All structs use `serde(default)` so partial configs work correctly.
//! Missing fields are filled with defaults suited to a locally hosted
//! OpenAI-compatible server.

mod endpoint;
mod logging;
mod session;

pub use endpoint::*;
pub use logging::*;
pub use session::*;

use serde::{Deserialize, Serialize};

/// Root configuration for memchat.
///
/// Only override what you want to change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub endpoint: EndpointConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}
