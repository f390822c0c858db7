//! Environment variable names used by this crate for convenient
//! configuration of the hook from services.
//!
//! These are purely helpers; the hook and transport types remain decoupled
//! from environment access.

/// Collector host name or address, e.g. `127.0.0.1`.
pub const FLUENT_HOST_ENV: &str = "FLUENT_HOST";

/// Collector Forward port.
pub const FLUENT_PORT_ENV: &str = "FLUENT_PORT";

/// Application identifier used to build default tags.
pub const FLUENT_APPLICATION_ENV: &str = "FLUENT_APPLICATION";

/// Comma-separated severities to dispatch, e.g. `error,warning,info`.
pub const FLUENT_LEVELS_ENV: &str = "FLUENT_LEVELS";

/// Connect and write timeout in milliseconds; `0` disables it.
pub const FLUENT_TIMEOUT_MS_ENV: &str = "FLUENT_TIMEOUT_MS";
