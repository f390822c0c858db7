use crate::env::{
    FLUENT_APPLICATION_ENV, FLUENT_HOST_ENV, FLUENT_LEVELS_ENV, FLUENT_PORT_ENV,
    FLUENT_TIMEOUT_MS_ENV,
};
use crate::forward::{ForwardConfig, ForwardTransport, DEFAULT_FORWARD_PORT};
use crate::hook::FluentHook;
use crate::layer::HookLayer;
use crate::panic::install_panic_hook;
use crate::severity::{ParseSeverityError, Severity, DEFAULT_LEVELS};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

/// Configuration of the hook and of the subscriber installed around it.
///
/// **Fields**
/// - `host`, `port`: address of the collector's Forward input.
/// - `application`: prefix of default tags (`<application>.<level>`).
/// - `levels`: severities dispatched to the collector.
/// - `timeout`: connect and write timeout of the Forward transport.
/// - `enable_stdout`: if `true`, a `tracing_subscriber::fmt::Layer` is
///   stacked on top of the [`HookLayer`] so events also reach the console.
/// - `capture_panics`: if `true`, panics are dispatched as `panic` entries.
#[derive(Clone, Debug)]
pub struct HookConfig {
    pub host: String,
    pub port: u16,
    pub application: String,
    pub levels: Vec<Severity>,
    pub timeout: Option<Duration>,
    pub enable_stdout: bool,
    pub capture_panics: bool,
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_FORWARD_PORT,
            application: "app".to_string(),
            levels: DEFAULT_LEVELS.to_vec(),
            timeout: ForwardConfig::default().timeout,
            enable_stdout: true,
            capture_panics: true,
        }
    }
}

/// Error returned when environment configuration cannot be parsed.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("invalid FLUENT_PORT value {0:?}")]
    InvalidPort(String),

    #[error("invalid FLUENT_LEVELS entry: {0}")]
    InvalidLevel(#[from] ParseSeverityError),

    #[error("invalid FLUENT_TIMEOUT_MS value {0:?}")]
    InvalidTimeout(String),
}

/// Error returned by [`init_tracing_with_config`].
#[derive(thiserror::Error, Debug)]
pub enum InitError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("global subscriber already set: {0}")]
    SetGlobalDefault(#[from] tracing::subscriber::SetGlobalDefaultError),
}

impl HookConfig {
    /// Build a config from the `FLUENT_*` environment variables, keeping
    /// defaults for the ones that are unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) but reading values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup(FLUENT_HOST_ENV) {
            config.host = host;
        }
        if let Some(port) = lookup(FLUENT_PORT_ENV) {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(port.clone()))?;
        }
        if let Some(application) = lookup(FLUENT_APPLICATION_ENV) {
            config.application = application;
        }
        if let Some(levels) = lookup(FLUENT_LEVELS_ENV) {
            config.levels = levels
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .map(str::parse::<Severity>)
                .collect::<Result<Vec<_>, _>>()?;
        }
        if let Some(timeout) = lookup(FLUENT_TIMEOUT_MS_ENV) {
            let millis: u64 = timeout
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout(timeout.clone()))?;
            config.timeout = (millis > 0).then(|| Duration::from_millis(millis));
        }

        Ok(config)
    }

    /// Build the hook this config describes.
    pub fn build_hook(&self) -> FluentHook<ForwardTransport> {
        let transport = ForwardTransport::new(ForwardConfig { timeout: self.timeout });
        let mut hook = FluentHook::with_transport(
            transport,
            self.host.clone(),
            self.port,
            self.application.clone(),
        );
        hook.set_levels(self.levels.clone());
        hook
    }
}

/// Install a global `tracing` subscriber that dispatches events through a
/// [`FluentHook`] built from `config`.
///
/// **Effects**
///
/// Sets a [`Registry`] combined with [`HookLayer`] (and optionally a `fmt`
/// layer) as the global default subscriber, and chains the panic hook when
/// `capture_panics` is set. Returns the shared hook.
pub fn init_tracing_with_config(
    config: HookConfig,
) -> Result<Arc<FluentHook<ForwardTransport>>, InitError> {
    let hook = Arc::new(config.build_hook());
    let layer = HookLayer::new(Arc::clone(&hook));

    // The two subscriber shapes have different types, hence two branches.
    if config.enable_stdout {
        let fmt_layer = tracing_subscriber::fmt::layer();
        let subscriber = Registry::default().with(layer).with(fmt_layer);
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let subscriber = Registry::default().with(layer);
        tracing::subscriber::set_global_default(subscriber)?;
    }

    if config.capture_panics {
        install_panic_hook(Arc::clone(&hook));
    }

    Ok(hook)
}

/// Initialize tracing from the `FLUENT_*` environment variables.
///
/// Equivalent to calling [`init_tracing_with_config`] with
/// [`HookConfig::from_env`]. This is the recommended entrypoint for
/// typical services.
pub fn init_tracing() -> Result<Arc<FluentHook<ForwardTransport>>, InitError> {
    init_tracing_with_config(HookConfig::from_env()?)
}
