use tracing::{error, info, warn};
use tracing_fluent_hook::init::{init_tracing_with_config, HookConfig};

fn main() {
    let config = match HookConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("bad configuration: {}", e);
            return;
        }
    };
    if let Err(e) = init_tracing_with_config(config) {
        eprintln!("failed to install subscriber: {}", e);
        return;
    }

    info!("starting service");

    error!(
        user_id = 42,
        reason = "invalid password",
        "authentication failed"
    );

    // Routed by explicit tag; no separate message field is added.
    warn!(tag = "auth.lockout", "auth.lockout");
}
