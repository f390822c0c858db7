use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;
use tracing::error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

use tracing_fluent_hook::noop::NoopTransport;
use tracing_fluent_hook::{FluentHook, HookLayer};

fn main() {
    let hook = FluentHook::with_transport(NoopTransport, "127.0.0.1", 24224, "load");
    let layer = HookLayer::new(Arc::new(hook));
    let fired = Arc::clone(&layer.fired_events);
    let subscriber = Registry::default().with(layer);

    let n: u64 = 100_000;
    let start = Instant::now();

    tracing::subscriber::with_default(subscriber, || {
        for i in 0..n {
            error!(iteration = i, "noop load test error");
        }
    });

    let elapsed = start.elapsed();
    println!("enriched {} events in {:?} (~{:.0} ev/s)",
        fired.load(Ordering::Relaxed),
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );
}
