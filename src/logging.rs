use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Filter used when `RUST_LOG` is unset.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "virt_place=debug"
    } else {
        "virt_place=info"
    }
}

/// Install the stderr subscriber. Progress notices and diagnostics all go
/// to stderr so stdout carries only the confirmation line.
pub fn init(verbose: bool) {
    let filter = match std::env::var("RUST_LOG") {
        Ok(spec) if !spec.is_empty() => EnvFilter::new(spec),
        _ => EnvFilter::new(default_directive(verbose)),
    };

    let stderr = std::io::stderr();
    let terminal_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(stderr.is_terminal())
        .with_target(false)
        .without_time()
        .with_filter(filter);

    // A second init (e.g. from tests) is harmless
    let _ = tracing_subscriber::registry().with(terminal_layer).try_init();
}
