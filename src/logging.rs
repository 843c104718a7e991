//! Tracing setup shared by the binaries. Logs go to stderr; stdout carries
//! the human or JSON report.

use tracing_subscriber::{fmt, EnvFilter};

pub fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "forgefunnel_core=info",
        1 => "forgefunnel_core=debug",
        _ => "forgefunnel_core=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
