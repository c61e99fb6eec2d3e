mod api;
mod app;
mod chart;
mod cli;
mod decoder;
mod diagnostics;
mod error;
mod export;
mod histogram;
mod normalize;

use cli::Cli;
use std::str::FromStr;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

/// `warn` unless RUST_LOG says otherwise; `--verbose` raises this crate only.
fn build_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    let filter = rust_log
        .filter(|directives| !directives.trim().is_empty())
        .map(EnvFilter::new)
        .unwrap_or_else(|| EnvFilter::new("warn"));

    match (verbose, Directive::from_str("call_hours=debug")) {
        (true, Ok(directive)) => filter.add_directive(directive),
        _ => filter,
    }
}

fn init_tracing(verbose: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    tracing_subscriber::fmt()
        .with_env_filter(build_filter(verbose, rust_log.as_deref()))
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::from_args();
    init_tracing(cli.verbose);

    app::run(cli.into_config()).await
}
