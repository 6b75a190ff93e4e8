use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `RUST_LOG` wins; otherwise only groupctl's own events, per-unit dispatch
/// included when verbose.
fn groupctl_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("groupctl=debug,info")
        } else {
            EnvFilter::new("groupctl=info")
        }
    })
}

/// Terse lines for an operator watching a batch run.
pub fn init_cli_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(groupctl_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .compact(),
        )
        .init();
}

/// 給自動化呼叫端使用的 JSON 日誌 (--json-logs)
pub fn init_json_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(groupctl_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .json(),
        )
        .init();
}
