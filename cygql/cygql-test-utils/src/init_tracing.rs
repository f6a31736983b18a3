use test_log::tracing_subscriber::{EnvFilter, FmtSubscriber, fmt::format::FmtSpan};

/// Install a test-writer subscriber filtered by `RUST_LOG`.
///
/// `RUST_LOG_SPAN_EVENTS` selects span events the way `test_log::test` reads
/// it, as a comma separated list of `new`, `enter`, `exit`, `close`, `active`
/// or `full`. Repeated calls are no-ops.
pub fn init_test_tracing() {
    let _ = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_span_events(span_events_from_env())
        .with_test_writer()
        .try_init();
}

fn span_events_from_env() -> FmtSpan {
    let Some(value) = std::env::var_os("RUST_LOG_SPAN_EVENTS") else {
        return FmtSpan::NONE;
    };
    let value = value.to_string_lossy().to_ascii_lowercase();

    value
        .split(',')
        .map(|filter| match filter.trim() {
            "new" => FmtSpan::NEW,
            "enter" => FmtSpan::ENTER,
            "exit" => FmtSpan::EXIT,
            "close" => FmtSpan::CLOSE,
            "active" => FmtSpan::ACTIVE,
            "full" => FmtSpan::FULL,
            other => panic!(
                "test-log: RUST_LOG_SPAN_EVENTS must contain filters separated by `,`, \
                 supported: new, enter, exit, close, active, full. Got: `{other}`"
            ),
        })
        .fold(FmtSpan::NONE, |acc, filter| filter | acc)
}
