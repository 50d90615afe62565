use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVE: &str = "info";

/// Installs the global subscriber. A second call keeps the first one.
pub fn init() {
    let filter = EnvFilter::new(directive(
        std::env::var("FINTOLA_LOG").ok(),
        std::env::var("RUST_LOG").ok(),
    ));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let result = match log_format(std::env::var("FINTOLA_LOG_FORMAT").ok()).as_str() {
        "json" => builder.json().try_init(),
        _ => builder.try_init(),
    };

    if let Err(error) = result {
        // Another subscriber is already global; report through it.
        tracing::debug!(error = %error, "keeping existing tracing subscriber");
    }
}

fn directive(fintola_log: Option<String>, rust_log: Option<String>) -> String {
    fintola_log
        .filter(|value| !value.trim().is_empty())
        .or_else(|| rust_log.filter(|value| !value.trim().is_empty()))
        .unwrap_or_else(|| DEFAULT_DIRECTIVE.to_string())
}

fn log_format(value: Option<String>) -> String {
    value
        .map(|value| value.trim().to_ascii_lowercase())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| "plain".to_string())
}
