use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logs to stderr, filtered by `RUST_LOG` (default `info`). Loads `.env`
/// first so the filter and API keys can live there.
pub fn init() {
  let _ = dotenvy::dotenv();

  let level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
  let env_filter = EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new("info"));

  let _ = tracing_subscriber::registry()
    .with(env_filter)
    .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
    .try_init();
}
