use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

static INIT: OnceCell<()> = OnceCell::new();

/// Install the global subscriber, filtered by `RUST_LOG`, defaults to `info`
///
/// Safe to call more than once, only the first call does anything
pub fn init() {
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        if let Err(error) = tracing_subscriber::fmt().with_env_filter(filter).try_init() {
            tracing::debug!("subscriber already installed: {error}");
        }
    });
}
