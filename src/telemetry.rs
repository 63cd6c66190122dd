use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Installs the fmt subscriber once. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("listing_wizard=info"));

        fmt().with_env_filter(filter).init();
    });
}
