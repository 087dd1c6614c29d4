//! # Logging
//!
//! Inicializa `tracing-subscriber`. El filtro sale de `RUST_LOG`; sin esa
//! variable se usa `crafted_http=info`.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "crafted_http=info";

/// Instala el subscriber global
///
/// Llamarla más de una vez no tiene efecto.
pub fn init() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
