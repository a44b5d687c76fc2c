//! Domain entities, error types and ports shared by every vigil crate.
//!
//! Adapters (`vigil-feed`, `vigil-notify`) implement the ports declared here;
//! `vigil-monitor` consumes them only through `Arc<dyn Trait>`.

pub mod common;
pub mod config;

pub mod market {
    pub mod entity;
    pub mod error;
    pub mod port;
    pub mod series;
}

pub mod signal {
    pub mod entity;
}

pub mod notify {
    pub mod entity;
    pub mod error;
    pub mod port;
}

pub mod monitor {
    pub mod entity;
}

#[cfg(feature = "test-utils")]
pub mod testing;

use tracing::debug;

/// # Summary
/// Installs `ring` as the process-wide rustls crypto provider.
///
/// # Logic
/// HTTP adapters build `reqwest` clients without a bundled provider, so one
/// must be installed before the first TLS handshake. Repeated calls are no-ops.
pub fn install_crypto_provider() {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }
}
