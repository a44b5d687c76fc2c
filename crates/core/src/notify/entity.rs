use serde::{Deserialize, Serialize};

/// # Summary
/// What an outbound message announces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertKind {
    StartupNotice,
    OverboughtAlert,
    OversoldAlert,
    StoppedNotice,
    ErrorNotice,
}

impl std::fmt::Display for AlertKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertKind::StartupNotice => write!(f, "startup"),
            AlertKind::OverboughtAlert => write!(f, "overbought"),
            AlertKind::OversoldAlert => write!(f, "oversold"),
            AlertKind::StoppedNotice => write!(f, "stopped"),
            AlertKind::ErrorNotice => write!(f, "error"),
        }
    }
}

/// # Summary
/// A rendered message, built and sent within a single cycle.
///
/// # Invariants
/// - Never queued, retried or deduplicated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertMessage {
    pub kind: AlertKind,
    pub payload: String,
}
