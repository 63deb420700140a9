//! Synchronization tuning knobs.

use serde::{Deserialize, Serialize};

/// Mirror behavior configuration.
///
/// The defaults match the documented channel-loss policy: resynchronize on
/// lag, and try one fresh subscription when the channel closes before
/// degrading.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncConfig {
    /// Rebuild the list from a fresh bulk read after the change channel
    /// reports dropped events.
    pub resync_on_lag: bool,
    /// Fresh-subscription attempts after the channel closes. Zero means the
    /// mirror degrades immediately on close.
    pub resubscribe_attempts: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            resync_on_lag: true,
            resubscribe_attempts: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_recover_rather_than_degrade() {
        let config = SyncConfig::default();
        assert!(config.resync_on_lag);
        assert_eq!(config.resubscribe_attempts, 1);
    }
}
