// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Pool configuration for the calling thread.
//!
//! There is no process-wide switch: each thread starts from
//! [`MathConfig::default`] and may [`install`](MathConfig::install) its own
//! settings at startup. Pools created afterwards on that thread honour the
//! installed values, and existing pools pick up a lowered size limit on their
//! next release.

use std::cell::Cell;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default number of released instances kept per type and thread.
pub const DEFAULT_MAX_POOL_SIZE: usize = 11;

/// Switches controlling temporary-object pooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MathConfig {
    /// When `false`, fetches allocate fresh instances and releases drop them.
    #[serde(default = "MathConfig::default_use_math_pools")]
    pub use_math_pools: bool,
    /// Maximum number of released instances retained per type and thread.
    #[serde(default = "MathConfig::default_max_math_pool_size")]
    pub max_math_pool_size: usize,
}

impl MathConfig {
    const fn default_use_math_pools() -> bool {
        true
    }

    const fn default_max_math_pool_size() -> usize {
        DEFAULT_MAX_POOL_SIZE
    }

    /// Configuration with pooling disabled.
    pub const fn unpooled() -> Self {
        Self {
            use_math_pools: false,
            max_math_pool_size: DEFAULT_MAX_POOL_SIZE,
        }
    }

    /// Parses a JSON document; omitted fields take their defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Serializes the configuration as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Makes this configuration current for the calling thread.
    pub fn install(self) {
        debug!(
            use_math_pools = self.use_math_pools,
            max_math_pool_size = self.max_math_pool_size,
            "installing math config for current thread"
        );
        CURRENT.with(|c| c.set(self));
    }
}

impl Default for MathConfig {
    fn default() -> Self {
        Self {
            use_math_pools: Self::default_use_math_pools(),
            max_math_pool_size: Self::default_max_math_pool_size(),
        }
    }
}

thread_local! {
    static CURRENT: Cell<MathConfig> = Cell::new(MathConfig::default());
}

/// Returns the configuration installed on the calling thread.
///
/// Falls back to the defaults while thread-local storage is being torn down.
pub fn current() -> MathConfig {
    CURRENT.try_with(Cell::get).unwrap_or_default()
}
