//! Mempool tuning knobs, loadable as the `[mempool]` section of the node config.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MempoolConfig {
    /// Run the full name-consistency diagnostic after every block connection.
    /// Expensive; meant for test networks and debugging.
    #[serde(default)]
    pub sanity_check_names: bool,
}
