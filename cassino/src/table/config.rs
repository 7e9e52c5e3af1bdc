//! Match configuration models.

use serde::{Deserialize, Serialize};

use crate::contact::DEFAULT_CONTACT_THRESHOLD;
use crate::game::engine::MatchRules;

/// Configuration for one hosted match.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchConfig {
    /// Display name for discovery.
    pub name: String,

    /// Rule parameters (build ceiling, completion target, card limit).
    pub rules: MatchRules,

    /// Distance in pixels within which a drag release touches an object.
    pub contact_threshold: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            name: "Casino match".to_string(),
            rules: MatchRules::default(),
            contact_threshold: DEFAULT_CONTACT_THRESHOLD,
        }
    }
}
