//! Port advertisement.
//!
//! A port is a locally hosted entity id this plugin instance advertises to
//! the host so other instances can discover it. The host pulls the current
//! set with a `getPorts` call; the answer is assembled synchronously from
//! locally tracked sets.

use serde::{Deserialize, Serialize};

/// The answer to the host's `getPorts` pull.
///
/// Each list is sorted and free of duplicates, so two answers describing
/// the same port sets compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ports {
    /// Field ids hosted by this plugin instance.
    pub fields: Vec<String>,
    /// Broadcaster ids hosted by this plugin instance.
    pub broadcasters: Vec<String>,
    /// Plugin ids hosted by this plugin instance.
    pub plugins: Vec<String>,
}

impl Ports {
    /// Builds a normalized advertisement from arbitrary id iterators.
    #[must_use]
    pub fn new<F, B, P>(fields: F, broadcasters: B, plugins: P) -> Self
    where
        F: IntoIterator<Item = String>,
        B: IntoIterator<Item = String>,
        P: IntoIterator<Item = String>,
    {
        Self {
            fields: normalize(fields),
            broadcasters: normalize(broadcasters),
            plugins: normalize(plugins),
        }
    }

    /// Whether no ports are advertised at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.broadcasters.is_empty() && self.plugins.is_empty()
    }
}

fn normalize(ids: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut ids: Vec<String> = ids.into_iter().collect();
    ids.sort();
    ids.dedup();
    ids
}
