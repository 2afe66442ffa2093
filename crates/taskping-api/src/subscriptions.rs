//! Mock push subscription registry.
//!
//! Subscriptions are keyed by their full canonical JSON serialization, so
//! registering and later deleting the identical object round-trips cleanly.
//! Loose `serde_json::Value` objects are accepted — platform subscription
//! shapes vary and only `endpoint` is required.

use std::collections::BTreeSet;
use std::sync::Mutex;

use serde_json::Value;
use tracing::info;

/// In-memory set of registered push subscriptions.
pub struct SubscriptionRegistry {
    entries: Mutex<BTreeSet<String>>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(BTreeSet::new()),
        }
    }

    /// Register a subscription. Returns whether it was newly added.
    pub fn add(&self, subscription: &Value) -> bool {
        let key = subscription.to_string();
        let added = self
            .entries
            .lock()
            .expect("registry lock poisoned")
            .insert(key);
        if added {
            info!(
                endpoint = subscription["endpoint"].as_str().unwrap_or(""),
                "push subscription registered"
            );
        }
        added
    }

    /// Remove a subscription by the identical object. Returns whether it was
    /// present.
    pub fn remove(&self, subscription: &Value) -> bool {
        self.entries
            .lock()
            .expect("registry lock poisoned")
            .remove(&subscription.to_string())
    }

    /// Number of registered subscriptions.
    pub fn count(&self) -> usize {
        self.entries.lock().expect("registry lock poisoned").len()
    }

    /// All registered subscriptions as parsed values.
    pub fn subscriptions(&self) -> Vec<Value> {
        self.entries
            .lock()
            .expect("registry lock poisoned")
            .iter()
            .filter_map(|raw| serde_json::from_str(raw).ok())
            .collect()
    }

    /// The endpoints of all registered subscriptions.
    pub fn endpoints(&self) -> Vec<String> {
        self.subscriptions()
            .iter()
            .filter_map(|sub| sub["endpoint"].as_str().map(String::from))
            .collect()
    }
}

impl Default for SubscriptionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
