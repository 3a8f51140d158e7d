//! Listener registration and local event dispatch.
//!
//! Every handle owns an [`EventHub`]: a set of subscriptions keyed either
//! by an exact event name or by a pattern. The two are separate
//! subscription kinds on purpose — overloading one registration surface
//! for both exact-match and pattern-match semantics is how the pattern
//! value ends up used as an emission target by accident.
//!
//! Dispatch is synchronous and in registration order. After the terminal
//! `delete` emission a hub is sealed and delivers nothing further.

use regex_lite::Regex;
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// How a subscription selects events.
#[derive(Debug, Clone)]
pub enum EventKey {
    /// Matches one event name exactly.
    Exact(String),
    /// Matches any event name the pattern finds a match in.
    Pattern(Regex),
}

impl EventKey {
    fn matches(&self, event: &str) -> bool {
        match self {
            Self::Exact(name) => name == event,
            Self::Pattern(re) => re.is_match(event),
        }
    }
}

impl From<&str> for EventKey {
    fn from(name: &str) -> Self {
        Self::Exact(name.to_owned())
    }
}

impl From<String> for EventKey {
    fn from(name: String) -> Self {
        Self::Exact(name)
    }
}

impl From<Regex> for EventKey {
    fn from(pattern: Regex) -> Self {
        Self::Pattern(pattern)
    }
}

type Callback = Arc<dyn Fn(&str, &[Value]) + Send + Sync>;

struct Subscription {
    key: EventKey,
    callback: Callback,
}

#[derive(Default)]
struct HubState {
    sealed: bool,
    subscriptions: Vec<Subscription>,
}

/// Listener set for one handle.
pub struct EventHub {
    state: Mutex<HubState>,
}

impl EventHub {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(HubState::default()),
        }
    }

    /// Registers a listener. Callbacks receive the concrete event name and
    /// the argument list.
    pub fn on<F>(&self, key: impl Into<EventKey>, callback: F)
    where
        F: Fn(&str, &[Value]) + Send + Sync + 'static,
    {
        let mut state = self.state.lock().unwrap();
        state.subscriptions.push(Subscription {
            key: key.into(),
            callback: Arc::new(callback),
        });
    }

    /// Delivers an event to every matching listener. No-op once sealed.
    pub fn emit(&self, event: &str, args: &[Value]) {
        // Collect matches under the lock, invoke outside it, so a callback
        // may register further listeners without deadlocking.
        let matched: Vec<Callback> = {
            let state = self.state.lock().unwrap();
            if state.sealed {
                return;
            }
            state
                .subscriptions
                .iter()
                .filter(|sub| sub.key.matches(event))
                .map(|sub| Arc::clone(&sub.callback))
                .collect()
        };

        for callback in matched {
            callback(event, args);
        }
    }

    /// Stops all further delivery. Called after the `delete` emission.
    pub fn seal(&self) {
        self.state.lock().unwrap().sealed = true;
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}
