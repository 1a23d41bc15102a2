//! Search configuration for the route planner.

use std::str::FromStr;
use std::time::Duration;

/// What to do once a route has been found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoutePolicy {
    /// Stop at the first route (in heuristic order) and return exactly one.
    #[default]
    FirstFound,

    /// Return every route discovered at the depth where the first one
    /// appeared. All of them have the same number of hops.
    CollectAll,
}

impl FromStr for RoutePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" | "first-found" => Ok(RoutePolicy::FirstFound),
            "all" | "collect-all" => Ok(RoutePolicy::CollectAll),
            other => Err(format!(
                "unknown route policy {other:?} (expected \"first\" or \"all\")"
            )),
        }
    }
}

/// Configuration parameters for route search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Maximum number of expansion steps from the origin.
    /// Routes may have up to `max_depth + 1` hops.
    pub max_depth: usize,

    pub policy: RoutePolicy,

    /// Deadline for a whole search; `None` waits indefinitely.
    pub deadline: Option<Duration>,
}

impl SearchConfig {
    pub fn new(max_depth: usize, policy: RoutePolicy, deadline: Option<Duration>) -> Self {
        Self {
            max_depth,
            policy,
            deadline,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_policy(mut self, policy: RoutePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: 10,
            policy: RoutePolicy::FirstFound,
            deadline: None,
        }
    }
}
