//! Resource/registration set differences
//!
//! Matching is exact string equality on the qualified name. The engine is
//! pure: the same inputs always produce the same, sorted, output.

use crate::scanner::ResourceEntity;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Output of one reconciliation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    /// Resources with no registration, sorted by name
    pub missing: Vec<ResourceEntity>,
    /// Registered qualified names with no backing resource, sorted
    pub orphaned: Vec<String>,
}

impl Reconciliation {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.orphaned.is_empty()
    }

    pub fn missing_names(&self) -> Vec<&str> {
        self.missing.iter().map(|r| r.name.as_str()).collect()
    }
}

/// Computes missing and orphaned registrations within one namespace.
#[derive(Debug, Clone)]
pub struct ReconciliationEngine {
    namespace: String,
}

impl ReconciliationEngine {
    /// `namespace` is the qualified-name prefix without the trailing dot.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    pub fn qualify(&self, name: &str) -> String {
        format!("{}.{}", self.namespace, name)
    }

    /// Diff `resources` against `registered`.
    ///
    /// Registered names outside the namespace are never reported as
    /// orphaned; they belong to someone else. When two origins declare the
    /// same name the first entity (plugin before project) is kept.
    pub fn reconcile(
        &self,
        resources: &[ResourceEntity],
        registered: &BTreeSet<String>,
    ) -> Reconciliation {
        let mut by_qualified: BTreeMap<String, &ResourceEntity> = BTreeMap::new();
        for resource in resources {
            by_qualified
                .entry(self.qualify(&resource.name))
                .or_insert(resource);
        }

        let mut missing: Vec<ResourceEntity> = by_qualified
            .iter()
            .filter(|(qualified, _)| !registered.contains(*qualified))
            .map(|(_, resource)| (*resource).clone())
            .collect();
        missing.sort_by(|a, b| a.name.cmp(&b.name).then(a.origin.cmp(&b.origin)));

        let prefix = format!("{}.", self.namespace);
        let orphaned = registered
            .iter()
            .filter(|name| name.starts_with(&prefix) && !by_qualified.contains_key(*name))
            .cloned()
            .collect();

        Reconciliation { missing, orphaned }
    }
}
