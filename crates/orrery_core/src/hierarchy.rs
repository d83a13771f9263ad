//! Parent/child forest of bodies.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Position of one body in the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyHierarchy {
    pub body_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Sorted.
    pub children: Vec<String>,
    /// Roots are 0; every child is one deeper than its parent.
    pub hierarchy_level: u32,
}

/// Static parent declaration for a body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyDefinition {
    pub body_id: String,
    pub parent_id: Option<String>,
}

impl HierarchyDefinition {
    pub fn new(body_id: impl Into<String>, parent_id: Option<&str>) -> Self {
        Self {
            body_id: body_id.into(),
            parent_id: parent_id.map(str::to_owned),
        }
    }
}

/// Static definitions for the bundled solar-system catalogue.
pub fn solar_system_definitions() -> Vec<HierarchyDefinition> {
    orrery_ephemeris::solar_system()
        .into_iter()
        .map(|b| HierarchyDefinition {
            body_id: b.id,
            parent_id: b.parent,
        })
        .collect()
}

/// Hierarchy snapshot rebuilt whenever the provider set changes.
#[derive(Debug, Clone, Default)]
pub struct HierarchyCache {
    entries: IndexMap<String, BodyHierarchy>,
}

impl HierarchyCache {
    /// Combine static definitions with bodies discovered in providers.
    ///
    /// Discovered bodies without a definition become roots. A parent that is
    /// not itself known, or a cycle, also demotes the body to a root, so the
    /// result is always a forest.
    pub fn build<'a>(
        definitions: &[HierarchyDefinition],
        discovered: impl IntoIterator<Item = &'a String>,
    ) -> Self {
        let mut parents: IndexMap<String, Option<String>> = definitions
            .iter()
            .map(|d| (d.body_id.clone(), d.parent_id.clone()))
            .collect();
        for body in discovered {
            parents.entry(body.clone()).or_insert(None);
        }

        let known: BTreeSet<String> = parents.keys().cloned().collect();
        for (body, parent) in parents.iter_mut() {
            if parent.as_ref().is_some_and(|p| !known.contains(p) || p == body) {
                *parent = None;
            }
        }

        let mut entries: IndexMap<String, BodyHierarchy> = IndexMap::with_capacity(parents.len());
        for body in parents.keys() {
            let (parent_id, level) = resolve(&parents, body);
            entries.insert(
                body.clone(),
                BodyHierarchy {
                    body_id: body.clone(),
                    parent_id,
                    children: Vec::new(),
                    hierarchy_level: level,
                },
            );
        }

        let links: Vec<(String, String)> = entries
            .values()
            .filter_map(|e| e.parent_id.clone().map(|p| (p, e.body_id.clone())))
            .collect();
        for (parent, child) in links {
            if let Some(entry) = entries.get_mut(&parent) {
                entry.children.push(child);
            }
        }
        for entry in entries.values_mut() {
            entry.children.sort_unstable();
        }
        Self { entries }
    }

    pub fn get(&self, body_id: &str) -> Option<&BodyHierarchy> {
        self.entries.get(body_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BodyHierarchy> {
        self.entries.values()
    }
}

/// Walk to the root. Returns the effective parent and depth; a body on a
/// cycle is cut loose as a root.
fn resolve(parents: &IndexMap<String, Option<String>>, body: &str) -> (Option<String>, u32) {
    let mut seen = BTreeSet::new();
    seen.insert(body);
    let mut level = 0;
    let mut current = body;
    while let Some(Some(parent)) = parents.get(current) {
        if !seen.insert(parent.as_str()) {
            return (None, 0);
        }
        level += 1;
        current = parent.as_str();
    }
    let parent = parents.get(body).cloned().flatten();
    (parent, level)
}
