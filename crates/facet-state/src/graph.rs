//! Dependency graph
//!
//! Derived, read-only mapping from a field to the ordered set of fields
//! that depend on it. Built once from the schema and never mutated.
//! Order is significant: dependencies appear in first-seen declaration
//! order and dependents in registration order, which fixes the
//! invalidation order of a reconciliation pass. Edges naming undeclared
//! fields are dropped at build time.

use facet_core::Schema;

/// Reverse dependency index over a schema
#[derive(Clone, Debug, Default)]
pub struct DependencyGraph {
    // (dependency, dependents) pairs; entry counts are small enough that
    // linear scans beat a map here and keep ordering for free.
    edges: Vec<(String, Vec<String>)>,
}

impl DependencyGraph {
    /// Build the graph from `depends_on` declarations
    pub fn build(schema: &Schema) -> Self {
        let mut edges: Vec<(String, Vec<String>)> = Vec::new();

        for field in schema.iter() {
            for dep in &field.depends_on {
                if !schema.contains(dep) {
                    // Dead edge: dependency never declared
                    continue;
                }
                match edges.iter_mut().find(|(name, _)| name == dep) {
                    Some((_, dependents)) => {
                        if !dependents.contains(&field.name) {
                            dependents.push(field.name.clone());
                        }
                    }
                    None => edges.push((dep.clone(), vec![field.name.clone()])),
                }
            }
        }

        DependencyGraph { edges }
    }

    /// Fields that depend on `name`, in registration order
    ///
    /// Empty for unknown names and for fields nothing depends on.
    pub fn dependents(&self, name: &str) -> &[String] {
        self.edges
            .iter()
            .find(|(dep, _)| dep == name)
            .map(|(_, dependents)| dependents.as_slice())
            .unwrap_or(&[])
    }

    /// Iterate `(dependency, dependents)` pairs in build order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.edges
            .iter()
            .map(|(dep, dependents)| (dep.as_str(), dependents.as_slice()))
    }

    /// True when no field declares a live dependency
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}
