//! Validated field schema
//!
//! A schema is the immutable set of field definitions the engine operates
//! over. Validation happens eagerly at construction: duplicate names,
//! type-mismatched defaults, and dependency cycles are rejected up front.
//! A `depends_on` entry naming an undeclared field is a dead edge and is
//! ignored both here and by the dependency graph.

use std::collections::HashMap;

use crate::{FacetError, FacetResult, FieldDef};

/// Immutable, validated collection of field definitions
///
/// Preserves declaration order; lookups by name go through an index.
#[derive(Clone, Debug)]
pub struct Schema {
    fields: Vec<FieldDef>,
    index: HashMap<String, usize>,
}

impl Schema {
    /// Build and validate a schema
    pub fn new(fields: Vec<FieldDef>) -> FacetResult<Schema> {
        let mut index = HashMap::with_capacity(fields.len());

        for (i, field) in fields.iter().enumerate() {
            if index.insert(field.name.clone(), i).is_some() {
                return Err(FacetError::DuplicateField(field.name.clone()));
            }
            if let Some(default) = &field.default {
                if default.field_type() != field.field_type {
                    return Err(FacetError::DefaultTypeMismatch {
                        field: field.name.clone(),
                        expected: field.field_type,
                    });
                }
            }
        }

        if let Some(cycle) = find_cycle(&fields, &index) {
            return Err(FacetError::DependencyCycle(cycle));
        }

        Ok(Schema { fields, index })
    }

    /// Look up a field definition by name
    #[inline]
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    /// Check whether a field is declared
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Iterate over field definitions in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter()
    }

    /// Number of declared fields
    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the schema declares no fields
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Depth-first search over `depends_on` edges between declared fields.
/// Returns the names along a cycle if one exists, closing the loop with
/// the repeated field.
fn find_cycle(fields: &[FieldDef], index: &HashMap<String, usize>) -> Option<Vec<String>> {
    let mut marks = vec![Mark::Unvisited; fields.len()];
    let mut path = Vec::new();

    for start in 0..fields.len() {
        if marks[start] == Mark::Unvisited {
            if let Some(cycle) = visit(start, fields, index, &mut marks, &mut path) {
                return Some(cycle);
            }
        }
    }
    None
}

fn visit(
    at: usize,
    fields: &[FieldDef],
    index: &HashMap<String, usize>,
    marks: &mut [Mark],
    path: &mut Vec<usize>,
) -> Option<Vec<String>> {
    marks[at] = Mark::InProgress;
    path.push(at);

    for dep in &fields[at].depends_on {
        let next = match index.get(dep) {
            Some(&i) => i,
            // Undeclared dependency: dead edge
            None => continue,
        };
        match marks[next] {
            Mark::Done => {}
            Mark::InProgress => {
                let start = path.iter().position(|&i| i == next).unwrap_or(0);
                let mut cycle: Vec<String> = path[start..]
                    .iter()
                    .map(|&i| fields[i].name.clone())
                    .collect();
                cycle.push(fields[next].name.clone());
                return Some(cycle);
            }
            Mark::Unvisited => {
                if let Some(cycle) = visit(next, fields, index, marks, path) {
                    return Some(cycle);
                }
            }
        }
    }

    path.pop();
    marks[at] = Mark::Done;
    None
}
