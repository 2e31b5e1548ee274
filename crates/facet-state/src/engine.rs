//! Reconciliation engine and field accessor
//!
//! The engine runs one synchronous pass per observed store mutation.
//! Sessions move through two states: the first pass initializes (seeds
//! defaults, records what the store already held), every later pass
//! compares dependencies against the value cache and clears dependents
//! whose dependency changed.
//!
//! Invalidation is one level per pass: clearing a dependent is itself a
//! store mutation, so a chain `a -> b -> c` settles over successive
//! passes rather than to a fixed point within one. All deletions of a
//! pass are committed as a single batched mutation.

use facet_codec as codec;
use facet_core::{FieldValue, Schema};
use facet_store::ParamStore;

use crate::{CacheSlot, DependencyGraph, Snapshot, ValueCache};

/// Counters for one reconciliation pass
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Default values written during initialization
    pub seeded: u32,
    /// Dependent entries cleared from the store
    pub invalidated: u32,
    /// True for the initialization pass
    pub first_pass: bool,
}

/// Dependency-aware filter state engine
///
/// Holds the schema, the derived dependency graph, and the value cache.
/// The store is injected per call; one engine tracks one store.
pub struct FilterEngine {
    schema: Schema,
    graph: DependencyGraph,
    cache: ValueCache,
    initialized: bool,
    last_seen: Option<u64>,
    memo: Option<(u64, Snapshot)>,
}

impl FilterEngine {
    /// Engine over a validated schema, in the uninitialized state
    pub fn new(schema: Schema) -> Self {
        let graph = DependencyGraph::build(&schema);
        FilterEngine {
            schema,
            graph,
            cache: ValueCache::new(),
            initialized: false,
            last_seen: None,
            memo: None,
        }
    }

    /// The schema this engine operates over
    #[inline]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The derived dependency graph
    #[inline]
    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Whether the initialization pass has run
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Run one reconciliation pass against the store
    ///
    /// The host calls this after every store mutation it observes. A
    /// pass with nothing new to observe is a no-op.
    pub fn reconcile<S: ParamStore>(&mut self, store: &mut S) -> PassReport {
        if !self.initialized {
            return self.initialize(store);
        }
        if self.last_seen == Some(store.version()) {
            return PassReport::default();
        }

        // Record the version observed at pass start. Deletions made by
        // this pass bump the store past it, which is what lets the next
        // pass observe them and carry a chain one level further.
        let observed = store.version();
        let report = self.invalidate(store);
        self.last_seen = Some(observed);
        report
    }

    /// Typed view of all fields, derived from the current store state
    ///
    /// Memoized on the store version; recomputed only after a mutation.
    pub fn snapshot<S: ParamStore>(&mut self, store: &S) -> Snapshot {
        let version = store.version();
        if let Some((memo_version, snap)) = &self.memo {
            if *memo_version == version {
                return snap.clone();
            }
        }

        let entries = self
            .schema
            .iter()
            .map(|field| {
                (
                    field.name.clone(),
                    codec::decode(store.get(&field.name), field.field_type),
                )
            })
            .collect();
        let snap = Snapshot::new(entries);
        self.memo = Some((version, snap.clone()));
        snap
    }

    /// Write a single field back into the store
    ///
    /// Empty values (absent, empty text, empty list) normalize to
    /// deletion; writers cannot distinguish explicitly-empty from unset.
    /// Keys outside the schema are written with the value's own string
    /// encoding. The write is observed by the next reconciliation pass,
    /// which may invalidate dependents.
    pub fn set_field<S: ParamStore>(&self, store: &mut S, key: &str, value: Option<FieldValue>) {
        let value = match value {
            Some(v) if !v.is_empty() => v,
            _ => {
                store.delete(key);
                return;
            }
        };
        store.set(key, &codec::encode(&value));
    }

    fn initialize<S: ParamStore>(&mut self, store: &mut S) -> PassReport {
        let observed = store.version();
        let mut defaults: Vec<(String, String)> = Vec::new();

        for field in self.schema.iter() {
            match store.get(&field.name) {
                Some(raw) => {
                    let value = codec::decode(Some(raw), field.field_type);
                    self.cache.record(&field.name, value);
                }
                None => {
                    if let Some(default) = &field.default {
                        defaults.push((field.name.clone(), codec::encode(default)));
                        self.cache.record(&field.name, Some(default.clone()));
                    }
                    // Absent with no default: left unobserved, which
                    // compares as absent on the next pass.
                }
            }
        }

        let seeded = defaults.len() as u32;
        if !defaults.is_empty() {
            // One batched write: partial initialization must never be
            // observable.
            store.set_many(&defaults);
            tracing::debug!(count = seeded, "seeded default field values");
        }

        self.initialized = true;
        self.last_seen = Some(observed);
        PassReport {
            seeded,
            invalidated: 0,
            first_pass: true,
        }
    }

    fn invalidate<S: ParamStore>(&mut self, store: &mut S) -> PassReport {
        // Comparisons run against the cache as it stood at pass start;
        // slot writes are buffered and applied after the sweep. Without
        // this, clearing a dependent mid-sweep would read as that
        // dependent's own change and collapse a chain in a single pass.
        let mut pending: Vec<(String, CacheSlot)> = Vec::new();
        let mut doomed: Vec<String> = Vec::new();

        for (dep, dependents) in self.graph.iter() {
            let field_type = match self.schema.field(dep) {
                Some(def) => def.field_type,
                None => continue,
            };
            let current = codec::decode(store.get(dep), field_type);

            let changed = match self.cache.get(dep) {
                Some(CacheSlot::Observed(previous)) => *previous != current,
                // A cleared slot is a transition pending observation.
                Some(CacheSlot::Cleared) => true,
                // Never observed compares as absent.
                None => current.is_some(),
            };
            if !changed {
                continue;
            }

            tracing::debug!(
                dependency = dep,
                dependents = dependents.len(),
                "dependency changed, clearing dependents"
            );
            for name in dependents {
                if store.get(name).is_some() {
                    pending.push((name.clone(), CacheSlot::Cleared));
                    if !doomed.contains(name) {
                        doomed.push(name.clone());
                    }
                } else {
                    // Nothing to delete: no transition happens, so the
                    // clearing must not read as one on the next pass.
                    pending.push((name.clone(), CacheSlot::Observed(None)));
                }
            }
            pending.push((dep.to_string(), CacheSlot::Observed(current)));
        }

        // Later writes win, so a field that is both a cleared dependent
        // and a changed dependency keeps its observed value.
        for (name, slot) in pending {
            match slot {
                CacheSlot::Observed(value) => self.cache.record(&name, value),
                CacheSlot::Cleared => self.cache.clear(&name),
            }
        }

        let invalidated = doomed.len() as u32;
        if !doomed.is_empty() {
            // Combined deletions commit as one mutation.
            store.delete_many(&doomed);
        }

        PassReport {
            seeded: 0,
            invalidated,
            first_pass: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_core::{FieldDef, FieldType};
    use facet_store::{MemoryStore, SharedStore};

    fn chain_schema() -> Schema {
        Schema::new(vec![
            FieldDef::new("country", FieldType::Text),
            FieldDef::new("city", FieldType::Text).depends_on(["country"]),
            FieldDef::new("district", FieldType::Text).depends_on(["city"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_defaults_seeded_as_one_mutation() {
        let schema = Schema::new(vec![
            FieldDef::new("q", FieldType::Text).with_default("all"),
            FieldDef::new("page", FieldType::Number).with_default(1.0),
            FieldDef::new("exact", FieldType::Bool),
        ])
        .unwrap();
        let mut engine = FilterEngine::new(schema);
        let mut store = MemoryStore::new();
        let v0 = store.version();

        let report = engine.reconcile(&mut store);

        assert!(report.first_pass);
        assert_eq!(report.seeded, 2);
        assert_eq!(store.version(), v0 + 1);
        assert_eq!(store.get("q"), Some("all"));
        assert_eq!(store.get("page"), Some("1"));
        assert_eq!(store.get("exact"), None);

        let snap = engine.snapshot(&store);
        assert_eq!(snap.get("q"), Some(&FieldValue::from("all")));
        assert_eq!(snap.get("page"), Some(&FieldValue::Number(1.0)));
        assert_eq!(snap.get("exact"), None);
    }

    #[test]
    fn test_existing_entries_win_over_defaults() {
        let schema = Schema::new(vec![
            FieldDef::new("q", FieldType::Text).with_default("all"),
        ])
        .unwrap();
        let mut engine = FilterEngine::new(schema);
        let mut store = MemoryStore::from_pairs([("q", "rust")]);

        let report = engine.reconcile(&mut store);

        assert_eq!(report.seeded, 0);
        assert_eq!(store.get("q"), Some("rust"));
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let mut engine = FilterEngine::new(chain_schema());
        let mut store = MemoryStore::from_pairs([("country", "es"), ("city", "madrid")]);

        engine.reconcile(&mut store);
        let settled = engine.reconcile(&mut store);
        let version = store.version();
        let snap = engine.snapshot(&store);

        let rerun = engine.reconcile(&mut store);

        assert_eq!(settled, PassReport::default());
        assert_eq!(rerun, PassReport::default());
        assert_eq!(store.version(), version);
        assert_eq!(engine.snapshot(&store), snap);
    }

    #[test]
    fn test_dependency_change_clears_dependent() {
        let mut engine = FilterEngine::new(chain_schema());
        let mut store = MemoryStore::from_pairs([("country", "es"), ("city", "madrid")]);
        engine.reconcile(&mut store);

        engine.set_field(&mut store, "country", Some(FieldValue::from("fr")));
        let report = engine.reconcile(&mut store);

        assert_eq!(report.invalidated, 1);
        assert_eq!(store.get("city"), None);
        assert_eq!(engine.snapshot(&store).get("city"), None);
        assert_eq!(
            engine.snapshot(&store).get("country"),
            Some(&FieldValue::from("fr"))
        );
    }

    #[test]
    fn test_same_value_write_does_not_clear_dependent() {
        let mut engine = FilterEngine::new(chain_schema());
        let mut store = MemoryStore::from_pairs([("country", "es"), ("city", "madrid")]);
        engine.reconcile(&mut store);

        engine.set_field(&mut store, "country", Some(FieldValue::from("es")));
        let report = engine.reconcile(&mut store);

        assert_eq!(report.invalidated, 0);
        assert_eq!(store.get("city"), Some("madrid"));
    }

    #[test]
    fn test_chain_settles_one_level_per_pass() {
        let mut engine = FilterEngine::new(chain_schema());
        let mut store = MemoryStore::from_pairs([
            ("country", "es"),
            ("city", "madrid"),
            ("district", "centro"),
        ]);
        engine.reconcile(&mut store);

        engine.set_field(&mut store, "country", Some(FieldValue::from("fr")));

        let first = engine.reconcile(&mut store);
        assert_eq!(first.invalidated, 1);
        assert_eq!(store.get("city"), None);
        assert_eq!(store.get("district"), Some("centro"));

        let second = engine.reconcile(&mut store);
        assert_eq!(second.invalidated, 1);
        assert_eq!(store.get("district"), None);

        let third = engine.reconcile(&mut store);
        assert_eq!(third, PassReport::default());
    }

    #[test]
    fn test_both_levels_changed_in_one_transition() {
        let mut engine = FilterEngine::new(chain_schema());
        let mut store = MemoryStore::from_pairs([
            ("country", "es"),
            ("city", "madrid"),
            ("district", "centro"),
        ]);
        engine.reconcile(&mut store);

        // External actor rewrites both country and city in one batch.
        store.set_many(&[
            ("country".to_string(), "fr".to_string()),
            ("city".to_string(), "paris".to_string()),
        ]);

        let report = engine.reconcile(&mut store);

        // Both changed dependencies are handled in the same sweep: the
        // city write is clobbered by country's invalidation, and the
        // district falls to city's own observed change.
        assert_eq!(report.invalidated, 2);
        assert_eq!(store.get("city"), None);
        assert_eq!(store.get("district"), None);
    }

    #[test]
    fn test_empty_values_normalize_to_deletion() {
        let schema = Schema::new(vec![
            FieldDef::new("q", FieldType::Text),
            FieldDef::new("tags", FieldType::List),
        ])
        .unwrap();
        let mut engine = FilterEngine::new(schema);
        let mut store = MemoryStore::from_pairs([("q", "rust"), ("tags", "a,b")]);
        engine.reconcile(&mut store);

        engine.set_field(&mut store, "q", Some(FieldValue::from("")));
        engine.set_field(&mut store, "tags", Some(FieldValue::List(Vec::new())));
        assert_eq!(store.get("q"), None);
        assert_eq!(store.get("tags"), None);

        engine.set_field(&mut store, "q", None);
        assert_eq!(store.get("q"), None);
    }

    #[test]
    fn test_unknown_field_written_with_string_coercion() {
        let mut engine = FilterEngine::new(chain_schema());
        let mut store = MemoryStore::new();
        engine.reconcile(&mut store);

        engine.set_field(&mut store, "sort", Some(FieldValue::Number(2.0)));
        assert_eq!(store.get("sort"), Some("2"));

        // Unknown keys stay outside the snapshot.
        assert!(!engine.snapshot(&store).contains("sort"));
    }

    #[test]
    fn test_external_mutation_triggers_invalidation() {
        let mut engine = FilterEngine::new(chain_schema());
        let mut store = MemoryStore::from_pairs([("country", "es"), ("city", "madrid")]);
        engine.reconcile(&mut store);

        // Mutation not originated by the engine, e.g. navigation.
        store.set("country", "de");
        let report = engine.reconcile(&mut store);

        assert_eq!(report.invalidated, 1);
        assert_eq!(store.get("city"), None);
    }

    #[test]
    fn test_external_delete_is_a_transition() {
        let mut engine = FilterEngine::new(chain_schema());
        let mut store = MemoryStore::from_pairs([("country", "es"), ("city", "madrid")]);
        engine.reconcile(&mut store);

        store.delete("country");
        let report = engine.reconcile(&mut store);

        assert_eq!(report.invalidated, 1);
        assert_eq!(store.get("city"), None);
    }

    #[test]
    fn test_unseeded_dependency_appearing_later() {
        // "country" starts absent with no default, so it is never seeded
        // into the cache; its later appearance must still register.
        let mut engine = FilterEngine::new(chain_schema());
        let mut store = MemoryStore::from_pairs([("city", "madrid")]);
        engine.reconcile(&mut store);

        store.set("country", "es");
        let report = engine.reconcile(&mut store);

        assert_eq!(report.invalidated, 1);
        assert_eq!(store.get("city"), None);
    }

    #[test]
    fn test_malformed_number_reads_absent() {
        let schema = Schema::new(vec![FieldDef::new("page", FieldType::Number)]).unwrap();
        let mut engine = FilterEngine::new(schema);
        let mut store = MemoryStore::from_pairs([("page", "not-a-number")]);
        engine.reconcile(&mut store);

        assert_eq!(engine.snapshot(&store).get("page"), None);
    }

    #[test]
    fn test_snapshot_tracks_store_mutations() {
        let mut engine = FilterEngine::new(chain_schema());
        let mut store = MemoryStore::new();
        engine.reconcile(&mut store);

        assert_eq!(engine.snapshot(&store).get("country"), None);

        engine.set_field(&mut store, "country", Some(FieldValue::from("es")));
        assert_eq!(
            engine.snapshot(&store).get("country"),
            Some(&FieldValue::from("es"))
        );
    }

    #[test]
    fn test_settles_for_arbitrary_store_contents() {
        use proptest::prelude::*;

        let entries = proptest::collection::vec(("[a-z]{1,8}", "[a-z0-9]{0,8}"), 0..6);
        proptest!(|(pairs in entries)| {
            let mut store = MemoryStore::from_pairs(pairs);
            let mut engine = FilterEngine::new(chain_schema());

            // A session settles in a bounded number of passes (one per
            // dependency level plus initialization).
            let mut settled = false;
            for _ in 0..5 {
                let report = engine.reconcile(&mut store);
                if report == PassReport::default() {
                    settled = true;
                    break;
                }
            }
            prop_assert!(settled);

            // Once settled, a further pass changes nothing.
            let version = store.version();
            let snap = engine.snapshot(&store);
            engine.reconcile(&mut store);
            prop_assert_eq!(store.version(), version);
            prop_assert_eq!(engine.snapshot(&store), snap);
        });
    }

    #[test]
    fn test_shared_store_host_and_engine() {
        let shared = SharedStore::from_store(MemoryStore::from_pairs([
            ("country", "es"),
            ("city", "madrid"),
        ]));
        let mut engine = FilterEngine::new(chain_schema());
        engine.reconcile(&mut *shared.write());

        // The hosting environment holds its own handle and mutates the
        // store behind the engine's back.
        let host = shared.clone();
        host.write().set("country", "pt");

        let report = engine.reconcile(&mut *shared.write());
        assert_eq!(report.invalidated, 1);
        assert_eq!(shared.read().get("city"), None);
    }
}
