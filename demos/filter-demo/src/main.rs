//! Walkthrough of dependent filters: country -> city -> district
//!
//! Simulates a host driving the engine: every mutation is followed by a
//! reconciliation pass, exactly as a change notification would.

use facet_core::{FieldDef, FieldType, FieldValue, Schema};
use facet_state::FilterEngine;
use facet_store::{MemoryStore, ParamStore};

fn print_state(label: &str, engine: &mut FilterEngine, store: &MemoryStore) {
    println!("--- {}", label);
    for (name, value) in engine.snapshot(store).iter() {
        match value {
            Some(v) => println!("  {} = {:?}", name, v),
            None => println!("  {} = (unset)", name),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let schema = Schema::new(vec![
        FieldDef::new("country", FieldType::Text).with_default("es"),
        FieldDef::new("city", FieldType::Text).depends_on(["country"]),
        FieldDef::new("district", FieldType::Text).depends_on(["city"]),
        FieldDef::new("tags", FieldType::List),
    ])?;

    let mut engine = FilterEngine::new(schema);
    let mut store = MemoryStore::new();

    engine.reconcile(&mut store);
    print_state("after initialization (country default seeded)", &mut engine, &store);

    engine.set_field(&mut store, "city", Some(FieldValue::from("madrid")));
    engine.reconcile(&mut store);
    engine.set_field(&mut store, "district", Some(FieldValue::from("centro")));
    engine.reconcile(&mut store);
    engine.set_field(
        &mut store,
        "tags",
        Some(FieldValue::from(vec!["cheap", "open, late"])),
    );
    engine.reconcile(&mut store);
    print_state("after selecting city, district and tags", &mut engine, &store);

    println!("\nChanging country invalidates the chain one level per pass:");
    engine.set_field(&mut store, "country", Some(FieldValue::from("fr")));
    engine.reconcile(&mut store);
    print_state("pass 1: city cleared", &mut engine, &store);
    engine.reconcile(&mut store);
    print_state("pass 2: district cleared", &mut engine, &store);

    println!("\nRaw store entries:");
    for (key, value) in store.entries() {
        println!("  {}={}", key, value);
    }

    Ok(())
}
