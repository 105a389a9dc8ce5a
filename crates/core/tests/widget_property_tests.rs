//! Property-based integration tests for the widget registry.
//!
//! Random operation sequences are replayed against the registry and a plain
//! `Vec` model; both must agree on order, and the stored record must match.

use std::sync::Arc;

use proptest::prelude::*;

use finboard_core::storage::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
use finboard_core::widgets::{DisplayMode, WidgetConfig, WidgetRegistry, WidgetRegistryTrait};

// =============================================================================
// Generators
// =============================================================================

fn arb_display_mode() -> impl Strategy<Value = DisplayMode> {
    prop_oneof![
        Just(DisplayMode::Card),
        Just(DisplayMode::Table),
        Just(DisplayMode::Chart),
    ]
}

fn arb_widget() -> impl Strategy<Value = WidgetConfig> {
    (
        "[a-f0-9]{8}-[a-f0-9]{4}",                          // id
        "[A-Za-z][A-Za-z ]{0,15}",                          // name
        proptest::option::of("[a-z ]{1,20}"),               // description
        "[A-Z]{1,5}",                                       // symbol
        1u64..3600,                                         // refresh interval
        arb_display_mode(),
        proptest::collection::vec("[a-z]{1,3}", 0..4),      // selected fields
    )
        .prop_map(|(id, name, description, symbol, interval, mode, fields)| WidgetConfig {
            id,
            name,
            description,
            request_url: format!("/api/finnhub?symbol={}&endpoint=quote", symbol),
            refresh_interval_secs: interval,
            display_mode: mode,
            selected_fields: fields,
        })
}

#[derive(Debug, Clone)]
enum Op {
    Add(WidgetConfig),
    Remove(usize),
    Reorder(usize, usize),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        arb_widget().prop_map(Op::Add),
        (0usize..8).prop_map(Op::Remove),
        (0usize..8, 0usize..8).prop_map(|(a, b)| Op::Reorder(a, b)),
    ]
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn registry_matches_vec_model(ops in proptest::collection::vec(arb_op(), 1..30)) {
        let store = Arc::new(MemoryKeyValueStore::new());
        let registry = WidgetRegistry::load(store.clone()).unwrap();
        let mut model: Vec<WidgetConfig> = Vec::new();

        for op in ops {
            match op {
                Op::Add(widget) => {
                    let duplicate = model.iter().any(|w| w.id == widget.id);
                    let result = registry.add(widget.clone());
                    prop_assert_eq!(result.is_ok(), !duplicate);
                    if !duplicate {
                        model.insert(0, widget);
                    }
                }
                Op::Remove(index) => {
                    let id = model
                        .get(index)
                        .map(|w| w.id.clone())
                        .unwrap_or_else(|| "missing".to_string());
                    let removed = registry.remove(&id).unwrap();
                    prop_assert_eq!(removed, index < model.len());
                    if removed {
                        model.remove(index);
                    }
                }
                Op::Reorder(from, to) => {
                    let in_range = from < model.len() && to < model.len();
                    prop_assert_eq!(registry.reorder(from, to).is_ok(), in_range);
                    if in_range {
                        let moved = model.remove(from);
                        model.insert(to, moved);
                    }
                }
            }
            prop_assert_eq!(registry.widgets(), model.clone());
        }

        let reloaded = WidgetRegistry::load(store).unwrap();
        prop_assert_eq!(reloaded.widgets(), model);
    }

    #[test]
    fn export_import_preserves_widgets(widgets in proptest::collection::vec(arb_widget(), 0..6)) {
        let mut unique = Vec::new();
        for widget in widgets {
            if !unique.iter().any(|w: &WidgetConfig| w.id == widget.id) {
                unique.push(widget);
            }
        }

        let source = WidgetRegistry::load(Arc::new(MemoryKeyValueStore::new())).unwrap();
        source.replace_all(unique.clone()).unwrap();
        let exported = source.export_json().unwrap();

        let dir = tempfile::tempdir().unwrap();
        let store: Arc<dyn KeyValueStore> = Arc::new(FileKeyValueStore::new(dir.path().join("finboard.json")));
        let target = WidgetRegistry::load(store.clone()).unwrap();
        prop_assert_eq!(target.import_json(&exported).unwrap(), unique.len());

        let reloaded = WidgetRegistry::load(store).unwrap();
        prop_assert_eq!(reloaded.widgets(), unique);
    }
}
