use drillrank::model::DrillSchema;
use drillrank::presets::Preset;
use drillrank::weights::{
    JsonFileStore, MemoryStore, WeightManager, WeightStore, DEBOUNCE_WINDOW, STORAGE_KEY,
};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

fn drill(key: &str, default_weight: f64) -> DrillSchema {
    DrillSchema {
        key: key.to_string(),
        label: key.to_string(),
        unit: String::new(),
        lower_is_better: false,
        min: None,
        max: None,
        default_weight: Some(default_weight),
    }
}

fn preset(name: &str, weights: &[(&str, f64)]) -> Preset {
    Preset {
        name: name.to_string(),
        description: String::new(),
        weights: weights
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect(),
    }
}

fn fixture() -> WeightManager<MemoryStore> {
    let drills = vec![drill("a", 0.5), drill("b", 0.5)];
    let presets = vec![
        preset("balanced", &[("a", 0.5), ("b", 0.5)]),
        preset("a_heavy", &[("a", 0.9), ("b", 0.1)]),
    ];
    WeightManager::new(MemoryStore::default(), &drills, presets)
}

// --- INIT & PERSISTENCE ---

#[test]
fn defaults_from_drill_schemas_when_store_is_empty() {
    let mgr = fixture();
    assert_eq!(mgr.persisted().get("a"), Some(&50.0));
    assert_eq!(mgr.persisted().get("b"), Some(&50.0));
    assert_eq!(mgr.persisted(), mgr.live());
    // Defaults happen to equal the balanced preset.
    assert_eq!(mgr.active_preset(), Some("balanced"));
}

#[test]
fn corrupt_store_record_falls_back_to_defaults() {
    let mut store = MemoryStore::default();
    store.save(STORAGE_KEY, "{not json!");
    let drills = vec![drill("a", 0.4)];
    let mgr = WeightManager::new(store, &drills, vec![]);
    assert_eq!(mgr.persisted().get("a"), Some(&40.0));
}

#[test]
fn stored_record_wins_over_defaults() {
    let mut store = MemoryStore::default();
    store.save(STORAGE_KEY, r#"{"a": 12.0, "b": 88.0}"#);
    let drills = vec![drill("a", 0.5), drill("b", 0.5)];
    let mgr = WeightManager::new(store, &drills, vec![]);
    assert_eq!(mgr.persisted().get("a"), Some(&12.0));
    assert_eq!(mgr.persisted().get("b"), Some(&88.0));
}

#[test]
fn json_file_store_round_trips_and_swallows_corruption() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = JsonFileStore::new(dir.path());
    assert!(store.load(STORAGE_KEY).is_none());
    store.save(STORAGE_KEY, r#"{"a": 30.0}"#);
    assert_eq!(store.load(STORAGE_KEY).unwrap(), r#"{"a": 30.0}"#);

    std::fs::write(dir.path().join(format!("{}.json", STORAGE_KEY)), "garbage").unwrap();
    let drills = vec![drill("a", 0.5)];
    let mgr = WeightManager::new(JsonFileStore::new(dir.path()), &drills, vec![]);
    assert_eq!(mgr.persisted().get("a"), Some(&50.0));
}

// --- DEBOUNCE PROTOCOL ---

#[test]
fn slider_edit_debounces_into_persisted() {
    let mut mgr = fixture();
    let t0 = Instant::now();

    mgr.set_weight("a", 10.0, t0);
    // Live is immediate, persisted is not.
    assert_eq!(mgr.live().get("a"), Some(&10.0));
    assert_eq!(mgr.persisted().get("a"), Some(&50.0));
    // Manual adjustment clears the preset badge synchronously.
    assert_eq!(mgr.active_preset(), None);

    // Quiet period not yet elapsed.
    assert!(!mgr.settle(t0 + Duration::from_millis(100)));
    assert_eq!(mgr.persisted().get("a"), Some(&50.0));

    assert!(mgr.settle(t0 + DEBOUNCE_WINDOW));
    assert_eq!(mgr.persisted().get("a"), Some(&10.0));
    assert!(!mgr.has_pending_commit());
}

#[test]
fn rapid_updates_restart_the_window_and_commit_only_the_latest() {
    let mut mgr = fixture();
    let t0 = Instant::now();

    mgr.set_weight("a", 10.0, t0);
    mgr.set_weight("a", 20.0, t0 + Duration::from_millis(200));
    mgr.set_weight("a", 30.0, t0 + Duration::from_millis(400));

    // The first window's deadline passed, but it was superseded.
    assert!(!mgr.settle(t0 + Duration::from_millis(450)));
    assert_eq!(mgr.persisted().get("a"), Some(&50.0));

    assert!(mgr.settle(t0 + Duration::from_millis(400) + DEBOUNCE_WINDOW));
    assert_eq!(mgr.persisted().get("a"), Some(&30.0));
}

#[test]
fn preset_application_supersedes_pending_commit() {
    let mut mgr = fixture();
    let t0 = Instant::now();

    mgr.set_weight("a", 10.0, t0);
    assert!(mgr.apply_preset("a_heavy"));

    // The stale debounced commit must not fire after the preset wrote
    // authoritative state.
    assert!(!mgr.settle(t0 + DEBOUNCE_WINDOW * 2));
    assert_eq!(mgr.persisted().get("a"), Some(&90.0));
    assert_eq!(mgr.live().get("a"), Some(&90.0));
    assert_eq!(mgr.active_preset(), Some("a_heavy"));
}

#[test]
fn commit_edit_bypasses_the_quiet_period() {
    let mut mgr = fixture();
    mgr.set_weight("b", 75.0, Instant::now());
    mgr.commit_edit();
    assert_eq!(mgr.persisted().get("b"), Some(&75.0));
    assert!(!mgr.has_pending_commit());
}

#[test]
fn cancel_edit_discards_the_live_vector() {
    let mut mgr = fixture();
    let t0 = Instant::now();
    mgr.set_weight("a", 5.0, t0);
    mgr.cancel_edit();
    assert_eq!(mgr.live().get("a"), Some(&50.0));
    assert!(!mgr.settle(t0 + DEBOUNCE_WINDOW * 2));
    assert_eq!(mgr.active_preset(), Some("balanced"));
}

// --- PRESETS ---

#[test]
fn preset_round_trip_is_exact() {
    let mut mgr = fixture();
    assert!(mgr.apply_preset("a_heavy"));
    // Fractions times 100, exactly, no drift.
    assert_eq!(mgr.persisted().get("a"), Some(&90.0));
    assert_eq!(mgr.persisted().get("b"), Some(&10.0));
    assert_eq!(mgr.active_preset(), Some("a_heavy"));
}

#[test]
fn preset_then_slider_then_settle() {
    let mut mgr = fixture();
    let t0 = Instant::now();

    assert!(mgr.apply_preset("balanced"));
    assert_eq!(mgr.persisted().get("a"), Some(&50.0));
    assert_eq!(mgr.active_preset(), Some("balanced"));

    mgr.set_weight("a", 10.0, t0);
    assert_eq!(mgr.active_preset(), None);

    assert!(mgr.settle(t0 + DEBOUNCE_WINDOW));
    assert_eq!(mgr.persisted().get("a"), Some(&10.0));
    assert_eq!(mgr.active_preset(), None);
}

#[test]
fn unknown_preset_is_a_noop() {
    let mut mgr = fixture();
    let before = mgr.persisted().clone();
    assert!(!mgr.apply_preset("does_not_exist"));
    assert_eq!(mgr.persisted(), &before);
    assert_eq!(mgr.active_preset(), Some("balanced"));
}

#[test]
fn detection_tolerates_small_numeric_noise() {
    let mut mgr = fixture();
    let mut near: BTreeMap<String, f64> = BTreeMap::new();
    near.insert("a".to_string(), 89.95);
    near.insert("b".to_string(), 10.05);
    mgr.replace_all(near);
    assert_eq!(mgr.active_preset(), Some("a_heavy"));

    let mut far: BTreeMap<String, f64> = BTreeMap::new();
    far.insert("a".to_string(), 88.0);
    far.insert("b".to_string(), 10.0);
    mgr.replace_all(far);
    assert_eq!(mgr.active_preset(), None);
}

#[test]
fn detection_requires_matching_key_sets() {
    let mut mgr = fixture();
    let mut partial: BTreeMap<String, f64> = BTreeMap::new();
    partial.insert("a".to_string(), 50.0);
    mgr.replace_all(partial);
    assert_eq!(mgr.active_preset(), None);
}

#[test]
fn persisted_changes_are_mirrored_to_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let drills = vec![drill("a", 0.5)];

    let mut mgr = WeightManager::new(JsonFileStore::new(dir.path()), &drills, vec![]);
    mgr.set_weight("a", 33.0, Instant::now());
    mgr.commit_edit();
    drop(mgr);

    // A fresh manager over the same store sees the committed vector.
    let reloaded = WeightManager::new(JsonFileStore::new(dir.path()), &drills, vec![]);
    assert_eq!(reloaded.persisted().get("a"), Some(&33.0));
}
