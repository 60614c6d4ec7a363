use crate::model::{DrillSchema, WeightVector};
use crate::presets::{find_preset, Preset};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Record name the manager reads/writes in its store.
pub const STORAGE_KEY: &str = "drill_weights";

/// Quiet period before a slider burst commits to the persisted vector.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(250);

/// Elementwise slack when matching the persisted vector against a preset.
pub const PRESET_TOLERANCE: f64 = 0.1;

/// Durable key-value boundary (device-local storage in the original
/// deployment). Payloads are opaque strings; the manager stores a flat
/// JSON object mapping drill key to percentage.
pub trait WeightStore {
    fn load(&self, key: &str) -> Option<String>;
    fn save(&mut self, key: &str, payload: &str);
}

/// In-memory store for tests and embedding hosts that persist elsewhere.
#[derive(Default)]
pub struct MemoryStore {
    records: HashMap<String, String>,
}

impl WeightStore for MemoryStore {
    fn load(&self, key: &str) -> Option<String> {
        self.records.get(key).cloned()
    }

    fn save(&mut self, key: &str, payload: &str) {
        self.records.insert(key.to_string(), payload.to_string());
    }
}

/// File-backed store: one `<key>.json` per record under a root directory.
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    fn record_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }
}

impl WeightStore for JsonFileStore {
    fn load(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.record_path(key)).ok()
    }

    fn save(&mut self, key: &str, payload: &str) {
        if let Err(e) = fs::create_dir_all(&self.root) {
            warn!("⚠️  Could not create weight store dir: {}", e);
            return;
        }
        if let Err(e) = fs::write(self.record_path(key), payload) {
            warn!("⚠️  Could not persist weights: {}", e);
        }
    }
}

struct PendingCommit {
    deadline: Instant,
    generation: u64,
}

/// Owns the authoritative weight vector plus an in-flight edit copy.
///
/// Slider updates land in `live` immediately and commit to `persisted`
/// after a quiet period. Every mutation bumps a commit generation; a
/// debounced commit applies only if its generation is still current, so a
/// late-firing commit can never overwrite a fresher preset application.
/// Time is passed in by the caller, which keeps the state machine
/// deterministic under test.
pub struct WeightManager<S: WeightStore> {
    store: S,
    presets: Vec<Preset>,
    defaults: WeightVector,
    persisted: WeightVector,
    live: WeightVector,
    active_preset: Option<String>,
    pending: Option<PendingCommit>,
    generation: u64,
    debounce: Duration,
}

impl<S: WeightStore> WeightManager<S> {
    /// Loads a prior vector from the store, falling back to the drill
    /// defaults when the record is absent or malformed. A parse failure is
    /// swallowed: the caller never sees it.
    pub fn new(store: S, drills: &[DrillSchema], presets: Vec<Preset>) -> Self {
        let defaults: WeightVector = drills
            .iter()
            .map(|d| (d.key.clone(), d.default_weight_pct()))
            .collect();

        let persisted = match store.load(STORAGE_KEY) {
            Some(payload) => match serde_json::from_str::<WeightVector>(&payload) {
                Ok(v) => v,
                Err(e) => {
                    warn!("⚠️  Stored weights unreadable ({}), using defaults", e);
                    defaults.clone()
                }
            },
            None => defaults.clone(),
        };

        let mut mgr = Self {
            store,
            presets,
            defaults,
            live: persisted.clone(),
            persisted,
            active_preset: None,
            pending: None,
            generation: 0,
            debounce: DEBOUNCE_WINDOW,
        };
        mgr.active_preset = mgr.detect_preset();
        mgr
    }

    pub fn persisted(&self) -> &WeightVector {
        &self.persisted
    }

    pub fn live(&self) -> &WeightVector {
        &self.live
    }

    pub fn active_preset(&self) -> Option<&str> {
        self.active_preset.as_deref()
    }

    pub fn defaults(&self) -> &WeightVector {
        &self.defaults
    }

    pub fn has_pending_commit(&self) -> bool {
        self.pending.is_some()
    }

    /// Single-slider update. `live` changes immediately, the preset badge
    /// clears immediately, and the full live vector is scheduled to commit
    /// once the burst goes quiet. Each update restarts the window.
    pub fn set_weight(&mut self, key: &str, value: f64, now: Instant) {
        self.live.insert(key.to_string(), value);
        self.active_preset = None;
        self.generation += 1;
        self.pending = Some(PendingCommit {
            deadline: now + self.debounce,
            generation: self.generation,
        });
    }

    /// Applies the pending debounced commit if its quiet period has
    /// elapsed and nothing superseded it. Returns true when a commit
    /// happened. Hosts call this from their tick/render loop.
    pub fn settle(&mut self, now: Instant) -> bool {
        let due = matches!(
            &self.pending,
            Some(p) if p.deadline <= now && p.generation == self.generation
        );
        if due {
            debug!("Committing debounced weight edit (gen {})", self.generation);
            self.commit();
        }
        due
    }

    /// Commits the in-flight edit immediately, skipping the quiet period.
    pub fn commit_edit(&mut self) {
        self.generation += 1;
        self.commit();
    }

    /// Discards the in-flight edit and any scheduled commit.
    pub fn cancel_edit(&mut self) {
        self.live = self.persisted.clone();
        self.generation += 1;
        self.pending = None;
        self.active_preset = self.detect_preset();
    }

    /// Bulk replacement from the preset table. Immediate and synchronous
    /// (a preset is one user decision, not streaming input); any pending
    /// debounced commit is superseded. Unknown names are a no-op.
    pub fn apply_preset(&mut self, name: &str) -> bool {
        let weights = match find_preset(&self.presets, name) {
            Some(p) => p.as_percentages(),
            None => {
                warn!("⚠️  Unknown preset '{}', ignoring", name);
                return false;
            }
        };
        self.live = weights.clone();
        self.persisted = weights;
        self.generation += 1;
        self.pending = None;
        self.active_preset = Some(name.to_string());
        self.persist();
        true
    }

    /// Bulk replacement with caller-supplied weights; the preset badge is
    /// cleared and re-derived from the new vector.
    pub fn replace_all(&mut self, weights: WeightVector) {
        self.live = weights.clone();
        self.persisted = weights;
        self.generation += 1;
        self.pending = None;
        self.active_preset = self.detect_preset();
        self.persist();
    }

    fn commit(&mut self) {
        self.persisted = self.live.clone();
        self.pending = None;
        self.active_preset = self.detect_preset();
        self.persist();
    }

    fn persist(&mut self) {
        match serde_json::to_string(&self.persisted) {
            Ok(payload) => self.store.save(STORAGE_KEY, &payload),
            Err(e) => warn!("⚠️  Could not serialize weights: {}", e),
        }
    }

    /// First preset whose scaled weights match `persisted` elementwise
    /// within tolerance, over the union of keys. None means "custom".
    fn detect_preset(&self) -> Option<String> {
        self.presets
            .iter()
            .find(|p| vectors_match(&p.as_percentages(), &self.persisted))
            .map(|p| p.name.clone())
    }
}

fn vectors_match(a: &WeightVector, b: &WeightVector) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().all(|(k, av)| match b.get(k) {
        Some(bv) => (av - bv).abs() <= PRESET_TOLERANCE,
        None => false,
    })
}
