use crate::errors::AppError;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Slot holding the saved message template.
pub const TEMPLATE_SLOT: &str = "template";
/// Slot holding the persisted sent-identifier list.
pub const SENT_SLOT: &str = "sent_ids";

/// Key/value persistence collaborator.
///
/// Two named slots are in use (`TEMPLATE_SLOT`, `SENT_SLOT`); the core
/// reads both at startup and writes each whenever its value changes.
pub trait StateStore {
    /// Reads a slot. `Ok(None)` means the slot was never written.
    fn get(&self, slot: &str) -> Result<Option<String>, AppError>;
    /// Writes a slot.
    fn put(&mut self, slot: &str, value: &str) -> Result<(), AppError>;
}

/// Wrapper for persisted slot payloads with integrity validation.
///
/// A SHA-256 checksum is stored alongside the payload; a mismatch on read
/// means the state file was edited or corrupted, and the slot is treated as
/// absent so the caller falls back to defaults.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SlotEnvelope {
    /// The slot payload.
    pub data: String,
    /// SHA-256 checksum of the payload (hex encoded).
    pub checksum: String,
}

impl SlotEnvelope {
    /// Seals a payload with its checksum.
    pub fn seal(data: String) -> Self {
        let checksum = Self::compute_checksum(&data);
        Self { data, checksum }
    }

    fn compute_checksum(data: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(data.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Whether the stored checksum still matches the payload.
    pub fn is_valid(&self) -> bool {
        Self::compute_checksum(&self.data) == self.checksum
    }

    /// Serializes the envelope for storage.
    pub fn serialize(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Deserializes and validates an envelope.
    ///
    /// Returns the payload when intact, `None` when the envelope is not
    /// valid JSON or the checksum does not match.
    pub fn open(serialized: &str) -> Option<String> {
        let envelope: SlotEnvelope = serde_json::from_str(serialized).ok()?;
        if envelope.is_valid() {
            Some(envelope.data)
        } else {
            tracing::warn!(
                "Persisted slot failed validation: checksum mismatch, payload length {}",
                envelope.data.len()
            );
            None
        }
    }
}

/// File-backed store: a single JSON object mapping slot names to sealed
/// payloads.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, AppError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(map) => Ok(map),
                Err(e) => {
                    // A corrupt state file behaves like an empty one
                    tracing::warn!("State file {} is malformed: {}", self.path.display(), e);
                    Ok(BTreeMap::new())
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

impl StateStore for JsonFileStore {
    fn get(&self, slot: &str) -> Result<Option<String>, AppError> {
        Ok(self.read_all()?.remove(slot))
    }

    fn put(&mut self, slot: &str, value: &str) -> Result<(), AppError> {
        let mut all = self.read_all()?;
        all.insert(slot.to_string(), value.to_string());
        let serialized = serde_json::to_string_pretty(&all)
            .map_err(|e| AppError::Internal(format!("failed to serialize state: {}", e)))?;
        std::fs::write(&self.path, serialized)?;
        Ok(())
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn get(&self, slot: &str) -> Result<Option<String>, AppError> {
        Ok(self.slots.get(slot).cloned())
    }

    fn put(&mut self, slot: &str, value: &str) -> Result<(), AppError> {
        self.slots.insert(slot.to_string(), value.to_string());
        Ok(())
    }
}

/// Loads the persisted template, falling back to `None` when the slot is
/// absent, tampered or unreadable. Malformed state is recovered silently.
pub fn load_template<S: StateStore>(store: &S) -> Option<String> {
    match store.get(TEMPLATE_SLOT) {
        Ok(Some(sealed)) => SlotEnvelope::open(&sealed),
        Ok(None) => None,
        Err(e) => {
            tracing::warn!("Failed to read template slot: {}", e);
            None
        }
    }
}

/// Loads the persisted sent set, falling back to empty on any failure.
pub fn load_sent_ids<S: StateStore>(store: &S) -> Vec<String> {
    let sealed = match store.get(SENT_SLOT) {
        Ok(Some(sealed)) => sealed,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::warn!("Failed to read sent-ids slot: {}", e);
            return Vec::new();
        }
    };
    let payload = match SlotEnvelope::open(&sealed) {
        Some(payload) => payload,
        None => return Vec::new(),
    };
    match serde_json::from_str(&payload) {
        Ok(ids) => ids,
        Err(e) => {
            tracing::warn!("Persisted sent set is malformed, starting empty: {}", e);
            Vec::new()
        }
    }
}

/// Persists the template slot.
pub fn save_template<S: StateStore>(store: &mut S, template: &str) -> Result<(), AppError> {
    store.put(
        TEMPLATE_SLOT,
        &SlotEnvelope::seal(template.to_string()).serialize(),
    )
}

/// Persists the sent set as an ordered list of identifiers.
pub fn save_sent_ids<S: StateStore>(store: &mut S, ids: &[String]) -> Result<(), AppError> {
    let payload = serde_json::to_string(ids)
        .map_err(|e| AppError::Internal(format!("failed to serialize sent ids: {}", e)))?;
    store.put(SENT_SLOT, &SlotEnvelope::seal(payload).serialize())
}
