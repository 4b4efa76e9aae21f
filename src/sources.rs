use crate::errors::{AppError, ResultExt};
use crate::models::SourceProspect;
use std::path::{Path, PathBuf};

/// Collaborator supplying the source prospect list.
///
/// The core adapts and reads this data at load time; it never mutates or
/// writes it back.
pub trait ProspectSource {
    fn fetch(&self) -> Result<Vec<SourceProspect>, AppError>;
}

/// Source backed by a JSON file containing an array of source prospects.
#[derive(Debug)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ProspectSource for JsonFileSource {
    fn fetch(&self) -> Result<Vec<SourceProspect>, AppError> {
        let raw = std::fs::read_to_string(&self.path)
            .context(format!("reading prospects file {}", self.path.display()))?;
        let prospects: Vec<SourceProspect> = serde_json::from_str(&raw)
            .map_err(|e| AppError::MalformedState(format!("prospects file: {}", e)))?;
        tracing::info!(
            "Loaded {} prospects from {}",
            prospects.len(),
            self.path.display()
        );
        Ok(prospects)
    }
}

/// Fixed in-memory source, used in tests and demos.
#[derive(Debug, Default)]
pub struct StaticSource {
    prospects: Vec<SourceProspect>,
}

impl StaticSource {
    pub fn new(prospects: Vec<SourceProspect>) -> Self {
        Self { prospects }
    }
}

impl ProspectSource for StaticSource {
    fn fetch(&self) -> Result<Vec<SourceProspect>, AppError> {
        Ok(self.prospects.clone())
    }
}
