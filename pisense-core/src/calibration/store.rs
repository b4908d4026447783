//! Durable baseline storage
//!
//! One JSON document holds every baseline ever saved, keyed by serial.
//! Loading is forgiving: a missing file, broken JSON, an unknown serial or a
//! malformed entry all mean "no stored baseline", which is an ordinary
//! cold start. Saving is strict and atomic.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde_json::{Map, Value};
use tempfile::NamedTempFile;

use super::{Baseline, SensorIdentity};
use crate::errors::StoreError;

type Document = Map<String, Value>;

/// File-backed mapping from sensor serial to baseline
#[derive(Debug, Clone)]
pub struct CalibrationStore {
    path: PathBuf,
}

impl CalibrationStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored baseline for this sensor, if there is a valid one
    pub fn load(&self, identity: &SensorIdentity) -> Option<Baseline> {
        let document = self.read_document()?;

        let Some(entry) = document.get(identity.as_str()) else {
            debug!("No stored baseline for sensor {}", identity);
            return None;
        };

        match serde_json::from_value::<Baseline>(entry.clone()) {
            Ok(baseline) => Some(baseline),
            Err(e) => {
                warn!("Stored baseline for sensor {} is invalid: {}", identity, e);
                None
            }
        }
    }

    /// Every valid baseline in the store
    pub fn entries(&self) -> BTreeMap<SensorIdentity, Baseline> {
        self.read_document()
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(serial, entry)| {
                serde_json::from_value(entry)
                    .ok()
                    .map(|baseline| (SensorIdentity::from(serial), baseline))
            })
            .collect()
    }

    /// Save a baseline, rewriting the whole document
    ///
    /// Entries for other serials are carried over untouched. The new
    /// document is fully written and synced to a temp file next to the
    /// store before it replaces the old one.
    pub fn save(&self, identity: &SensorIdentity, baseline: &Baseline) -> Result<(), StoreError> {
        let mut document = self.read_document().unwrap_or_default();
        document.insert(identity.as_str().to_owned(), serde_json::to_value(baseline)?);

        let staged = self.stage(&document)?;
        staged.persist(&self.path)?;

        info!(
            "Saved baseline for sensor {} (primary:{} secondary:{})",
            identity, baseline.baseline_primary, baseline.baseline_secondary
        );
        Ok(())
    }

    /// Write a document to a synced temp file in the store's directory
    fn stage(&self, document: &Document) -> Result<NamedTempFile, StoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut staged = tempfile::Builder::new()
            .prefix(".calibration")
            .suffix(".tmp")
            .tempfile_in(dir)?;
        serde_json::to_writer_pretty(&mut staged, document)?;
        staged.as_file().sync_all()?;

        Ok(staged)
    }

    fn read_document(&self) -> Option<Document> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No calibration store at {}", self.path.display());
                return None;
            }
            Err(e) => {
                warn!("Calibration store {} unreadable: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_str::<Document>(&content) {
            Ok(document) => Some(document),
            Err(e) => {
                warn!("Calibration store {} is invalid: {}", self.path.display(), e);
                None
            }
        }
    }
}
