//! JSONL trail writer.
//!
//! Appends [`TrailEvent`] records to per-session `{trail_dir}/{session_id}.jsonl`
//! files with `serde_jsonlines::append_json_lines`.

use std::path::{Path, PathBuf};

use chrono::Utc;
use whys_core::events::{EngineEvent, TrailEvent};
use whys_engine::EventSink;

use crate::error::DatabaseError;

/// Writes engine events to the trail. Registered on the engine as an
/// [`EventSink`].
pub struct TrailWriter {
    trail_dir: PathBuf,
    enabled: bool,
}

impl TrailWriter {
    /// Create a writer for `trail_dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the directory cannot be created.
    pub fn new(trail_dir: PathBuf) -> Result<Self, DatabaseError> {
        std::fs::create_dir_all(&trail_dir).map_err(|e| DatabaseError::Other(e.into()))?;
        Ok(Self {
            trail_dir,
            enabled: true,
        })
    }

    /// A writer that drops everything (`[store] trail = false`, ephemeral runs).
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            trail_dir: PathBuf::new(),
            enabled: false,
        }
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub fn trail_dir(&self) -> &Path {
        &self.trail_dir
    }

    fn path_for(&self, session_id: &str) -> PathBuf {
        self.trail_dir.join(format!("{session_id}.jsonl"))
    }

    /// Append one event to its session's file.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the file write fails.
    pub fn append(&self, entry: &TrailEvent) -> Result<(), DatabaseError> {
        if !self.enabled {
            return Ok(());
        }
        serde_jsonlines::append_json_lines(self.path_for(&entry.ses), [entry])
            .map_err(|e| DatabaseError::Other(e.into()))?;
        Ok(())
    }

    /// Read a session's trail back in order. A session with no file has an
    /// empty trail.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the file cannot be read or a line does not
    /// parse.
    pub fn read(&self, session_id: &str) -> Result<Vec<TrailEvent>, DatabaseError> {
        let path = self.path_for(session_id);
        if !self.enabled || !path.exists() {
            return Ok(Vec::new());
        }
        serde_jsonlines::json_lines(&path)
            .map_err(|e| DatabaseError::Other(e.into()))?
            .collect::<std::io::Result<Vec<TrailEvent>>>()
            .map_err(|e| DatabaseError::Query(format!("bad trail line in {}: {e}", path.display())))
    }
}

impl EventSink for TrailWriter {
    fn record(&self, event: &EngineEvent) {
        let entry = TrailEvent::new(event.clone(), Utc::now());
        if let Err(e) = self.append(&entry) {
            tracing::warn!(session = %entry.ses, error = %e, "trail: append failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use whys_core::events::Signals;

    fn classified(session_id: &str, step: usize) -> EngineEvent {
        EngineEvent::Classified {
            session_id: session_id.into(),
            step,
            signals: Signals::default(),
        }
    }

    #[test]
    fn appends_one_line_per_event_per_session() {
        let dir = tempfile::tempdir().unwrap();
        let writer = TrailWriter::new(dir.path().join("trail")).unwrap();

        writer.record(&classified("rca-00000001", 1));
        writer.record(&classified("rca-00000001", 2));
        writer.record(&classified("rca-00000002", 1));

        let first = writer.read("rca-00000001").unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].v, 1);
        assert_eq!(first[1].event, classified("rca-00000001", 2));
        assert_eq!(writer.read("rca-00000002").unwrap().len(), 1);

        let raw = std::fs::read_to_string(dir.path().join("trail/rca-00000001.jsonl")).unwrap();
        assert_eq!(raw.lines().count(), 2);
    }

    #[test]
    fn disabled_writer_writes_nothing() {
        let writer = TrailWriter::disabled();
        assert!(!writer.is_enabled());
        writer.record(&classified("rca-00000001", 1));
        assert!(writer.read("rca-00000001").unwrap().is_empty());
    }

    #[test]
    fn missing_trail_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let writer = TrailWriter::new(dir.path().to_path_buf()).unwrap();
        assert!(writer.read("rca-none").unwrap().is_empty());
    }

    #[test]
    fn old_lines_without_version_default_to_one() {
        let dir = tempfile::tempdir().unwrap();
        let writer = TrailWriter::new(dir.path().to_path_buf()).unwrap();
        let mut value = serde_json::to_value(TrailEvent::new(
            classified("rca-00000001", 1),
            Utc::now(),
        ))
        .unwrap();
        value.as_object_mut().unwrap().remove("v");
        std::fs::write(
            dir.path().join("rca-00000001.jsonl"),
            format!("{value}\n"),
        )
        .unwrap();

        let events = writer.read("rca-00000001").unwrap();
        assert_eq!(events[0].v, 1);
    }
}
