//! Save file handling: one JSON-encoded session record per file.

use std::path::Path;

use colony_types::Record;
use tracing::info;

use crate::error::EngineError;

/// Load the session record at `path`, or `None` if there is no save yet.
///
/// # Errors
///
/// Returns [`EngineError`] if the file exists but cannot be read or parsed.
pub fn load(path: &Path) -> Result<Option<Record>, EngineError> {
    if !path.exists() {
        info!(path = %path.display(), "no save file, starting fresh");
        return Ok(None);
    }
    let text = std::fs::read_to_string(path)?;
    let record = Record::from_json(&text)?;
    info!(path = %path.display(), fields = record.len(), "save file loaded");
    Ok(Some(record))
}

/// Write `record` to `path`, replacing any previous save.
///
/// # Errors
///
/// Returns [`EngineError::Io`] if the file cannot be written.
pub fn store(path: &Path, record: &Record) -> Result<(), EngineError> {
    std::fs::write(path, record.to_json())?;
    info!(path = %path.display(), "save file written");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_a_fresh_start() {
        let path = std::env::temp_dir().join("colony-engine-no-such-save.json");
        assert!(load(&path).unwrap().is_none());
    }

    #[test]
    fn store_then_load() {
        let path = std::env::temp_dir().join(format!(
            "colony-engine-save-{}.json",
            std::process::id()
        ));
        let mut record = Record::new();
        record.put_int("population", 7);
        store(&path, &record).unwrap();
        let loaded = load(&path).unwrap().unwrap();
        assert_eq!(loaded.get_int("population"), 7);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn garbage_is_an_error() {
        let path = std::env::temp_dir().join(format!(
            "colony-engine-garbage-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(load(&path), Err(EngineError::Save { .. })));
        std::fs::remove_file(&path).unwrap();
    }
}
