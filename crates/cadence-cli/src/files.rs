//! JSON file reading and writing for imports, exports and backups.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};

/// Only `.json` files are accepted for imports.
fn require_json(path: &Path) -> Result<()> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if !is_json {
        bail!("Please select a JSON file: {}", path.display());
    }
    Ok(())
}

pub fn read_json_file(path: &Path) -> Result<String> {
    require_json(path)?;
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

pub fn write_json_file(path: &Path, contents: &str) -> Result<()> {
    require_json(path)?;
    write_text_file(path, contents)
}

pub fn write_text_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_rejects_non_json_extension() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("agenda.txt");
        fs::write(&path, "{}").unwrap();
        let err = read_json_file(&path).unwrap_err();
        assert!(err.to_string().contains("JSON file"));
    }

    #[test]
    fn test_write_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("team.JSON");
        write_json_file(&path, "[]").unwrap();
        assert_eq!(read_json_file(&path).unwrap(), "[]");
    }
}
