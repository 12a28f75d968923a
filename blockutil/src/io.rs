use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Read and parse a JSON document. Missing files and malformed JSON are both errors that name
/// the path.
pub fn read_json<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let path = path.as_ref();
    let contents = fs_err::read_to_string(path)?;
    let obj = serde_json::from_str(&contents)
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(obj)
}

/// Write compact JSON, creating parent directories as needed.
pub fn write_json<T: Serialize, P: AsRef<Path>>(path: P, obj: &T) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs_err::create_dir_all(parent)?;
        }
    }
    let mut file = fs_err::File::create(path)?;
    file.write_all(serde_json::to_string(obj)?.as_bytes())?;
    info!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_malformed_files() {
        let dir = std::env::temp_dir().join("blockutil_io_test");
        let good = dir.join("nested/good.json");
        write_json(&good, &vec![1, 2, 3]).unwrap();
        let back: Vec<usize> = read_json(&good).unwrap();
        assert_eq!(back, vec![1, 2, 3]);

        let bad = dir.join("bad.json");
        fs_err::write(&bad, "{ not json").unwrap();
        let err = read_json::<Vec<usize>, _>(&bad).unwrap_err();
        assert!(format!("{:#}", err).contains("bad.json"));

        assert!(read_json::<Vec<usize>, _>(dir.join("missing.json")).is_err());
    }
}
