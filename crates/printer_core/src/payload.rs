use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::TempPath;

/// Label payload on disk for the duration of one print call.
///
/// The file is removed when the value is dropped, so every exit path of the
/// caller cleans up. [`TransientPayload::remove`] reports removal errors.
#[derive(Debug)]
pub struct TransientPayload {
    path: TempPath,
}

impl TransientPayload {
    pub fn create(dir: &Path, item_id: &str, content: &str) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        let prefix = format!("{}-", file_stem(item_id));
        let mut file = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(".txt")
            .tempfile_in(dir)?;
        file.write_all(content.as_bytes())?;
        file.flush()?;
        Ok(Self {
            path: file.into_temp_path(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn remove(self) -> io::Result<()> {
        self.path.close()
    }
}

fn file_stem(item_id: &str) -> String {
    let stem: String = item_id
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
        .take(40)
        .collect();
    if stem.is_empty() {
        "label".to_string()
    } else {
        stem
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_lives_until_drop() {
        let dir = tempfile::tempdir().unwrap();
        let labels = dir.path().join("labels");
        let payload = TransientPayload::create(&labels, "ABC123", "^XA^XZ").unwrap();
        let path = payload.path().to_path_buf();
        assert_eq!(fs::read_to_string(&path).unwrap(), "^XA^XZ");
        assert!(path.file_name().unwrap().to_string_lossy().starts_with("ABC123-"));

        drop(payload);
        assert!(!path.exists());
    }

    #[test]
    fn unsafe_item_ids_are_stripped_from_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let payload = TransientPayload::create(dir.path(), "../..\\x", "").unwrap();
        assert_eq!(payload.path().parent(), Some(dir.path()));
        let path = payload.path().to_path_buf();
        payload.remove().unwrap();
        assert!(!path.exists());
    }
}
