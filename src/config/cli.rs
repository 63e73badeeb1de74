use crate::core::Storage;
use crate::utils::error::Result;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        // join() passes absolute paths through untouched, so source images
        // anywhere on disk resolve while relative names land in base_path.
        let full_path = Path::new(&self.base_path).join(path);
        let data = fs::read(full_path)?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write to a temp sibling and rename, so a failed job never leaves a
        // partially-written destination behind.
        let file_name = full_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let tmp_path = full_path.with_file_name(format!("{}.tmp", file_name));
        fs::write(&tmp_path, data)?;
        if let Err(e) = fs::rename(&tmp_path, &full_path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        Ok(())
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        Ok(Path::new(&self.base_path).join(path).exists())
    }
}
