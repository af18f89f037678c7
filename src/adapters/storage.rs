use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// 本機檔案儲存；附加模式的檔案在整個執行期間保持開啟
#[derive(Debug, Default)]
pub struct LocalStorage {
    appenders: HashMap<PathBuf, File>,
}

impl LocalStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

impl Storage for LocalStorage {
    async fn read_to_string(&self, path: &str) -> Result<Option<String>> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn append_line(&mut self, path: &str, line: &str) -> Result<()> {
        let key = PathBuf::from(path);
        if !self.appenders.contains_key(&key) {
            ensure_parent(&key)?;
            let file = OpenOptions::new().create(true).append(true).open(&key)?;
            self.appenders.insert(key.clone(), file);
        }

        if let Some(file) = self.appenders.get_mut(&key) {
            writeln!(file, "{}", line)?;
            file.flush()?;
        }
        Ok(())
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(path);
        ensure_parent(full_path)?;
        fs::write(full_path, data)?;
        Ok(())
    }
}
