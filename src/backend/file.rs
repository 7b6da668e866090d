//! ローカルファイルによるバックエンド実装
//!
//! <root>/tables/<table>.json にキー → 行のマップを保存し、
//! <root>/storage/<bucket>/<path> にアップロードされたファイルを置く。

use super::Backend;
use crate::error::{ResllError, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone)]
pub struct FileBackend {
    root: PathBuf,
}

type Table = BTreeMap<String, Value>;

impl FileBackend {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(root.join("tables"))?;
        std::fs::create_dir_all(root.join("storage"))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn table_path(&self, table: &str) -> Result<PathBuf> {
        validate_name(table)?;
        Ok(self.root.join("tables").join(format!("{}.json", table)))
    }

    fn object_path(&self, bucket: &str, path: &str) -> Result<PathBuf> {
        validate_name(bucket)?;
        let relative = Path::new(path);
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if path.is_empty() || !safe {
            return Err(ResllError::Backend(format!("不正なオブジェクトパス: {}", path)));
        }
        Ok(self.root.join("storage").join(bucket).join(relative))
    }

    fn load_table(&self, table: &str) -> Result<Table> {
        let path = self.table_path(table)?;
        if !path.exists() {
            return Ok(Table::new());
        }

        let reader = BufReader::new(File::open(&path)?);
        serde_json::from_reader(reader).map_err(|e| {
            ResllError::Backend(format!("テーブル読み込み失敗 {}: {}", path.display(), e))
        })
    }

    fn save_table(&self, table: &str, rows: &Table) -> Result<()> {
        let path = self.table_path(table)?;
        let tmp = path.with_extension("json.tmp");
        {
            let writer = BufWriter::new(File::create(&tmp)?);
            serde_json::to_writer_pretty(writer, rows)?;
        }
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<()> {
    let ok = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if ok {
        Ok(())
    } else {
        Err(ResllError::Backend(format!("不正なテーブル/バケット名: {}", name)))
    }
}

impl Backend for FileBackend {
    fn get(&self, table: &str, key: &str) -> Result<Option<Value>> {
        Ok(self.load_table(table)?.remove(key))
    }

    fn set(&self, table: &str, key: &str, row: Value) -> Result<()> {
        let mut rows = self.load_table(table)?;
        rows.insert(key.to_string(), row);
        self.save_table(table, &rows)
    }

    fn list(&self, table: &str) -> Result<Vec<Value>> {
        Ok(self.load_table(table)?.into_values().collect())
    }

    fn upload(&self, bucket: &str, path: &str, bytes: &[u8]) -> Result<()> {
        let dest = self.object_path(bucket, path)?;
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&dest, bytes)?;
        tracing::debug!("アップロード: {}", dest.display());
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        let full = self.root.join("storage").join(bucket).join(path);
        format!("file://{}", full.to_string_lossy().replace('\\', "/"))
    }
}
