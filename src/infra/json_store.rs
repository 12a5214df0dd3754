use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::model::catalog::Catalog;
use crate::domain::repository::{CatalogRepository, StoreError, StoreErrorKind};

#[derive(Debug, thiserror::Error)]
pub enum JsonStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt catalog data: {0}")]
    CorruptData(#[source] serde_json::Error),
    #[error("JSON encode error: {0}")]
    Encode(#[source] serde_json::Error),
}

impl StoreError for JsonStoreError {
    fn kind(&self) -> StoreErrorKind {
        match self {
            Self::CorruptData(_) => StoreErrorKind::CorruptData,
            Self::Io(_) | Self::Encode(_) => StoreErrorKind::Io,
        }
    }
}

/// JSONファイルによるCatalogRepository実装。
/// 1 Catalog = 1 JSONファイル（Bookオブジェクトの配列）。
pub struct JsonCatalogRepository {
    path: PathBuf,
}

impl JsonCatalogRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// 保存先と同じディレクトリの一時ファイル（`books.json` → `books.json.tmp`）。
/// 拡張子を置き換えないので、保存先自体が `*.tmp` でも衝突しない。
fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "catalog".into());
    name.push(".tmp");
    path.with_file_name(name)
}

/// 4スペースインデントで整形する。非ASCII文字はエスケープしない。
fn encode(catalog: &Catalog) -> Result<Vec<u8>, JsonStoreError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    catalog
        .serialize(&mut ser)
        .map_err(JsonStoreError::Encode)?;
    buf.push(b'\n');
    Ok(buf)
}

impl CatalogRepository for JsonCatalogRepository {
    type Error = JsonStoreError;

    fn load(&self) -> Result<Catalog, Self::Error> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "catalog file missing, starting empty");
            return Ok(Catalog::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        let catalog: Catalog = serde_json::from_str(&content).map_err(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "catalog file is corrupt");
            JsonStoreError::CorruptData(e)
        })?;
        tracing::debug!(path = %self.path.display(), books = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    fn save(&self, catalog: &Catalog) -> Result<(), Self::Error> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = encode(catalog)?;
        // 一時ファイルに書いてからrenameするので、失敗時も既存ファイルは壊れない
        let tmp = tmp_path(&self.path);
        let written =
            std::fs::write(&tmp, &content).and_then(|()| std::fs::rename(&tmp, &self.path));
        if let Err(e) = written {
            // 書き込み・renameのどちらで失敗しても一時ファイルは残さない
            let _ = std::fs::remove_file(&tmp);
            return Err(e.into());
        }
        tracing::debug!(path = %self.path.display(), books = catalog.len(), "catalog saved");
        Ok(())
    }
}
