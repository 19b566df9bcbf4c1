//! Asset store – uploaded fonts and logos.
//!
//! The designer only consumes the identifiers returned here: a font
//! filename for `invoice_custom_font_name` and a logo URL for
//! `invoice_logo_url`.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::fonts::FontFormat;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontUpload {
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoUpload {
    pub url: String,
}

#[async_trait]
pub trait AssetStore: Send + Sync {
    async fn upload_font(&self, filename: &str, bytes: Vec<u8>) -> Result<FontUpload>;
    async fn upload_logo(&self, filename: &str, bytes: Vec<u8>) -> Result<LogoUpload>;
    /// Uploaded font filenames, sorted.
    async fn list_fonts(&self) -> Result<Vec<String>>;
    /// Bytes of an uploaded font, used to register it for printing.
    async fn font_bytes(&self, filename: &str) -> Result<Vec<u8>>;
}

/// Strip any directory components a client may have sent.
fn sanitize(filename: &str) -> Result<String> {
    let name = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or("")
        .trim();
    if name.is_empty() || name == "." || name == ".." {
        return Err(Error::Upload(format!("invalid filename {filename:?}")));
    }
    Ok(name.to_string())
}

/// Keeps uploads in memory.
pub struct MemoryAssetStore {
    fonts: RwLock<BTreeMap<String, Vec<u8>>>,
    logos: RwLock<BTreeMap<String, Vec<u8>>>,
    offline: AtomicBool,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        Self {
            fonts: RwLock::new(BTreeMap::new()),
            logos: RwLock::new(BTreeMap::new()),
            offline: AtomicBool::new(false),
        }
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(Error::Upload("asset store unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

impl Default for MemoryAssetStore {
    fn default() -> Self {
        Self::new()
    }
}

fn lock_err<T>(e: std::sync::PoisonError<T>) -> Error {
    Error::Upload(format!("Lock: {e}"))
}

#[async_trait]
impl AssetStore for MemoryAssetStore {
    async fn upload_font(&self, filename: &str, bytes: Vec<u8>) -> Result<FontUpload> {
        self.check_online()?;
        let filename = sanitize(filename)?;
        if bytes.is_empty() {
            return Err(Error::Upload(format!("{filename} is empty")));
        }
        if FontFormat::detect(&filename, &bytes).is_none() {
            return Err(Error::Upload(format!("{filename} is not a supported font")));
        }
        self.fonts
            .write()
            .map_err(lock_err)?
            .insert(filename.clone(), bytes);
        log::info!("uploaded font {filename}");
        Ok(FontUpload { filename })
    }

    async fn upload_logo(&self, filename: &str, bytes: Vec<u8>) -> Result<LogoUpload> {
        self.check_online()?;
        let filename = sanitize(filename)?;
        if bytes.is_empty() {
            return Err(Error::Upload(format!("{filename} is empty")));
        }
        let url = format!("/uploads/logos/{filename}");
        self.logos.write().map_err(lock_err)?.insert(filename, bytes);
        log::info!("uploaded logo {url}");
        Ok(LogoUpload { url })
    }

    async fn list_fonts(&self) -> Result<Vec<String>> {
        self.check_online()?;
        Ok(self.fonts.read().map_err(lock_err)?.keys().cloned().collect())
    }

    async fn font_bytes(&self, filename: &str) -> Result<Vec<u8>> {
        self.check_online()?;
        self.fonts
            .read()
            .map_err(lock_err)?
            .get(filename)
            .cloned()
            .ok_or_else(|| Error::Upload(format!("font {filename} not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn logo_url_uses_upload_path() {
        let store = MemoryAssetStore::new();
        let logo = store.upload_logo("shop.png", vec![1, 2, 3]).await.unwrap();
        assert_eq!(logo.url, "/uploads/logos/shop.png");
    }

    #[tokio::test]
    async fn font_upload_strips_directories() {
        let store = MemoryAssetStore::new();
        let font = store
            .upload_font("C:\\fonts\\Brand.woff2", b"wOF2rest".to_vec())
            .await
            .unwrap();
        assert_eq!(font.filename, "Brand.woff2");
        assert_eq!(store.list_fonts().await.unwrap(), vec!["Brand.woff2"]);
        assert_eq!(store.font_bytes("Brand.woff2").await.unwrap(), b"wOF2rest");
    }

    #[tokio::test]
    async fn rejects_non_fonts() {
        let store = MemoryAssetStore::new();
        let err = store.upload_font("notes.txt", b"hello".to_vec()).await;
        assert!(matches!(err, Err(Error::Upload(_))));
        assert!(matches!(store.upload_logo("..", vec![1]).await, Err(Error::Upload(_))));
    }
}
