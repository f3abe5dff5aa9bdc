//! Local filesystem storage implementation.
//!
//! ## Storage Layout
//!
//! ```text
//! {root}/
//! ├── config.toml                    # Toolkit configuration
//! ├── keywords.csv                   # Harvested keywords (one line)
//! ├── keywords_general.csv           # Top informational keywords
//! ├── golden_keywords.csv            # Golden informational keywords
//! ├── golden_shopping_keywords.csv   # Golden shopping keywords
//! ├── products_seed.csv              # keyword,product_name,raw_url,pros,cons
//! └── products_seed.resolved.csv     # seed columns + deeplink
//! ```

use std::collections::HashSet;
use std::path::PathBuf;

use serde::{Serialize, de::DeserializeOwned};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};

/// Header of single-column keyword files.
pub const KEYWORD_HEADER: &str = "keyword";

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Get the full path for a relative key.
    pub fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    pub async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(key);
        self.ensure_dir(&path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Read bytes, returning None if file doesn't exist.
    pub async fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Read a comma-separated keyword line.
    ///
    /// Fields are trimmed; blanks and exact duplicates are dropped. A missing
    /// file reads as no keywords.
    pub async fn read_keyword_line(&self, key: &str) -> Result<Vec<String>> {
        let Some(bytes) = self.read_bytes(key).await? else {
            return Ok(Vec::new());
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(bytes.as_slice());

        let mut seen = HashSet::new();
        let mut keywords = Vec::new();
        for record in reader.records() {
            for field in record?.iter() {
                let field = field.trim_start_matches('\u{feff}').trim();
                if !field.is_empty() && seen.insert(field.to_string()) {
                    keywords.push(field.to_string());
                }
            }
        }
        Ok(keywords)
    }

    /// Write a single `keyword` column file.
    pub async fn write_keyword_csv(&self, key: &str, keywords: &[String]) -> Result<()> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record([KEYWORD_HEADER])?;
        for keyword in keywords {
            writer.write_record([keyword])?;
        }
        let bytes = writer.into_inner().map_err(|e| AppError::Io(e.into_error()))?;
        self.write_bytes(key, &bytes).await
    }

    /// Read CSV rows with a header line.
    pub async fn read_csv<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        let bytes = self
            .read_bytes(key)
            .await?
            .ok_or_else(|| AppError::config(format!("{} not found", self.path(key).display())))?;

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(bytes.as_slice());
        let mut rows = Vec::new();
        for row in reader.deserialize() {
            rows.push(row?);
        }
        Ok(rows)
    }

    /// Write CSV rows under an explicit header, even when `rows` is empty.
    pub async fn write_csv<T: Serialize>(&self, key: &str, header: &[&str], rows: &[T]) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        writer.write_record(header)?;
        for row in rows {
            writer.serialize(row)?;
        }
        let bytes = writer.into_inner().map_err(|e| AppError::Io(e.into_error()))?;
        self.write_bytes(key, &bytes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SeedRow;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_and_read() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        storage.write_bytes("nested/test.txt", b"hello").await.unwrap();
        let data = storage.read_bytes("nested/test.txt").await.unwrap();
        assert_eq!(data, Some(b"hello".to_vec()));
        assert!(!storage.path("nested/test.tmp").exists());
    }

    #[tokio::test]
    async fn test_read_nonexistent() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        assert!(storage.read_bytes("nope.txt").await.unwrap().is_none());
        assert!(storage.read_keyword_line("nope.csv").await.unwrap().is_empty());
        assert!(storage.read_csv::<SeedRow>("nope.csv").await.is_err());
    }

    #[tokio::test]
    async fn test_keyword_line_trimmed_and_deduped() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());
        storage
            .write_bytes("keywords.csv", "\u{feff}에어프라이어 추천, 가계부, ,가계부,\"삼성 TV, QN90\"\n".as_bytes())
            .await
            .unwrap();

        let keywords = storage.read_keyword_line("keywords.csv").await.unwrap();
        assert_eq!(keywords, vec!["에어프라이어 추천", "가계부", "삼성 TV, QN90"]);
    }

    #[tokio::test]
    async fn test_keyword_csv_layout() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());
        storage
            .write_keyword_csv("golden_keywords.csv", &["가계부".to_string(), "a,b".to_string()])
            .await
            .unwrap();

        let text = std::fs::read_to_string(storage.path("golden_keywords.csv")).unwrap();
        assert_eq!(text, "keyword\n가계부\n\"a,b\"\n");
    }

    #[tokio::test]
    async fn test_seed_rows_round_trip_with_header() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());
        storage
            .write_bytes(
                "products_seed.csv",
                b"keyword,product_name,raw_url,pros,cons\nfryer,Fryer 5L,https://www.coupang.com/vp/products/1,big,loud\n",
            )
            .await
            .unwrap();

        let rows: Vec<SeedRow> = storage.read_csv("products_seed.csv").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].raw_url, "https://www.coupang.com/vp/products/1");
        assert_eq!(rows[0].cons, "loud");

        let header = ["keyword", "product_name", "raw_url", "pros", "cons"];
        storage.write_csv("empty.csv", &header, &Vec::<SeedRow>::new()).await.unwrap();
        let text = std::fs::read_to_string(storage.path("empty.csv")).unwrap();
        assert_eq!(text, "keyword,product_name,raw_url,pros,cons\n");
    }
}
