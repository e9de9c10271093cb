//! Mirror into a folder on the local filesystem.

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, warn};

use inspect_core::{decode_photo, MirrorReceipt, INSPECTION_JSON_FILE};

use super::{DocumentSink, InspectionDocument, SinkError};

/// Writes mirror folders under `root` (`DATA_STORAGE_PATH/DATA_FOLDER_PATH`).
pub struct LocalFolderSink {
    root: PathBuf,
}

impl LocalFolderSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        LocalFolderSink { root: root.into() }
    }
}

#[async_trait]
impl DocumentSink for LocalFolderSink {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn store(&self, document: &InspectionDocument) -> Result<MirrorReceipt, SinkError> {
        let folder = self.root.join(document.folder_name());
        fs::create_dir_all(&folder).await?;

        let json_path = folder.join(INSPECTION_JSON_FILE);
        fs::write(&json_path, document.metadata_json()?).await?;
        debug!(path = %json_path.display(), "Wrote inspection metadata");

        let mut photos = BTreeMap::new();
        for (direction, payload) in document.photos.iter() {
            let bytes = match decode_photo(payload) {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!(direction = direction.key(), "Skipping photo: {}", e);
                    continue;
                }
            };

            let path = folder.join(direction.file_name());
            if let Err(e) = fs::write(&path, bytes).await {
                warn!(direction = direction.key(), "Failed to write photo: {}", e);
                continue;
            }
            photos.insert(direction.key().to_string(), path.display().to_string());
        }

        Ok(MirrorReceipt {
            folder_path: folder.display().to_string(),
            json_file: INSPECTION_JSON_FILE.to_string(),
            photos,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use inspect_core::InspectionPhotos;

    fn document(photos: InspectionPhotos) -> InspectionDocument {
        InspectionDocument {
            product_name: "91958CU810JW007".to_string(),
            inspector: "Kim".to_string(),
            notes: "Scratch on the back".to_string(),
            photos,
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_writes_metadata_and_photos() {
        let dir = tempfile::tempdir().unwrap();
        let sink = LocalFolderSink::new(dir.path().join("InspectionData"));

        let doc = document(InspectionPhotos {
            front: Some("data:image/jpeg;base64,aGVsbG8=".to_string()),
            left: Some("d29ybGQ=".to_string()),
            ..Default::default()
        });
        let receipt = sink.store(&doc).await.unwrap();

        let folder = PathBuf::from(&receipt.folder_path);
        assert!(folder.ends_with(doc.folder_name()));

        assert_eq!(receipt.json_file, "inspection-data.json");
        let json: serde_json::Value =
            serde_json::from_slice(&std::fs::read(folder.join(&receipt.json_file)).unwrap()).unwrap();
        assert_eq!(json["productName"], "91958CU810JW007");
        assert_eq!(json["notes"], "Scratch on the back");

        assert_eq!(std::fs::read(folder.join("정면.jpg")).unwrap(), b"hello");
        assert_eq!(std::fs::read(folder.join("좌측.jpg")).unwrap(), b"world");
        assert!(!folder.join("후면.jpg").exists());
        assert_eq!(
            receipt.photos.keys().collect::<Vec<_>>(),
            vec!["front", "left"]
        );
    }

    #[tokio::test]
    async fn test_bad_photo_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let sink = LocalFolderSink::new(dir.path());

        let doc = document(InspectionPhotos {
            front: Some("not base64 at all!".to_string()),
            back: Some("aGVsbG8=".to_string()),
            ..Default::default()
        });
        let receipt = sink.store(&doc).await.unwrap();

        assert!(!receipt.photos.contains_key("front"));
        assert!(receipt.photos.contains_key("back"));
    }
}
