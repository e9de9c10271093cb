//! # Inspection Photos
//!
//! The four-direction photo set captured for every inspection, and decoding
//! of the base64 payloads the web client sends.
//!
//! ## Payload Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Camera frame (canvas.toDataURL)                                        │
//! │                                                                         │
//! │   "data:image/jpeg;base64,/9j/4AAQSkZJRgABAQ..."                       │
//! │    └──── optional prefix ────┘└──── standard base64 ────┘               │
//! │                                                                         │
//! │  decode_photo() strips the prefix (any image kind) and decodes.         │
//! │  Raw base64 without a prefix is accepted as-is.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Photo Direction
// =============================================================================

/// Side of the product a photo was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum PhotoDirection {
    Front,
    Back,
    Left,
    Right,
}

impl PhotoDirection {
    /// All directions in capture order.
    pub const ALL: [PhotoDirection; 4] = [
        PhotoDirection::Front,
        PhotoDirection::Back,
        PhotoDirection::Left,
        PhotoDirection::Right,
    ];

    /// Key used in JSON bodies and mirror receipts.
    pub fn key(self) -> &'static str {
        match self {
            PhotoDirection::Front => "front",
            PhotoDirection::Back => "back",
            PhotoDirection::Left => "left",
            PhotoDirection::Right => "right",
        }
    }

    /// Label shown to inspectors (정면 / 후면 / 좌측 / 우측).
    pub fn label(self) -> &'static str {
        match self {
            PhotoDirection::Front => "정면",
            PhotoDirection::Back => "후면",
            PhotoDirection::Left => "좌측",
            PhotoDirection::Right => "우측",
        }
    }

    /// Attachment file name inside a mirror folder: `<label>.jpg`.
    pub fn file_name(self) -> &'static str {
        match self {
            PhotoDirection::Front => "정면.jpg",
            PhotoDirection::Back => "후면.jpg",
            PhotoDirection::Left => "좌측.jpg",
            PhotoDirection::Right => "우측.jpg",
        }
    }
}

// =============================================================================
// Inspection Photos
// =============================================================================

/// Up to four base64 photo payloads. Missing sides are `null` in JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InspectionPhotos {
    #[serde(default)]
    pub front: Option<String>,
    #[serde(default)]
    pub back: Option<String>,
    #[serde(default)]
    pub left: Option<String>,
    #[serde(default)]
    pub right: Option<String>,
}

impl InspectionPhotos {
    /// Payload for one direction, if present and non-empty.
    pub fn get(&self, direction: PhotoDirection) -> Option<&str> {
        let slot = match direction {
            PhotoDirection::Front => &self.front,
            PhotoDirection::Back => &self.back,
            PhotoDirection::Left => &self.left,
            PhotoDirection::Right => &self.right,
        };
        slot.as_deref().filter(|payload| !payload.is_empty())
    }

    /// Present photos in the order front, back, left, right.
    pub fn iter(&self) -> impl Iterator<Item = (PhotoDirection, &str)> + '_ {
        PhotoDirection::ALL
            .into_iter()
            .filter_map(move |direction| self.get(direction).map(|payload| (direction, payload)))
    }

    /// Number of photos present.
    pub fn count(&self) -> usize {
        self.iter().count()
    }
}

// =============================================================================
// Decoding
// =============================================================================

/// Removes a leading `data:image/<kind>;base64,` if present.
fn strip_data_url(payload: &str) -> &str {
    let Some(rest) = payload.strip_prefix("data:image/") else {
        return payload;
    };
    let Some((kind, data)) = rest.split_once(";base64,") else {
        return payload;
    };

    let valid_kind =
        !kind.is_empty() && kind.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid_kind {
        data
    } else {
        payload
    }
}

/// Decodes a photo payload into raw image bytes.
///
/// ## Example
/// ```rust
/// use inspect_core::photo::decode_photo;
///
/// assert_eq!(decode_photo("data:image/jpeg;base64,aGk=").unwrap(), b"hi");
/// assert_eq!(decode_photo("aGk=").unwrap(), b"hi");
/// assert!(decode_photo("not base64!").is_err());
/// ```
pub fn decode_photo(payload: &str) -> Result<Vec<u8>, ValidationError> {
    let data = strip_data_url(payload.trim());

    if data.is_empty() {
        return Err(ValidationError::Required {
            field: "photo".to_string(),
        });
    }

    STANDARD
        .decode(data)
        .map_err(|e| ValidationError::InvalidFormat {
            field: "photo".to_string(),
            reason: e.to_string(),
        })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_with_and_without_prefix() {
        assert_eq!(decode_photo("data:image/png;base64,aGVsbG8=").unwrap(), b"hello");
        assert_eq!(decode_photo("aGVsbG8=").unwrap(), b"hello");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_photo("@@@"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            decode_photo("data:image/jpeg;base64,"),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_non_image_prefix_is_not_stripped() {
        assert_eq!(strip_data_url("data:text/plain;base64,aGk="), "data:text/plain;base64,aGk=");
        assert_eq!(strip_data_url("data:image/;base64,aGk="), "data:image/;base64,aGk=");
    }

    #[test]
    fn test_iter_order_and_skips() {
        let photos = InspectionPhotos {
            front: None,
            back: Some("b".to_string()),
            left: Some(String::new()),
            right: Some("r".to_string()),
        };

        let present: Vec<_> = photos.iter().collect();
        assert_eq!(
            present,
            vec![(PhotoDirection::Back, "b"), (PhotoDirection::Right, "r")]
        );
        assert_eq!(photos.count(), 2);
    }

    #[test]
    fn test_photos_json_accepts_nulls_and_missing() {
        let photos: InspectionPhotos =
            serde_json::from_str(r#"{"front":"f","back":null}"#).unwrap();
        assert_eq!(photos.front.as_deref(), Some("f"));
        assert!(photos.back.is_none());
        assert!(photos.right.is_none());
    }

    #[test]
    fn test_direction_names() {
        assert_eq!(PhotoDirection::Left.key(), "left");
        assert_eq!(PhotoDirection::Left.file_name(), "좌측.jpg");
        for direction in PhotoDirection::ALL {
            assert_eq!(direction.file_name(), format!("{}.jpg", direction.label()));
        }
        assert_eq!(PhotoDirection::Front.file_name(), "정면.jpg");
        assert_eq!(PhotoDirection::Back.file_name(), "후면.jpg");
        assert_eq!(PhotoDirection::Right.file_name(), "우측.jpg");
        assert_eq!(serde_json::to_string(&PhotoDirection::Front).unwrap(), "\"front\"");
    }
}
