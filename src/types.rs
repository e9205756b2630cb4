//! Value types shared by the client, the scan session, and the collection.
//!
//! [`ImageBlob`] is the opaque image handle passed from capture to upload to
//! storage. It is reference-counted, so cloning a [`CardRecord`] (or taking a
//! collection snapshot) never copies pixel data.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::Arc;

/// Raw bytes of a captured card photo, in whatever raster format the
/// capture source produced.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageBlob(Arc<[u8]>);

impl ImageBlob {
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First 12 hex digits of the SHA-256 of the bytes.
    ///
    /// Used as the image's identity in logs and CLI output.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(&self.0);
        let hex = format!("{:x}", digest);
        hex[..12].to_string()
    }
}

impl From<Vec<u8>> for ImageBlob {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<&[u8]> for ImageBlob {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes)
    }
}

impl fmt::Debug for ImageBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImageBlob({} bytes", self.len())?;
        if !self.is_empty() {
            write!(f, ", {}", self.fingerprint())?;
        }
        write!(f, ")")
    }
}

/// Card metadata as reported by the recognition endpoint.
///
/// Every field is always populated: fields the server omitted hold the
/// `Unknown ...` placeholders from [`crate::recognition::response`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDetails {
    pub player_name: String,
    pub team_name: String,
    pub set_name: String,
    pub card_number: String,
}

/// One recognized trading card: its metadata plus the photo it came from.
///
/// Immutable once built. Fields are private so neither the session nor
/// the collection can be handed a record and change it afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRecord {
    details: CardDetails,
    image: ImageBlob,
}

impl CardRecord {
    pub fn new(details: CardDetails, image: ImageBlob) -> Self {
        Self { details, image }
    }

    pub fn details(&self) -> &CardDetails {
        &self.details
    }

    pub fn player_name(&self) -> &str {
        &self.details.player_name
    }

    pub fn team_name(&self) -> &str {
        &self.details.team_name
    }

    pub fn set_name(&self) -> &str {
        &self.details.set_name
    }

    pub fn card_number(&self) -> &str {
        &self.details.card_number
    }

    pub fn image(&self) -> &ImageBlob {
        &self.image
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blob_clone_shares_bytes() {
        let blob = ImageBlob::from(vec![1u8, 2, 3]);
        let copy = blob.clone();
        assert_eq!(blob.as_bytes().as_ptr(), copy.as_bytes().as_ptr());
        assert_eq!(copy.len(), 3);
    }

    #[test]
    fn fingerprint_is_stable_and_short() {
        let blob = ImageBlob::from(&b"hello world"[..]);
        // sha256("hello world") = b94d27b9934d...
        assert_eq!(blob.fingerprint(), "b94d27b9934d");
    }

    #[test]
    fn debug_omits_fingerprint_for_empty_blob() {
        let blob = ImageBlob::from(Vec::new());
        assert_eq!(format!("{blob:?}"), "ImageBlob(0 bytes)");
    }

    #[test]
    fn record_accessors_expose_details() {
        let record = CardRecord::new(
            CardDetails {
                player_name: "J. Doe".into(),
                team_name: "Bulls".into(),
                set_name: "1997 Topps".into(),
                card_number: "23".into(),
            },
            ImageBlob::from(vec![0xFF, 0xD8]),
        );
        assert_eq!(record.player_name(), "J. Doe");
        assert_eq!(record.team_name(), "Bulls");
        assert_eq!(record.set_name(), "1997 Topps");
        assert_eq!(record.card_number(), "23");
        assert_eq!(record.image().len(), 2);
    }
}
