//! Encoded image buffers.

use crate::images::ImageFormat;
use base64::Engine;
use bytes::Bytes;
use serde::{Serialize, Serializer};

/// Encoded bytes together with the format they are actually encoded in.
///
/// The encoding can differ from the record's decoded source format, e.g.
/// when full payloads are recompressed as JPEG.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payload {
    #[serde(serialize_with = "serialize_base64")]
    pub bytes: Bytes,
    pub encoding: ImageFormat,
}

impl Payload {
    pub fn new(bytes: impl Into<Bytes>, encoding: ImageFormat) -> Self {
        Self {
            bytes: bytes.into(),
            encoding,
        }
    }

    /// Opaque bytes of unknown encoding.
    pub fn opaque(bytes: impl Into<Bytes>) -> Self {
        Self::new(bytes, ImageFormat::Unknown)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    pub fn mime_type(&self) -> &'static str {
        self.encoding.mime_type()
    }

    #[inline]
    pub fn extension(&self) -> &'static str {
        self.encoding.extension()
    }

    /// Render as a `data:` URL.
    pub fn to_data_url(&self) -> String {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&self.bytes);
        format!("data:{};base64,{}", self.mime_type(), encoded)
    }
}

fn serialize_base64<S: Serializer>(bytes: &Bytes, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(bytes))
}
