use bytes::Bytes;

use super::MimeType;

/// Image bytes fetched for a message, with the type the server declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBlob {
    pub bytes: Bytes,
    pub mime: Option<MimeType>,
}

impl ImageBlob {
    pub fn new(bytes: impl Into<Bytes>, mime: Option<MimeType>) -> Self {
        Self {
            bytes: bytes.into(),
            mime,
        }
    }

    /// Key this blob is stored under inside a clipboard item.
    pub fn effective_mime(&self) -> MimeType {
        MimeType::normalize_image(self.mime.as_ref())
    }
}

/// Everything captured from one message root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionPayload {
    pub text: Option<String>,
    pub html: Option<String>,
    pub image_blobs: Vec<ImageBlob>,
}

impl ExtractionPayload {
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.html.is_none() && self.image_blobs.is_empty()
    }

    pub fn has_images(&self) -> bool {
        !self.image_blobs.is_empty()
    }
}
