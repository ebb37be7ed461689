use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Clipboard content type, e.g. `text/html`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MimeType(pub String);

impl MimeType {
    pub fn text_plain() -> Self {
        Self("text/plain".into())
    }

    pub fn text_html() -> Self {
        Self("text/html".into())
    }

    pub fn image_png() -> Self {
        Self("image/png".into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_image(&self) -> bool {
        self.0.starts_with("image/")
    }

    /// Effective clipboard key for an image blob.
    ///
    /// A missing type, or one that is not `image/*`, becomes `image/png`.
    pub fn normalize_image(declared: Option<&MimeType>) -> MimeType {
        match declared {
            Some(mime) if mime.is_image() => mime.clone(),
            _ => MimeType::image_png(),
        }
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MimeType {
    type Err = anyhow::Error;

    /// Parses a `Content-Type` style value, dropping parameters such as `charset`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let essence = s.split(';').next().unwrap_or_default().trim();
        anyhow::ensure!(!essence.is_empty(), "empty mime type");
        Ok(MimeType(essence.to_ascii_lowercase()))
    }
}
