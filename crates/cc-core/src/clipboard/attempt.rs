use bytes::Bytes;
use std::collections::HashSet;

use super::{ExtractionPayload, MimeType};

/// One representation inside a clipboard item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardPart {
    pub mime: MimeType,
    pub data: Bytes,
}

/// Which logical parts of a payload an attempt carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IncludedParts {
    pub text_included: bool,
    pub html_included: bool,
    pub images_included: usize,
}

/// A single candidate clipboard write: one item, one part per MIME type.
///
/// Never empty. [`ClipboardAttempt::build`] returns `None` instead of an
/// attempt without parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardAttempt {
    parts: Vec<ClipboardPart>,
    included: IncludedParts,
}

impl ClipboardAttempt {
    /// Builds an attempt from `payload`, optionally carrying its images.
    ///
    /// Images whose effective MIME type was already taken by an earlier
    /// image are skipped: a clipboard item holds one blob per key.
    pub fn build(payload: &ExtractionPayload, with_images: bool) -> Option<Self> {
        let mut parts = Vec::new();
        let mut seen: HashSet<MimeType> = HashSet::new();
        let mut included = IncludedParts::default();

        if let Some(text) = &payload.text {
            seen.insert(MimeType::text_plain());
            parts.push(ClipboardPart {
                mime: MimeType::text_plain(),
                data: Bytes::from(text.clone().into_bytes()),
            });
            included.text_included = true;
        }

        if let Some(html) = &payload.html {
            seen.insert(MimeType::text_html());
            parts.push(ClipboardPart {
                mime: MimeType::text_html(),
                data: Bytes::from(html.clone().into_bytes()),
            });
            included.html_included = true;
        }

        if with_images {
            for blob in &payload.image_blobs {
                let mime = blob.effective_mime();
                if !seen.insert(mime.clone()) {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(%mime, "skipping image with duplicate clipboard type");
                    continue;
                }
                parts.push(ClipboardPart {
                    mime,
                    data: blob.bytes.clone(),
                });
                included.images_included += 1;
            }
        }

        if parts.is_empty() {
            return None;
        }

        Some(Self { parts, included })
    }

    /// Parts in the order they are written.
    pub fn parts(&self) -> &[ClipboardPart] {
        &self.parts
    }

    /// Which kinds of content this attempt carries.
    pub fn included(&self) -> IncludedParts {
        self.included
    }

    /// The part stored under `mime`, if any.
    pub fn part(&self, mime: &MimeType) -> Option<&ClipboardPart> {
        self.parts.iter().find(|part| &part.mime == mime)
    }

    pub fn image_parts(&self) -> impl Iterator<Item = &ClipboardPart> {
        self.parts.iter().filter(|part| part.mime.is_image())
    }

    /// Consumes the attempt, for adapters that hand parts to a backend.
    pub fn into_parts(self) -> Vec<ClipboardPart> {
        self.parts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::ImageBlob;

    fn payload(text: Option<&str>, html: Option<&str>, images: Vec<ImageBlob>) -> ExtractionPayload {
        ExtractionPayload {
            text: text.map(str::to_string),
            html: html.map(str::to_string),
            image_blobs: images,
        }
    }

    #[test]
    fn empty_payload_builds_no_attempt() {
        assert!(ClipboardAttempt::build(&ExtractionPayload::default(), true).is_none());
    }

    #[test]
    fn images_only_payload_without_images_builds_no_attempt() {
        let p = payload(None, None, vec![ImageBlob::new(vec![1u8], None)]);
        assert!(ClipboardAttempt::build(&p, false).is_none());
        assert!(ClipboardAttempt::build(&p, true).is_some());
    }

    #[test]
    fn text_and_html_are_keyed_by_their_types() {
        let p = payload(Some("hi"), Some("<b>hi</b>"), vec![]);
        let attempt = ClipboardAttempt::build(&p, true).unwrap();

        assert_eq!(attempt.parts().len(), 2);
        assert_eq!(
            attempt.part(&MimeType::text_plain()).unwrap().data,
            Bytes::from_static(b"hi")
        );
        assert_eq!(
            attempt.part(&MimeType::text_html()).unwrap().data,
            Bytes::from_static(b"<b>hi</b>")
        );
        assert_eq!(
            attempt.included(),
            IncludedParts {
                text_included: true,
                html_included: true,
                images_included: 0
            }
        );
    }

    #[test]
    fn duplicate_image_types_keep_the_first_blob() {
        let p = payload(
            Some("hi"),
            None,
            vec![
                ImageBlob::new(vec![1u8], Some(MimeType("image/jpeg".into()))),
                ImageBlob::new(vec![2u8], Some(MimeType("image/jpeg".into()))),
                ImageBlob::new(vec![3u8], None),
                ImageBlob::new(vec![4u8], Some(MimeType("text/plain".into()))),
            ],
        );
        let attempt = ClipboardAttempt::build(&p, true).unwrap();

        let images: Vec<_> = attempt.image_parts().collect();
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].mime.as_str(), "image/jpeg");
        assert_eq!(images[0].data, Bytes::from_static(&[1]));
        assert_eq!(images[1].mime.as_str(), "image/png");
        assert_eq!(images[1].data, Bytes::from_static(&[3]));
        assert_eq!(attempt.included().images_included, 2);
    }
}
