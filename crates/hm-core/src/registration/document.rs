use serde::{Deserialize, Serialize};

/// Media types the verification step accepts: any image, or PDF.
pub fn is_accepted_media_type(media_type: &str) -> bool {
    let media_type = media_type.trim().to_ascii_lowercase();
    media_type.starts_with("image/") || media_type == "application/pdf"
}

/// Reference to an uploaded verification document.
///
/// The upload itself is done by the document collaborator; the flow only keeps the
/// reference it returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    /// Display name (usually the file name).
    pub name: String,
    /// Location the collaborator resolved the file to.
    pub uri: String,
    pub media_type: String,
}

impl DocumentRef {
    pub fn new(
        name: impl Into<String>,
        uri: impl Into<String>,
        media_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            uri: uri.into(),
            media_type: media_type.into(),
        }
    }

    pub fn is_accepted(&self) -> bool {
        is_accepted_media_type(&self.media_type)
    }
}
