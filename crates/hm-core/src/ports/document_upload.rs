use std::path::PathBuf;

use async_trait::async_trait;

use crate::registration::DocumentRef;

/// File offered by the user for verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub path: PathBuf,
    /// Media type reported by the picker, if it reported one.
    pub declared_type: Option<String>,
}

impl CandidateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            declared_type: None,
        }
    }
}

/// Document upload collaborator.
///
/// Returns only image or PDF files; no size or count limit is applied.
#[async_trait]
pub trait DocumentUploadPort: Send + Sync {
    async fn upload(&self, files: Vec<CandidateFile>) -> anyhow::Result<Vec<DocumentRef>>;
}
