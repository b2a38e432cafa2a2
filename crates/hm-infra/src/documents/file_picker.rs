use std::path::Path;

use anyhow::Context;
use tokio::io::AsyncReadExt;
use tracing::{debug, info, warn};

use hm_core::ports::{CandidateFile, DocumentUploadPort};
use hm_core::registration::{is_accepted_media_type, DocumentRef};

const PDF_MAGIC: &[u8] = b"%PDF-";
const SNIFF_LEN: usize = 32;
const UNKNOWN_MEDIA_TYPE: &str = "application/octet-stream";

/// Document collaborator for files on the local disk.
///
/// The media type the picker declared wins; otherwise it is sniffed from the file
/// header. Anything that is neither an image nor a PDF is dropped, and so is a file
/// that cannot be read.
#[derive(Debug, Default, Clone)]
pub struct LocalDocumentPicker;

impl LocalDocumentPicker {
    pub fn new() -> Self {
        Self
    }

    async fn media_type_of(file: &CandidateFile) -> anyhow::Result<String> {
        if let Some(declared) = file
            .declared_type
            .as_deref()
            .map(str::trim)
            .filter(|declared| !declared.is_empty())
        {
            return Ok(declared.to_ascii_lowercase());
        }

        let header = read_header(&file.path).await?;
        Ok(sniff_media_type(&header).to_string())
    }
}

async fn read_header(path: &Path) -> anyhow::Result<Vec<u8>> {
    let file = tokio::fs::File::open(path)
        .await
        .with_context(|| format!("failed to open document {}", path.display()))?;
    let mut header = Vec::with_capacity(SNIFF_LEN);
    file.take(SNIFF_LEN as u64)
        .read_to_end(&mut header)
        .await
        .with_context(|| format!("failed to read document {}", path.display()))?;
    Ok(header)
}

fn sniff_media_type(header: &[u8]) -> &'static str {
    if header.starts_with(PDF_MAGIC) {
        return "application/pdf";
    }
    image::guess_format(header)
        .map(|format| format.to_mime_type())
        .unwrap_or(UNKNOWN_MEDIA_TYPE)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[async_trait::async_trait]
impl DocumentUploadPort for LocalDocumentPicker {
    async fn upload(&self, files: Vec<CandidateFile>) -> anyhow::Result<Vec<DocumentRef>> {
        let offered = files.len();
        let mut accepted = Vec::with_capacity(offered);

        for file in files {
            let media_type = match Self::media_type_of(&file).await {
                Ok(media_type) => media_type,
                Err(err) => {
                    warn!(path = %file.path.display(), error = %err, "document skipped");
                    continue;
                }
            };
            if !is_accepted_media_type(&media_type) {
                debug!(path = %file.path.display(), media_type, "document rejected");
                continue;
            }
            accepted.push(DocumentRef::new(
                display_name(&file.path),
                format!("file://{}", file.path.display()),
                media_type,
            ));
        }

        info!(offered, accepted = accepted.len(), "documents picked");
        Ok(accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    fn write_file(dir: &tempfile::TempDir, name: &str, bytes: &[u8]) -> CandidateFile {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(bytes).unwrap();
        CandidateFile::new(path)
    }

    #[test]
    fn sniffs_pdf_and_images() {
        assert_eq!(sniff_media_type(b"%PDF-1.7\n"), "application/pdf");
        assert_eq!(sniff_media_type(PNG_HEADER), "image/png");
        assert_eq!(sniff_media_type(&[0xFF, 0xD8, 0xFF, 0xE0]), "image/jpeg");
        assert_eq!(sniff_media_type(b"PK\x03\x04"), UNKNOWN_MEDIA_TYPE);
        assert_eq!(sniff_media_type(b""), UNKNOWN_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn keeps_only_images_and_pdfs() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![
            write_file(&dir, "license.pdf", b"%PDF-1.4\n%..."),
            write_file(&dir, "photo.bin", PNG_HEADER),
            write_file(&dir, "notes.txt", b"hello there"),
        ];

        let docs = LocalDocumentPicker::new().upload(files).await.unwrap();

        let names: Vec<_> = docs.iter().map(|doc| doc.name.as_str()).collect();
        assert_eq!(names, vec!["license.pdf", "photo.bin"]);
        assert_eq!(docs[0].media_type, "application/pdf");
        assert_eq!(docs[1].media_type, "image/png");
        assert!(docs[0].uri.starts_with("file://"));
    }

    #[tokio::test]
    async fn declared_type_wins_over_header() {
        let dir = tempfile::tempdir().unwrap();
        let mut declared_image = write_file(&dir, "scan", b"not really an image");
        declared_image.declared_type = Some("Image/HEIC".to_string());
        let mut declared_zip = write_file(&dir, "bundle", b"%PDF-1.4");
        declared_zip.declared_type = Some("application/zip".to_string());

        let docs = LocalDocumentPicker::new()
            .upload(vec![declared_image, declared_zip])
            .await
            .unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].media_type, "image/heic");
    }

    #[tokio::test]
    async fn unreadable_file_is_skipped_and_the_rest_kept() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![
            CandidateFile::new(dir.path().join("gone.pdf")),
            write_file(&dir, "license.pdf", b"%PDF-1.4\n%..."),
        ];

        let docs = LocalDocumentPicker::new().upload(files).await.unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].name, "license.pdf");
    }

    #[tokio::test]
    async fn read_error_names_the_file() {
        let dir = tempfile::tempdir().unwrap();

        let err = read_header(&dir.path().join("gone.pdf")).await.unwrap_err();

        assert!(err.to_string().contains("gone.pdf"));
    }
}
