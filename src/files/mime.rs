use std::path::Path;

use crate::error::LLMError;

/// MIME type used for extensions the service does not know about.
pub const OCTET_STREAM: &str = "application/octet-stream";

const MIME_BY_EXTENSION: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("webp", "image/webp"),
    ("mp3", "audio/mpeg"),
    ("wav", "audio/wav"),
    ("m4a", "audio/mp4"),
    ("pdf", "application/pdf"),
];

/// Infers the MIME type of a file from the extension of its name.
pub fn mime_for_name(name: &str) -> &'static str {
    let Some(ext) = Path::new(name).extension().and_then(|ext| ext.to_str()) else {
        return OCTET_STREAM;
    };
    let ext = ext.to_ascii_lowercase();
    MIME_BY_EXTENSION
        .iter()
        .find(|(candidate, _)| *candidate == ext)
        .map(|(_, mime)| *mime)
        .unwrap_or(OCTET_STREAM)
}

/// Broad kind of media an attachment carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Audio,
    Document,
}

impl MediaKind {
    pub fn from_mime(mime: &str) -> Self {
        if mime.starts_with("image/") {
            MediaKind::Image
        } else if mime.starts_with("audio/") {
            MediaKind::Audio
        } else {
            MediaKind::Document
        }
    }
}

/// A file staged for sending with a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
    pub bytes: Vec<u8>,
    pub kind: MediaKind,
    pub mime_type: String,
}

impl Attachment {
    /// Creates an attachment, inferring its MIME type and kind from `name`.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let mime_type = mime_for_name(&name).to_string();
        Self {
            kind: MediaKind::from_mime(&mime_type),
            name,
            bytes,
            mime_type,
        }
    }

    /// Reads an attachment from disk, naming it after the file.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, LLMError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| LLMError::Io(format!("not a file path: {}", path.display())))?;
        let bytes = tokio::fs::read(path).await?;
        Ok(Self::new(name, bytes))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("photo.png", "image/png")]
    #[case("photo.jpg", "image/jpeg")]
    #[case("photo.jpeg", "image/jpeg")]
    #[case("photo.webp", "image/webp")]
    #[case("voice.mp3", "audio/mpeg")]
    #[case("voice.wav", "audio/wav")]
    #[case("voice.m4a", "audio/mp4")]
    #[case("paper.pdf", "application/pdf")]
    #[case("PHOTO.PNG", "image/png")]
    #[case("archive.tar.gz", OCTET_STREAM)]
    #[case("notes.txt", OCTET_STREAM)]
    #[case("README", OCTET_STREAM)]
    fn infers_mime_from_extension(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(mime_for_name(name), expected);
    }

    #[test]
    fn attachment_kind_follows_mime() {
        assert_eq!(Attachment::new("a.webp", vec![]).kind, MediaKind::Image);
        assert_eq!(Attachment::new("a.m4a", vec![]).kind, MediaKind::Audio);
        assert_eq!(Attachment::new("a.pdf", vec![]).kind, MediaKind::Document);
        assert_eq!(Attachment::new("a.bin", vec![]).kind, MediaKind::Document);
    }

    #[tokio::test]
    async fn attachment_from_path_reads_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();

        let attachment = Attachment::from_path(&path).await.unwrap();
        assert_eq!(attachment.name, "scan.pdf");
        assert_eq!(attachment.mime_type, "application/pdf");
        assert_eq!(attachment.bytes, b"%PDF-1.4");
    }
}
