use crate::files::UploadedReference;

/// One element of a turn payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPart {
    Text(String),
    File(UploadedReference),
}

/// Builds the payload of a turn: the prompt text first, then the uploaded
/// files in the order given.
///
/// Count and size limits are left to the remote API.
pub fn build_contents(prompt: &str, uploads: &[UploadedReference]) -> Vec<ContentPart> {
    std::iter::once(ContentPart::Text(prompt.to_string()))
        .chain(uploads.iter().cloned().map(ContentPart::File))
        .collect()
}
