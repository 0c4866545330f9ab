use serde::{Deserialize, Serialize};

use crate::{chat::ContentPart, files::RemoteFile};

const USER_ROLE: &str = "user";

#[derive(Serialize, Debug)]
pub(super) struct GenerateRequest<'a> {
    pub(super) contents: Vec<WireContent<'a>>,
}

#[derive(Serialize, Debug)]
pub(super) struct WireContent<'a> {
    pub(super) role: &'a str,
    pub(super) parts: Vec<WirePart<'a>>,
}

#[derive(Serialize, Debug)]
#[serde(untagged)]
pub(super) enum WirePart<'a> {
    Text {
        text: &'a str,
    },
    File {
        #[serde(rename = "fileData")]
        file_data: FileData<'a>,
    },
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(super) struct FileData<'a> {
    pub(super) mime_type: &'a str,
    pub(super) file_uri: &'a str,
}

impl<'a> GenerateRequest<'a> {
    /// One user turn whose parts follow the order of `contents`.
    pub(super) fn from_contents(contents: &'a [ContentPart]) -> Self {
        let parts = contents
            .iter()
            .map(|part| match part {
                ContentPart::Text(text) => WirePart::Text { text },
                ContentPart::File(reference) => WirePart::File {
                    file_data: FileData {
                        mime_type: reference.mime_type(),
                        file_uri: reference.handle(),
                    },
                },
            })
            .collect();
        Self {
            contents: vec![WireContent {
                role: USER_ROLE,
                parts,
            }],
        }
    }
}

#[derive(Serialize, Debug)]
pub(super) struct UploadMetadata<'a> {
    pub(super) file: UploadFileMetadata<'a>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(super) struct UploadFileMetadata<'a> {
    pub(super) display_name: &'a str,
}

#[derive(Deserialize, Debug)]
pub(super) struct UploadResponse {
    pub(super) file: RemoteFile,
}
