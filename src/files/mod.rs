mod mime;
mod poll;
mod reference;
mod scratch;
mod store;
mod uploader;

pub use mime::{mime_for_name, Attachment, MediaKind, OCTET_STREAM};
pub use poll::{PollConfig, PollOutcome, PollStep};
pub use reference::{FileState, RemoteFile, UploadedReference};
pub use store::FileStore;
pub use uploader::FileUploader;
