mod content;
mod sse;
mod stream;
mod streamer;
mod transport;
mod usage;

pub use content::{build_contents, ContentPart};
pub use stream::{EventStream, RawEventStream, StreamEvent};
pub use streamer::ResponseStreamer;
pub use transport::GenerateTransport;
pub use usage::{extract_usage, normalize_usage, Usage};

pub(crate) use sse::{create_sse_stream, parse_json_event};
