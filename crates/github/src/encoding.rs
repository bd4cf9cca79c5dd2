use base64::{engine::general_purpose::STANDARD, Engine as _};
use pipeline::ContentEncoding;

/// Applies `encoding` to file content before it is sent to the contents endpoint.
pub fn encode_content(encoding: ContentEncoding, content: &str) -> String {
    match encoding {
        ContentEncoding::Plain => content.to_owned(),
        ContentEncoding::Base64 => STANDARD.encode(content.as_bytes()),
    }
}
