use std::io::Cursor;
use tiny_http::Response;

// ---------------------------------------------------------------------------
// GET /
// ---------------------------------------------------------------------------

/// Serves the upload page, compiled into the binary.
pub fn handle() -> Response<Cursor<Vec<u8>>> {
    crate::routes::html_response(include_str!("../assets/index.html").to_owned())
}
