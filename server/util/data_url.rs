use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// Decodes the payload of a `data:<mime>;base64,<payload>` URL.
///
/// Returns `None` when the string is not a base64 data URL or the payload is
/// not valid base64.
pub fn decode(url: &str) -> Option<Vec<u8>> {
    let (meta, payload) = url.split_once(',')?;
    if !meta.starts_with("data:") || !meta.ends_with(";base64") {
        return None;
    }
    STANDARD.decode(payload.trim()).ok()
}
