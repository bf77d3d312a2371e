//! Just enough multipart/form-data parsing for a single-file upload form.

/// Returns the index of the first occurrence of `needle` in `haystack`.
pub fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Splits `haystack` on every occurrence of `needle`, returning the pieces
/// between occurrences (excluding the needle itself).
pub fn split_on<'a>(haystack: &'a [u8], needle: &[u8]) -> Vec<&'a [u8]> {
    let mut result = Vec::new();
    let mut start = 0;
    while start <= haystack.len() {
        if let Some(pos) = find_subsequence(&haystack[start..], needle) {
            result.push(&haystack[start..start + pos]);
            start += pos + needle.len();
        } else {
            result.push(&haystack[start..]);
            break;
        }
    }
    result
}

/// Extracts the boundary token from a Content-Type header value like
/// `multipart/form-data; boundary=----WebKitFormBoundaryXXX`.
pub fn extract_boundary(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .map(|s| s.trim())
        .find(|s| s.starts_with("boundary="))
        .map(|s| s["boundary=".len()..].trim_matches('"').to_owned())
}

/// Extracts the raw bytes of the file part named `field_name`, falling back
/// to the first file part when no part carries that name.
pub fn extract_file(body: &[u8], boundary: &str, field_name: &str) -> Option<Vec<u8>> {
    extract_file_part(body, boundary, Some(field_name))
        .or_else(|| extract_file_part(body, boundary, None))
}

fn extract_file_part(body: &[u8], boundary: &str, field_name: Option<&str>) -> Option<Vec<u8>> {
    let delimiter = format!("--{}", boundary);
    let parts = split_on(body, delimiter.as_bytes());

    for part in parts {
        let sep = b"\r\n\r\n";
        if let Some(sep_pos) = find_subsequence(part, sep) {
            let headers = String::from_utf8_lossy(&part[..sep_pos]);
            let is_file = headers.contains("filename=");
            let name_matches = match field_name {
                Some(name) => headers.contains(&format!("name=\"{}\"", name)),
                None => true,
            };
            if is_file && name_matches {
                let raw = &part[sep_pos + sep.len()..];
                let trimmed = raw.strip_suffix(b"\r\n").unwrap_or(raw);
                return Some(trimmed.to_vec());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_with_two_parts() -> Vec<u8> {
        b"--BND\r\n\
Content-Disposition: form-data; name=\"comment\"\r\n\r\n\
just text\r\n\
--BND\r\n\
Content-Disposition: form-data; name=\"file\"; filename=\"a.jpg\"\r\n\
Content-Type: image/jpeg\r\n\r\n\
\xFF\xD8JPEGBYTES\r\n\
--BND--\r\n"
            .to_vec()
    }

    #[test]
    fn boundary_is_parsed_from_the_header_value() {
        assert_eq!(
            extract_boundary("multipart/form-data; boundary=----WebKitABC").as_deref(),
            Some("----WebKitABC")
        );
        assert_eq!(
            extract_boundary("multipart/form-data; boundary=\"quoted\"").as_deref(),
            Some("quoted")
        );
        assert_eq!(extract_boundary("application/json"), None);
    }

    #[test]
    fn named_file_part_is_extracted_without_the_trailing_crlf() {
        let bytes = extract_file(&body_with_two_parts(), "BND", "file").unwrap();
        assert_eq!(bytes, b"\xFF\xD8JPEGBYTES");
    }

    #[test]
    fn text_parts_are_not_mistaken_for_files() {
        // Asking for the text field's name falls back to the only file part.
        let bytes = extract_file(&body_with_two_parts(), "BND", "comment").unwrap();
        assert_eq!(bytes, b"\xFF\xD8JPEGBYTES");
    }

    #[test]
    fn missing_file_part_yields_none() {
        let body = b"--BND\r\n\
Content-Disposition: form-data; name=\"comment\"\r\n\r\n\
hello\r\n\
--BND--\r\n"
            .to_vec();
        assert_eq!(extract_file(&body, "BND", "file"), None);
    }

    #[test]
    fn split_on_returns_pieces_between_needles() {
        let pieces = split_on(b"a..b..c", b"..");
        assert_eq!(pieces, vec![&b"a"[..], &b"b"[..], &b"c"[..]]);
    }
}
