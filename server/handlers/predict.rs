use std::io::{Cursor, Read};

use serde::{Deserialize, Serialize};
use tiny_http::{Request, Response};

use qr_damage_net::{Classification, DamageClass, Error, QrDamagePredictor};

use crate::routes::{error_response, json_response};
use crate::util::data_url;
use crate::util::multipart::{extract_boundary, extract_file};

/// Largest accepted request body. Generous enough for a photo straight off a
/// phone camera.
pub const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct PredictRequest {
    image: String,
}

#[derive(Serialize)]
struct PredictResponse {
    success: bool,
    class_name: &'static str,
    /// Percentage, 0-100.
    confidence: f32,
    probabilities: Vec<ProbabilityEntry>,
}

#[derive(Serialize)]
struct ProbabilityEntry {
    class_name: &'static str,
    /// Percentage, 0-100.
    probability: f32,
}

impl PredictResponse {
    fn from_classification(result: &Classification) -> PredictResponse {
        PredictResponse {
            success: true,
            class_name: result.class_name(),
            confidence: result.confidence * 100.0,
            probabilities: DamageClass::ALL
                .iter()
                .map(|&class| ProbabilityEntry {
                    class_name: class.name(),
                    probability: result.probabilities[class.id()] * 100.0,
                })
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// POST /predict
// ---------------------------------------------------------------------------

/// Accepts either a multipart upload (file field `file`) or a JSON body
/// `{"image": "data:<mime>;base64,..."}` and answers with the classification
/// as JSON.
pub fn handle(request: &mut Request, predictor: &QrDamagePredictor) -> Response<Cursor<Vec<u8>>> {
    // Reject oversized uploads before buffering them.
    if let Some(len) = request.body_length() {
        if len > MAX_BODY_BYTES {
            return error_response(413, "image too large (16 MiB limit)");
        }
    }

    let content_type = request
        .headers()
        .iter()
        .find(|h| h.field.equiv("Content-Type"))
        .map(|h| h.value.as_str().to_owned())
        .unwrap_or_default();

    let mut body: Vec<u8> = Vec::new();
    // take() also caps bodies that arrive without a Content-Length.
    let reader = request.as_reader();
    if reader
        .take(MAX_BODY_BYTES as u64 + 1)
        .read_to_end(&mut body)
        .is_err()
    {
        return error_response(400, "could not read request body");
    }
    if body.len() > MAX_BODY_BYTES {
        return error_response(413, "image too large (16 MiB limit)");
    }

    let image_bytes = match extract_image_bytes(&content_type, &body) {
        Some(bytes) if !bytes.is_empty() => bytes,
        _ => return error_response(400, "No image provided"),
    };

    match predictor.predict_bytes(&image_bytes) {
        Ok(result) => {
            log::info!(
                "classified {} byte upload as {} ({:.1}%)",
                image_bytes.len(),
                result.class_name(),
                result.confidence * 100.0
            );
            let payload = PredictResponse::from_classification(&result);
            json_response(200, serde_json::to_string(&payload).unwrap_or_default())
        }
        Err(e) => {
            log::warn!("prediction failed: {}", e);
            error_response(status_for(&e), &e.to_string())
        }
    }
}

/// Pulls the encoded image out of whichever request shape arrived.
fn extract_image_bytes(content_type: &str, body: &[u8]) -> Option<Vec<u8>> {
    if content_type.starts_with("multipart/form-data") {
        let boundary = extract_boundary(content_type)?;
        extract_file(body, &boundary, "file")
    } else {
        let parsed: PredictRequest = serde_json::from_slice(body).ok()?;
        data_url::decode(&parsed.image)
    }
}

fn status_for(error: &Error) -> u16 {
    match error {
        Error::Decode(_) | Error::InvalidInput(_) => 400,
        Error::ModelLoad(_) | Error::Inference(_) => 500,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multipart_bodies_yield_the_file_field() {
        let body = b"--XBOUND\r\n\
Content-Disposition: form-data; name=\"file\"; filename=\"qr.png\"\r\n\
Content-Type: image/png\r\n\r\n\
PNGDATA\r\n\
--XBOUND--\r\n"
            .to_vec();
        let bytes = extract_image_bytes("multipart/form-data; boundary=XBOUND", &body).unwrap();
        assert_eq!(bytes, b"PNGDATA");
    }

    #[test]
    fn json_bodies_yield_the_data_url_payload() {
        let body = br#"{"image": "data:image/png;base64,cXJjb2Rl"}"#;
        let bytes = extract_image_bytes("application/json", body).unwrap();
        assert_eq!(bytes, b"qrcode");
    }

    #[test]
    fn unusable_bodies_yield_nothing() {
        assert!(extract_image_bytes("application/json", b"{}").is_none());
        assert!(extract_image_bytes("multipart/form-data", b"no boundary header").is_none());
    }

    #[test]
    fn client_errors_map_to_400_and_internal_to_500() {
        assert_eq!(status_for(&Error::Decode("x".into())), 400);
        assert_eq!(status_for(&Error::InvalidInput("x".into())), 400);
        assert_eq!(status_for(&Error::Inference("x".into())), 500);
        assert_eq!(status_for(&Error::ModelLoad("x".into())), 500);
    }
}
