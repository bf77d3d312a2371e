use crate::decode;
use crate::error::{Error, Result};
use crate::network::{checkpoint, TinyQrNet};
use crate::pixel::PixelBuffer;
use crate::preprocess::preprocess;
use crate::report::Classification;

/// Edge length the network was trained at.
pub const IMG_SIZE: u32 = 160;

/// Load-once, predict-many wrapper around the network.
///
/// Construct it once at process startup; `predict` takes `&self`, so a single
/// instance can serve concurrent callers behind an `Arc`. There is no lazy
/// initialization and no reloading: if the checkpoint does not load, the
/// predictor does not exist.
pub struct QrDamagePredictor {
    img_size: u32,
    net: TinyQrNet,
}

impl QrDamagePredictor {
    /// Loads a checkpoint and prepares the predictor at the standard input
    /// size.
    pub fn load(model_path: &str) -> Result<QrDamagePredictor> {
        QrDamagePredictor::with_img_size(model_path, IMG_SIZE)
    }

    /// As `load`, but at a custom input edge length. The size must survive
    /// three 2x2 poolings, so anything below 8 fails at predict time.
    pub fn with_img_size(model_path: &str, img_size: u32) -> Result<QrDamagePredictor> {
        let mut net = TinyQrNet::new();
        net.load_state(checkpoint::load(model_path)?)?;
        Ok(QrDamagePredictor { img_size, net })
    }

    pub fn img_size(&self) -> u32 {
        self.img_size
    }

    /// Number of learned parameters in the loaded network.
    pub fn param_count(&self) -> usize {
        self.net.param_count()
    }

    /// Classifies a decoded pixel buffer.
    pub fn predict(&self, image: &PixelBuffer) -> Result<Classification> {
        let input = preprocess(image, self.img_size)?;
        let logits = self.net.forward(&input)?;
        Ok(Classification::from_logits(&logits))
    }

    /// Classifies encoded image bytes (PNG/JPEG/BMP/GIF).
    pub fn predict_bytes(&self, bytes: &[u8]) -> Result<Classification> {
        self.predict(&decode::decode_image(bytes)?)
    }

    /// Classifies an image file on disk.
    pub fn predict_path(&self, image_path: &str) -> Result<Classification> {
        let bytes = std::fs::read(image_path).map_err(|e| {
            Error::Decode(format!("could not read image file '{}': {}", image_path, e))
        })?;
        self.predict_bytes(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classes::DamageClass;

    #[test]
    fn loads_a_checkpoint_and_classifies() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("net.json").to_string_lossy().into_owned();
        checkpoint::save(&path, &TinyQrNet::new().state()).unwrap();

        // Small input size keeps the forward pass cheap; the topology only
        // needs the edge length to survive three halvings.
        let predictor = QrDamagePredictor::with_img_size(&path, 16).unwrap();
        assert_eq!(predictor.img_size(), 16);

        let buffer = PixelBuffer::gray(10, 10, (0u8..100).collect()).unwrap();
        let first = predictor.predict(&buffer).unwrap();
        let second = predictor.predict(&buffer).unwrap();
        assert_eq!(first, second);
        assert!(DamageClass::ALL.contains(&first.class));
        assert!(first.confidence > 0.0 && first.confidence <= 1.0);

        // Decode failures surface as errors, not fallback classifications.
        assert!(matches!(
            predictor.predict_bytes(b"not an image"),
            Err(Error::Decode(_))
        ));
        assert!(matches!(
            predictor.predict_path("/no/such/image.png"),
            Err(Error::Decode(_))
        ));
    }

    #[test]
    fn missing_checkpoint_fails_to_construct() {
        assert!(matches!(
            QrDamagePredictor::load("/no/such/model.json"),
            Err(Error::ModelLoad(_))
        ));
    }
}
