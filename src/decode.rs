use crate::error::{Error, Result};
use crate::pixel::PixelBuffer;

/// Decodes encoded image bytes (PNG/JPEG/BMP/GIF) into a 3-channel BGR
/// `PixelBuffer`.
///
/// Grayscale and paletted sources are expanded to 3 channels here, matching
/// the color decode path the network weights assume; the preprocessor folds
/// them back to luminance.
pub fn decode_image(bytes: &[u8]) -> Result<PixelBuffer> {
    if bytes.is_empty() {
        return Err(Error::Decode("empty image payload".to_owned()));
    }

    let img = image::load_from_memory(bytes)
        .map_err(|e| Error::Decode(format!("could not decode image: {}", e)))?;
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();

    let mut data = Vec::with_capacity(width as usize * height as usize * 3);
    for pixel in rgb.pixels() {
        let [r, g, b] = pixel.0;
        data.push(b);
        data.push(g);
        data.push(r);
    }
    PixelBuffer::bgr(width, height, data)
}
