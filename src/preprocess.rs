use image::imageops::{self, FilterType};
use image::GrayImage;

use crate::error::{Error, Result};
use crate::math::Tensor;
use crate::pixel::PixelBuffer;

/// Turns a decoded pixel buffer into the network's input tensor.
///
/// Steps: fold color to BT.601 luminance, bilinear-resize to `size` x `size`
/// (aspect distortion is accepted, not corrected), scale samples to [0, 1],
/// replicate the single luminance plane across the 3 input channels, and add
/// a leading batch dimension of 1.
///
/// The replication step deliberately discards any color information: the
/// network weights were trained on grayscale content presented as 3 identical
/// channels, so the numeric contract must match.
pub fn preprocess(buffer: &PixelBuffer, size: u32) -> Result<Tensor> {
    if buffer.width == 0 || buffer.height == 0 {
        return Err(Error::InvalidInput(format!(
            "cannot classify a {}x{} image",
            buffer.width, buffer.height
        )));
    }
    if size == 0 {
        return Err(Error::InvalidInput("target size must be positive".to_owned()));
    }

    let gray = GrayImage::from_raw(buffer.width, buffer.height, to_luminance(buffer))
        .ok_or_else(|| Error::InvalidInput("luminance buffer length mismatch".to_owned()))?;
    let resized = imageops::resize(&gray, size, size, FilterType::Triangle);

    let side = size as usize;
    let plane: Vec<f32> = resized.as_raw().iter().map(|&v| v as f32 / 255.0).collect();
    let mut data = Vec::with_capacity(3 * side * side);
    for _ in 0..3 {
        data.extend_from_slice(&plane);
    }
    Ok(Tensor::from_vec(1, 3, side, side, data))
}

/// BT.601 luminance, `Y = 0.299 R + 0.587 G + 0.114 B`, rounded to the
/// nearest 8-bit value. Single-channel buffers pass through unchanged.
fn to_luminance(buffer: &PixelBuffer) -> Vec<u8> {
    if buffer.channels == 1 {
        return buffer.data.clone();
    }
    buffer
        .data
        .chunks_exact(3)
        .map(|bgr| {
            let y = 0.114 * bgr[0] as f32 + 0.587 * bgr[1] as f32 + 0.299 * bgr[2] as f32;
            y.round() as u8
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker_bgr(width: u32, height: u32) -> PixelBuffer {
        let mut data = Vec::new();
        for y in 0..height {
            for x in 0..width {
                let v = if (x + y) % 2 == 0 { 200 } else { 30 };
                data.extend_from_slice(&[v, v / 2, v / 3]);
            }
        }
        PixelBuffer::bgr(width, height, data).unwrap()
    }

    #[test]
    fn output_is_a_unit_range_batch_of_one() {
        let tensor = preprocess(&checker_bgr(7, 13), 160).unwrap();
        assert_eq!(tensor.shape(), (1, 3, 160, 160));
        assert!(tensor.data.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn preprocessing_is_deterministic() {
        let buffer = checker_bgr(21, 9);
        let a = preprocess(&buffer, 64).unwrap();
        let b = preprocess(&buffer, 64).unwrap();
        assert_eq!(a.data, b.data);
    }

    #[test]
    fn all_three_channels_are_identical() {
        let tensor = preprocess(&checker_bgr(12, 12), 32).unwrap();
        let plane = 32 * 32;
        assert_eq!(tensor.data[..plane], tensor.data[plane..2 * plane]);
        assert_eq!(tensor.data[..plane], tensor.data[2 * plane..]);
    }

    #[test]
    fn gray_buffer_matches_its_bgr_replica() {
        let lum: Vec<u8> = (0..64).map(|i| (i * 4) as u8).collect();
        let gray = PixelBuffer::gray(8, 8, lum.clone()).unwrap();

        let bgr_bytes: Vec<u8> = lum.iter().flat_map(|&v| [v, v, v]).collect();
        let bgr = PixelBuffer::bgr(8, 8, bgr_bytes).unwrap();

        assert_eq!(
            preprocess(&gray, 160).unwrap().data,
            preprocess(&bgr, 160).unwrap().data
        );
    }

    #[test]
    fn constant_image_stays_constant_through_resize() {
        let buffer = PixelBuffer::gray(50, 3, vec![128; 150]).unwrap();
        let tensor = preprocess(&buffer, 16).unwrap();
        for &v in &tensor.data {
            assert!((v - 128.0 / 255.0).abs() < 1e-6);
        }
    }

    #[test]
    fn zero_dimension_is_invalid_input() {
        let empty = PixelBuffer::gray(0, 4, vec![]).unwrap();
        match preprocess(&empty, 160) {
            Err(Error::InvalidInput(msg)) => assert!(msg.contains("0x4")),
            other => panic!("expected invalid input error, got {:?}", other.map(|t| t.shape())),
        }
    }

    #[test]
    fn bt601_weights_are_applied_in_bgr_order() {
        // One pure-blue pixel: luminance = 0.114 * 255 = 29.07 -> 29.
        let buffer = PixelBuffer::bgr(1, 1, vec![255, 0, 0]).unwrap();
        let tensor = preprocess(&buffer, 1).unwrap();
        assert!((tensor.data[0] - 29.0 / 255.0).abs() < 1e-6);
    }
}
