use crate::error::{Error, Result};

/// A raw decoded image: 8-bit samples, row-major, interleaved per pixel.
///
/// Either single-channel luminance or 3-channel color in blue-green-red
/// order (the sample order the published network weights were trained on).
/// Construction validates the channel count and the buffer length; a
/// `PixelBuffer` that exists is structurally sound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width:    u32,
    pub height:   u32,
    pub channels: u8,
    pub data:     Vec<u8>,
}

impl PixelBuffer {
    /// Wraps a single-channel luminance buffer.
    pub fn gray(width: u32, height: u32, data: Vec<u8>) -> Result<PixelBuffer> {
        PixelBuffer::with_channels(width, height, 1, data)
    }

    /// Wraps a 3-channel buffer with interleaved B, G, R samples.
    pub fn bgr(width: u32, height: u32, data: Vec<u8>) -> Result<PixelBuffer> {
        PixelBuffer::with_channels(width, height, 3, data)
    }

    fn with_channels(width: u32, height: u32, channels: u8, data: Vec<u8>) -> Result<PixelBuffer> {
        if channels != 1 && channels != 3 {
            return Err(Error::Decode(format!(
                "unsupported channel count {} (expected 1 or 3)",
                channels
            )));
        }
        let expected = width as usize * height as usize * channels as usize;
        if data.len() != expected {
            return Err(Error::Decode(format!(
                "pixel buffer holds {} bytes, but {}x{}x{} needs {}",
                data.len(),
                width,
                height,
                channels,
                expected
            )));
        }
        Ok(PixelBuffer { width, height, channels, data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_buffers_construct() {
        let g = PixelBuffer::gray(4, 2, vec![0; 8]).unwrap();
        assert_eq!(g.channels, 1);

        let c = PixelBuffer::bgr(4, 2, vec![0; 24]).unwrap();
        assert_eq!(c.channels, 3);
    }

    #[test]
    fn length_mismatch_is_a_decode_error() {
        match PixelBuffer::bgr(4, 2, vec![0; 23]) {
            Err(Error::Decode(msg)) => {
                assert!(msg.contains("23"));
                assert!(msg.contains("24"));
            }
            other => panic!("expected decode error, got {:?}", other),
        }
    }

    #[test]
    fn bad_channel_count_is_a_decode_error() {
        match PixelBuffer::with_channels(2, 2, 4, vec![0; 16]) {
            Err(Error::Decode(msg)) => assert!(msg.contains("expected 1 or 3")),
            other => panic!("expected decode error, got {:?}", other),
        }
    }

    #[test]
    fn zero_sized_buffers_are_structurally_valid() {
        // Rejected later by preprocessing, not at construction.
        assert!(PixelBuffer::gray(0, 5, vec![]).is_ok());
    }
}
