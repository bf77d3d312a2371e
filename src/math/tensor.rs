/// A 4-D float tensor in NCHW layout (batch, channels, height, width) backed
/// by a single flat `Vec<f32>`.
///
/// The flat layout keeps activation maps contiguous per channel row, which is
/// what the convolution loops index over. Index math lives in `offset`; the
/// element accessors exist for tests and cold paths, hot loops compute their
/// offsets incrementally.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    pub batch:    usize,
    pub channels: usize,
    pub height:   usize,
    pub width:    usize,
    pub data:     Vec<f32>,
}

impl Tensor {
    pub fn zeros(batch: usize, channels: usize, height: usize, width: usize) -> Tensor {
        Tensor {
            batch,
            channels,
            height,
            width,
            data: vec![0.0; batch * channels * height * width],
        }
    }

    /// Wraps an existing flat buffer. The buffer length must match the
    /// declared dimensions; this is a programmer-error check, not input
    /// validation.
    pub fn from_vec(
        batch: usize,
        channels: usize,
        height: usize,
        width: usize,
        data: Vec<f32>,
    ) -> Tensor {
        assert_eq!(
            data.len(),
            batch * channels * height * width,
            "tensor data length does not match dimensions"
        );
        Tensor { batch, channels, height, width, data }
    }

    pub fn shape(&self) -> (usize, usize, usize, usize) {
        (self.batch, self.channels, self.height, self.width)
    }

    #[inline]
    pub fn offset(&self, n: usize, c: usize, y: usize, x: usize) -> usize {
        ((n * self.channels + c) * self.height + y) * self.width + x
    }

    #[inline]
    pub fn at(&self, n: usize, c: usize, y: usize, x: usize) -> f32 {
        self.data[self.offset(n, c, y, x)]
    }

    #[inline]
    pub fn set(&mut self, n: usize, c: usize, y: usize, x: usize, value: f32) {
        let i = self.offset(n, c, y, x);
        self.data[i] = value;
    }

    pub fn map<F>(&self, functor: F) -> Tensor
    where
        F: Fn(f32) -> f32,
    {
        Tensor {
            batch:    self.batch,
            channels: self.channels,
            height:   self.height,
            width:    self.width,
            data:     self.data.iter().map(|&x| functor(x)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_walk_the_buffer_in_order() {
        let t = Tensor::zeros(2, 3, 4, 5);
        let mut expected = 0;
        for n in 0..2 {
            for c in 0..3 {
                for y in 0..4 {
                    for x in 0..5 {
                        assert_eq!(t.offset(n, c, y, x), expected);
                        expected += 1;
                    }
                }
            }
        }
        assert_eq!(expected, t.data.len());
    }

    #[test]
    fn set_and_at_round_trip() {
        let mut t = Tensor::zeros(1, 2, 2, 2);
        t.set(0, 1, 1, 0, 7.5);
        assert_eq!(t.at(0, 1, 1, 0), 7.5);
        assert_eq!(t.at(0, 0, 0, 0), 0.0);
    }

    #[test]
    fn map_applies_elementwise() {
        let t = Tensor::from_vec(1, 1, 1, 4, vec![-2.0, -0.5, 0.0, 3.0]);
        let relu = t.map(|x| x.max(0.0));
        assert_eq!(relu.data, vec![0.0, 0.0, 0.0, 3.0]);
        assert_eq!(relu.shape(), t.shape());
    }

    #[test]
    #[should_panic]
    fn from_vec_rejects_wrong_length() {
        let _ = Tensor::from_vec(1, 1, 2, 2, vec![0.0; 5]);
    }
}
