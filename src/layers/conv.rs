use crate::error::{Error, Result};
use crate::math::{init, Tensor};

/// Kernel side length. The whole topology uses 3x3 kernels.
const K: usize = 3;

/// 2-D convolution: 3x3 kernel, stride 1, zero "same" padding, so the output
/// feature map has the same height and width as the input.
///
/// The forward pass takes `&self` and writes into a freshly allocated output
/// tensor, so a single layer can serve any number of threads at once.
#[derive(Debug, Clone)]
pub struct Conv2d {
    pub in_channels:  usize,
    pub out_channels: usize,
    /// Flat `[out_channels][in_channels][3][3]`.
    pub weight: Vec<f32>,
    /// One bias per output channel.
    pub bias: Vec<f32>,
}

impl Conv2d {
    /// He-initialized weights (a ReLU follows every convolution here), zero
    /// biases.
    pub fn new(in_channels: usize, out_channels: usize) -> Conv2d {
        let fan_in = in_channels * K * K;
        Conv2d {
            in_channels,
            out_channels,
            weight: init::he(out_channels * fan_in, fan_in),
            bias:   vec![0.0; out_channels],
        }
    }

    pub fn forward(&self, x: &Tensor) -> Result<Tensor> {
        if x.channels != self.in_channels {
            return Err(Error::Inference(format!(
                "convolution expected {} input channels, got {}",
                self.in_channels, x.channels
            )));
        }

        let (batch, _, h, w) = x.shape();
        let mut out = Tensor::zeros(batch, self.out_channels, h, w);
        let mut o = 0;

        for n in 0..batch {
            for oc in 0..self.out_channels {
                let b = self.bias[oc];
                for oy in 0..h {
                    // Kernel rows that land inside the image for this output row
                    // (with padding 1, input row = oy + ky - 1).
                    let ky_lo = usize::from(oy == 0);
                    let ky_hi = if oy + 1 == h { K - 1 } else { K };

                    for ox in 0..w {
                        let kx_lo = usize::from(ox == 0);
                        let kx_hi = if ox + 1 == w { K - 1 } else { K };

                        let mut acc = b;
                        for ic in 0..self.in_channels {
                            let wk = &self.weight[(oc * self.in_channels + ic) * K * K..];
                            let chan = x.offset(n, ic, 0, 0);
                            for ky in ky_lo..ky_hi {
                                let row = chan + (oy + ky - 1) * w;
                                let wrow = &wk[ky * K..ky * K + K];
                                for kx in kx_lo..kx_hi {
                                    acc += wrow[kx] * x.data[row + (ox + kx - 1)];
                                }
                            }
                        }
                        out.data[o] = acc;
                        o += 1;
                    }
                }
            }
        }

        Ok(out)
    }
}
