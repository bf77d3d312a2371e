use crate::error::{Error, Result};
use crate::math::init;

/// Fully-connected layer: `out = W * input + b`.
#[derive(Debug, Clone)]
pub struct Linear {
    pub in_features:  usize,
    pub out_features: usize,
    /// Flat `[out_features][in_features]`, one row per output neuron.
    pub weight: Vec<f32>,
    pub bias: Vec<f32>,
}

impl Linear {
    /// Xavier-initialized weights (no ReLU behind the classifier head), zero
    /// biases.
    pub fn new(in_features: usize, out_features: usize) -> Linear {
        Linear {
            in_features,
            out_features,
            weight: init::xavier(out_features * in_features, in_features),
            bias:   vec![0.0; out_features],
        }
    }

    pub fn forward(&self, input: &[f32]) -> Result<Vec<f32>> {
        if input.len() != self.in_features {
            return Err(Error::Inference(format!(
                "linear layer expected {} input features, got {}",
                self.in_features,
                input.len()
            )));
        }

        let mut out = Vec::with_capacity(self.out_features);
        for o in 0..self.out_features {
            let row = &self.weight[o * self.in_features..(o + 1) * self.in_features];
            let mut sum = self.bias[o];
            for (w, x) in row.iter().zip(input) {
                sum += w * x;
            }
            out.push(sum);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn computes_rows_times_input_plus_bias() {
        let mut layer = Linear::new(3, 2);
        layer.weight = vec![
            1.0, 0.0, -1.0,
            0.5, 0.5, 0.5,
        ];
        layer.bias = vec![10.0, 0.0];

        let out = layer.forward(&[2.0, 4.0, 6.0]).unwrap();
        assert_eq!(out, vec![10.0 + 2.0 - 6.0, 6.0]);
    }

    #[test]
    fn input_length_mismatch_is_an_inference_error() {
        let layer = Linear::new(4, 2);
        match layer.forward(&[1.0, 2.0]) {
            Err(Error::Inference(msg)) => {
                assert!(msg.contains("4"));
                assert!(msg.contains("2"));
            }
            other => panic!("expected inference error, got {:?}", other),
        }
    }
}
