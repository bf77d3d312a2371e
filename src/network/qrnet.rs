use crate::classes::NUM_CLASSES;
use crate::error::{Error, Result};
use crate::layers::{global_avg_pool, Conv2d, Linear, MaxPool2d};
use crate::math::Tensor;
use crate::network::checkpoint::{ParamTensor, WeightSet};

/// The damage classifier topology: four double-convolution stages with 2x2
/// max-pooling after the first three, then global average pooling and a
/// linear head.
///
/// Channel plan: 3 -> 32 -> 32 -> 64 -> 64 -> 128 -> 128 -> 256 -> 256, head
/// 256 -> 5. With a 160x160 input the spatial sizes run 160 -> 80 -> 40 -> 20
/// (stage four keeps 20x20). Every convolution is followed by ReLU; the head
/// emits raw logits, softmax is applied downstream.
pub struct TinyQrNet {
    pub conv1a: Conv2d,
    pub conv1b: Conv2d,
    pub conv2a: Conv2d,
    pub conv2b: Conv2d,
    pub conv3a: Conv2d,
    pub conv3b: Conv2d,
    pub conv4a: Conv2d,
    pub conv4b: Conv2d,
    pub pool:   MaxPool2d,
    pub head:   Linear,
}

fn relu(v: f32) -> f32 {
    v.max(0.0)
}

impl TinyQrNet {
    /// A freshly initialized network (He convolutions, Xavier head). Real
    /// deployments overwrite these via `load_state`.
    pub fn new() -> TinyQrNet {
        TinyQrNet {
            conv1a: Conv2d::new(3, 32),
            conv1b: Conv2d::new(32, 32),
            conv2a: Conv2d::new(32, 64),
            conv2b: Conv2d::new(64, 64),
            conv3a: Conv2d::new(64, 128),
            conv3b: Conv2d::new(128, 128),
            conv4a: Conv2d::new(128, 256),
            conv4b: Conv2d::new(256, 256),
            pool:   MaxPool2d,
            head:   Linear::new(256, NUM_CLASSES),
        }
    }

    /// Runs a single preprocessed image through the network and returns the
    /// raw class scores.
    ///
    /// Takes `&self` and allocates all intermediate activations locally, so
    /// one network instance can serve concurrent callers.
    pub fn forward(&self, input: &Tensor) -> Result<[f32; NUM_CLASSES]> {
        if input.batch != 1 {
            return Err(Error::Inference(format!(
                "expected a single-image batch, got batch size {}",
                input.batch
            )));
        }

        let x = self.conv1a.forward(input)?.map(relu);
        let x = self.conv1b.forward(&x)?.map(relu);
        let x = self.pool.forward(&x)?;

        let x = self.conv2a.forward(&x)?.map(relu);
        let x = self.conv2b.forward(&x)?.map(relu);
        let x = self.pool.forward(&x)?;

        let x = self.conv3a.forward(&x)?.map(relu);
        let x = self.conv3b.forward(&x)?.map(relu);
        let x = self.pool.forward(&x)?;

        let x = self.conv4a.forward(&x)?.map(relu);
        let x = self.conv4b.forward(&x)?.map(relu);

        let features = global_avg_pool(&x)?;
        let logits = self.head.forward(&features)?;
        logits.try_into().map_err(|v: Vec<f32>| {
            Error::Inference(format!(
                "classifier head produced {} logits, expected {}",
                v.len(),
                NUM_CLASSES
            ))
        })
    }

    /// All parameters keyed by layer-qualified name, for checkpointing.
    pub fn state(&self) -> WeightSet {
        let mut params = WeightSet::new();
        for (name, conv) in self.conv_layers() {
            params.insert(
                format!("{}.weight", name),
                ParamTensor {
                    shape: vec![conv.out_channels, conv.in_channels, 3, 3],
                    data:  conv.weight.clone(),
                },
            );
            params.insert(
                format!("{}.bias", name),
                ParamTensor { shape: vec![conv.out_channels], data: conv.bias.clone() },
            );
        }
        params.insert(
            "head.weight".to_owned(),
            ParamTensor {
                shape: vec![self.head.out_features, self.head.in_features],
                data:  self.head.weight.clone(),
            },
        );
        params.insert(
            "head.bias".to_owned(),
            ParamTensor { shape: vec![self.head.out_features], data: self.head.bias.clone() },
        );
        params
    }

    /// Replaces every parameter from a named weight set.
    ///
    /// Strict: every parameter must be present with exactly the expected
    /// shape, and nothing else may remain. Any violation fails with
    /// `Error::ModelLoad` naming the offending parameter.
    pub fn load_state(&mut self, mut params: WeightSet) -> Result<()> {
        let convs: [(&str, &mut Conv2d); 8] = [
            ("conv1a", &mut self.conv1a),
            ("conv1b", &mut self.conv1b),
            ("conv2a", &mut self.conv2a),
            ("conv2b", &mut self.conv2b),
            ("conv3a", &mut self.conv3a),
            ("conv3b", &mut self.conv3b),
            ("conv4a", &mut self.conv4a),
            ("conv4b", &mut self.conv4b),
        ];
        for (name, conv) in convs {
            let weight_shape = [conv.out_channels, conv.in_channels, 3, 3];
            conv.weight = take_param(&mut params, &format!("{}.weight", name), &weight_shape)?;
            conv.bias = take_param(&mut params, &format!("{}.bias", name), &[conv.out_channels])?;
        }
        let head_shape = [self.head.out_features, self.head.in_features];
        self.head.weight = take_param(&mut params, "head.weight", &head_shape)?;
        self.head.bias = take_param(&mut params, "head.bias", &[self.head.out_features])?;

        if !params.is_empty() {
            let extras: Vec<&str> = params.keys().map(|k| k.as_str()).collect();
            return Err(Error::ModelLoad(format!(
                "checkpoint contains unexpected parameter(s): {}",
                extras.join(", ")
            )));
        }
        Ok(())
    }

    /// Total number of learned values across all layers.
    pub fn param_count(&self) -> usize {
        let mut count = self.head.weight.len() + self.head.bias.len();
        for (_, conv) in self.conv_layers() {
            count += conv.weight.len() + conv.bias.len();
        }
        count
    }

    fn conv_layers(&self) -> [(&'static str, &Conv2d); 8] {
        [
            ("conv1a", &self.conv1a),
            ("conv1b", &self.conv1b),
            ("conv2a", &self.conv2a),
            ("conv2b", &self.conv2b),
            ("conv3a", &self.conv3a),
            ("conv3b", &self.conv3b),
            ("conv4a", &self.conv4a),
            ("conv4b", &self.conv4b),
        ]
    }
}

impl Default for TinyQrNet {
    fn default() -> Self {
        TinyQrNet::new()
    }
}

/// Removes `name` from the set, checking its shape, and returns the values.
fn take_param(params: &mut WeightSet, name: &str, shape: &[usize]) -> Result<Vec<f32>> {
    let param = params
        .remove(name)
        .ok_or_else(|| Error::ModelLoad(format!("checkpoint is missing parameter '{}'", name)))?;
    if param.shape.as_slice() != shape {
        return Err(Error::ModelLoad(format!(
            "parameter '{}' has shape {:?}, expected {:?}",
            name, param.shape, shape
        )));
    }
    let expected: usize = shape.iter().product();
    if param.data.len() != expected {
        return Err(Error::ModelLoad(format!(
            "parameter '{}' carries {} values, expected {}",
            name,
            param.data.len(),
            expected
        )));
    }
    Ok(param.data)
}
