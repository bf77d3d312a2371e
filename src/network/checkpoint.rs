use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// A single named parameter as persisted in a checkpoint: its shape and the
/// row-major values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamTensor {
    pub shape: Vec<usize>,
    pub data:  Vec<f32>,
}

/// All parameters of a network, keyed by layer-qualified name
/// (`conv1a.weight`, `head.bias`, ...). A `BTreeMap` keeps the serialized key
/// order deterministic.
pub type WeightSet = BTreeMap<String, ParamTensor>;

/// Serializes a weight set to a compact JSON file.
pub fn save(path: &str, params: &WeightSet) -> std::io::Result<()> {
    let file = std::fs::File::create(path)?;
    let writer = std::io::BufWriter::new(file);
    serde_json::to_writer(writer, params)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
}

/// Reads a weight set from a JSON checkpoint previously written by `save`.
///
/// Validates that every entry carries exactly as many values as its declared
/// shape implies. Whether the names and shapes match a particular network is
/// checked by `TinyQrNet::load_state`.
pub fn load(path: &str) -> Result<WeightSet> {
    let file = std::fs::File::open(path)
        .map_err(|e| Error::ModelLoad(format!("could not open checkpoint '{}': {}", path, e)))?;
    let reader = std::io::BufReader::new(file);
    let params: WeightSet = serde_json::from_reader(reader)
        .map_err(|e| Error::ModelLoad(format!("malformed checkpoint '{}': {}", path, e)))?;

    for (name, param) in &params {
        let expected: usize = param.shape.iter().product();
        if param.data.len() != expected {
            return Err(Error::ModelLoad(format!(
                "parameter '{}' declares shape {:?} ({} values) but carries {} values",
                name,
                param.shape,
                expected,
                param.data.len()
            )));
        }
    }
    Ok(params)
}
