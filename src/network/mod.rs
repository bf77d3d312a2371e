pub mod checkpoint;
pub mod qrnet;

pub use checkpoint::{ParamTensor, WeightSet};
pub use qrnet::TinyQrNet;
