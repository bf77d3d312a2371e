pub mod error;
pub mod classes;
pub mod math;
pub mod layers;
pub mod network;
pub mod pixel;
pub mod decode;
pub mod preprocess;
pub mod report;
pub mod predict;

// Convenience re-exports
pub use error::{Error, Result};
pub use classes::{DamageClass, NUM_CLASSES};
pub use math::tensor::Tensor;
pub use network::checkpoint::{ParamTensor, WeightSet};
pub use network::qrnet::TinyQrNet;
pub use pixel::PixelBuffer;
pub use predict::{QrDamagePredictor, IMG_SIZE};
pub use report::Classification;
