pub mod conv;
pub mod pool;
pub mod linear;

pub use conv::Conv2d;
pub use pool::{global_avg_pool, MaxPool2d};
pub use linear::Linear;
