use rand::prelude::*;
use std::f32::consts::PI;

/// Samples a single value from N(0, 1) using the Box-Muller transform.
/// Both u1 and u2 must be uniform on (0, 1].
fn sample_standard_normal(rng: &mut ThreadRng) -> f32 {
    // Draw two independent uniform samples in (0, 1] to avoid log(0).
    let u1: f32 = 1.0 - rng.gen::<f32>();
    let u2: f32 = 1.0 - rng.gen::<f32>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

/// He initialization: `n` samples from N(0, sqrt(2 / fan_in)).
///
/// Recommended before ReLU layers. The variance 2/fan_in accounts for
/// the fact that ReLU zeroes half of its inputs on average.
pub fn he(n: usize, fan_in: usize) -> Vec<f32> {
    let mut rng = rand::thread_rng();
    let std_dev = (2.0 / fan_in as f32).sqrt();
    (0..n).map(|_| sample_standard_normal(&mut rng) * std_dev).collect()
}

/// Xavier (Glorot) initialization: `n` samples from N(0, sqrt(1 / fan_in)).
///
/// Recommended for layers without a ReLU behind them. Keeps the variance of
/// activations roughly equal across layers.
pub fn xavier(n: usize, fan_in: usize) -> Vec<f32> {
    let mut rng = rand::thread_rng();
    let std_dev = (1.0 / fan_in as f32).sqrt();
    (0..n).map(|_| sample_standard_normal(&mut rng) * std_dev).collect()
}
