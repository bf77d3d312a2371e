use crate::error::{Error, Result};
use crate::math::Tensor;

/// 2x2 max pooling with stride 2. Halves the spatial resolution, rounding
/// down; a trailing odd row/column is dropped.
#[derive(Debug, Clone)]
pub struct MaxPool2d;

impl MaxPool2d {
    pub fn forward(&self, x: &Tensor) -> Result<Tensor> {
        if x.height < 2 || x.width < 2 {
            return Err(Error::Inference(format!(
                "cannot 2x2 max-pool a {}x{} feature map",
                x.height, x.width
            )));
        }

        let (batch, channels, h, w) = x.shape();
        let (oh, ow) = (h / 2, w / 2);
        let mut out = Tensor::zeros(batch, channels, oh, ow);
        let mut o = 0;

        for n in 0..batch {
            for c in 0..channels {
                let chan = x.offset(n, c, 0, 0);
                for oy in 0..oh {
                    let top = chan + (oy * 2) * w;
                    for ox in 0..ow {
                        let i = top + ox * 2;
                        let m = x.data[i]
                            .max(x.data[i + 1])
                            .max(x.data[i + w])
                            .max(x.data[i + w + 1]);
                        out.data[o] = m;
                        o += 1;
                    }
                }
            }
        }

        Ok(out)
    }
}

/// Collapses each channel's spatial grid to its mean, yielding one value per
/// (image, channel) pair in channel order.
pub fn global_avg_pool(x: &Tensor) -> Result<Vec<f32>> {
    let area = x.height * x.width;
    if area == 0 {
        return Err(Error::Inference(
            "cannot average an empty feature map".to_owned(),
        ));
    }

    let mut out = Vec::with_capacity(x.batch * x.channels);
    for n in 0..x.batch {
        for c in 0..x.channels {
            let start = x.offset(n, c, 0, 0);
            let sum: f32 = x.data[start..start + area].iter().sum();
            out.push(sum / area as f32);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_pool_picks_window_maxima() {
        let x = Tensor::from_vec(
            1, 1, 4, 4,
            vec![
                1.0, 2.0, 5.0, 0.0,
                3.0, 4.0, 1.0, 1.0,
                0.0, 0.0, 9.0, 8.0,
                0.0, 7.0, 6.0, 9.5,
            ],
        );
        let y = MaxPool2d.forward(&x).unwrap();
        assert_eq!(y.shape(), (1, 1, 2, 2));
        assert_eq!(y.data, vec![4.0, 5.0, 7.0, 9.5]);
    }

    #[test]
    fn odd_trailing_row_and_column_are_dropped() {
        let x = Tensor::from_vec(
            1, 1, 3, 3,
            vec![
                1.0, 2.0, 100.0,
                3.0, 4.0, 100.0,
                100.0, 100.0, 100.0,
            ],
        );
        let y = MaxPool2d.forward(&x).unwrap();
        assert_eq!(y.shape(), (1, 1, 1, 1));
        assert_eq!(y.data, vec![4.0]);
    }

    #[test]
    fn pooling_below_window_size_fails() {
        let x = Tensor::zeros(1, 4, 1, 1);
        assert!(matches!(MaxPool2d.forward(&x), Err(Error::Inference(_))));
    }

    #[test]
    fn global_avg_pool_means_each_channel() {
        let mut x = Tensor::zeros(1, 2, 2, 2);
        x.data[..4].copy_from_slice(&[1.0, 2.0, 3.0, 4.0]);
        x.data[4..].copy_from_slice(&[10.0, 10.0, 10.0, 10.0]);
        let v = global_avg_pool(&x).unwrap();
        assert_eq!(v, vec![2.5, 10.0]);
    }

    #[test]
    fn global_avg_pool_rejects_empty_grid() {
        let x = Tensor::zeros(1, 2, 0, 0);
        assert!(matches!(global_avg_pool(&x), Err(Error::Inference(_))));
    }
}
