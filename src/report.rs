use crate::classes::{DamageClass, NUM_CLASSES};

/// The outcome of classifying one image: the winning class, its probability,
/// and the full distribution in class id order.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub class:         DamageClass,
    pub confidence:    f32,
    pub probabilities: [f32; NUM_CLASSES],
}

impl Classification {
    /// Builds the report from the network's raw class scores.
    ///
    /// Softmax subtracts the max logit before exponentiating so large scores
    /// cannot overflow. The argmax scans with strict `>`, so equal scores
    /// resolve to the lowest class id.
    pub fn from_logits(logits: &[f32; NUM_CLASSES]) -> Classification {
        let max = logits.iter().fold(f32::NEG_INFINITY, |m, &v| m.max(v));

        let mut probabilities = [0.0f32; NUM_CLASSES];
        let mut sum = 0.0f32;
        for (p, &logit) in probabilities.iter_mut().zip(logits) {
            *p = (logit - max).exp();
            sum += *p;
        }
        for p in &mut probabilities {
            *p /= sum;
        }

        let mut best = 0;
        for (i, &logit) in logits.iter().enumerate() {
            if logit > logits[best] {
                best = i;
            }
        }

        Classification {
            class: DamageClass::ALL[best],
            confidence: probabilities[best],
            probabilities,
        }
    }

    pub fn class_name(&self) -> &'static str {
        self.class.name()
    }

    /// (class, probability) pairs sorted by descending probability, for
    /// ranked display.
    pub fn ranked(&self) -> Vec<(DamageClass, f32)> {
        let mut rows: Vec<(DamageClass, f32)> = DamageClass::ALL
            .iter()
            .map(|&c| (c, self.probabilities[c.id()]))
            .collect();
        rows.sort_by(|a, b| b.1.total_cmp(&a.1));
        rows
    }
}
