//! Null-aware numeric helpers. Means skip nulls and are `None` when nothing
//! is left; sums treat nulls as zero.

#[derive(Debug, Clone, Copy, Default)]
pub struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    pub fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    pub fn value(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

pub fn mean<I: IntoIterator<Item = Option<f64>>>(values: I) -> Option<f64> {
    let mut acc = Mean::default();
    for v in values {
        acc.push(v);
    }
    acc.value()
}

pub fn sum<I: IntoIterator<Item = Option<f64>>>(values: I) -> f64 {
    values.into_iter().flatten().sum()
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_skips_nulls() {
        assert_eq!(mean([Some(70.0), None, Some(72.0)]), Some(71.0));
        assert_eq!(mean([None, None]), None);
        assert_eq!(mean(Vec::<Option<f64>>::new()), None);
    }

    #[test]
    fn test_sum_treats_nulls_as_zero() {
        assert_eq!(sum([Some(1.5), None, Some(2.0)]), 3.5);
        assert_eq!(sum([None]), 0.0);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.23456), 1.23);
        assert_eq!(round2(2.0 / 3.0), 0.67);
        assert_eq!(round2(71.0), 71.0);
    }
}
