pub struct Statistics;

impl Statistics {
    /// Largest finite value, ignoring absent entries.
    pub fn max<I>(values: I) -> Option<f64>
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        values
            .into_iter()
            .flatten()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.max(v))))
    }

    pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
        let first = *values.first()?;
        let mut min = first;
        let mut max = first;
        for &v in values.iter().skip(1) {
            min = min.min(v);
            max = max.max(v);
        }
        Some((min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::Statistics;

    #[test]
    fn max_skips_missing_and_nan() {
        let m = Statistics::max([Some(3.0), None, Some(f64::NAN), Some(7.5), Some(-1.0)]);
        assert_eq!(m, Some(7.5));
        assert_eq!(Statistics::max([None, None]), None);
    }

    #[test]
    fn min_max_works() {
        assert_eq!(Statistics::min_max(&[2000.0, 1990.0, 2010.0]), Some((1990.0, 2010.0)));
        assert_eq!(Statistics::min_max(&[]), None);
    }
}
