//! Continuous scales (linear and logarithmic) with d3-compatible tick and
//! `nice` behavior.

const E10: f64 = 7.071_067_811_865_476; // sqrt(50)
const E5: f64 = 3.162_277_660_168_379_5; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LinearScale {
    domain: [f64; 2],
    range: [f64; 2],
}

impl LinearScale {
    pub fn new(domain: [f64; 2], range: [f64; 2]) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> [f64; 2] {
        self.domain
    }

    pub fn range(&self) -> [f64; 2] {
        self.range
    }

    /// Degenerate domains map everything to the middle of the range.
    pub fn apply(&self, v: f64) -> f64 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        let span = d1 - d0;
        let t = if span == 0.0 { 0.5 } else { (v - d0) / span };
        r0 + t * (r1 - r0)
    }

    /// Extends the domain outward to round tick boundaries.
    pub fn nice(mut self, count: usize) -> Self {
        let [mut start, mut stop] = self.domain;
        let reversed = stop < start;
        if reversed {
            std::mem::swap(&mut start, &mut stop);
        }

        let mut prestep: Option<f64> = None;
        for _ in 0..10 {
            let step = tick_increment(start, stop, count);
            if prestep == Some(step) {
                break;
            }
            if step > 0.0 {
                start = (start / step).floor() * step;
                stop = (stop / step).ceil() * step;
            } else if step < 0.0 {
                start = (start * step).ceil() / step;
                stop = (stop * step).floor() / step;
            } else {
                break;
            }
            prestep = Some(step);
        }

        self.domain = if reversed { [stop, start] } else { [start, stop] };
        self
    }

    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let [a, b] = self.domain;
        ticks(a.min(b), a.max(b), count)
    }
}

/// Log scale over a strictly positive domain.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LogScale {
    domain: [f64; 2],
    range: [f64; 2],
}

impl LogScale {
    pub fn new(domain: [f64; 2], range: [f64; 2]) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> [f64; 2] {
        self.domain
    }

    /// Returns `None` for non-positive input.
    pub fn apply(&self, v: f64) -> Option<f64> {
        if v <= 0.0 || !v.is_finite() {
            return None;
        }
        let l0 = self.domain[0].ln();
        let l1 = self.domain[1].ln();
        let [r0, r1] = self.range;
        let span = l1 - l0;
        let t = if span == 0.0 || !span.is_finite() {
            0.5
        } else {
            (v.ln() - l0) / span
        };
        Some(r0 + t * (r1 - r0))
    }
}

/// Step between ticks; negative values encode the reciprocal of a
/// fractional step (e.g. -10 means 0.1) to avoid rounding error.
pub fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    let step = (stop - start) / count.max(1) as f64;
    if step <= 0.0 || !step.is_finite() {
        return 0.0;
    }
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };
    if power >= 0.0 {
        factor * 10f64.powf(power)
    } else {
        -(10f64.powf(-power)) / factor
    }
}

/// Evenly spaced round values inside `[start, stop]`.
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }

    let step = tick_increment(start, stop, count);
    if step > 0.0 {
        let i0 = (start / step).ceil() as i64;
        let i1 = (stop / step).floor() as i64;
        (i0..=i1).map(|i| i as f64 * step).collect()
    } else if step < 0.0 {
        let inv = -step;
        let i0 = (start * inv).ceil() as i64;
        let i1 = (stop * inv).floor() as i64;
        (i0..=i1).map(|i| i as f64 / inv).collect()
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{LinearScale, LogScale, tick_increment, ticks};
    use pretty_assertions::assert_eq;

    #[test]
    fn linear_maps_endpoints() {
        let s = LinearScale::new([0.0, 10.0], [250.0, 20.0]);
        assert_eq!(s.apply(0.0), 250.0);
        assert_eq!(s.apply(10.0), 20.0);
        assert_eq!(s.apply(5.0), 135.0);
    }

    #[test]
    fn degenerate_linear_domain_hits_midpoint() {
        let s = LinearScale::new([3.0, 3.0], [0.0, 100.0]);
        assert_eq!(s.apply(3.0), 50.0);
    }

    #[test]
    fn nice_rounds_outward() {
        let s = LinearScale::new([0.0, 287.0], [0.0, 1.0]).nice(10);
        assert_eq!(s.domain(), [0.0, 300.0]);
        let s = LinearScale::new([0.2, 0.93], [0.0, 1.0]).nice(10);
        assert_eq!(s.domain(), [0.2, 1.0]);
    }

    #[test]
    fn ticks_are_round() {
        assert_eq!(ticks(0.0, 300.0, 5), vec![
            0.0, 50.0, 100.0, 150.0, 200.0, 250.0, 300.0
        ]);
        assert_eq!(ticks(1990.0, 2010.0, 10), vec![
            1990.0, 1992.0, 1994.0, 1996.0, 1998.0, 2000.0, 2002.0, 2004.0, 2006.0, 2008.0, 2010.0
        ]);
        assert_eq!(ticks(0.0, 1.0, 5), vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
    }

    #[test]
    fn increment_encodes_fractions_as_negative() {
        assert_eq!(tick_increment(0.0, 1.0, 10), -10.0);
        assert_eq!(tick_increment(0.0, 100.0, 10), 10.0);
    }

    #[test]
    fn log_scale_places_decades_evenly() {
        let s = LogScale::new([1.0, 1000.0], [0.0, 150.0]);
        assert!((s.apply(1.0).unwrap() - 0.0).abs() < 1e-9);
        assert!((s.apply(10.0).unwrap() - 50.0).abs() < 1e-9);
        assert!((s.apply(1000.0).unwrap() - 150.0).abs() < 1e-9);
        assert_eq!(s.apply(0.0), None);
    }
}
