#![forbid(unsafe_code)]

//! "Nice" numbers: tick increments, domain rounding and tick generation.
//!
//! Steps are powers of ten times 1, 2, 5 or 10, picked so that roughly
//! `count` steps span the interval.

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

/// Signed tick increment for `[start, stop]` split into about `count` steps.
///
/// Positive results are the step itself; negative results `-k` encode the
/// step `1 / k`, which keeps sub-unit steps exact.
pub fn tick_increment(start: f64, stop: f64, count: f64) -> f64 {
    let step = (stop - start) / count.max(0.0);
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
        -10f64.powf(-power) / factor
    }
}

/// Round `[start, stop]` outward to multiples of a nice step.
///
/// Degenerate or non-finite domains are returned unchanged.
pub fn nice(start: f64, stop: f64, count: f64) -> (f64, f64) {
    let (mut lo, mut hi, reversed) = if stop < start {
        (stop, start, true)
    } else {
        (start, stop, false)
    };
    let mut step = tick_increment(lo, hi, count);
    if step > 0.0 {
        lo = (lo / step).floor() * step;
        hi = (hi / step).ceil() * step;
        step = tick_increment(lo, hi, count);
    } else if step < 0.0 {
        lo = (lo * step).ceil() / step;
        hi = (hi * step).floor() / step;
        step = tick_increment(lo, hi, count);
    }
    let out = if step > 0.0 && step.is_finite() {
        ((lo / step).floor() * step, (hi / step).ceil() * step)
    } else if step < 0.0 && step.is_finite() {
        ((lo * step).ceil() / step, (hi * step).floor() / step)
    } else {
        return (start, stop);
    };
    if reversed { (out.1, out.0) } else { out }
}

/// About `count` nice tick values within `[start, stop]`.
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    let count = count as f64;
    if start == stop && count > 0.0 {
        return vec![start];
    }
    let (lo, hi, reversed) = if stop < start {
        (stop, start, true)
    } else {
        (start, stop, false)
    };
    let step = tick_increment(lo, hi, count);
    if step == 0.0 || !step.is_finite() {
        return Vec::new();
    }
    let mut out: Vec<f64> = if step > 0.0 {
        let first = (lo / step).ceil();
        let last = (hi / step).floor();
        let n = (last - first + 1.0).ceil().max(0.0) as usize;
        (0..n).map(|i| (first + i as f64) * step).collect()
    } else {
        let inv = -step;
        let first = (lo * inv).ceil();
        let last = (hi * inv).floor();
        let n = (last - first + 1.0).ceil().max(0.0) as usize;
        (0..n).map(|i| (first + i as f64) / inv).collect()
    };
    if reversed {
        out.reverse();
    }
    out
}

/// `start, start + step, …` strictly below `stop`.
pub fn range(start: f64, stop: f64, step: f64) -> Vec<f64> {
    if step == 0.0 || !step.is_finite() {
        return Vec::new();
    }
    let n = ((stop - start) / step).ceil().max(0.0) as usize;
    (0..n).map(|i| start + i as f64 * step).collect()
}

/// Round `v` to `decimals` places.
pub fn round_to(v: f64, decimals: usize) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (v * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increment_picks_1_2_5_10() {
        assert_eq!(tick_increment(0.0, 10.0, 10.0), 1.0);
        assert_eq!(tick_increment(0.0, 100.0, 10.0), 10.0);
        assert_eq!(tick_increment(0.0, 35.0, 10.0), 5.0);
        assert_eq!(tick_increment(1.0, 9.0, 10.0), -1.0);
        assert_eq!(tick_increment(0.0, 8.0 / 3.0, 10.0), -5.0);
    }

    #[test]
    fn nice_rounds_outward() {
        assert_eq!(nice(1.0, 9.0, 10.0), (1.0, 9.0));
        assert_eq!(nice(0.0, 8.0 / 3.0, 10.0), (0.0, 2.8));
        assert_eq!(nice(0.0, 10.0 / 3.0, 10.0), (0.0, 3.5));
        assert_eq!(nice(0.13, 9.87, 10.0), (0.0, 10.0));
        assert_eq!(nice(9.87, 0.13, 10.0), (10.0, 0.0));
    }

    #[test]
    fn nice_degenerate_unchanged() {
        assert_eq!(nice(4.0, 4.0, 10.0), (4.0, 4.0));
    }

    #[test]
    fn ticks_basic() {
        assert_eq!(ticks(0.0, 10.0, 5), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(ticks(0.0, 1.0, 3), vec![0.0, 0.5, 1.0]);
        assert_eq!(ticks(10.0, 0.0, 5), vec![10.0, 8.0, 6.0, 4.0, 2.0, 0.0]);
        assert_eq!(ticks(3.0, 3.0, 5), vec![3.0]);
    }

    #[test]
    fn range_excludes_stop() {
        assert_eq!(range(0.0, 10.0, 3.5), vec![0.0, 3.5, 7.0]);
        assert_eq!(range(0.0, 7.0, 3.5), vec![0.0, 3.5]);
        assert!(range(0.0, 1.0, 0.0).is_empty());
    }

    #[test]
    fn round_to_places() {
        assert_eq!(round_to(3.8000000000000003, 1), 3.8);
        assert_eq!(round_to(6.6, 1), 6.6);
        assert_eq!(round_to(2.345, 0), 2.0);
    }
}
