//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Round a price-like value to two decimal places, returning 0.0 for non-finite values.
#[must_use]
pub fn round_cents(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value * 100.0).round() / 100.0
}

/// Convert a `usize` count to f64 while allowing precision loss in a single location.
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(0.0)
}

/// Narrow a u64 draw into an index below `len`, returning 0 for empty ranges.
#[must_use]
pub fn index_below(draw: u64, len: usize) -> usize {
    let Some(len64) = cast::<usize, u64>(len).filter(|l| *l > 0) else {
        return 0;
    };
    cast::<u64, usize>(draw % len64).unwrap_or(0)
}

/// Map `value` from `[min, max]` onto `0.0..=100.0`, clamping outside values.
#[must_use]
pub fn percent_of_range(value: i32, min: i32, max: i32) -> f64 {
    if max <= min {
        return 0.0;
    }
    let clamped = value.clamp(min, max);
    f64::from(clamped - min) / f64::from(max - min) * 100.0
}
