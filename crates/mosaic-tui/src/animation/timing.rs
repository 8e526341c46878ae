//! Time and unit helpers for tile animation

use std::time::{Duration, Instant};

/// Calculate animation progress (0.0 to 1.0) at `now`
#[inline]
pub fn progress_at(start: Instant, duration: Duration, now: Instant) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_duration_since(start);
    (elapsed.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0)
}

/// Check if an animation started at `start` has finished by `now`
#[inline]
pub fn is_complete_at(start: Instant, duration: Duration, now: Instant) -> bool {
    now.saturating_duration_since(start) >= duration
}

/// Convert logical units to terminal cells, rounding to the nearest cell
#[inline]
pub fn to_cells(units: f64, units_per_cell: f64) -> u16 {
    if units_per_cell <= 0.0 || !units.is_finite() || units <= 0.0 {
        return 0;
    }
    (units / units_per_cell).round().min(u16::MAX as f64) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_zero_duration() {
        let start = Instant::now();
        assert!((progress_at(start, Duration::ZERO, start) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_progress_midway() {
        let start = Instant::now();
        let duration = Duration::from_millis(200);
        let now = start + Duration::from_millis(100);
        assert!((progress_at(start, duration, now) - 0.5).abs() < 0.001);
        assert!(!is_complete_at(start, duration, now));
        assert!(is_complete_at(start, duration, start + duration));
    }

    #[test]
    fn test_to_cells() {
        assert_eq!(to_cells(300.0, 16.0), 19);
        assert_eq!(to_cells(0.0, 16.0), 0);
        assert_eq!(to_cells(-4.0, 16.0), 0);
        assert_eq!(to_cells(100.0, 0.0), 0);
    }
}
