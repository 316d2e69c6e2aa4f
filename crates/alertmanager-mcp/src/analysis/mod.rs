//! Pure views over a fetched alert snapshot.
//!
//! Nothing here performs I/O. Each function takes the alerts returned by a
//! single backend query and produces a structure plus its text rendering.

pub mod correlation;
pub mod investigation;
pub mod summary;

pub use correlation::{correlate, render_correlation, CorrelationGroup, CORRELATION_LABELS};
pub use investigation::{investigate, render_history, Instance, Investigation};
pub use summary::AlertSummary;

use chrono::Duration;

/// Render an elapsed duration as `1h2m3s`, `4m0s` or `45s`. Negative values render as `0s`.
#[must_use]
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.num_seconds().max(0);
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);

    if hours > 0 {
        format!("{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m{seconds}s")
    } else {
        format!("{seconds}s")
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_uses_largest_units() {
        assert_eq!(format_elapsed(Duration::seconds(3723)), "1h2m3s");
        assert_eq!(format_elapsed(Duration::seconds(240)), "4m0s");
        assert_eq!(format_elapsed(Duration::seconds(45)), "45s");
        assert_eq!(format_elapsed(Duration::hours(50)), "50h0m0s");
    }

    #[test]
    fn elapsed_truncates_and_clamps() {
        assert_eq!(format_elapsed(Duration::milliseconds(1999)), "1s");
        assert_eq!(format_elapsed(Duration::seconds(-30)), "0s");
        assert_eq!(format_elapsed(Duration::zero()), "0s");
    }
}
