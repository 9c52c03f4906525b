use crate::models::ReadingStatus;

/// Fraction of each bound that separates the warning band from the critical band.
const CRITICAL_MARGIN: f64 = 0.2;

/// Classify a value against an inclusive normal range `(low, high)`.
///
/// The critical margin is taken against each bound on its own, so a range
/// like `(22.0, 28.0)` turns critical below 17.6 and above 33.6.
pub fn classify(value: f64, range: (f64, f64)) -> ReadingStatus {
    let (low, high) = range;

    if value >= low && value <= high {
        ReadingStatus::Normal
    } else if value < low - low * CRITICAL_MARGIN || value > high + high * CRITICAL_MARGIN {
        ReadingStatus::Critical
    } else {
        ReadingStatus::Warning
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_temperature_bands() {
        assert_eq!(classify(25.0, (22.0, 28.0)), ReadingStatus::Normal);
        assert_eq!(classify(17.0, (22.0, 28.0)), ReadingStatus::Critical);
        assert_eq!(classify(20.0, (22.0, 28.0)), ReadingStatus::Warning);
    }

    #[test]
    fn test_classify_bounds_are_inclusive() {
        assert_eq!(classify(22.0, (22.0, 28.0)), ReadingStatus::Normal);
        assert_eq!(classify(28.0, (22.0, 28.0)), ReadingStatus::Normal);
        assert_eq!(classify(17.7, (22.0, 28.0)), ReadingStatus::Warning);
        assert_eq!(classify(33.5, (22.0, 28.0)), ReadingStatus::Warning);
        assert_eq!(classify(33.7, (22.0, 28.0)), ReadingStatus::Critical);
    }

    #[test]
    fn test_classify_margin_is_asymmetric() {
        // Low side margin is 120, high side margin is 240
        assert_eq!(classify(481.0, (600.0, 1200.0)), ReadingStatus::Warning);
        assert_eq!(classify(479.0, (600.0, 1200.0)), ReadingStatus::Critical);
        assert_eq!(classify(1439.0, (600.0, 1200.0)), ReadingStatus::Warning);
        assert_eq!(classify(1441.0, (600.0, 1200.0)), ReadingStatus::Critical);
    }
}
