//! Skip-if-recent freshness check for the generated stylesheet.

use std::path::Path;
use std::time::{Duration, SystemTime};

/// Whether a build may be skipped because `output` was written less than
/// `threshold` ago.
///
/// Always `false` when `enabled` is off or the output does not exist.
pub fn should_skip(output: &Path, threshold: Duration, enabled: bool) -> bool {
    should_skip_at(output, threshold, enabled, SystemTime::now())
}

/// [`should_skip`] evaluated at an explicit wall-clock time.
pub fn should_skip_at(output: &Path, threshold: Duration, enabled: bool, now: SystemTime) -> bool {
    if !enabled {
        return false;
    }

    let modified = match std::fs::metadata(output).and_then(|m| m.modified()) {
        Ok(modified) => modified,
        Err(_) => return false,
    };

    // A timestamp in the future counts as just written
    let age = now.duration_since(modified).unwrap_or(Duration::ZERO);
    age < threshold
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const THRESHOLD: Duration = Duration::from_secs(5);

    #[test]
    fn test_disabled_never_skips() {
        let tmp = TempDir::new().unwrap();
        let output = tmp.path().join("tailwind.css");
        fs::write(&output, "body{}").unwrap();

        assert!(!should_skip(&output, THRESHOLD, false));
    }

    #[test]
    fn test_missing_output_never_skips() {
        let tmp = TempDir::new().unwrap();
        assert!(!should_skip(&tmp.path().join("missing.css"), THRESHOLD, true));
    }

    #[test]
    fn test_fresh_and_stale_output() {
        let tmp = TempDir::new().unwrap();
        let output = tmp.path().join("tailwind.css");
        fs::write(&output, "body{}").unwrap();
        let modified = fs::metadata(&output).unwrap().modified().unwrap();

        assert!(should_skip_at(&output, THRESHOLD, true, modified + Duration::from_secs(1)));
        assert!(!should_skip_at(&output, THRESHOLD, true, modified + THRESHOLD));
        assert!(!should_skip_at(&output, THRESHOLD, true, modified + Duration::from_secs(60)));
    }

    #[test]
    fn test_future_mtime_counts_as_fresh() {
        let tmp = TempDir::new().unwrap();
        let output = tmp.path().join("tailwind.css");
        fs::write(&output, "body{}").unwrap();
        let modified = fs::metadata(&output).unwrap().modified().unwrap();

        assert!(should_skip_at(&output, THRESHOLD, true, modified - Duration::from_secs(30)));
    }
}
