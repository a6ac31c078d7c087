//! Configuration types for the scheduling system.

use chrono::NaiveDateTime;

use crate::logging::VERBOSITY_SILENT;

/// Configuration for a graph-build-and-schedule run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchedulingConfig {
    /// Instant the first activities start at.
    pub project_start: NaiveDateTime,
    /// Logging verbosity (see [`crate::logging`]).
    pub verbosity: u8,
}

impl SchedulingConfig {
    pub fn new(project_start: NaiveDateTime) -> Self {
        Self {
            project_start,
            verbosity: VERBOSITY_SILENT,
        }
    }

    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::VERBOSITY_DEBUG;
    use chrono::NaiveDate;

    #[test]
    fn test_config_defaults_to_silent() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 4)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let config = SchedulingConfig::new(start);
        assert_eq!(config.project_start, start);
        assert_eq!(config.verbosity, VERBOSITY_SILENT);

        let config = config.with_verbosity(VERBOSITY_DEBUG);
        assert_eq!(config.verbosity, VERBOSITY_DEBUG);
    }
}
