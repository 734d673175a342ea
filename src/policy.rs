//! Auto-action policy.
//!
//! Pure decision functions evaluated by the state machine. They read only
//! the settings snapshot and the latest reported speed, so they are
//! testable without any transport or subsystem in place.

use crate::settings::AppSettings;

/// Speed above which movement-triggered auto-logging kicks in.
pub const AUTO_LOG_MOVING_SPEED: f64 = 3.5;

/// Whether the logger should start immediately when the link comes up.
///
/// Immediate auto-log applies only when the "log on movement" mode is off;
/// otherwise [`should_start_logger_on_move`] takes over.
pub fn should_start_logger_on_connect(settings: &AppSettings) -> bool {
    settings.auto_log && !settings.start_auto_logging_when_is_moving
}

/// Whether the logger should start on a telemetry tick at the given speed.
pub fn should_start_logger_on_move(settings: &AppSettings, speed: f64) -> bool {
    settings.auto_log
        && settings.start_auto_logging_when_is_moving
        && speed > AUTO_LOG_MOVING_SPEED
}

/// Whether a wearable mirror session should start automatically on connect.
pub fn should_auto_mirror(settings: &AppSettings) -> bool {
    settings.auto_watch
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(auto_log: bool, on_moving: bool) -> AppSettings {
        AppSettings {
            auto_log,
            start_auto_logging_when_is_moving: on_moving,
            ..Default::default()
        }
    }

    #[test]
    fn test_start_on_connect() {
        assert!(should_start_logger_on_connect(&settings(true, false)));
        assert!(!should_start_logger_on_connect(&settings(true, true)));
        assert!(!should_start_logger_on_connect(&settings(false, false)));
        assert!(!should_start_logger_on_connect(&settings(false, true)));
    }

    #[test]
    fn test_start_on_move_requires_speed_above_threshold() {
        let s = settings(true, true);
        assert!(!should_start_logger_on_move(&s, 0.0));
        assert!(!should_start_logger_on_move(&s, 3.5));
        assert!(should_start_logger_on_move(&s, 3.6));
    }

    #[test]
    fn test_start_on_move_requires_both_flags() {
        assert!(!should_start_logger_on_move(&settings(true, false), 10.0));
        assert!(!should_start_logger_on_move(&settings(false, true), 10.0));
        assert!(!should_start_logger_on_move(&settings(false, false), 10.0));
    }

    #[test]
    fn test_connect_and_move_rules_are_mutually_exclusive() {
        // One rule requires the "on moving" flag set, the other requires it
        // clear, so no settings value can satisfy both.
        for auto_log in [false, true] {
            for on_moving in [false, true] {
                let s = settings(auto_log, on_moving);
                let both = should_start_logger_on_connect(&s)
                    && should_start_logger_on_move(&s, f64::MAX);
                assert!(!both, "both rules fired for {s:?}");
            }
        }
    }

    #[test]
    fn test_auto_mirror() {
        let mut s = AppSettings::default();
        assert!(!should_auto_mirror(&s));
        s.auto_watch = true;
        assert!(should_auto_mirror(&s));
    }
}
