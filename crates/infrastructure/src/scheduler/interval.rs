//! Conversion of minimum intervals into cron schedules
//!
//! Steps are rounded up to a divisor of the enclosing unit so consecutive
//! firings are never closer than the requested interval, including across
//! the minute/hour/day wrap.

use std::time::Duration;

use super::SchedulerError;

/// Predefined cron expressions (6 fields: sec min hour day month weekday)
pub mod schedules {
    /// Every minute
    pub const EVERY_MINUTE: &str = "0 * * * * *";
    /// Every hour
    pub const HOURLY: &str = "0 0 * * * *";
    /// Every two hours
    pub const EVERY_2_HOURS: &str = "0 0 */2 * * *";
    /// Every day at midnight
    pub const DAILY_MIDNIGHT: &str = "0 0 0 * * *";
}

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: u64 = 24 * SECONDS_PER_HOUR;

/// Cron expression firing no more often than `interval`
///
/// # Errors
///
/// Returns `UnsupportedInterval` for a zero interval or one longer than a day.
pub fn interval_to_cron(interval: Duration) -> Result<String, SchedulerError> {
    let secs = interval.as_secs() + u64::from(interval.subsec_nanos() > 0);

    if secs == 0 {
        return Err(SchedulerError::UnsupportedInterval(
            "interval must be at least one second".to_string(),
        ));
    }
    if secs > SECONDS_PER_DAY {
        return Err(SchedulerError::UnsupportedInterval(format!(
            "{secs}s exceeds one day"
        )));
    }

    let expression = if secs < SECONDS_PER_MINUTE {
        match smallest_divisor_at_least(60, secs) {
            60 => schedules::EVERY_MINUTE.to_string(),
            step => format!("*/{step} * * * * *"),
        }
    } else if secs < SECONDS_PER_HOUR {
        match smallest_divisor_at_least(60, secs.div_ceil(SECONDS_PER_MINUTE)) {
            60 => schedules::HOURLY.to_string(),
            step => format!("0 */{step} * * * *"),
        }
    } else if secs < SECONDS_PER_DAY {
        match smallest_divisor_at_least(24, secs.div_ceil(SECONDS_PER_HOUR)) {
            24 => schedules::DAILY_MIDNIGHT.to_string(),
            1 => schedules::HOURLY.to_string(),
            step => format!("0 0 */{step} * * *"),
        }
    } else {
        schedules::DAILY_MIDNIGHT.to_string()
    };

    Ok(expression)
}

fn smallest_divisor_at_least(n: u64, min: u64) -> u64 {
    (min..=n).find(|d| n % d == 0).unwrap_or(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expr_for(secs: u64) -> String {
        interval_to_cron(Duration::from_secs(secs)).unwrap()
    }

    #[test]
    fn two_hours_maps_to_every_second_hour() {
        assert_eq!(expr_for(2 * 60 * 60), schedules::EVERY_2_HOURS);
    }

    #[test]
    fn seconds_round_up_to_divisor_of_sixty() {
        assert_eq!(expr_for(1), "*/1 * * * * *");
        assert_eq!(expr_for(7), "*/10 * * * * *");
        assert_eq!(expr_for(30), "*/30 * * * * *");
        assert_eq!(expr_for(45), schedules::EVERY_MINUTE);
    }

    #[test]
    fn minutes_round_up() {
        assert_eq!(expr_for(60), "0 */1 * * * *");
        assert_eq!(expr_for(5 * 60), "0 */5 * * * *");
        assert_eq!(expr_for(7 * 60), "0 */10 * * * *");
        assert_eq!(expr_for(61), "0 */2 * * * *");
        assert_eq!(expr_for(45 * 60), schedules::HOURLY);
    }

    #[test]
    fn hours_round_up_to_divisor_of_twenty_four() {
        assert_eq!(expr_for(60 * 60), schedules::HOURLY);
        assert_eq!(expr_for(90 * 60), schedules::EVERY_2_HOURS);
        assert_eq!(expr_for(5 * 60 * 60), "0 0 */6 * * *");
        assert_eq!(expr_for(13 * 60 * 60), schedules::DAILY_MIDNIGHT);
        assert_eq!(expr_for(24 * 60 * 60), schedules::DAILY_MIDNIGHT);
    }

    #[test]
    fn sub_second_remainder_rounds_up() {
        let expression = interval_to_cron(Duration::from_millis(1500)).unwrap();
        assert_eq!(expression, "*/2 * * * * *");
    }

    #[test]
    fn zero_and_multi_day_intervals_are_rejected() {
        assert!(matches!(
            interval_to_cron(Duration::ZERO),
            Err(SchedulerError::UnsupportedInterval(_))
        ));
        assert!(matches!(
            interval_to_cron(Duration::from_secs(2 * 24 * 60 * 60)),
            Err(SchedulerError::UnsupportedInterval(_))
        ));
    }

    #[test]
    fn generated_expressions_parse() {
        for secs in [1, 7, 45, 60, 61, 600, 3600, 5400, 7200, 18000, 86400] {
            let expression = expr_for(secs);
            assert!(
                expression.parse::<cron::Schedule>().is_ok(),
                "{expression} should parse"
            );
        }
    }
}
