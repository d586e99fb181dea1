pub const MINUTES_PER_DAY: i32 = 1440;

/// Maps a normalized horizontal hand position onto a time of day.
/// The centre of the frame is the base time; the edges are ± the maximum
/// adjustment, clamped to the 24-hour range.
#[derive(Debug, Clone, Copy)]
pub struct TimeDial {
    base_minutes: i32,
    max_adjustment: i32,
}

impl TimeDial {
    pub fn new(base_minutes: i32, max_adjustment: i32) -> Self {
        Self {
            base_minutes,
            max_adjustment,
        }
    }

    pub fn base_minutes(&self) -> i32 {
        self.base_minutes
    }

    pub fn minutes_for(&self, x: f64) -> i32 {
        let offset = ((x - 0.5) * 2.0 * self.max_adjustment as f64).round() as i32;
        (self.base_minutes + offset).clamp(0, MINUTES_PER_DAY - 1)
    }
}

impl Default for TimeDial {
    fn default() -> Self {
        // 07:30 base, ±4 hours of travel.
        Self::new(450, 240)
    }
}

pub fn format_hhmm(minutes: i32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centre_left_and_right_map_to_the_reference_times() {
        let dial = TimeDial::default();
        assert_eq!(dial.minutes_for(0.5), 450);
        assert_eq!(dial.minutes_for(0.0), 210);
        assert_eq!(dial.minutes_for(1.0), 690);
    }

    #[test]
    fn outputs_stay_inside_one_day() {
        let low = TimeDial::new(30, 240);
        assert_eq!(low.minutes_for(0.0), 0);

        let high = TimeDial::new(1430, 240);
        assert_eq!(high.minutes_for(1.0), MINUTES_PER_DAY - 1);
    }

    #[test]
    fn offsets_round_to_the_nearest_minute() {
        let dial = TimeDial::default();
        // (0.501 - 0.5) * 480 = 0.48 -> rounds to 0.
        assert_eq!(dial.minutes_for(0.501), 450);
        // (0.502 - 0.5) * 480 = 0.96 -> rounds to 1.
        assert_eq!(dial.minutes_for(0.502), 451);
    }

    #[test]
    fn formats_zero_padded_hours_and_minutes() {
        assert_eq!(format_hhmm(450), "07:30");
        assert_eq!(format_hhmm(0), "00:00");
        assert_eq!(format_hhmm(1439), "23:59");
        assert_eq!(format_hhmm(61), "01:01");
    }
}
