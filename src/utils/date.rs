//! Calendar date conversion without timezone dependencies.
//!
//! Commit timestamps arrive as seconds since the Unix epoch plus the
//! author's UTC offset. `DateTime::from_unix` turns that pair into the
//! wall-clock date the author saw, which is what `@git:lastUpdated` shows.

/// Wall-clock date and time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTime {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl DateTime {
    /// Convert Unix seconds, shifted by `offset_secs`, to a calendar date.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // Ranges checked by construction
    pub fn from_unix(secs: i64, offset_secs: i32) -> Self {
        let local = secs + i64::from(offset_secs);
        let days = local.div_euclid(86_400);
        let rem = local.rem_euclid(86_400);

        let (year, month, day) = civil_from_days(days);
        Self {
            year,
            month,
            day,
            hour: (rem / 3600) as u8,
            minute: ((rem / 60) % 60) as u8,
            second: (rem % 60) as u8,
        }
    }

    /// Format as `YYYY-MM-DD`.
    pub fn to_date_string(self) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// Days since 1970-01-01 to (year, month, day), proleptic Gregorian.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn civil_from_days(days: i64) -> (i32, u8, u8) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u8;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u8;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year as i32, month, day)
}
