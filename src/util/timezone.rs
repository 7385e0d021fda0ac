use chrono::{DateTime, Datelike, TimeZone, Utc};
use chrono_tz::Tz;
use time::{Date, Month, OffsetDateTime, UtcOffset};

pub fn localized_datetime(time: OffsetDateTime, tz: Tz) -> DateTime<Tz> {
    let utc = time.to_offset(UtcOffset::UTC);
    let seconds = utc.unix_timestamp();
    let nanos: u32 = utc.nanosecond();
    let datetime_utc = DateTime::<Utc>::from_timestamp(seconds, nanos)
        .or_else(|| DateTime::<Utc>::from_timestamp(seconds, 0))
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
    tz.from_utc_datetime(&datetime_utc.naive_utc())
}

/// Calendar date of `time` as observed in `tz`.
pub fn localized_date(time: OffsetDateTime, tz: Tz) -> Date {
    let localized = localized_datetime(time, tz);
    let month = Month::try_from(localized.month() as u8)
        .expect("valid month value from chrono to time conversion");
    let day =
        u8::try_from(localized.day()).expect("valid day value from chrono to time conversion");
    Date::from_calendar_date(localized.year(), month, day).expect("valid calendar date")
}

#[cfg(test)]
mod tests {
    use time::macros::{date, datetime};

    use super::*;

    #[test]
    fn date_follows_the_zone_not_utc() {
        let late_evening_utc = datetime!(2026-10-18 20:30 UTC);
        assert_eq!(
            localized_date(late_evening_utc, chrono_tz::Asia::Ho_Chi_Minh),
            date!(2026 - 10 - 19)
        );
        assert_eq!(
            localized_date(late_evening_utc, chrono_tz::UTC),
            date!(2026 - 10 - 18)
        );
    }
}
