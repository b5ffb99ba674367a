#[cfg(not(target_arch = "wasm32"))]
pub use time::{OffsetDateTime, UtcOffset};

/// Parses a PDF date string of the form `D:YYYYMMDDHHmmSSOHH'mm'`, where the `O` offset
/// segment (`+`, `-`, or `Z`) and everything after it is optional, and trailing fields are
/// optional (a bare `D:YYYY` is valid). Some producers append a stray trailing apostrophe
/// after the minute field (`+02'00'` becomes `+02'00''` or similar); that is tolerated rather
/// than rejected, matching real-world PDF producers.
pub fn parse_pdf_date(raw: &str) -> Result<OffsetDateTime, String> {
    let s = raw.strip_prefix("D:").unwrap_or(raw);
    let bytes = s.as_bytes();
    if bytes.len() < 4 {
        return Err("date string too short to contain a year".to_string());
    }

    let digits = |start: usize, len: usize, default: u32| -> Result<u32, String> {
        if start + len > bytes.len() {
            return Ok(default);
        }
        s.get(start..start + len)
            .ok_or_else(|| "date field out of range".to_string())?
            .parse::<u32>()
            .map_err(|e| e.to_string())
    };

    let year = digits(0, 4, 1970)? as i32;
    let month = digits(4, 2, 1)?.max(1).min(12);
    let day = digits(6, 2, 1)?.max(1).min(31);
    let hour = digits(8, 2, 0)?;
    let minute = digits(10, 2, 0)?;
    let second = digits(12, 2, 0)?;

    let month = time::Month::try_from(month as u8).map_err(|e| e.to_string())?;
    let date = time::Date::from_calendar_date(year, month, day as u8).map_err(|e| e.to_string())?;
    let time_of_day =
        time::Time::from_hms(hour as u8, minute as u8, second as u8).map_err(|e| e.to_string())?;

    // Offset segment begins at byte 14: either "Z", "+HH'mm'" or "-HH'mm'", with an
    // optional stray trailing apostrophe tolerated.
    let offset = if bytes.len() > 14 {
        let sign = bytes[14] as char;
        match sign {
            'Z' => time::UtcOffset::UTC,
            '+' | '-' => {
                let oh: i8 = s.get(15..17).unwrap_or("00").parse().unwrap_or(0);
                let om: i8 = s
                    .get(18..20)
                    .or_else(|| s.get(18..s.len().min(20)))
                    .unwrap_or("00")
                    .trim_end_matches('\'')
                    .parse()
                    .unwrap_or(0);
                let signed = if sign == '-' { -1 } else { 1 };
                time::UtcOffset::from_hms(signed * oh, signed * om, 0).map_err(|e| e.to_string())?
            }
            _ => time::UtcOffset::UTC,
        }
    } else {
        time::UtcOffset::UTC
    };

    Ok(OffsetDateTime::new_in_offset(date, time_of_day, offset))
}

/// Formats an [`OffsetDateTime`] back into the PDF `D:YYYYMMDDHHmmSSOHH'mm'` date form.
pub fn format_pdf_date(dt: OffsetDateTime) -> String {
    let offset = dt.offset();
    let total_minutes = offset.whole_hours() as i32 * 60 + offset.minutes_past_hour() as i32;
    let sign = if total_minutes < 0 { '-' } else { '+' };
    let oh = (total_minutes.abs()) / 60;
    let om = (total_minutes.abs()) % 60;
    format!(
        "D:{:04}{:02}{:02}{:02}{:02}{:02}{}{:02}'{:02}'",
        dt.year(),
        dt.month() as u8,
        dt.day(),
        dt.hour(),
        dt.minute(),
        dt.second(),
        sign,
        oh,
        om,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_date_with_offset() {
        let dt = parse_pdf_date("D:20170505150224+02'00'").unwrap();
        assert_eq!(dt.year(), 2017);
        assert_eq!(dt.hour(), 15);
    }

    #[test]
    fn tolerates_stray_trailing_apostrophe() {
        let dt = parse_pdf_date("D:20170505150224+02'00''").unwrap();
        assert_eq!(dt.minute(), 2);
    }

    #[test]
    fn round_trips_through_format() {
        let original = parse_pdf_date("D:20230101000000+00'00'").unwrap();
        let formatted = format_pdf_date(original);
        let reparsed = parse_pdf_date(&formatted).unwrap();
        assert_eq!(original, reparsed);
    }

    #[test]
    fn bare_year_is_accepted() {
        let dt = parse_pdf_date("D:2020").unwrap();
        assert_eq!(dt.year(), 2020);
        assert_eq!(dt.month() as u8, 1);
    }

    #[test]
    fn non_digit_field_is_an_error_not_a_panic() {
        assert!(parse_pdf_date("D:2020XX01").is_err());
    }
}

/// wasm32-unknown-unknown polyfill

#[cfg(all(feature = "js-sys", target_arch = "wasm32"))]
pub use self::js_sys_date::OffsetDateTime;
#[cfg(all(feature = "js-sys", target_arch = "wasm32"))]
mod js_sys_date {
    use js_sys::Date;
    use time::Month;

    #[derive(Debug, Clone, Default, PartialEq, PartialOrd, Ord, Eq, Hash)]
    pub struct OffsetDateTime(Date);

    impl serde::Serialize for OffsetDateTime {
        fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            "1970-01-01 00:00:00.00 +00:00:00".serialize(serializer)
        }
    }

    impl<'de> serde::Deserialize<'de> for OffsetDateTime {
        fn deserialize<D: serde::Deserializer<'de>>(
            deserializer: D,
        ) -> Result<OffsetDateTime, D::Error> {
            let _ = String::deserialize(deserializer)?;
            Ok(OffsetDateTime::now_utc())
        }
    }

    impl OffsetDateTime {
        pub fn unix_timestamp(self) -> i64 {
            0
        }

        pub fn from_unix_timestamp(_: i64) -> Option<Self> {
            Some(Self(Date::new(&(1000.0 * 60.0 * 24.0 * 5.0).into())))
        }

        #[inline(always)]
        pub fn now_utc() -> Self {
            let date = Date::new_0();
            OffsetDateTime(date)
        }

        #[inline(always)]
        pub fn now() -> Self {
            let date = Date::new_0();
            OffsetDateTime(date)
        }

        #[inline(always)]
        pub fn format(&self, format: impl ToString) -> String {
            // TODO
            "".into()
        }

        #[inline(always)]
        pub fn year(&self) -> i32 {
            self.0.get_full_year() as i32
        }

        #[inline(always)]
        pub fn month(&self) -> Month {
            match self.0.get_month() {
                0 => Month::January,
                1 => Month::February,
                2 => Month::March,
                3 => Month::April,
                4 => Month::May,
                5 => Month::June,
                6 => Month::July,
                7 => Month::August,
                8 => Month::September,
                9 => Month::October,
                10 => Month::November,
                11 => Month::December,
                _ => unreachable!(),
            }
        }

        #[inline(always)]
        pub fn day(&self) -> u8 {
            self.0.get_date() as u8
        }

        #[inline(always)]
        pub fn hour(&self) -> u8 {
            self.0.get_hours() as u8
        }

        #[inline(always)]
        pub fn minute(&self) -> u8 {
            self.0.get_minutes() as u8
        }

        #[inline(always)]
        pub fn second(&self) -> u8 {
            self.0.get_seconds() as u8
        }

        #[inline]
        pub fn offset(&self) -> super::UtcOffset {
            super::UtcOffset {
                hours: 0,
                minutes: 0,
                seconds: 0,
            }
        }
    }
}

#[cfg(all(not(feature = "js-sys"), target_arch = "wasm32"))]
pub use self::unix_epoch_stub_date::OffsetDateTime;
#[cfg(all(not(feature = "js-sys"), target_arch = "wasm32"))]
mod unix_epoch_stub_date {
    use time::Month;

    #[derive(Debug, PartialEq, Default, Copy, Clone, Eq, Ord, PartialOrd, Hash)]
    pub struct OffsetDateTime;

    impl serde::Serialize for OffsetDateTime {
        fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            "1970-01-01 00:00:00.00 +00:00:00".serialize(serializer)
        }
    }

    impl<'de> serde::Deserialize<'de> for OffsetDateTime {
        fn deserialize<D: serde::Deserializer<'de>>(
            deserializer: D,
        ) -> Result<OffsetDateTime, D::Error> {
            let _ = String::deserialize(deserializer)?;
            Ok(OffsetDateTime::from_unix_timestamp(0).unwrap_or_default())
        }
    }

    impl OffsetDateTime {
        pub fn from_unix_timestamp(_: usize) -> Result<Self, String> {
            Ok(OffsetDateTime)
        }

        pub fn unix_timestamp(self) -> i64 {
            0
        }

        #[inline(always)]
        pub fn now_utc() -> Self {
            OffsetDateTime
        }

        #[inline(always)]
        pub fn now() -> Self {
            OffsetDateTime
        }

        #[inline(always)]
        pub fn format(&self, _: impl ToString) -> String {
            // TODO
            "".into()
        }

        #[inline(always)]
        pub fn year(&self) -> i32 {
            1970
        }

        #[inline(always)]
        pub fn month(&self) -> Month {
            Month::January
        }

        #[inline(always)]
        pub fn day(&self) -> u8 {
            1
        }

        #[inline(always)]
        pub fn hour(&self) -> u8 {
            0
        }

        #[inline(always)]
        pub fn minute(&self) -> u8 {
            0
        }

        #[inline(always)]
        pub fn second(&self) -> u8 {
            0
        }

        #[inline]
        pub fn offset(&self) -> super::UtcOffset {
            super::UtcOffset {
                hours: 0,
                minutes: 0,
                seconds: 0,
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UtcOffset {
    hours: i8,
    minutes: i8,
    seconds: i8,
}

#[cfg(target_arch = "wasm32")]
impl UtcOffset {
    pub const fn from_hms(hours: i8, minutes: i8, seconds: i8) -> Result<Self, &'static str> {
        Ok(Self {
            hours,
            minutes,
            seconds,
        })
    }

    pub const fn whole_hours(self) -> i8 {
        self.hours
    }

    pub const fn is_negative(self) -> bool {
        self.hours < 0 || self.minutes < 0 || self.seconds < 0
    }

    pub const fn minutes_past_hour(self) -> i8 {
        self.minutes
    }
}
