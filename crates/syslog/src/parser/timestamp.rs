//! 타임스탬프 문법
//!
//! 각 문법은 고정 폭(footprint)을 가지며, 후보 문자열은 `cursor + footprint`
//! 이후 첫 공백까지입니다. 문법은 선언 순서대로 시도됩니다.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};

/// 지원하는 타임스탬프 문법
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimestampGrammar {
    /// `2003-10-11T22:14:15.003Z`
    UtcMillis,
    /// `2003-08-24T05:14:15.000003-07:00`
    OffsetMicros,
    /// `Nov 10 14:38:52` (연도 없음, UTC). 한 자리 날짜는 `Nov  1`처럼 공백으로 채워질 수 있음
    Legacy,
}

impl TimestampGrammar {
    /// RFC 5424 분기에서 시도하는 순서
    pub(crate) const ALL: [Self; 3] = [Self::UtcMillis, Self::OffsetMicros, Self::Legacy];

    fn footprint(self) -> usize {
        match self {
            Self::UtcMillis => 24,
            Self::OffsetMicros => 32,
            Self::Legacy => 14,
        }
    }

    fn parse(self, candidate: &str, year: i32) -> Option<DateTime<FixedOffset>> {
        match self {
            Self::UtcMillis => NaiveDateTime::parse_from_str(candidate, "%Y-%m-%dT%H:%M:%S%.3fZ")
                .ok()
                .map(|naive| DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc).into()),
            Self::OffsetMicros => {
                DateTime::parse_from_str(candidate, "%Y-%m-%dT%H:%M:%S%.6f%:z").ok()
            }
            Self::Legacy => {
                // 공백으로 채운 한 자리 날짜를 일반 형태로 맞춤
                let candidate = candidate.replacen("  ", " ", 1);
                NaiveDateTime::parse_from_str(&format!("{year} {candidate}"), "%Y %b %d %H:%M:%S")
                    .ok()
                    .map(|naive| DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc).into())
            }
        }
    }
}

/// `cursor` 위치에서 `grammars`를 차례로 시도합니다.
///
/// 성공하면 날짜와 뒤따르는 공백 다음 커서를 반환합니다.
pub(crate) fn parse_at(
    raw: &str,
    cursor: usize,
    grammars: &[TimestampGrammar],
    year: i32,
) -> Option<(DateTime<FixedOffset>, usize)> {
    grammars.iter().find_map(|grammar| {
        let from = cursor + grammar.footprint();
        let space = from + raw.get(from..)?.find(' ')?;
        let candidate = raw.get(cursor..space)?;
        grammar
            .parse(candidate, year)
            .map(|date| (date, space + 1))
    })
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};

    use super::*;

    #[test]
    fn utc_millis() {
        let raw = "2003-10-11T22:14:15.003Z host";
        let (date, next) = parse_at(raw, 0, &TimestampGrammar::ALL, 2024).unwrap();
        assert_eq!(next, 25);
        assert_eq!((date.year(), date.month(), date.day()), (2003, 10, 11));
        assert_eq!(date.nanosecond(), 3_000_000);
        assert_eq!(date.offset().local_minus_utc(), 0);
    }

    #[test]
    fn offset_micros() {
        let raw = "2003-08-24T05:14:15.000003-07:00 192.0.2.1";
        let (date, next) = parse_at(raw, 0, &TimestampGrammar::ALL, 2024).unwrap();
        assert_eq!(next, 33);
        assert_eq!(date.hour(), 5);
        assert_eq!(date.nanosecond(), 3_000);
        assert_eq!(date.offset().local_minus_utc(), -7 * 3600);
    }

    #[test]
    fn legacy_uses_supplied_year() {
        let raw = "Nov 10 14:38:52 machine";
        let (date, next) = parse_at(raw, 0, &[TimestampGrammar::Legacy], 2021).unwrap();
        assert_eq!(next, 16);
        assert_eq!((date.year(), date.month(), date.day()), (2021, 11, 10));
        assert_eq!((date.hour(), date.minute(), date.second()), (14, 38, 52));
    }

    #[test]
    fn legacy_space_padded_day() {
        let raw = "Nov  1 14:38:52 machine";
        let (date, next) = parse_at(raw, 0, &[TimestampGrammar::Legacy], 2021).unwrap();
        assert_eq!(next, 16);
        assert_eq!((date.month(), date.day()), (11, 1));
        assert_eq!((date.hour(), date.minute(), date.second()), (14, 38, 52));
    }

    #[test]
    fn legacy_unpadded_single_digit_day() {
        let raw = "Nov 1 14:38:52 machine";
        let (date, next) = parse_at(raw, 0, &[TimestampGrammar::Legacy], 2021).unwrap();
        assert_eq!(next, 15);
        assert_eq!(date.day(), 1);
    }

    #[test]
    fn no_trailing_space_fails() {
        assert!(parse_at("2003-10-11T22:14:15.003Z", 0, &TimestampGrammar::ALL, 2024).is_none());
    }

    #[test]
    fn garbage_fails_every_grammar() {
        let raw = "this is certainly not a timestamp at all ok";
        assert!(parse_at(raw, 0, &TimestampGrammar::ALL, 2024).is_none());
    }

    #[test]
    fn cursor_past_end_fails() {
        assert!(parse_at("short", 10, &TimestampGrammar::ALL, 2024).is_none());
    }
}
