//! Syslog severity (RFC 5424 Section 6.2.1, Table 2)

use std::fmt;

use serde::Serialize;

/// 메시지의 긴급도
///
/// PRI 값에서 `priority % 8`로 유도됩니다. 숫자가 작을수록 긴급합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// 시스템 사용 불가
    Emergency = 0,
    /// 즉시 조치 필요
    Alert = 1,
    /// 치명적 상태
    Critical = 2,
    /// 에러 상태
    Error = 3,
    /// 경고 상태
    Warning = 4,
    /// 정상이지만 주목할 상태
    Notice = 5,
    /// 정보성 메시지
    Informational = 6,
    /// 디버그 메시지
    Debug = 7,
}

impl Severity {
    /// PRI 값에서 severity를 유도합니다 (`priority % 8`).
    pub fn from_priority(priority: u32) -> Self {
        match priority % 8 {
            0 => Self::Emergency,
            1 => Self::Alert,
            2 => Self::Critical,
            3 => Self::Error,
            4 => Self::Warning,
            5 => Self::Notice,
            6 => Self::Informational,
            _ => Self::Debug,
        }
    }

    /// severity 코드를 반환합니다.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// 소문자 약칭을 반환합니다.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Emergency => "emerg",
            Self::Alert => "alert",
            Self::Critical => "crit",
            Self::Error => "err",
            Self::Warning => "warning",
            Self::Notice => "notice",
            Self::Informational => "info",
            Self::Debug => "debug",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_priority_takes_remainder() {
        assert_eq!(Severity::from_priority(151), Severity::Debug);
        assert_eq!(Severity::from_priority(3), Severity::Error);
        assert_eq!(Severity::from_priority(34), Severity::Critical);
        assert_eq!(Severity::from_priority(165), Severity::Notice);
        assert_eq!(Severity::from_priority(0), Severity::Emergency);
        assert_eq!(Severity::from_priority(1000), Severity::Emergency);
    }

    #[test]
    fn lower_code_is_more_urgent() {
        assert!(Severity::Emergency < Severity::Debug);
        assert_eq!(Severity::Warning.code(), 4);
    }

    #[test]
    fn display_short_names() {
        assert_eq!(Severity::Emergency.to_string(), "emerg");
        assert_eq!(Severity::Informational.to_string(), "info");
    }
}
