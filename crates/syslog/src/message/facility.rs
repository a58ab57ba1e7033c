//! Syslog facility (RFC 5424 Section 6.2.1, Table 1)

use std::fmt;

use serde::Serialize;

/// 메시지를 생성한 소스의 대분류
///
/// PRI 값에서 `priority / 8`로 유도되며, 유효 범위는 0-23입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Facility {
    /// 커널 메시지
    Kernel = 0,
    /// 사용자 수준 메시지
    User = 1,
    /// 메일 시스템
    Mail = 2,
    /// 시스템 데몬
    Daemon = 3,
    /// 보안/인증 메시지
    Auth = 4,
    /// syslogd 내부 메시지
    Syslog = 5,
    /// 라인 프린터 서브시스템
    Lpr = 6,
    /// 네트워크 뉴스 서브시스템
    News = 7,
    /// UUCP 서브시스템
    Uucp = 8,
    /// 클록 데몬 (cron)
    Cron = 9,
    /// 보안/인증 메시지 (private)
    AuthPriv = 10,
    /// FTP 데몬
    Ftp = 11,
    /// NTP 서브시스템
    Ntp = 12,
    /// 로그 감사
    Audit = 13,
    /// 로그 경보
    Alert = 14,
    /// 클록 데몬
    Clock = 15,
    Local0 = 16,
    Local1 = 17,
    Local2 = 18,
    Local3 = 19,
    Local4 = 20,
    Local5 = 21,
    Local6 = 22,
    Local7 = 23,
}

impl Facility {
    /// facility 코드(0-23)를 변환합니다. 범위 밖이면 `None`.
    pub fn from_code(code: u8) -> Option<Self> {
        let facility = match code {
            0 => Self::Kernel,
            1 => Self::User,
            2 => Self::Mail,
            3 => Self::Daemon,
            4 => Self::Auth,
            5 => Self::Syslog,
            6 => Self::Lpr,
            7 => Self::News,
            8 => Self::Uucp,
            9 => Self::Cron,
            10 => Self::AuthPriv,
            11 => Self::Ftp,
            12 => Self::Ntp,
            13 => Self::Audit,
            14 => Self::Alert,
            15 => Self::Clock,
            16 => Self::Local0,
            17 => Self::Local1,
            18 => Self::Local2,
            19 => Self::Local3,
            20 => Self::Local4,
            21 => Self::Local5,
            22 => Self::Local6,
            23 => Self::Local7,
            _ => return None,
        };
        Some(facility)
    }

    /// PRI 값에서 facility를 유도합니다 (`priority / 8`).
    ///
    /// 몫이 23을 넘으면 `None`입니다.
    pub fn from_priority(priority: u32) -> Option<Self> {
        u8::try_from(priority / 8).ok().and_then(Self::from_code)
    }

    /// facility 코드를 반환합니다.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// 소문자 이름을 반환합니다 (Linux 관례).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Kernel => "kern",
            Self::User => "user",
            Self::Mail => "mail",
            Self::Daemon => "daemon",
            Self::Auth => "auth",
            Self::Syslog => "syslog",
            Self::Lpr => "lpr",
            Self::News => "news",
            Self::Uucp => "uucp",
            Self::Cron => "cron",
            Self::AuthPriv => "authpriv",
            Self::Ftp => "ftp",
            Self::Ntp => "ntp",
            Self::Audit => "audit",
            Self::Alert => "alert",
            Self::Clock => "clock",
            Self::Local0 => "local0",
            Self::Local1 => "local1",
            Self::Local2 => "local2",
            Self::Local3 => "local3",
            Self::Local4 => "local4",
            Self::Local5 => "local5",
            Self::Local6 => "local6",
            Self::Local7 => "local7",
        }
    }
}

impl fmt::Display for Facility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_priority_divides_by_eight() {
        assert_eq!(Facility::from_priority(151), Some(Facility::Local2));
        assert_eq!(Facility::from_priority(3), Some(Facility::Kernel));
        assert_eq!(Facility::from_priority(34), Some(Facility::Auth));
        assert_eq!(Facility::from_priority(165), Some(Facility::Local4));
        assert_eq!(Facility::from_priority(191), Some(Facility::Local7));
    }

    #[test]
    fn out_of_range_code_is_none() {
        assert_eq!(Facility::from_code(24), None);
        assert_eq!(Facility::from_priority(192), None);
        assert_eq!(Facility::from_priority(u32::MAX), None);
    }

    #[test]
    fn code_matches_discriminant() {
        for code in 0..=23 {
            let facility = Facility::from_code(code).unwrap();
            assert_eq!(facility.code(), code);
        }
    }

    #[test]
    fn display_uses_short_name() {
        assert_eq!(Facility::AuthPriv.to_string(), "authpriv");
        assert_eq!(Facility::Local7.to_string(), "local7");
    }
}
