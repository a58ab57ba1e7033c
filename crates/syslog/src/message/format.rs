//! 메시지 형식 분류

use std::fmt;

use serde::Serialize;

/// 디코더가 판별한 syslog 메시지 형식
///
/// 파싱이 진행될수록 더 구체적인 형식으로 승격되며, 치명적 실패 시에만
/// [`Format::Unknown`]으로 강등됩니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// PRI 파싱 실패 또는 치명적 디코딩 실패
    #[default]
    Unknown,
    /// `<PRI>content` 형태의 최소 형식
    Simple,
    /// BSD syslog (RFC 3164)
    Rfc3164,
    /// IETF syslog (RFC 5424)
    Rfc5424,
}

impl Format {
    /// 메트릭 레이블 등에 쓰이는 소문자 이름을 반환합니다.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Simple => "simple",
            Self::Rfc3164 => "rfc3164",
            Self::Rfc5424 => "rfc5424",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "Unknown"),
            Self::Simple => write!(f, "Simple"),
            Self::Rfc3164 => write!(f, "RFC3164"),
            Self::Rfc5424 => write!(f, "RFC5424"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unknown() {
        assert_eq!(Format::default(), Format::Unknown);
    }

    #[test]
    fn display_names() {
        assert_eq!(Format::Rfc5424.to_string(), "RFC5424");
        assert_eq!(Format::Rfc3164.to_string(), "RFC3164");
        assert_eq!(Format::Simple.to_string(), "Simple");
        assert_eq!(Format::Unknown.to_string(), "Unknown");
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&Format::Rfc3164).unwrap();
        assert_eq!(json, "\"rfc3164\"");
    }
}
