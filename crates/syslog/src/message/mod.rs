//! 디코딩된 syslog 메시지 모델
//!
//! [`Message`]는 데이터그램 하나당 한 번 생성되며 이후에는 읽기 전용입니다.
//! 파싱 실패는 `Err`가 아니라 [`Message::valid`]와 [`Message::error`]로 표현됩니다.

mod facility;
mod format;
mod severity;

pub use facility::Facility;
pub use format::Format;
pub use severity::Severity;

use std::fmt;
use std::net::SocketAddr;

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::error::DecodeError;
use crate::structured_data::StructuredData;

/// 디코딩된 syslog 메시지
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub(crate) raw: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) source: Option<SocketAddr>,
    pub(crate) valid: bool,
    pub(crate) format: Format,
    pub(crate) priority: Option<u32>,
    pub(crate) version: Option<u16>,
    pub(crate) date: Option<DateTime<FixedOffset>>,
    pub(crate) hostname: String,
    pub(crate) application: String,
    pub(crate) process_id: Option<u32>,
    pub(crate) message_id: Option<String>,
    pub(crate) structured_data: Option<StructuredData>,
    pub(crate) content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) error: Option<DecodeError>,
}

impl Message {
    /// 원시 바이트를 디코딩합니다. 송신자 주소는 비어 있습니다.
    ///
    /// 어떤 입력에도 패닉하지 않으며, 유효하지 않은 UTF-8은 손실 변환됩니다.
    pub fn decode(raw: &[u8]) -> Self {
        crate::parser::decode_message(None, raw)
    }

    /// 수신한 데이터그램을 송신자 주소와 함께 디코딩합니다.
    pub fn from_datagram(source: SocketAddr, raw: &[u8]) -> Self {
        crate::parser::decode_message(Some(source), raw)
    }

    /// 원본 문자열
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// 송신자 주소 (데이터그램에서 디코딩된 경우)
    pub fn source(&self) -> Option<SocketAddr> {
        self.source
    }

    /// 치명적 파싱 실패 없이 디코딩되었는지 여부
    pub fn valid(&self) -> bool {
        self.valid
    }

    /// 판별된 메시지 형식
    pub fn format(&self) -> Format {
        self.format
    }

    /// PRI 값. 표준 범위(0-191)를 넘는 값도 그대로 보존됩니다.
    pub fn priority(&self) -> Option<u32> {
        self.priority
    }

    /// PRI에서 유도한 facility. `priority / 8`이 23을 넘으면 `None`
    pub fn facility(&self) -> Option<Facility> {
        self.priority.and_then(Facility::from_priority)
    }

    /// PRI에서 유도한 severity
    pub fn severity(&self) -> Option<Severity> {
        self.priority.map(Severity::from_priority)
    }

    /// 프로토콜 버전 (RFC 5424 전용)
    pub fn version(&self) -> Option<u16> {
        self.version
    }

    /// 타임스탬프. `-` 자리표시자이거나 날짜가 없는 형식이면 `None`
    pub fn date(&self) -> Option<DateTime<FixedOffset>> {
        self.date
    }

    /// 호스트명. 없으면 빈 문자열
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// 애플리케이션명. 없으면 빈 문자열
    pub fn application(&self) -> &str {
        &self.application
    }

    /// 프로세스 ID (RFC 5424 전용). `-` 자리표시자면 `None`
    pub fn process_id(&self) -> Option<u32> {
        self.process_id
    }

    /// 메시지 ID (RFC 5424 전용). `-` 자리표시자면 `None`
    pub fn message_id(&self) -> Option<&str> {
        self.message_id.as_deref()
    }

    /// 구조화 데이터 (RFC 5424 전용)
    ///
    /// `-` 자리표시자는 `Some(빈 목록)`, 필드가 없으면 `None`입니다.
    pub fn structured_data(&self) -> Option<&StructuredData> {
        self.structured_data.as_ref()
    }

    /// 본문. 앞의 `BOM` 세 글자는 제거됩니다.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// 메시지를 invalid로 만든 치명적 실패
    pub fn error(&self) -> Option<&DecodeError> {
        self.error.as_ref()
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.source {
            Some(source) => write!(f, "{} {}", source.ip(), self.raw),
            None => f.write_str(&self.raw),
        }
    }
}
