//! syslog 크레이트 에러 타입
//!
//! - [`SyslogError`]: 서버/클라이언트 동작 중 `Err`로 반환되는 에러.
//!   `From<SyslogError> for SysloomError` 변환이 구현되어 있어
//!   상위 레이어에서 `?` 연산자로 전파할 수 있습니다.
//! - [`DecodeError`]: 메시지 디코딩 진단 정보. `Err`로 반환되지 않고
//!   [`Message::error`](crate::Message::error)에 기록됩니다.

use serde::Serialize;
use sysloom_core::error::{ConfigError, ServerError, SysloomError};

/// syslog 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum SyslogError {
    /// 소켓 바인드 실패
    #[error("bind error: {addr}: {reason}")]
    Bind {
        /// 바인드 대상 주소
        addr: String,
        /// 실패 사유
        reason: String,
    },

    /// 서버가 이미 실행 중
    #[error("server already running")]
    AlreadyRunning,

    /// 데이터그램 송신 실패
    #[error("send error: {addr}: {reason}")]
    Send {
        /// 목적지 주소
        addr: String,
        /// 실패 사유
        reason: String,
    },

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<SyslogError> for SysloomError {
    fn from(err: SyslogError) -> Self {
        match err {
            SyslogError::Bind { addr, reason } => {
                SysloomError::Server(ServerError::Bind(format!("{addr}: {reason}")))
            }
            SyslogError::AlreadyRunning => SysloomError::Server(ServerError::AlreadyRunning),
            SyslogError::Send { addr, reason } => {
                SysloomError::Server(ServerError::Send(format!("{addr}: {reason}")))
            }
            SyslogError::Config { field, reason } => {
                SysloomError::Config(ConfigError::InvalidValue { field, reason })
            }
            SyslogError::Io(e) => SysloomError::Io(e),
        }
    }
}

/// 메시지를 invalid로 만든 치명적 디코딩 실패
///
/// 오프셋은 원본 문자열 기준 바이트 위치입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecodeError {
    /// `<N>` 접두어가 없거나 N이 음이 아닌 정수(u32)가 아님
    #[error("invalid priority: {reason}")]
    Priority {
        /// 실패 사유
        reason: String,
    },

    /// RFC 5424 타임스탬프가 어떤 문법과도 맞지 않음
    #[error("unrecognized timestamp at offset {offset}")]
    Timestamp {
        /// 타임스탬프 시작 위치
        offset: usize,
    },

    /// RFC 5424 프로세스 ID가 숫자가 아님
    #[error("non-numeric process id '{token}' at offset {offset}")]
    ProcessId {
        /// 토큰 시작 위치
        offset: usize,
        /// 문제가 된 토큰
        token: String,
    },

    /// 구조화 데이터 파싱 실패
    #[error("structured data error at offset {offset}: {reason}")]
    StructuredData {
        /// 실패한 요소의 `[` 위치
        offset: usize,
        /// 실패 사유
        reason: StructuredDataError,
    },
}

/// SD-ELEMENT 파싱 실패 사유
///
/// 요소 내부 오프셋은 `[` 바로 다음 문자 기준입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StructuredDataError {
    /// 닫는 `]`가 없음
    #[error("unterminated element")]
    Unterminated,

    /// SD-ID가 비어 있음
    #[error("empty element id")]
    EmptyId,

    /// 파라미터에 `=`가 없음
    #[error("missing '=' after offset {offset}")]
    MissingEquals {
        /// 검색 시작 위치
        offset: usize,
    },

    /// 파라미터 값의 여는 따옴표가 없음
    #[error("missing opening quote after offset {offset}")]
    MissingOpenQuote {
        /// `=` 위치
        offset: usize,
    },

    /// 파라미터 값의 닫는 따옴표가 없음
    #[error("unterminated value starting at offset {offset}")]
    UnterminatedValue {
        /// 여는 따옴표 위치
        offset: usize,
    },
}
