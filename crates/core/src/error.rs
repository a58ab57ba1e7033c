//! 에러 타입 -- 도메인별 에러 정의

/// sysloom 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum SysloomError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 수신 서버 / 송신 클라이언트 에러
    #[error("server error: {0}")]
    Server(#[from] ServerError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 네트워크 계층 에러
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// 소켓 바인드 실패
    #[error("bind failed: {0}")]
    Bind(String),

    /// 이미 실행 중
    #[error("server already running")]
    AlreadyRunning,

    /// 데이터그램 송신 실패
    #[error("send failed: {0}")]
    Send(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_converts_to_top_level() {
        let err: SysloomError = ConfigError::InvalidValue {
            field: "server.port".to_owned(),
            reason: "must be 1-65535".to_owned(),
        }
        .into();
        assert!(matches!(err, SysloomError::Config(_)));
        assert!(err.to_string().contains("server.port"));
    }

    #[test]
    fn server_error_display() {
        let err = ServerError::Bind("0.0.0.0:514: permission denied".to_owned());
        assert_eq!(
            err.to_string(),
            "bind failed: 0.0.0.0:514: permission denied"
        );
        assert_eq!(
            ServerError::AlreadyRunning.to_string(),
            "server already running"
        );
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::AddrInUse, "in use");
        let err: SysloomError = io.into();
        assert!(matches!(err, SysloomError::Io(_)));
    }
}
