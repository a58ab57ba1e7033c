//! 설정 관리 -- sysloom.toml 파싱 및 런타임 설정
//!
//! [`SysloomConfig`]는 데몬과 각 모듈의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`SYSLOOM_SERVER_PORT=5514` 형식)
//! 3. 설정 파일 (`sysloom.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), sysloom_core::error::SysloomError> {
//! use sysloom_core::config::SysloomConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = SysloomConfig::load("sysloom.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = SysloomConfig::parse("[server]\nport = 5514")?;
//! # Ok(())
//! # }
//! ```

use std::net::IpAddr;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, SysloomError};

/// 표준 syslog UDP 포트
pub const DEFAULT_SYSLOG_PORT: u16 = 514;

/// 기본 최대 데이터그램 크기 (8KB)
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 8192;

/// UDP 페이로드 상한
pub const MAX_UDP_PAYLOAD: usize = 65_535;

/// sysloom 통합 설정
///
/// `sysloom.toml` 파일의 최상위 구조를 나타냅니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SysloomConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 수신 서버 설정
    #[serde(default)]
    pub server: ServerSection,
    /// 송신 클라이언트 설정
    #[serde(default)]
    pub client: ClientSection,
}

impl SysloomConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    ///
    /// 설정 로딩 순서:
    /// 1. TOML 파일 파싱
    /// 2. 환경변수 오버라이드 적용
    /// 3. 유효성 검증
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, SysloomError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, SysloomError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SysloomError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                SysloomError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, SysloomError> {
        toml::from_str(toml_str).map_err(|e| {
            SysloomError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `SYSLOOM_{SECTION}_{FIELD}`
    /// 예: `SYSLOOM_SERVER_MAX_MESSAGE_SIZE=16384`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "SYSLOOM_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "SYSLOOM_GENERAL_LOG_FORMAT");

        // Server
        override_string(&mut self.server.bind_addr, "SYSLOOM_SERVER_BIND_ADDR");
        override_u16(&mut self.server.port, "SYSLOOM_SERVER_PORT");
        override_usize(
            &mut self.server.max_message_size,
            "SYSLOOM_SERVER_MAX_MESSAGE_SIZE",
        );
        override_u64(
            &mut self.server.poll_interval_ms,
            "SYSLOOM_SERVER_POLL_INTERVAL_MS",
        );
        override_usize(
            &mut self.server.queue_capacity,
            "SYSLOOM_SERVER_QUEUE_CAPACITY",
        );

        // Client
        override_bool(&mut self.client.synchronous, "SYSLOOM_CLIENT_SYNCHRONOUS");
        override_u16(&mut self.client.default_port, "SYSLOOM_CLIENT_DEFAULT_PORT");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), SysloomError> {
        const MAX_POLL_INTERVAL_MS: u64 = 5_000;
        const MAX_QUEUE_CAPACITY: usize = 1_000_000;

        // log_level 검증
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        // log_format 검증
        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        if self.server.bind_addr.parse::<IpAddr>().is_err() {
            return Err(ConfigError::InvalidValue {
                field: "server.bind_addr".to_owned(),
                reason: format!("'{}' is not an IP address", self.server.bind_addr),
            }
            .into());
        }

        if self.server.max_message_size == 0 || self.server.max_message_size > MAX_UDP_PAYLOAD {
            return Err(ConfigError::InvalidValue {
                field: "server.max_message_size".to_owned(),
                reason: format!("must be 1-{}", MAX_UDP_PAYLOAD),
            }
            .into());
        }

        if self.server.poll_interval_ms == 0 || self.server.poll_interval_ms > MAX_POLL_INTERVAL_MS
        {
            return Err(ConfigError::InvalidValue {
                field: "server.poll_interval_ms".to_owned(),
                reason: format!("must be 1-{}", MAX_POLL_INTERVAL_MS),
            }
            .into());
        }

        if self.server.queue_capacity == 0 || self.server.queue_capacity > MAX_QUEUE_CAPACITY {
            return Err(ConfigError::InvalidValue {
                field: "server.queue_capacity".to_owned(),
                reason: format!("must be 1-{}", MAX_QUEUE_CAPACITY),
            }
            .into());
        }

        if self.client.default_port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "client.default_port".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
        }
    }
}

/// 수신 서버 설정 (`[server]` 섹션)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// 바인드 IP 주소
    pub bind_addr: String,
    /// UDP 포트 (0이면 OS가 임의 포트 할당)
    pub port: u16,
    /// 최대 데이터그램 크기 (바이트). 초과분은 잘립니다.
    pub max_message_size: usize,
    /// 정지 신호 확인을 위한 소켓 폴링 주기 (밀리초)
    pub poll_interval_ms: u64,
    /// 출력 큐 용량 (데몬이 채널을 만들 때 사용)
    pub queue_capacity: usize,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_owned(),
            port: DEFAULT_SYSLOG_PORT,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            poll_interval_ms: 100,
            queue_capacity: 1024,
        }
    }
}

/// 송신 클라이언트 설정 (`[client]` 섹션)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSection {
    /// true면 전송 완료까지 대기, false면 백그라운드 전송
    pub synchronous: bool,
    /// 목적지에 포트가 없을 때 사용할 포트
    pub default_port: u16,
}

impl Default for ClientSection {
    fn default() -> Self {
        Self {
            synchronous: true,
            default_port: DEFAULT_SYSLOG_PORT,
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_u16(target: &mut u16, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u16>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u16 from env var, ignoring"
            ),
        }
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}
