//! 수신 서버 / 송신 클라이언트 설정
//!
//! [`ServerConfig`]와 [`ClientConfig`]는 core의
//! [`ServerSection`](sysloom_core::config::ServerSection),
//! [`ClientSection`](sysloom_core::config::ClientSection)에서 파생됩니다.
//!
//! # 사용 예시
//! ```ignore
//! use sysloom_core::config::SysloomConfig;
//! use sysloom_syslog::config::ServerConfig;
//!
//! let core_config = SysloomConfig::default();
//! let config = ServerConfig::from_core(&core_config.server)?;
//! ```

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use sysloom_core::config::{
    ClientSection, DEFAULT_MAX_MESSAGE_SIZE, DEFAULT_SYSLOG_PORT, MAX_UDP_PAYLOAD, ServerSection,
};

use crate::error::SyslogError;

/// 폴링 주기 상한
const MAX_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// 수신 서버 설정
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// 바인드 IP 주소
    pub bind_addr: IpAddr,
    /// UDP 포트 (0이면 OS가 할당)
    pub port: u16,
    /// 최대 데이터그램 크기 (바이트)
    pub max_message_size: usize,
    /// 정지 신호를 확인하는 소켓 읽기 데드라인
    pub poll_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_SYSLOG_PORT,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            poll_interval: Duration::from_millis(100),
        }
    }
}

impl ServerConfig {
    /// core의 `[server]` 섹션에서 서버 설정을 생성합니다.
    pub fn from_core(section: &ServerSection) -> Result<Self, SyslogError> {
        let bind_addr = section
            .bind_addr
            .parse::<IpAddr>()
            .map_err(|e| SyslogError::Config {
                field: "bind_addr".to_owned(),
                reason: format!("'{}': {}", section.bind_addr, e),
            })?;

        let config = Self {
            bind_addr,
            port: section.port,
            max_message_size: section.max_message_size,
            poll_interval: Duration::from_millis(section.poll_interval_ms),
        };
        config.validate()?;
        Ok(config)
    }

    /// 바인드할 소켓 주소
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), SyslogError> {
        if self.max_message_size == 0 || self.max_message_size > MAX_UDP_PAYLOAD {
            return Err(SyslogError::Config {
                field: "max_message_size".to_owned(),
                reason: format!("must be 1-{}", MAX_UDP_PAYLOAD),
            });
        }

        if self.poll_interval.is_zero() || self.poll_interval > MAX_POLL_INTERVAL {
            return Err(SyslogError::Config {
                field: "poll_interval".to_owned(),
                reason: format!("must be 1ms-{}ms", MAX_POLL_INTERVAL.as_millis()),
            });
        }

        Ok(())
    }
}

/// 서버 설정 빌더
#[derive(Default)]
pub struct ServerConfigBuilder {
    config: ServerConfig,
}

impl ServerConfigBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 바인드 IP 주소를 설정합니다.
    pub fn bind_addr(mut self, addr: IpAddr) -> Self {
        self.config.bind_addr = addr;
        self
    }

    /// UDP 포트를 설정합니다.
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// 최대 데이터그램 크기를 설정합니다.
    pub fn max_message_size(mut self, size: usize) -> Self {
        self.config.max_message_size = size;
        self
    }

    /// 폴링 주기를 설정합니다.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval = interval;
        self
    }

    /// 설정을 검증하고 `ServerConfig`를 생성합니다.
    pub fn build(self) -> Result<ServerConfig, SyslogError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// 송신 클라이언트 설정
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// true면 전송 완료까지 대기, false면 백그라운드 전송
    pub synchronous: bool,
    /// 목적지에 포트가 없을 때 붙일 포트
    pub default_port: u16,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            synchronous: true,
            default_port: DEFAULT_SYSLOG_PORT,
        }
    }
}

impl ClientConfig {
    /// core의 `[client]` 섹션에서 클라이언트 설정을 생성합니다.
    pub fn from_core(section: &ClientSection) -> Self {
        Self {
            synchronous: section.synchronous,
            default_port: section.default_port,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ServerConfig::default();
        config.validate().unwrap();
        assert_eq!(config.port, 514);
        assert_eq!(config.max_message_size, 8192);
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:514");
    }

    #[test]
    fn from_core_preserves_values() {
        let section = ServerSection {
            bind_addr: "127.0.0.1".to_owned(),
            port: 5514,
            max_message_size: 4096,
            poll_interval_ms: 50,
            ..Default::default()
        };
        let config = ServerConfig::from_core(&section).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:5514");
        assert_eq!(config.max_message_size, 4096);
        assert_eq!(config.poll_interval, Duration::from_millis(50));
    }

    #[test]
    fn from_core_rejects_bad_bind_addr() {
        let section = ServerSection {
            bind_addr: "localhost".to_owned(),
            ..Default::default()
        };
        let err = ServerConfig::from_core(&section).unwrap_err();
        assert!(matches!(err, SyslogError::Config { ref field, .. } if field == "bind_addr"));
    }

    #[test]
    fn ipv6_socket_addr() {
        let config = ServerConfigBuilder::new()
            .bind_addr("::1".parse().unwrap())
            .port(5514)
            .build()
            .unwrap();
        assert_eq!(config.socket_addr().to_string(), "[::1]:5514");
    }

    #[test]
    fn builder_rejects_zero_max_message_size() {
        let result = ServerConfigBuilder::new().max_message_size(0).build();
        assert!(result.is_err());
    }

    #[test]
    fn builder_rejects_oversized_max_message_size() {
        let result = ServerConfigBuilder::new().max_message_size(70_000).build();
        assert!(result.is_err());
    }

    #[test]
    fn builder_rejects_zero_poll_interval() {
        let result = ServerConfigBuilder::new()
            .poll_interval(Duration::ZERO)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn client_config_from_core() {
        let section = ClientSection {
            synchronous: false,
            default_port: 1514,
        };
        let config = ClientConfig::from_core(&section);
        assert!(!config.synchronous);
        assert_eq!(config.default_port, 1514);
    }
}
