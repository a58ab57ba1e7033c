//! UDP syslog 송신 클라이언트
//!
//! 동기 모드에서는 전송이 끝날 때까지 기다리고 결과를 반환합니다.
//! 비동기 모드에서는 전송을 백그라운드 태스크로 띄우고 즉시 `Ok(())`를 반환하며,
//! 실패는 [`SyslogClient::last_error`]로 확인합니다.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::{Arc, Mutex, PoisonError};

use bytes::Bytes;
use metrics::counter;
use tokio::net::UdpSocket;
use tokio_util::task::TaskTracker;
use tracing::{debug, warn};

use sysloom_core::metrics as m;

use crate::config::ClientConfig;
use crate::error::SyslogError;

/// UDP syslog 송신 클라이언트
pub struct SyslogClient {
    config: ClientConfig,
    tracker: TaskTracker,
    last_error: Arc<Mutex<Option<String>>>,
}

impl SyslogClient {
    /// 새 클라이언트를 생성합니다.
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            tracker: TaskTracker::new(),
            last_error: Arc::new(Mutex::new(None)),
        }
    }

    /// `addr`로 데이터그램 하나를 보냅니다.
    ///
    /// `addr`에 포트가 없으면 설정된 기본 포트를 붙입니다.
    pub async fn send(&self, addr: &str, data: &[u8]) -> Result<(), SyslogError> {
        let target = with_default_port(addr, self.config.default_port);

        if self.config.synchronous {
            let result = send_datagram(&target, data).await;
            record(&result);
            return result;
        }

        let data = Bytes::copy_from_slice(data);
        let last_error = Arc::clone(&self.last_error);
        self.tracker.spawn(async move {
            let result = send_datagram(&target, &data).await;
            record(&result);
            let mut slot = last_error.lock().unwrap_or_else(PoisonError::into_inner);
            match result {
                Ok(()) => *slot = None,
                Err(e) => {
                    warn!(destination = %target, error = %e, "background send failed");
                    *slot = Some(e.to_string());
                }
            }
        });
        Ok(())
    }

    /// 진행 중인 모든 백그라운드 전송이 끝날 때까지 기다립니다.
    pub async fn wait(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }

    /// 가장 최근 백그라운드 전송의 실패 사유. 마지막 전송이 성공했으면 `None`
    pub fn last_error(&self) -> Option<String> {
        self.last_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// 클라이언트 설정
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

async fn send_datagram(target: &str, data: &[u8]) -> Result<(), SyslogError> {
    let send_error = |reason: String| SyslogError::Send {
        addr: target.to_owned(),
        reason,
    };

    let remote = tokio::net::lookup_host(target)
        .await
        .map_err(|e| send_error(e.to_string()))?
        .next()
        .ok_or_else(|| send_error("address resolved to nothing".to_owned()))?;

    let local: SocketAddr = match remote.ip() {
        IpAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
        IpAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
    };

    let socket = UdpSocket::bind(local)
        .await
        .map_err(|e| send_error(e.to_string()))?;
    socket
        .connect(remote)
        .await
        .map_err(|e| send_error(e.to_string()))?;

    let written = socket
        .send(data)
        .await
        .map_err(|e| send_error(e.to_string()))?;
    if written != data.len() {
        return Err(send_error(format!(
            "short write: {written} of {} bytes",
            data.len()
        )));
    }

    debug!(remote = %remote, bytes = written, "datagram sent");
    Ok(())
}

fn record(result: &Result<(), SyslogError>) {
    let outcome = if result.is_ok() { "success" } else { "failure" };
    counter!(m::CLIENT_SENDS_TOTAL, m::LABEL_RESULT => outcome).increment(1);
}

/// 포트가 없는 목적지에 기본 포트를 붙입니다.
fn with_default_port(addr: &str, port: u16) -> String {
    if addr.parse::<SocketAddr>().is_ok() {
        return addr.to_owned();
    }

    let bare = addr.trim_start_matches('[').trim_end_matches(']');
    if let Ok(ip) = bare.parse::<IpAddr>() {
        return SocketAddr::new(ip, port).to_string();
    }

    match addr.rsplit_once(':') {
        Some((_, p)) if p.parse::<u16>().is_ok() => addr.to_owned(),
        _ => format!("{addr}:{port}"),
    }
}
