//! UDP syslog 수신 서버
//!
//! 데이터그램 하나를 메시지 하나로 취급합니다. 수신 루프는 데이터그램을 복사해
//! 독립된 디코딩 태스크에 넘기고, 각 태스크는 결과 [`Message`]를 출력 큐에 넣습니다.
//! 큐가 가득 차면 디코딩 태스크만 대기하며 수신 루프는 막히지 않습니다.
//!
//! # 상태 전이
//! ```text
//! Stopped --listen()--> Running --stop()--> Stopping (진행 중 태스크 대기) --> Stopped
//! ```
//!
//! 세 상태는 하나의 원자 변수로 관리되므로 `listen` 시작 직후의 `stop`도 유실되지 않습니다.
//!
//! # 사용 예시
//! ```ignore
//! let (tx, mut rx) = tokio::sync::mpsc::channel(1024);
//! let server = Arc::new(SyslogServer::new(ServerConfig::default(), tx));
//!
//! let handle = tokio::spawn({
//!     let server = Arc::clone(&server);
//!     async move { server.listen().await }
//! });
//!
//! while let Some(message) = rx.recv().await {
//!     println!("{message}");
//! }
//! ```

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Mutex, PoisonError};

use bytes::Bytes;
use metrics::counter;
use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

use sysloom_core::metrics as m;

use crate::config::ServerConfig;
use crate::error::SyslogError;
use crate::message::Message;

const STOPPED: u8 = 0;
const RUNNING: u8 = 1;
const STOPPING: u8 = 2;

/// UDP syslog 수신 서버
///
/// `listen`이 실행되는 동안 다른 태스크에서 `stop`, `running`을 호출할 수
/// 있도록 보통 `Arc`로 공유합니다.
pub struct SyslogServer {
    config: ServerConfig,
    tx: mpsc::Sender<Message>,
    /// `STOPPED` / `RUNNING` / `STOPPING`
    state: AtomicU8,
    local_addr: Mutex<Option<SocketAddr>>,
}

impl SyslogServer {
    /// 새 서버를 생성합니다. 소켓은 `listen` 호출 시 바인드됩니다.
    pub fn new(config: ServerConfig, tx: mpsc::Sender<Message>) -> Self {
        Self {
            config,
            tx,
            state: AtomicU8::new(STOPPED),
            local_addr: Mutex::new(None),
        }
    }

    /// 소켓을 바인드하고 `stop`이 호출될 때까지 데이터그램을 수신합니다.
    ///
    /// 정지 후에는 진행 중인 모든 디코딩 태스크가 끝날 때까지 기다린 뒤
    /// 소켓을 닫고 반환합니다. 바인드 실패만 에러로 반환되며,
    /// 개별 읽기 에러는 로그를 남기고 계속 진행합니다.
    pub async fn listen(&self) -> Result<(), SyslogError> {
        if self
            .state
            .compare_exchange(STOPPED, RUNNING, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(SyslogError::AlreadyRunning);
        }

        let result = self.serve().await;

        self.set_local_addr(None);
        self.state.store(STOPPED, Ordering::SeqCst);
        result
    }

    async fn serve(&self) -> Result<(), SyslogError> {
        let bind_addr = self.config.socket_addr();
        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|e| SyslogError::Bind {
                addr: bind_addr.to_string(),
                reason: e.to_string(),
            })?;

        let local_addr = socket.local_addr()?;
        self.set_local_addr(Some(local_addr));
        info!(
            addr = %local_addr,
            max_message_size = self.config.max_message_size,
            "syslog server listening"
        );

        let max = self.config.max_message_size;
        // 잘림을 감지하기 위해 1바이트 여유를 둠
        let mut buf = vec![0u8; max + 1];
        let tracker = TaskTracker::new();

        while self.state.load(Ordering::SeqCst) == RUNNING {
            let (len, source) = match timeout(self.config.poll_interval, socket.recv_from(&mut buf))
                .await
            {
                Err(_elapsed) => continue,
                Ok(Ok(received)) => received,
                Ok(Err(e)) => {
                    warn!(error = %e, "failed to read datagram, continuing");
                    counter!(m::SERVER_RECV_ERRORS_TOTAL).increment(1);
                    continue;
                }
            };

            counter!(m::SERVER_DATAGRAMS_RECEIVED_TOTAL).increment(1);

            let len = if len > max {
                warn!(
                    source = %source,
                    max_message_size = max,
                    "datagram exceeds maximum size, truncating"
                );
                counter!(m::SERVER_DATAGRAMS_TRUNCATED_TOTAL).increment(1);
                max
            } else {
                len
            };

            debug!(source = %source, bytes = len, "datagram received");

            let datagram = Bytes::copy_from_slice(&buf[..len]);
            let tx = self.tx.clone();
            tracker.spawn(async move {
                let message = Message::from_datagram(source, &datagram);
                counter!(m::SERVER_MESSAGES_DECODED_TOTAL, m::LABEL_FORMAT => message.format().as_str())
                    .increment(1);
                if !message.valid() {
                    counter!(m::SERVER_MESSAGES_INVALID_TOTAL).increment(1);
                }

                if tx.send(message).await.is_err() {
                    warn!(source = %source, "output queue closed, dropping message");
                    counter!(m::SERVER_QUEUE_SEND_FAILURES_TOTAL).increment(1);
                }
            });
        }

        info!(
            in_flight = tracker.len(),
            "syslog server stopping, waiting for in-flight decodes"
        );
        tracker.close();
        tracker.wait().await;
        drop(socket);
        info!("syslog server stopped");

        Ok(())
    }

    /// 수신 루프에 정지를 요청합니다.
    ///
    /// 루프는 다음 폴링 주기 안에 이를 확인합니다. `listen`이 시작되기 전이거나
    /// 이미 정지 중이면 아무 일도 하지 않습니다.
    pub fn stop(&self) {
        let _ = self
            .state
            .compare_exchange(RUNNING, STOPPING, Ordering::SeqCst, Ordering::SeqCst);
    }

    /// 수신 루프가 실행 중인지 확인합니다.
    ///
    /// 정지 후 진행 중인 디코딩 태스크가 모두 끝나야 false가 됩니다.
    pub fn running(&self) -> bool {
        self.state.load(Ordering::SeqCst) != STOPPED
    }

    /// 설정된 포트
    pub fn port(&self) -> u16 {
        self.config.port
    }

    /// 최대 데이터그램 크기 (바이트)
    pub fn maximum_message_size(&self) -> usize {
        self.config.max_message_size
    }

    /// 실제로 바인드된 주소. 실행 중이 아니면 `None`
    pub fn local_addr(&self) -> Option<SocketAddr> {
        *self
            .local_addr
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// 서버 설정
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    fn set_local_addr(&self, addr: Option<SocketAddr>) {
        *self
            .local_addr
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = addr;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_server_is_stopped() {
        let (tx, _rx) = mpsc::channel(10);
        let server = SyslogServer::new(ServerConfig::default(), tx);
        assert!(!server.running());
        assert_eq!(server.port(), 514);
        assert_eq!(server.maximum_message_size(), 8192);
        assert!(server.local_addr().is_none());
    }

    #[test]
    fn stop_while_stopped_is_noop() {
        let (tx, _rx) = mpsc::channel(10);
        let server = SyslogServer::new(ServerConfig::default(), tx);
        server.stop();
        assert!(!server.running());
        assert_eq!(server.state.load(Ordering::SeqCst), STOPPED);
    }

    fn loopback_server() -> SyslogServer {
        let config = crate::config::ServerConfigBuilder::new()
            .bind_addr("127.0.0.1".parse().unwrap())
            .port(0)
            .poll_interval(std::time::Duration::from_millis(20))
            .build()
            .unwrap();
        let (tx, _rx) = mpsc::channel(10);
        SyslogServer::new(config, tx)
    }

    #[tokio::test]
    async fn stop_right_after_listen_starts_is_honoured() {
        let server = loopback_server();
        let listen = server.listen();
        tokio::pin!(listen);

        // 첫 폴링에서 상태가 Running으로 바뀜
        tokio::select! {
            biased;
            result = &mut listen => panic!("listen returned early: {result:?}"),
            _ = std::future::ready(()) => {}
        }
        assert!(server.running());

        server.stop();
        assert_eq!(server.state.load(Ordering::SeqCst), STOPPING);

        tokio::time::timeout(std::time::Duration::from_secs(5), listen)
            .await
            .expect("listen should observe the stop")
            .expect("listen ok");
        assert!(!server.running());
        assert_eq!(server.state.load(Ordering::SeqCst), STOPPED);
    }

    #[tokio::test]
    async fn listen_while_stopping_is_rejected() {
        let server = loopback_server();
        let listen = server.listen();
        tokio::pin!(listen);
        tokio::select! {
            biased;
            result = &mut listen => panic!("listen returned early: {result:?}"),
            _ = std::future::ready(()) => {}
        }

        server.stop();
        assert!(server.running());
        assert!(matches!(
            server.listen().await,
            Err(SyslogError::AlreadyRunning)
        ));

        listen.await.expect("listen ok");
    }

    #[tokio::test]
    async fn bind_failure_is_reported() {
        let occupied = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
        let port = occupied.local_addr().unwrap().port();

        let config = crate::config::ServerConfigBuilder::new()
            .bind_addr("127.0.0.1".parse().unwrap())
            .port(port)
            .build()
            .unwrap();
        let (tx, _rx) = mpsc::channel(10);
        let server = SyslogServer::new(config, tx);

        let err = server.listen().await.unwrap_err();
        assert!(matches!(err, SyslogError::Bind { .. }));
        assert!(!server.running());
    }
}
