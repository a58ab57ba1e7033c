//! 메트릭 상수 및 설명 등록
//!
//! 모든 Prometheus 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 각 모듈은 이 상수를 사용하여 `metrics::counter!()` 매크로를 호출합니다.
//! 레코더가 설치되지 않은 프로세스에서는 모든 호출이 no-op입니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `sysloom_`
//! - 모듈명: `server_`, `client_`
//! - 접미어: `_total` (counter)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(sysloom_core::metrics::SERVER_DATAGRAMS_RECEIVED_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 메시지 형식 레이블 키 (unknown, simple, rfc3164, rfc5424)
pub const LABEL_FORMAT: &str = "format";

/// 결과 레이블 키 (success, failure)
pub const LABEL_RESULT: &str = "result";

// ─── Server 메트릭 ─────────────────────────────────────────────────

/// Server: 수신한 데이터그램 수 (counter)
pub const SERVER_DATAGRAMS_RECEIVED_TOTAL: &str = "sysloom_server_datagrams_received_total";

/// Server: 최대 크기를 넘어 잘린 데이터그램 수 (counter)
pub const SERVER_DATAGRAMS_TRUNCATED_TOTAL: &str = "sysloom_server_datagrams_truncated_total";

/// Server: 디코딩된 메시지 수 (counter, label: format)
pub const SERVER_MESSAGES_DECODED_TOTAL: &str = "sysloom_server_messages_decoded_total";

/// Server: 치명적 파싱 실패로 invalid 표시된 메시지 수 (counter)
pub const SERVER_MESSAGES_INVALID_TOTAL: &str = "sysloom_server_messages_invalid_total";

/// Server: 출력 큐가 닫혀 버려진 메시지 수 (counter)
pub const SERVER_QUEUE_SEND_FAILURES_TOTAL: &str = "sysloom_server_queue_send_failures_total";

/// Server: 일시적 소켓 읽기 에러 수 (counter)
pub const SERVER_RECV_ERRORS_TOTAL: &str = "sysloom_server_recv_errors_total";

// ─── Client 메트릭 ─────────────────────────────────────────────────

/// Client: 송신 시도 수 (counter, label: result)
pub const CLIENT_SENDS_TOTAL: &str = "sysloom_client_sends_total";

/// 모든 메트릭의 설명을 등록합니다.
///
/// `metrics::describe_counter!()`를 호출하여 Prometheus HELP 텍스트를 설정합니다.
///
/// 이 함수는 전역 레코더 설치 후 한 번만 호출해야 합니다.
pub fn describe_all() {
    use metrics::describe_counter;

    // Server
    describe_counter!(
        SERVER_DATAGRAMS_RECEIVED_TOTAL,
        "Total number of UDP datagrams received"
    );
    describe_counter!(
        SERVER_DATAGRAMS_TRUNCATED_TOTAL,
        "Datagrams truncated to the configured maximum message size"
    );
    describe_counter!(
        SERVER_MESSAGES_DECODED_TOTAL,
        "Decoded syslog messages per detected format"
    );
    describe_counter!(
        SERVER_MESSAGES_INVALID_TOTAL,
        "Messages marked invalid by a fatal decode failure"
    );
    describe_counter!(
        SERVER_QUEUE_SEND_FAILURES_TOTAL,
        "Messages dropped because the output queue was closed"
    );
    describe_counter!(
        SERVER_RECV_ERRORS_TOTAL,
        "Transient socket read errors ignored by the receive loop"
    );

    // Client
    describe_counter!(CLIENT_SENDS_TOTAL, "Datagram send attempts by result");
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_METRICS: &[&str] = &[
        SERVER_DATAGRAMS_RECEIVED_TOTAL,
        SERVER_DATAGRAMS_TRUNCATED_TOTAL,
        SERVER_MESSAGES_DECODED_TOTAL,
        SERVER_MESSAGES_INVALID_TOTAL,
        SERVER_QUEUE_SEND_FAILURES_TOTAL,
        SERVER_RECV_ERRORS_TOTAL,
        CLIENT_SENDS_TOTAL,
    ];

    #[test]
    fn all_metrics_use_prefix_and_counter_suffix() {
        for name in ALL_METRICS {
            assert!(name.starts_with("sysloom_"), "{name} missing prefix");
            assert!(name.ends_with("_total"), "{name} missing _total suffix");
        }
    }

    #[test]
    fn metric_names_are_unique() {
        let mut names = ALL_METRICS.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ALL_METRICS.len());
    }

    #[test]
    fn describe_all_without_recorder_is_noop() {
        describe_all();
    }
}
