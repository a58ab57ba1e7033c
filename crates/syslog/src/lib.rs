#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`message`]: 디코딩된 메시지 모델과 형식/facility/severity 분류
//! - [`structured_data`]: RFC 5424 구조화 데이터 모델과 SD-ELEMENT 파서
//! - [`server`]: UDP 수신 서버 (데이터그램마다 디코딩 태스크 생성)
//! - [`client`]: UDP 송신 클라이언트 (동기 / 백그라운드)
//! - [`config`]: 서버/클라이언트 설정 (core 설정에서 파생)
//! - [`error`]: 도메인 에러와 디코딩 진단 타입
//!
//! # 아키텍처
//!
//! ```text
//! UdpSocket -> recv loop -> decode task (per datagram) -> mpsc::Sender<Message> -> consumer
//!                               |
//!                      priority / version / header / SD / content
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod message;
pub mod server;
pub mod structured_data;

mod parser;

// --- 주요 타입 re-export ---

// 메시지
pub use message::{Facility, Format, Message, Severity};
pub use structured_data::{Element, Parameter, StructuredData};

// 서버 / 클라이언트
pub use client::SyslogClient;
pub use server::SyslogServer;

// 설정
pub use config::{ClientConfig, ServerConfig, ServerConfigBuilder};

// 에러
pub use error::{DecodeError, StructuredDataError, SyslogError};
