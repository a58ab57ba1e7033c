//! 형식 자동 감지 syslog 디코더
//!
//! 원시 바이트를 한 번의 커서 전진으로 파싱하며, 어떤 RFC를 따르는지
//! 미리 알지 못한 채로 형식을 판별합니다.
//!
//! # 지원 형식
//! ```text
//! RFC 5424: <PRI>VERSION TIMESTAMP HOSTNAME APP-NAME PROCID MSGID STRUCTURED-DATA MSG
//! RFC 3164: <PRI>Mmm dd hh:mm:ss HOSTNAME APP-NAME MSG
//! Simple:   <PRI>MSG
//! ```
//!
//! PRI 뒤의 버전 필드 유무만으로 RFC 5424와 나머지를 구분합니다.
//! 버전이 없고 레거시 타임스탬프도 없으면 Simple로 처리합니다.
//!
//! # 치명적 실패
//! 다음 경우에만 메시지가 invalid가 되며, 나머지 누락은 필드 부재로 처리됩니다.
//! - PRI 파싱 실패
//! - RFC 5424 타임스탬프 파싱 실패
//! - RFC 5424 프로세스 ID가 숫자가 아님
//! - 구조화 데이터 파싱 실패

mod field;
mod timestamp;

use std::net::SocketAddr;

use chrono::{DateTime, Datelike, FixedOffset, Utc};

use crate::error::{DecodeError, StructuredDataError};
use crate::message::{Format, Message};
use crate::structured_data::{Element, StructuredData, find_element_end};

use field::Field;
use timestamp::TimestampGrammar;

/// RFC 5424 본문 앞에 올 수 있는 BOM 표기
const BOM_PREFIX: &str = "BOM";

/// 파싱 중 채워지는 메시지 초안
#[derive(Debug, Default)]
struct Draft {
    format: Format,
    priority: Option<u32>,
    version: Option<u16>,
    date: Option<DateTime<FixedOffset>>,
    hostname: String,
    application: String,
    process_id: Option<u32>,
    message_id: Option<String>,
    structured_data: Option<StructuredData>,
    content: String,
}

impl Draft {
    fn into_message(
        self,
        raw: String,
        source: Option<SocketAddr>,
        error: Option<DecodeError>,
    ) -> Message {
        let valid = error.is_none();
        Message {
            raw,
            source,
            valid,
            format: if valid { self.format } else { Format::Unknown },
            priority: self.priority,
            version: self.version,
            date: self.date,
            hostname: self.hostname,
            application: self.application,
            process_id: self.process_id,
            message_id: self.message_id,
            structured_data: self.structured_data,
            content: self.content,
            error,
        }
    }
}

/// 바이트를 디코딩하여 [`Message`]를 만듭니다.
pub(crate) fn decode_message(source: Option<SocketAddr>, bytes: &[u8]) -> Message {
    let raw = String::from_utf8_lossy(bytes).into_owned();
    let mut draft = Draft::default();
    let error = parse(&raw, &mut draft, Utc::now().year()).err();
    draft.into_message(raw, source, error)
}

fn parse(raw: &str, draft: &mut Draft, year: i32) -> Result<(), DecodeError> {
    let (priority, cursor) = parse_priority(raw)?;
    draft.priority = Some(priority);

    match parse_version(raw, cursor) {
        Some((version, next)) => {
            draft.version = Some(version);
            parse_rfc5424(raw, next, year, draft)
        }
        None => {
            parse_rfc3164(raw, cursor, year, draft);
            Ok(())
        }
    }
}

/// `<N>` 접두어를 파싱하고 `>` 다음 커서를 반환합니다.
///
/// 음이 아닌 정수면 모두 받아들이며, 191 초과 여부는 facility 유도 시점에 드러납니다.
fn parse_priority(raw: &str) -> Result<(u32, usize), DecodeError> {
    if !raw.starts_with('<') {
        return Err(DecodeError::Priority {
            reason: "missing '<'".to_owned(),
        });
    }

    let end = raw.find('>').ok_or_else(|| DecodeError::Priority {
        reason: "missing '>'".to_owned(),
    })?;

    let digits = &raw[1..end];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DecodeError::Priority {
            reason: format!("'{digits}' is not a number"),
        });
    }

    let value = digits.parse::<u32>().map_err(|_| DecodeError::Priority {
        reason: format!("{digits} does not fit in 32 bits"),
    })?;
    Ok((value, end + 1))
}

/// 숫자로 시작하고 공백으로 끝나는 버전 필드를 확인합니다.
fn parse_version(raw: &str, cursor: usize) -> Option<(u16, usize)> {
    let rest = raw.get(cursor..)?;
    if !rest.as_bytes().first()?.is_ascii_digit() {
        return None;
    }
    let space = 1 + rest.get(1..)?.find(' ')?;
    let version = rest[..space].parse::<u16>().ok()?;
    Some((version, cursor + space + 1))
}

fn parse_rfc5424(
    raw: &str,
    cursor: usize,
    year: i32,
    draft: &mut Draft,
) -> Result<(), DecodeError> {
    if cursor >= raw.len() {
        return Err(DecodeError::Timestamp { offset: cursor });
    }

    let cursor = match field::placeholder(raw, cursor) {
        Some(next) => next,
        None => {
            let (date, next) = timestamp::parse_at(raw, cursor, &TimestampGrammar::ALL, year)
                .ok_or(DecodeError::Timestamp { offset: cursor })?;
            draft.date = Some(date);
            next
        }
    };

    let cursor = field::nil_or_token(raw, cursor)
        .advance(cursor, |host| draft.hostname = host.to_owned());
    let cursor = field::nil_or_token(raw, cursor)
        .advance(cursor, |app| draft.application = app.to_owned());

    let cursor = match field::nil_or_token(raw, cursor) {
        Field::Value(token, next) => {
            let pid = token.parse::<u32>().map_err(|_| DecodeError::ProcessId {
                offset: cursor,
                token: token.to_owned(),
            })?;
            draft.process_id = Some(pid);
            next
        }
        Field::Nil(next) => next,
        Field::Missing => cursor,
    };

    let cursor = field::nil_or_token(raw, cursor)
        .advance(cursor, |id| draft.message_id = Some(id.to_owned()));

    let cursor = parse_structured_data(raw, cursor, draft)?;

    draft.content = content_from(raw, cursor);
    draft.format = Format::Rfc5424;
    Ok(())
}

/// 하나 이상의 `[...]` 그룹 또는 `-`를 파싱합니다.
///
/// 실패하더라도 그때까지 파싱된 요소는 초안에 남습니다.
fn parse_structured_data(
    raw: &str,
    cursor: usize,
    draft: &mut Draft,
) -> Result<usize, DecodeError> {
    if let Some(next) = field::placeholder(raw, cursor) {
        draft.structured_data = Some(StructuredData::new());
        return Ok(next);
    }

    // `[`가 아니면 구조화 데이터 없이 바로 본문
    if raw.as_bytes().get(cursor) != Some(&b'[') {
        return Ok(cursor);
    }

    let mut data = StructuredData::new();
    let mut position = cursor;

    while raw.as_bytes().get(position) == Some(&b'[') {
        let parsed = find_element_end(raw, position)
            .ok_or(StructuredDataError::Unterminated)
            .and_then(|end| Element::parse(&raw[position + 1..end]).map(|e| (e, end)));

        match parsed {
            Ok((element, end)) => {
                data.push(element);
                position = end + 1;
            }
            Err(reason) => {
                draft.structured_data = Some(data);
                return Err(DecodeError::StructuredData {
                    offset: position,
                    reason,
                });
            }
        }
    }

    draft.structured_data = Some(data);

    if raw.as_bytes().get(position) == Some(&b' ') {
        position += 1;
    }
    Ok(position)
}

fn parse_rfc3164(raw: &str, cursor: usize, year: i32, draft: &mut Draft) {
    let cursor = match timestamp::parse_at(raw, cursor, &[TimestampGrammar::Legacy], year) {
        Some((date, next)) => {
            draft.date = Some(date);
            let next = field::token(raw, next)
                .advance(next, |host| draft.hostname = host.to_owned());
            let next = field::token(raw, next)
                .advance(next, |app| draft.application = app.to_owned());
            draft.format = Format::Rfc3164;
            next
        }
        None => {
            draft.format = Format::Simple;
            cursor
        }
    };

    draft.content = content_from(raw, cursor);
}

fn content_from(raw: &str, cursor: usize) -> String {
    let rest = raw.get(cursor..).unwrap_or_default();
    rest.strip_prefix(BOM_PREFIX).unwrap_or(rest).to_owned()
}
