#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use sysloom_syslog::{Format, Message};

/// 퍼저용 구조적 입력: 헤더는 유효하게 두고 필드 내용만 흔든다
#[derive(Arbitrary, Debug)]
struct FuzzInput {
    priority: u32,
    hostname: String,
    application: String,
    process_id: Option<u32>,
    elements: Vec<FuzzElement>,
    content: String,
}

#[derive(Arbitrary, Debug)]
struct FuzzElement {
    id: String,
    params: Vec<(String, String)>,
}

fn token(s: &str) -> String {
    let cleaned: String = s.chars().filter(|c| c.is_ascii_graphic()).collect();
    if cleaned.is_empty() || cleaned == "-" {
        "x".to_owned()
    } else {
        cleaned
    }
}

fuzz_target!(|input: FuzzInput| {
    let priority = input.priority;
    let pid = input
        .process_id
        .map_or_else(|| "-".to_owned(), |p| p.to_string());

    let mut line = format!(
        "<{priority}>1 - {} {} {pid} - ",
        token(&input.hostname),
        token(&input.application),
    );
    if input.elements.is_empty() {
        line.push('-');
    }
    for element in input.elements.iter().take(8) {
        line.push('[');
        line.push_str(&element.id.replace([' ', ']', '"', '='], ""));
        for (name, value) in element.params.iter().take(8) {
            let name: String = name
                .chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect();
            let value = value.replace(['"', '\'', ']'], "");
            line.push_str(&format!(" {name}=\"{value}\""));
        }
        line.push(']');
    }
    line.push(' ');
    line.push_str(&input.content);

    let message = Message::decode(line.as_bytes());
    assert_eq!(message, Message::decode(line.as_bytes()));

    if message.valid() {
        assert_eq!(message.format(), Format::Rfc5424);
        assert_eq!(message.priority(), Some(priority));
        assert_eq!(message.process_id(), input.process_id);
    }
});
