//! RFC 5424 Structured Data 모델과 SD-ELEMENT 파서
//!
//! ```text
//! [exampleSDID@32473 iut="3" eventSource="Application"][examplePriority@32473 class="high"]
//! ```
//!
//! # 따옴표 이스케이프 규칙
//! 값 안의 `"`는 바로 앞에 작은따옴표(`'`)가 있을 때 이스케이프된 것으로 봅니다.
//! RFC 5424의 `\"` 규칙과 다르지만 송신 측 프로토콜과의 호환을 위해 그대로 유지합니다.
//! 이스케이프 시퀀스는 값에 원문 그대로 남습니다.

use serde::Serialize;

use crate::error::StructuredDataError;

/// 이스케이프 문자 (닫는 따옴표로 취급하지 않을 `"` 앞에 오는 문자)
const QUOTE_ESCAPE: u8 = b'\'';

/// SD-PARAM: 이름/값 쌍
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    name: String,
    value: String,
}

impl Parameter {
    /// 새 파라미터를 생성합니다.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// 파라미터 이름
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 파라미터 값 (이스케이프 시퀀스 포함 원문)
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// SD-ELEMENT: ID와 순서가 보존된 파라미터 목록
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Element {
    id: String,
    parameters: Vec<Parameter>,
}

impl Element {
    /// 새 요소를 생성합니다.
    pub fn new(id: impl Into<String>, parameters: Vec<Parameter>) -> Self {
        Self {
            id: id.into(),
            parameters,
        }
    }

    /// `[...]` 내부 텍스트를 파싱합니다.
    ///
    /// 형식: `id name1="value1" name2="value2"`
    ///
    /// 첫 공백 앞이 ID이며, 공백이 없으면 파라미터가 없는 요소입니다.
    /// `=`, 여는 따옴표, 닫는 따옴표 중 하나라도 찾지 못하면 요소 전체가 실패합니다.
    pub fn parse(interior: &str) -> Result<Self, StructuredDataError> {
        let (id, mut cursor) = match interior.find(' ') {
            Some(space) => (&interior[..space], space + 1),
            None => (interior, interior.len()),
        };

        if id.is_empty() {
            return Err(StructuredDataError::EmptyId);
        }

        let mut parameters = Vec::new();

        while cursor < interior.len() {
            let equals = interior[cursor..]
                .find('=')
                .map(|i| cursor + i)
                .ok_or(StructuredDataError::MissingEquals { offset: cursor })?;

            let open_quote = interior[equals..]
                .find('"')
                .map(|i| equals + i)
                .ok_or(StructuredDataError::MissingOpenQuote { offset: equals })?;

            let close_quote = find_closing_quote(interior, open_quote + 1)
                .ok_or(StructuredDataError::UnterminatedValue { offset: open_quote })?;

            parameters.push(Parameter::new(
                &interior[cursor..equals],
                &interior[open_quote + 1..close_quote],
            ));

            // 닫는 따옴표와 뒤따르는 공백 하나를 건너뜀
            cursor = close_quote + 1;
            if interior.as_bytes().get(cursor) == Some(&b' ') {
                cursor += 1;
            }
        }

        Ok(Self {
            id: id.to_owned(),
            parameters,
        })
    }

    /// SD-ID
    pub fn id(&self) -> &str {
        &self.id
    }

    /// 선언 순서대로의 파라미터 목록
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// 이름이 일치하는 첫 파라미터의 값을 반환합니다.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|p| p.name == name)
            .map(Parameter::value)
    }

    /// 파라미터 수
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    /// 파라미터가 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

/// STRUCTURED-DATA: 선언 순서대로의 요소 목록
///
/// 빈 목록(`-` 자리표시자)은 필드 자체가 없는 것(`Option::None`)과 구별됩니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StructuredData {
    elements: Vec<Element>,
}

impl StructuredData {
    /// 빈 구조화 데이터를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// 선언 순서대로의 요소 목록
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// ID가 일치하는 첫 요소를 반환합니다.
    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// 요소 수
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// 요소가 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// 요소 반복자
    pub fn iter(&self) -> std::slice::Iter<'_, Element> {
        self.elements.iter()
    }
}

impl<'a> IntoIterator for &'a StructuredData {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl From<Vec<Element>> for StructuredData {
    fn from(elements: Vec<Element>) -> Self {
        Self { elements }
    }
}

/// `from` 이후 첫 번째 이스케이프되지 않은 `"`의 위치를 찾습니다.
fn find_closing_quote(s: &str, from: usize) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut index = from;
    while index < bytes.len() {
        let offset = s[index..].find('"')?;
        let quote = index + offset;
        if bytes[quote - 1] != QUOTE_ESCAPE {
            return Some(quote);
        }
        index = quote + 1;
    }
    None
}

/// `open`의 `[`에 대응하는 `]` 위치를 찾습니다.
///
/// 따옴표로 감싼 값 안의 `]`는 건너뜁니다.
pub(crate) fn find_element_end(s: &str, open: usize) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut in_quote = false;
    for i in open + 1..bytes.len() {
        match bytes[i] {
            b'"' if in_quote && bytes[i - 1] == QUOTE_ESCAPE => {}
            b'"' => in_quote = !in_quote,
            b']' if !in_quote => return Some(i),
            _ => {}
        }
    }
    None
}
