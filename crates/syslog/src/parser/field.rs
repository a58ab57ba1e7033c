//! 커서 기반 필드 추출 헬퍼

/// RFC 5424 NILVALUE
const PLACEHOLDER: &str = "-";

/// 필드 하나를 읽은 결과
///
/// `usize`는 다음 필드가 시작되는 커서 위치입니다.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Field<T> {
    /// 값이 있음
    Value(T, usize),
    /// `-` 자리표시자
    Nil(usize),
    /// 구분자를 찾지 못함. 커서는 그대로 유지됩니다.
    Missing,
}

impl<T> Field<T> {
    /// 값이 있으면 `store`에 넘기고 다음 커서를 반환합니다.
    pub(crate) fn advance(self, cursor: usize, store: impl FnOnce(T)) -> usize {
        match self {
            Self::Value(value, next) => {
                store(value);
                next
            }
            Self::Nil(next) => next,
            Self::Missing => cursor,
        }
    }
}

/// `cursor` 위치의 단독 `-`를 인식합니다.
///
/// 뒤에 공백이 오거나 입력 끝이어야 하며, `-foo` 같은 토큰은 값입니다.
pub(crate) fn placeholder(raw: &str, cursor: usize) -> Option<usize> {
    let rest = raw.get(cursor..)?;
    if rest == PLACEHOLDER {
        Some(raw.len())
    } else if rest.starts_with("- ") {
        Some(cursor + PLACEHOLDER.len() + 1)
    } else {
        None
    }
}

/// `cursor`부터 다음 공백까지의 토큰을 읽습니다.
pub(crate) fn token(raw: &str, cursor: usize) -> Field<&str> {
    let Some(rest) = raw.get(cursor..) else {
        return Field::Missing;
    };
    match rest.find(' ') {
        Some(space) => Field::Value(&rest[..space], cursor + space + 1),
        None => Field::Missing,
    }
}

/// 자리표시자이거나 토큰인 필드를 읽습니다.
pub(crate) fn nil_or_token(raw: &str, cursor: usize) -> Field<&str> {
    match placeholder(raw, cursor) {
        Some(next) => Field::Nil(next),
        None => token(raw, cursor),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_followed_by_space() {
        assert_eq!(placeholder("a - b", 2), Some(4));
    }

    #[test]
    fn placeholder_at_end_of_input() {
        assert_eq!(placeholder("a -", 2), Some(3));
    }

    #[test]
    fn dash_prefixed_token_is_not_placeholder() {
        assert_eq!(placeholder("-foo bar", 0), None);
        assert_eq!(nil_or_token("-foo bar", 0), Field::Value("-foo", 5));
    }

    #[test]
    fn token_without_delimiter_is_missing() {
        assert_eq!(token("lonely", 0), Field::Missing);
        assert_eq!(token("short", 99), Field::Missing);
    }

    #[test]
    fn advance_keeps_cursor_when_missing() {
        let mut seen = None;
        let next = Field::<&str>::Missing.advance(7, |v| seen = Some(v));
        assert_eq!(next, 7);
        assert!(seen.is_none());

        let next = Field::Value("host", 12).advance(7, |v| seen = Some(v));
        assert_eq!(next, 12);
        assert_eq!(seen, Some("host"));
    }
}
