//! 공급자 정규화 -- 레지스트리 originator 텍스트를 [`Supplier`]로 분류
//!
//! # 규칙
//!
//! 1. NFKD 분해 후 ASCII 문자만 남깁니다 (`José` -> `Jose`).
//! 2. 이메일 주소를 추출하고, 여러 개면 마지막 것만 사용합니다.
//! 3. 이메일과 괄호류를 제거한 이름 부분을 공백 기준으로 토큰화합니다.
//! 4. 토큰 4개 이상은 조직, 2~3개는 개인, 그 외는 알 수 없음(`NOASSERTION`)입니다.
//! 5. 이메일이 있으면 이름 뒤에 `(email)` 형태로 붙입니다.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::types::{Supplier, SupplierKind};

/// RFC 5322 로컬 파트 + 도메인 라벨 형식의 이메일 패턴
const EMAIL_PATTERN: &str = r"[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+";

static EMAIL_RE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(EMAIL_PATTERN).ok());

/// 조직으로 분류되는 최소 토큰 수
const ORGANIZATION_MIN_TOKENS: usize = 4;
/// 개인으로 분류되는 최소 토큰 수
const PERSON_MIN_TOKENS: usize = 2;

/// 이름 부분에서 제거할 구분 문자
const STRIP_CHARS: [char; 6] = ['<', '>', '(', ')', '[', ']'];

/// 악센트 문자를 가장 가까운 ASCII로 분해하고 나머지 비 ASCII 문자는 버립니다.
pub fn to_ascii(text: &str) -> String {
    text.nfkd().filter(char::is_ascii).collect()
}

/// originator 텍스트로 공급자를 분류합니다.
///
/// 값이 없거나 토큰이 하나 이하면 [`Supplier::unknown`]을 반환합니다.
pub fn classify_supplier(originator: Option<&str>) -> Supplier {
    let Some(raw) = originator else {
        return Supplier::unknown();
    };

    let ascii = to_ascii(raw);
    let (name_part, email) = match EMAIL_RE.as_ref() {
        Some(re) => {
            let email = re.find_iter(&ascii).last().map(|m| m.as_str().to_owned());
            (re.replace_all(&ascii, " ").into_owned(), email)
        }
        None => (ascii, None),
    };

    let cleaned: String = name_part
        .chars()
        .map(|c| if STRIP_CHARS.contains(&c) { ' ' } else { c })
        .collect();
    let tokens: Vec<&str> = cleaned.split_whitespace().collect();

    let kind = if tokens.len() >= ORGANIZATION_MIN_TOKENS {
        SupplierKind::Organization
    } else if tokens.len() >= PERSON_MIN_TOKENS {
        SupplierKind::Person
    } else {
        return Supplier::unknown();
    };

    let name = tokens.join(" ");
    let text = match email {
        Some(email) => format!("{name} ({email})"),
        None => name,
    };

    Supplier { kind, text }
}
