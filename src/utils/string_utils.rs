//! # 문자열 유틸리티
//!
//! 식별자 검증, 설정 목록 파싱, 타입 이름 정리 등 문자열 처리 함수들입니다.

use crate::core::errors::AppError;

/// 필수 문자열 필드 검증 및 정리
///
/// 빈 문자열이나 공백만 있는 경우 ValidationError를 반환하고,
/// 유효한 문자열인 경우 앞뒤 공백을 제거한 문자열을 반환합니다.
///
/// # 인자
/// * `value` - 검증할 문자열
/// * `field_name` - 필드명 (에러 메시지용)
///
/// # 예제
/// ```rust,ignore
/// use crate::utils::string_utils::validate_required_string;
///
/// assert_eq!(validate_required_string("  cache  ", "identifier").unwrap(), "cache");
/// assert!(validate_required_string("   ", "identifier").is_err());
/// ```
pub fn validate_required_string(value: &str, field_name: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::ValidationError(format!(
            "{}은(는) 필수입니다",
            field_name
        )));
    }
    Ok(trimmed.to_string())
}

/// 선택적 문자열 필드 정리
///
/// None 값이거나 빈 문자열/공백만 있는 경우 None을 반환하고,
/// 유효한 문자열인 경우 앞뒤 공백을 제거한 문자열을 Some 옵션으로 반환합니다.
///
/// # 예제
/// ```rust,ignore
/// assert_eq!(clean_optional_string(Some("  Hello  ".to_string())), Some("Hello".to_string()));
/// assert_eq!(clean_optional_string(Some("   ".to_string())), None);
/// assert_eq!(clean_optional_string(None), None);
/// ```
pub fn clean_optional_string(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// 쉼표로 구분된 목록을 파싱합니다.
///
/// 각 항목의 앞뒤 공백을 제거하고 빈 항목은 버립니다. 순서는 유지됩니다.
///
/// ```rust,ignore
/// assert_eq!(parse_list(" a, ,b "), vec!["a", "b"]);
/// ```
pub fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .filter_map(|item| clean_optional_string(Some(item.to_string())))
        .collect()
}

/// 전체 모듈 경로가 포함된 타입 이름에서 마지막 세그먼트만 추출합니다.
///
/// `std::any::type_name::<T>()`는 `plugin_runtime::providers::builtin::ExceptionServiceProvider`
/// 같은 전체 경로를 돌려주므로 로그와 프로바이더 이름에는 `ExceptionServiceProvider`만 사용합니다.
/// 제네릭 인자가 있는 경우 인자 부분은 그대로 둡니다.
pub fn short_type_name(type_name: &str) -> &str {
    let head = match type_name.find('<') {
        Some(pos) => &type_name[..pos],
        None => type_name,
    };
    match head.rfind("::") {
        Some(pos) => &type_name[pos + 2..],
        None => type_name,
    }
}

/// 불리언 설정값을 파싱합니다.
///
/// `1`, `true`, `yes`, `on` (대소문자 무관)은 참, `0`, `false`, `no`, `off`는 거짓,
/// 그 외 값은 None입니다.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
