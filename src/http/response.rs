//! 파이프라인이 돌려주는 응답
//!
//! 성공 응답과 실패 응답은 `ResponseKind`로 구별됩니다. 실패 응답은 예외 변환기와 접근 거부 미들웨어가 만듭니다.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseKind {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    status: u16,
    headers: BTreeMap<String, String>,
    body: Value,
    kind: ResponseKind,
}

impl Response {
    pub fn new(status: u16, body: Value) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
            body,
            kind: ResponseKind::Success,
        }
    }

    /// 200 성공 응답
    pub fn ok(body: Value) -> Self {
        Self::new(200, body)
    }

    /// 실패 응답. 상태 코드와 무관하게 `ResponseKind::Failure`를 가집니다.
    pub fn failure(status: u16, body: Value) -> Self {
        Self {
            kind: ResponseKind::Failure,
            ..Self::new(status, body)
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_lowercase(), value.to_string());
        self
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }

    pub fn kind(&self) -> ResponseKind {
        self.kind
    }

    pub fn is_failure(&self) -> bool {
        self.kind == ResponseKind::Failure
    }

    pub fn is_success(&self) -> bool {
        self.kind == ResponseKind::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ok_response() {
        let response = Response::ok(json!({"id": 1})).with_header("X-Request-Id", "abc");
        assert_eq!(response.status(), 200);
        assert!(response.is_success());
        assert_eq!(response.header("x-request-id"), Some("abc"));
    }

    #[test]
    fn test_failure_kind_is_independent_of_status() {
        let denied = Response::new(401, json!({"error": "unauthenticated"}));
        let failed = Response::failure(500, json!({"error": "Internal Server Error"}));

        assert!(denied.is_success());
        assert!(failed.is_failure());
        assert_eq!(failed.kind(), ResponseKind::Failure);
    }

    #[test]
    fn test_serializes_kind_in_snake_case() {
        let value = serde_json::to_value(Response::failure(500, Value::Null)).unwrap();
        assert_eq!(value["kind"], json!("failure"));
        assert_eq!(value["status"], json!(500));
    }
}
