//! 요청 ID 미들웨어
//!
//! `x-request-id` 헤더가 있으면 그대로 쓰고, 없으면 UUID v4를 발급합니다.
//! ID는 `request_id` 속성과 요청의 ID 슬롯에 기록되고 응답 헤더로 되돌려 보냅니다.
//! 체인 안에서 실패하면 실패 경계가 슬롯의 ID를 실패 응답에 붙입니다.

use uuid::Uuid;

use crate::core::errors::AppResult;
use crate::http::{Request, Response};
use crate::pipeline::{Middleware, Next};

pub use crate::http::request::{REQUEST_ID_ATTRIBUTE, REQUEST_ID_HEADER};

const MAX_INCOMING_LENGTH: usize = 128;

#[derive(Debug, Clone, Copy, Default)]
pub struct AssignRequestId;

impl AssignRequestId {
    fn incoming(request: &Request) -> Option<String> {
        let value = request.header(REQUEST_ID_HEADER)?.trim();
        let acceptable = !value.is_empty()
            && value.len() <= MAX_INCOMING_LENGTH
            && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        acceptable.then(|| value.to_string())
    }
}

impl Middleware for AssignRequestId {
    fn handle(&self, mut request: Request, next: Next<'_>) -> AppResult<Response> {
        let request_id = request
            .request_id()
            .map(str::to_string)
            .or_else(|| Self::incoming(&request))
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        request.assign_request_id(&request_id);
        request.set(REQUEST_ID_ATTRIBUTE, request_id.as_str());

        let response = next(request)?;
        Ok(response.with_header(REQUEST_ID_HEADER, &request_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::AppError;
    use crate::http::RequestPayload;
    use serde_json::json;

    fn echo(request: Request) -> AppResult<Response> {
        Ok(Response::ok(request.get(REQUEST_ID_ATTRIBUTE, json!(null))))
    }

    #[test]
    fn test_generates_uuid_when_missing() {
        let request = Request::capture(&RequestPayload::new("GET", "/"));
        let response = AssignRequestId.handle(request, Box::new(echo)).unwrap();

        let header = response.header(REQUEST_ID_HEADER).unwrap().to_string();
        assert!(Uuid::parse_str(&header).is_ok());
        assert_eq!(response.body(), &json!(header));
    }

    #[test]
    fn test_reuses_incoming_header() {
        let request = Request::capture(
            &RequestPayload::new("GET", "/").with_header("X-Request-Id", "edge-42"),
        );
        let response = AssignRequestId.handle(request, Box::new(echo)).unwrap();

        assert_eq!(response.header(REQUEST_ID_HEADER), Some("edge-42"));
        assert_eq!(response.body(), &json!("edge-42"));
    }

    #[test]
    fn test_rejects_malformed_incoming_header() {
        let request = Request::capture(
            &RequestPayload::new("GET", "/").with_header("x-request-id", "<script>"),
        );
        let response = AssignRequestId.handle(request, Box::new(echo)).unwrap();

        assert_ne!(response.header(REQUEST_ID_HEADER), Some("<script>"));
    }

    #[test]
    fn test_records_id_in_slot_when_chain_fails() {
        let request = Request::capture(
            &RequestPayload::new("GET", "/").with_header("x-request-id", "edge-9"),
        );
        let outer = request.clone();

        let result = AssignRequestId.handle(
            request,
            Box::new(|_: Request| -> AppResult<Response> {
                Err(AppError::NotFound("gone".to_string()))
            }),
        );

        assert!(result.is_err());
        assert_eq!(outer.request_id(), Some("edge-9"));
    }
}
