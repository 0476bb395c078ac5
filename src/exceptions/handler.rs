//! 예외 처리기
//!
//! 파이프라인 실패를 응답으로 바꾸는 교체 가능한 능력입니다.
//! 컨테이너에 `exception.handler` 식별자로 등록되며, 나중에 등록된 프로바이더가 덮어쓸 수 있습니다.

use std::sync::Arc;

use chrono::Utc;
use serde_json::{Value, json};

use crate::core::errors::{AppError, AppResult};
use crate::http::{REQUEST_ID_ATTRIBUTE, Request, Response};

/// 실패를 기록하고 응답으로 변환하는 처리기
pub trait ExceptionHandler: Send + Sync {
    /// 실패를 기록합니다. 기본 구현은 `log`로 남깁니다.
    fn report(&self, error: &AppError) {
        if error.is_client_error() {
            log::warn!("Request failed: {}", error);
        } else {
            log::error!("Request failed: {}", error);
        }
    }

    /// 실패를 응답으로 변환합니다.
    fn render(&self, request: &Request, error: &AppError) -> AppResult<Response>;
}

/// 컨테이너에 저장되는 처리기 형태
pub type SharedExceptionHandler = Arc<dyn ExceptionHandler>;

/// 기본 JSON 예외 처리기
///
/// ```json
/// { "error": "Not found: page", "status": 404, "path": "/missing", "timestamp": "2024-..." }
/// ```
///
/// 5xx 메시지는 `debug`가 켜진 경우에만 그대로 노출합니다.
#[derive(Debug, Clone, Default)]
pub struct DefaultExceptionHandler {
    debug: bool,
}

impl DefaultExceptionHandler {
    pub fn new(debug: bool) -> Self {
        Self { debug }
    }

    fn message(&self, error: &AppError) -> String {
        if error.is_client_error() || self.debug {
            error.to_string()
        } else {
            GENERIC_MESSAGE.to_string()
        }
    }
}

impl ExceptionHandler for DefaultExceptionHandler {
    fn render(&self, request: &Request, error: &AppError) -> AppResult<Response> {
        let status = error.status_code();
        let mut body = json!({
            "error": self.message(error),
            "status": status,
            "path": request.path(),
            "timestamp": Utc::now().to_rfc3339(),
        });

        if let (Some(request_id), Value::Object(map)) =
            (request.get_str(REQUEST_ID_ATTRIBUTE), &mut body)
        {
            map.insert(REQUEST_ID_ATTRIBUTE.to_string(), Value::from(request_id));
        }

        Ok(Response::failure(status, body))
    }
}

/// 응답에 노출하는 일반 메시지
pub const GENERIC_MESSAGE: &str = "Internal Server Error";
