//! 실패 경계 (failure boundary)
//!
//! 파이프라인 실행을 감싸 미들웨어나 최종 액션에서 발생한 실패를 가장 바깥에서 한 번만 잡고,
//! 컨테이너에서 해석한 예외 처리기로 응답을 만듭니다. 다시 던지지 않습니다.
//!
//! 처리기를 해석할 수 없거나 처리기 자체가 실패(또는 panic)하면 내부 정보가 없는
//! 일반 실패 응답을 돌려줍니다. 호스트 런타임으로 돌아가기 전의 마지막 방어선입니다.
//!
//! 요청에 ID가 기록되어 있으면 처리기에 넘기는 요청의 `request_id` 속성과
//! 실패 응답의 `x-request-id` 헤더에 붙입니다. 일반 실패 응답도 마찬가지입니다.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use serde_json::json;

use crate::core::container::Container;
use crate::core::errors::{AppError, AppResult};
use crate::exceptions::handler::{GENERIC_MESSAGE, SharedExceptionHandler};
use crate::foundation::keys;
use crate::http::{REQUEST_ID_ATTRIBUTE, REQUEST_ID_HEADER, Request, Response};

pub struct ExceptionTranslator<'c> {
    container: &'c Container,
}

impl<'c> ExceptionTranslator<'c> {
    pub fn new(container: &'c Container) -> Self {
        Self { container }
    }

    /// 작업을 실행하고 실패를 응답으로 변환합니다.
    ///
    /// `request`는 실패 시 처리기에 함께 전달되는 캡처 시점의 요청입니다.
    /// 파이프라인 안에서 기록된 요청 ID는 복제본끼리 공유되므로 여기서도 보입니다.
    pub fn capture<F>(&self, request: &Request, work: F) -> Response
    where
        F: FnOnce() -> AppResult<Response>,
    {
        let error = match panic::catch_unwind(AssertUnwindSafe(work)) {
            Ok(Ok(response)) => return response,
            Ok(Err(error)) => error,
            Err(payload) => AppError::InternalError(panic_message(payload.as_ref())),
        };

        match request.request_id() {
            Some(request_id) => {
                let mut tagged = request.clone();
                if !tagged.has(REQUEST_ID_ATTRIBUTE) {
                    tagged.set(REQUEST_ID_ATTRIBUTE, request_id);
                }
                self.translate(&tagged, &error).with_header(REQUEST_ID_HEADER, request_id)
            }
            None => self.translate(request, &error),
        }
    }

    /// 실패 하나를 응답으로 변환합니다.
    pub fn translate(&self, request: &Request, error: &AppError) -> Response {
        let handler = match self
            .container
            .make_as::<SharedExceptionHandler>(keys::EXCEPTION_HANDLER)
        {
            Ok(handler) => handler,
            Err(resolution) => {
                log::error!(
                    "Exception handler unavailable ({}); original failure: {}",
                    resolution,
                    error
                );
                return fallback_response();
            }
        };

        let rendered = panic::catch_unwind(AssertUnwindSafe(|| {
            handler.report(error);
            handler.render(request, error)
        }));

        match rendered {
            Ok(Ok(response)) => response,
            Ok(Err(render_error)) => {
                log::error!(
                    "Exception handler failed ({}); original failure: {}",
                    render_error,
                    error
                );
                fallback_response()
            }
            Err(payload) => {
                log::error!(
                    "Exception handler panicked ({}); original failure: {}",
                    panic_message(payload.as_ref()),
                    error
                );
                fallback_response()
            }
        }
    }
}

/// 내부 정보를 담지 않는 일반 실패 응답
pub fn fallback_response() -> Response {
    Response::failure(500, json!({ "error": GENERIC_MESSAGE, "status": 500 }))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panic: {}", message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panic: {}", message)
    } else {
        "panic with unknown payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exceptions::handler::{DefaultExceptionHandler, ExceptionHandler};
    use crate::http::RequestPayload;
    use std::sync::Arc;

    fn request() -> Request {
        Request::capture(&RequestPayload::new("GET", "/checkout"))
    }

    fn container_with_default_handler() -> Container {
        let container = Container::new();
        container
            .singleton_as(keys::EXCEPTION_HANDLER, |_| {
                Ok(Arc::new(DefaultExceptionHandler::new(false)) as SharedExceptionHandler)
            })
            .unwrap();
        container
    }

    struct BrokenHandler;

    impl ExceptionHandler for BrokenHandler {
        fn render(&self, _request: &Request, _error: &AppError) -> AppResult<Response> {
            Err(AppError::InternalError("template missing".to_string()))
        }
    }

    struct PanickingHandler;

    impl ExceptionHandler for PanickingHandler {
        fn report(&self, _error: &AppError) {}

        fn render(&self, _request: &Request, _error: &AppError) -> AppResult<Response> {
            panic!("handler exploded");
        }
    }

    #[test]
    fn test_success_passes_through() {
        let container = container_with_default_handler();
        let response = ExceptionTranslator::new(&container)
            .capture(&request(), || Ok(Response::ok(json!("fine"))));

        assert!(response.is_success());
        assert_eq!(response.body(), &json!("fine"));
    }

    #[test]
    fn test_error_is_converted_by_handler() {
        let container = container_with_default_handler();
        let response = ExceptionTranslator::new(&container).capture(&request(), || {
            Err(AppError::AuthorizationError("not an editor".to_string()))
        });

        assert!(response.is_failure());
        assert_eq!(response.status(), 403);
        assert_eq!(response.body()["path"], json!("/checkout"));
    }

    #[test]
    fn test_panic_is_converted() {
        let container = container_with_default_handler();
        let response = ExceptionTranslator::new(&container)
            .capture(&request(), || panic!("terminal action blew up"));

        assert!(response.is_failure());
        assert_eq!(response.status(), 500);
        assert_eq!(response.body()["error"], json!(GENERIC_MESSAGE));
    }

    #[test]
    fn test_missing_handler_falls_back() {
        let container = Container::new();
        let response = ExceptionTranslator::new(&container)
            .capture(&request(), || Err(AppError::NotFound("x".to_string())));

        assert_eq!(response, fallback_response());
    }

    #[test]
    fn test_failing_handler_falls_back() {
        let container = Container::new();
        container
            .singleton_as(keys::EXCEPTION_HANDLER, |_| {
                Ok(Arc::new(BrokenHandler) as SharedExceptionHandler)
            })
            .unwrap();

        let response = ExceptionTranslator::new(&container)
            .capture(&request(), || Err(AppError::NotFound("x".to_string())));

        assert_eq!(response, fallback_response());
    }

    #[test]
    fn test_panicking_handler_falls_back() {
        let container = Container::new();
        container
            .singleton_as(keys::EXCEPTION_HANDLER, |_| {
                Ok(Arc::new(PanickingHandler) as SharedExceptionHandler)
            })
            .unwrap();

        let response = ExceptionTranslator::new(&container)
            .capture(&request(), || Err(AppError::NotFound("x".to_string())));

        assert!(response.is_failure());
        assert_eq!(response.body()["error"], json!(GENERIC_MESSAGE));
    }

    #[test]
    fn test_request_id_reaches_handler_and_header() {
        let container = container_with_default_handler();
        let request = request();
        let inner = request.clone();

        let response = ExceptionTranslator::new(&container).capture(&request, move || {
            inner.assign_request_id("edge-9");
            Err(AppError::NotFound("gone".to_string()))
        });

        assert_eq!(response.status(), 404);
        assert_eq!(response.header(REQUEST_ID_HEADER), Some("edge-9"));
        assert_eq!(response.body()["request_id"], json!("edge-9"));
    }

    #[test]
    fn test_fallback_keeps_request_id_header() {
        let container = Container::new();
        let request = request();
        request.assign_request_id("edge-10");

        let response = ExceptionTranslator::new(&container)
            .capture(&request, || Err(AppError::NotFound("x".to_string())));

        assert_eq!(response.status(), 500);
        assert_eq!(response.body(), fallback_response().body());
        assert_eq!(response.header(REQUEST_ID_HEADER), Some("edge-10"));
    }

    #[test]
    fn test_panic_message_extraction() {
        assert_eq!(panic_message(&"boom"), "panic: boom");
        assert_eq!(panic_message(&String::from("bang")), "panic: bang");
        assert_eq!(panic_message(&42u8), "panic with unknown payload");
    }
}
