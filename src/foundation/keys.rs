//! 컨테이너에 등록되는 잘 알려진 식별자

/// [`AppConfig`](crate::config::AppConfig)
pub const CONFIG: &str = "config";
/// 현재 [`Environment`](crate::config::Environment)
pub const ENVIRONMENT: &str = "env";
/// 파이프라인을 통과한 요청
pub const REQUEST: &str = "request";
/// [`SharedExceptionHandler`](crate::exceptions::SharedExceptionHandler)
pub const EXCEPTION_HANDLER: &str = "exception.handler";
/// [`SharedFileSource`](crate::foundation::files::SharedFileSource)
pub const FILES: &str = "files";

pub const MIDDLEWARE_REQUEST_ID: &str = "middleware.request_id";
pub const MIDDLEWARE_TRIM_STRINGS: &str = "middleware.trim_strings";
pub const MIDDLEWARE_AUTH: &str = "middleware.auth";
pub const MIDDLEWARE_AUTH_OPTIONAL: &str = "middleware.auth.optional";
