//! 코어 프로바이더
//!
//! 애플리케이션 생성 시 발견된 프로바이더보다 먼저 등록되므로,
//! 여기서 등록한 바인딩은 뒤에 오는 프로바이더가 같은 식별자로 덮어쓸 수 있습니다.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::core::container::Container;
use crate::core::errors::AppResult;
use crate::exceptions::{DefaultExceptionHandler, SharedExceptionHandler};
use crate::foundation::keys;
use crate::middlewares::{AssignRequestId, EnsureUser, TrimStrings};
use crate::pipeline::register_middleware;
use crate::providers::ServiceProvider;

/// 기본 예외 처리기를 `exception.handler`로 등록합니다.
#[derive(Debug, Default)]
pub struct ExceptionServiceProvider;

impl ServiceProvider for ExceptionServiceProvider {
    fn register(&mut self, container: &Container) -> AppResult<()> {
        container.singleton_as(keys::EXCEPTION_HANDLER, |c| {
            let debug = c
                .make_as::<AppConfig>(keys::CONFIG)
                .map(|config| config.debug)
                .unwrap_or(false);
            Ok(Arc::new(DefaultExceptionHandler::new(debug)) as SharedExceptionHandler)
        })
    }
}

/// 기본 제공 미들웨어를 등록합니다.
#[derive(Debug, Default)]
pub struct MiddlewareServiceProvider;

impl ServiceProvider for MiddlewareServiceProvider {
    fn register(&mut self, container: &Container) -> AppResult<()> {
        register_middleware(container, keys::MIDDLEWARE_REQUEST_ID, |_| Ok(AssignRequestId))?;
        register_middleware(container, keys::MIDDLEWARE_TRIM_STRINGS, |_| {
            Ok(TrimStrings::default())
        })?;
        register_middleware(container, keys::MIDDLEWARE_AUTH, |_| Ok(EnsureUser::required()))?;
        register_middleware(container, keys::MIDDLEWARE_AUTH_OPTIONAL, |_| {
            Ok(EnsureUser::optional())
        })?;
        Ok(())
    }
}
