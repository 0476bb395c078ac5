//! # Middleware Pipeline
//!
//! 요청을 순서가 있는 미들웨어 체인에 통과시킨 뒤 최종 액션에 도달시키는 파이프라인입니다.
//!
//! ## 구성
//!
//! 미들웨어 목록을 뒤에서부터 접어(fold) 하나의 호출 가능한 함수를 만듭니다.
//! 최종 액션이 가장 안쪽에 있고, 각 미들웨어는 이전에 만들어진 함수를 "다음 단계"로 감쌉니다.
//!
//! ```text
//! [A, B, C] + T  →  A(B(C(T)))
//!
//! before-A → before-B → before-C → T → after-C → after-B → after-A
//! ```
//!
//! ## 실행 계약
//!
//! - 미들웨어는 `next(request)`를 한 번 호출하고 그 결과를 돌려주거나,
//! - `next`를 호출하지 않고 자신의 응답을 돌려줘 체인을 끊습니다 (접근 거부, 조기 응답).
//!
//! `Next`는 `FnOnce`이므로 두 번 호출하는 코드는 컴파일되지 않습니다.
//! 미들웨어 식별자는 해당 단계에 도달했을 때 컨테이너에서 해석됩니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! let response = Pipeline::new(&container)
//!     .send(request)
//!     .through(chain)
//!     .then(|request| Ok(Response::ok(json!({ "path": request.path() }))))?;
//! ```

pub mod chain;

use std::sync::Arc;

use crate::core::container::Container;
use crate::core::errors::{AppError, AppResult};
use crate::http::{Request, Response};

pub use chain::MiddlewareChain;

/// 체인의 나머지 부분
pub type Next<'a> = Box<dyn FnOnce(Request) -> AppResult<Response> + 'a>;

/// 요청 처리 미들웨어
pub trait Middleware: Send + Sync {
    fn handle(&self, request: Request, next: Next<'_>) -> AppResult<Response>;
}

/// 컨테이너에 저장되는 미들웨어 형태
pub type SharedMiddleware = Arc<dyn Middleware>;

struct FnMiddleware<F>(F);

impl<F> Middleware for FnMiddleware<F>
where
    F: for<'a> Fn(Request, Next<'a>) -> AppResult<Response> + Send + Sync,
{
    fn handle(&self, request: Request, next: Next<'_>) -> AppResult<Response> {
        (self.0)(request, next)
    }
}

/// 클로저로 미들웨어를 만듭니다.
pub fn from_fn<F>(handler: F) -> SharedMiddleware
where
    F: for<'a> Fn(Request, Next<'a>) -> AppResult<Response> + Send + Sync + 'static,
{
    Arc::new(FnMiddleware(handler))
}

/// 미들웨어 팩토리를 싱글톤으로 등록합니다.
pub fn register_middleware<M, F>(
    container: &Container,
    identifier: &str,
    factory: F,
) -> AppResult<()>
where
    M: Middleware + 'static,
    F: Fn(&Container) -> AppResult<M> + Send + Sync + 'static,
{
    container.singleton_as(identifier, move |c| {
        factory(c).map(|middleware| Arc::new(middleware) as SharedMiddleware)
    })
}

/// 식별자를 미들웨어로 해석합니다.
pub fn resolve_middleware(container: &Container, identifier: &str) -> AppResult<SharedMiddleware> {
    let middleware = container.make_as::<SharedMiddleware>(identifier)?;
    Ok(Arc::clone(&middleware))
}

/// 요청 파이프라인 빌더
pub struct Pipeline<'c> {
    container: &'c Container,
    request: Option<Request>,
    pipes: MiddlewareChain,
}

impl<'c> Pipeline<'c> {
    pub fn new(container: &'c Container) -> Self {
        Self {
            container,
            request: None,
            pipes: MiddlewareChain::new(),
        }
    }

    pub fn send(mut self, request: Request) -> Self {
        self.request = Some(request);
        self
    }

    /// 미들웨어 체인을 교체합니다.
    pub fn through(mut self, pipes: MiddlewareChain) -> Self {
        self.pipes = pipes;
        self
    }

    /// 미들웨어 하나를 체인 끝에 추가합니다.
    pub fn pipe(mut self, identifier: &str) -> Self {
        self.pipes.push(identifier);
        self
    }

    /// 최종 액션을 가장 안쪽에 두고 체인을 실행합니다.
    pub fn then<D>(self, destination: D) -> AppResult<Response>
    where
        D: FnOnce(Request) -> AppResult<Response> + 'c,
    {
        let request = self
            .request
            .ok_or_else(|| AppError::InternalError("pipeline has no request to send".to_string()))?;
        let container = self.container;

        let mut next: Next<'c> = Box::new(destination);
        for identifier in self.pipes.into_iter().rev() {
            let inner = next;
            next = Box::new(move |request: Request| {
                let middleware = resolve_middleware(container, &identifier)?;
                log::trace!("Entering middleware [{}]", identifier);
                middleware.handle(request, inner)
            });
        }

        next(request)
    }
}
