//! 미들웨어 모듈
//!
//! 요청 파이프라인에서 사용되는 기본 제공 미들웨어들입니다.
//! 코어 `MiddlewareServiceProvider`가 아래 식별자로 컨테이너에 등록합니다.
//!
//! | 식별자 | 미들웨어 |
//! |--------|----------|
//! | `middleware.request_id` | [`AssignRequestId`] |
//! | `middleware.trim_strings` | [`TrimStrings`] |
//! | `middleware.auth` | [`EnsureUser::required`] |
//! | `middleware.auth.optional` | [`EnsureUser::optional`] |
//!
//! # 사용 방법
//!
//! ```rust,ignore
//! app.middleware(["middleware.request_id", "middleware.trim_strings"])?;
//! app.route_middleware("account", ["middleware.auth"])?;
//! ```

pub mod ensure_user;
pub mod request_id;
pub mod trim_strings;

pub use ensure_user::{AuthMode, EnsureUser};
pub use request_id::AssignRequestId;
pub use trim_strings::TrimStrings;
