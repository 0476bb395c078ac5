//! 사용자 확인 미들웨어
//!
//! 요청의 사용자 해석 함수로 현재 사용자를 확인합니다.
//! 인증 정책 자체(토큰 검증 등)는 사용자 해석 함수를 설정하는 호스트의 몫입니다.

use serde_json::json;

use crate::core::errors::AppResult;
use crate::http::{Request, Response};
use crate::pipeline::{Middleware, Next};

/// 인증 모드
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// 사용자가 없으면 401로 체인을 끊습니다.
    Required,
    /// 사용자가 없어도 진행합니다.
    Optional,
}

/// 사용자 확인 미들웨어
#[derive(Debug, Clone)]
pub struct EnsureUser {
    mode: AuthMode,
}

impl EnsureUser {
    pub fn new(mode: AuthMode) -> Self {
        Self { mode }
    }

    pub fn required() -> Self {
        Self::new(AuthMode::Required)
    }

    pub fn optional() -> Self {
        Self::new(AuthMode::Optional)
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }
}

impl Middleware for EnsureUser {
    fn handle(&self, mut request: Request, next: Next<'_>) -> AppResult<Response> {
        let authenticated = request.user().is_some();

        match (self.mode, authenticated) {
            (AuthMode::Required, false) => {
                log::warn!("인증 실패: {} {}", request.method(), request.path());
                return Ok(Response::failure(
                    401,
                    json!({
                        "error": "authentication_required",
                        "message": "인증된 사용자가 필요합니다"
                    }),
                ));
            }
            (AuthMode::Optional, false) => {
                log::debug!("선택적 인증: 사용자 없음, 요청 진행");
            }
            (_, true) => {
                log::debug!("인증 성공: {}", request.path());
            }
        }

        request.set("authenticated", authenticated);
        next(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::RequestPayload;
    use std::sync::Arc;

    struct User {
        id: u64,
    }

    fn anonymous() -> Request {
        Request::capture(&RequestPayload::new("GET", "/account"))
    }

    fn signed_in() -> Request {
        let mut request = anonymous();
        request.set_user_resolver(|_| Some(Arc::new(User { id: 7 })));
        request
    }

    fn terminal(request: Request) -> AppResult<Response> {
        let id = request.user_as::<User>().map(|user| user.id);
        Ok(Response::ok(json!({
            "user": id,
            "authenticated": request.get("authenticated", json!(null)),
        })))
    }

    #[test]
    fn test_required_without_user_short_circuits() {
        let response = EnsureUser::required()
            .handle(
                anonymous(),
                Box::new(|_: Request| -> AppResult<Response> { panic!("next must not run") }),
            )
            .unwrap();

        assert_eq!(response.status(), 401);
        assert!(response.is_failure());
        assert_eq!(response.body()["error"], json!("authentication_required"));
    }

    #[test]
    fn test_required_with_user_continues() {
        let response = EnsureUser::required().handle(signed_in(), Box::new(terminal)).unwrap();

        assert!(response.is_success());
        assert_eq!(response.body()["user"], json!(7));
        assert_eq!(response.body()["authenticated"], json!(true));
    }

    #[test]
    fn test_optional_without_user_continues() {
        let response = EnsureUser::optional().handle(anonymous(), Box::new(terminal)).unwrap();

        assert!(response.is_success());
        assert_eq!(response.body()["user"], json!(null));
        assert_eq!(response.body()["authenticated"], json!(false));
    }
}
