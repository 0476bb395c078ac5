//! 플러그인 런타임
//!
//! 호스트 콘텐츠 관리 플러그인 안에 내장되는 경량 애플리케이션 런타임입니다.
//! 의존성 주입 컨테이너, 두 단계 프로바이더 부트스트랩, 미들웨어 파이프라인을 제공합니다.
//!
//! # Features
//!
//! - **서비스 컨테이너**: transient / singleton / instance 바인딩, contextual 바인딩, 순환 참조 감지
//! - **프로바이더**: register → boot 두 단계 생명주기, `inventory` 기반 자동 등록
//! - **미들웨어 파이프라인**: 중첩 래퍼 순서 보장, 조기 응답, 중복 제거
//! - **실패 경계**: 파이프라인 실패(및 panic)를 교체 가능한 예외 처리기로 응답 변환
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   Host Runtime  │ ← HTTP 전송 (actix-web 어댑터)
//! └─────────────────┘
//!          │ RequestSource
//!          ▼
//! ┌─────────────────┐
//! │   Application   │ ← 부트 순서, 미들웨어 구성
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ Exception       │ ← 실패 경계
//! │ Translator      │
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Pipeline     │ ← 미들웨어 체인 → 최종 액션
//! └─────────────────┘
//!          │ make
//!          ▼
//! ┌─────────────────┐
//! │    Container    │ ← 바인딩 레지스트리, 프로바이더가 채움
//! └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use plugin_runtime::config::AppConfig;
//! use plugin_runtime::foundation::Application;
//! use plugin_runtime::http::RequestPayload;
//!
//! let mut app = Application::new(AppConfig::load())?;
//! app.middleware(["middleware.request_id", "middleware.trim_strings"])?;
//!
//! let response = app.boot(&RequestPayload::new("GET", "/"))?;
//! ```

pub mod config;
pub mod core;
pub mod exceptions;
pub mod foundation;
pub mod host;
pub mod http;
pub mod middlewares;
pub mod pipeline;
pub mod providers;
pub mod utils;

pub use crate::core::{AppError, AppResult, Container};
pub use foundation::Application;
pub use providers::{ProviderRegistration, ServiceProvider};
