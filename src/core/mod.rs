//! # Core Container Module
//!
//! 런타임의 핵심인 의존성 주입 컨테이너와 에러 타입을 제공합니다.
//!
//! ## 모듈 구성
//!
//! ### [`binding`] - 바인딩 저장소
//! - **Binding**: transient / singleton / instance 세 종류를 표현하는 합 타입
//! - **BindingRegistry**: 식별자 → 바인딩 맵, 같은 식별자는 마지막 등록이 이김
//!
//! ### [`container`] - 의존성 주입 컨테이너
//! - **Container**: `bind` / `singleton` / `instance` / `make`
//! - **재귀 해석**: 팩토리가 컨테이너로 자신의 의존성을 해석
//! - **순환 참조 감지**: 빌드 스택 기반의 즉시 실패
//! - **contextual 바인딩**: 특정 식별자를 빌드하는 동안에만 적용되는 오버라이드
//!
//! ### [`registry`] - 생성자 테이블
//! - **inventory 기반**: 명시적으로 제출된 생성자만 자동 생성에 사용
//!
//! ### [`errors`] - 통합 에러 처리
//! - **AppError**: 해석/생명주기/설정/런타임 에러를 하나의 열거형으로 정의
//!
//! ## 사용 패턴
//!
//! ```rust,ignore
//! use plugin_runtime::core::{Container, Instance};
//!
//! let container = Container::new();
//! container.instance_value("app.name", String::from("blog"))?;
//! container.singleton("clock", |_| Ok(Arc::new(SystemClock) as Instance))?;
//!
//! let name = container.make_as::<String>("app.name")?;
//! ```
//!
//! ## 트러블슈팅
//!
//! ### 순환 참조 감지
//! ```text
//! Circular resolution detected for [mailer]: mailer -> transport -> mailer
//! ```
//! **해결**: 한쪽 의존성을 boot 단계에서 지연 해석하도록 변경
//!
//! ### 미등록 식별자
//! ```text
//! Unresolvable binding: [mailer] is not bound and cannot be constructed
//! ```
//! **해결**: 프로바이더의 register 훅에서 바인딩하거나 `ConstructorRegistration` 제출

pub mod binding;
pub mod container;
pub mod errors;
pub mod registry;

pub use binding::{Binding, BindingKind, BindingRegistry, Factory, Instance};
pub use container::{Container, ContextualBindingBuilder, ContextualNeeds, Parameters};
pub use errors::*;
pub use registry::ConstructorRegistration;
