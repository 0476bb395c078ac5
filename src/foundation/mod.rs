//! 애플리케이션 기반
//!
//! - [`application`]: 부트 순서와 요청 처리 진입점
//! - [`keys`]: 잘 알려진 컨테이너 식별자
//! - [`namespace`]: 소스 루트 → 논리 네임스페이스 매핑
//! - [`files`]: 파일 접근 협력자

pub mod application;
pub mod files;
pub mod keys;
pub mod namespace;

pub use application::Application;
pub use files::{FileSource, LocalFiles, MemoryFiles, SharedFileSource};
pub use namespace::detect_namespace;
