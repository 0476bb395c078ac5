//! 예외 처리
//!
//! - [`handler`]: 실패를 응답으로 바꾸는 교체 가능한 처리기
//! - [`translator`]: 파이프라인을 감싸는 가장 바깥 실패 경계

pub mod handler;
pub mod translator;

pub use handler::{
    DefaultExceptionHandler, ExceptionHandler, GENERIC_MESSAGE, SharedExceptionHandler,
};
pub use translator::{ExceptionTranslator, fallback_response};
