//! 요청/응답 모델
//!
//! 전송 계층과 무관한 메모리 내 객체입니다. 실제 HTTP 전송은 호스트가 담당하고
//! [`RequestSource`]를 통해 원시 데이터를 넘겨줍니다.

pub mod request;
pub mod response;
pub mod source;

pub use request::{
    REQUEST_ID_ATTRIBUTE, REQUEST_ID_HEADER, Request, RequestSnapshot, UserResolver,
};
pub use response::{Response, ResponseKind};
pub use source::{RequestPayload, RequestSource, UploadedFile};
