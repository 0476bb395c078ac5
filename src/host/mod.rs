//! 호스트 런타임 어댑터
//!
//! HTTP 전송은 호스트의 몫입니다. 이 모듈은 actix-web 요청을 요청 원천으로,
//! 파이프라인 응답을 actix-web 응답으로 옮기는 얇은 변환만 제공합니다.

pub mod actix_adapter;

pub use actix_adapter::{into_http_response, parse_query_string, payload_from_http};
