//! 공통 유틸리티 함수 모듈
//!
//! 런타임 전체에서 사용되는 공통 유틸리티 함수들을 제공합니다.
//!
//! # Modules
//!
//! - [`string_utils`] - 식별자 검증, 목록 파싱, 타입 이름 정리
//! - [`display_terminal`] - 시작 배너 포맷팅 함수들

pub mod display_terminal;
pub mod string_utils;
