//! # Configuration Module
//!
//! 런타임 설정 관리를 담당하는 모듈입니다.
//! 환경 변수 기반의 설정값들을 한 곳에서 읽고, 호스트 환경 프로브를 통해
//! 실행 환경과 콘솔 모드 여부를 판단합니다.
//!
//! ## 환경 변수
//!
//! ```bash
//! export APP_ENV="development"          # development, test, staging, production
//! export APP_RUNNING_IN_CONSOLE="false" # 콘솔 전용 프로바이더 등록 여부
//! export APP_MIDDLEWARE="middleware.request_id,middleware.trim_strings"
//! export APP_BASE_PATH="/srv/plugin"
//!
//! # 데모 서버
//! export HOST="0.0.0.0"
//! export PORT="8080"
//! ```

pub mod app_config;

pub use app_config::*;
