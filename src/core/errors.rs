//! # Application Error Handling System
//!
//! 런타임 전역에서 사용하는 통합 에러 타입입니다.
//! 컨테이너 해석 실패, 프로바이더 생명주기 실패, 설정 오류와
//! 파이프라인 안에서 발생하는 런타임 에러를 하나의 열거형으로 다룹니다.
//!
//! ## 에러 분류
//!
//! ### 1. 프로그래머 에러 (Fail-Fast)
//! - `UnresolvableBindingError`: 등록되지 않았고 자동 생성도 불가능한 식별자
//! - `CircularResolutionError`: 팩토리가 자기 자신을 간접적으로 다시 요청
//! - `TypeMismatchError`: 등록된 값과 요청한 타입이 다름
//! - `ProviderLifecycleError`: register/boot 훅 실패
//! - `ConfigurationError`: 설정 누락 또는 잘못된 설정
//!
//! 이 에러들은 부트스트랩 도중 즉시 호출자에게 전달되며 재시도하지 않습니다.
//!
//! ### 2. 파이프라인 에러 (응답으로 변환)
//! 미들웨어나 최종 액션 안에서 발생한 에러는 어떤 변형이든 "파이프라인 실패"로 취급되어
//! [`crate::exceptions::ExceptionTranslator`]가 응답으로 변환합니다.
//!
//! ## 상태 코드 매핑
//!
//! | AppError | Status | 사용 시나리오 |
//! |----------|--------|---------------|
//! | `ValidationError` | 400 | 입력값 검증 실패, 빈 식별자 |
//! | `AuthenticationError` | 401 | 사용자 없음 |
//! | `AuthorizationError` | 403 | 권한 부족 |
//! | `NotFound` | 404 | 리소스 없음 |
//! | `ConflictError` | 409 | 중복/상태 충돌 |
//! | 그 외 | 500 | 내부 오류 |

use std::fmt;

use thiserror::Error;

/// 프로바이더 생명주기 단계
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    Register,
    Boot,
}

impl fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecyclePhase::Register => f.write_str("register"),
            LifecyclePhase::Boot => f.write_str("boot"),
        }
    }
}

/// 애플리케이션 전역 에러 타입
///
/// `thiserror`로 `Error` trait을 구현합니다.
/// HTTP 상태 코드로의 매핑은 [`AppError::status_code`]가 담당합니다.
#[derive(Error, Debug)]
pub enum AppError {
    /// 식별자에 대한 바인딩이 없고 생성자 테이블에도 등록되지 않음
    ///
    /// # 예제
    /// ```rust,ignore
    /// let err = container.make("mailer").unwrap_err();
    /// assert!(matches!(err, AppError::UnresolvableBindingError(_)));
    /// ```
    #[error("Unresolvable binding: [{0}] is not bound and cannot be constructed")]
    UnresolvableBindingError(String),

    /// 팩토리가 완료되기 전에 자기 자신의 식별자를 다시 요청함
    ///
    /// `chain`은 해석 스택을 `a -> b -> a` 형태로 담습니다.
    #[error("Circular resolution detected for [{identifier}]: {chain}")]
    CircularResolutionError { identifier: String, chain: String },

    /// 등록된 값이 요청한 타입으로 다운캐스트되지 않음
    #[error("Type mismatch for [{identifier}]: expected {expected}")]
    TypeMismatchError {
        identifier: String,
        expected: &'static str,
    },

    /// register 또는 boot 훅이 실패함
    ///
    /// 부분적으로 초기화된 상태에서 계속 진행하지 않도록 `boot()` 밖으로 그대로 전파됩니다.
    #[error("Provider [{provider}] failed during {phase}: {source}")]
    ProviderLifecycleError {
        provider: String,
        phase: LifecyclePhase,
        #[source]
        source: Box<AppError>,
    },

    /// 설정 누락 또는 잘못된 설정
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// `boot()`가 두 번 호출됨
    #[error("Application has already been booted")]
    AlreadyBootedError,

    /// 입력값 검증 에러 (400 Bad Request)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 리소스 찾을 수 없음 에러 (404 Not Found)
    #[error("Not found: {0}")]
    NotFound(String),

    /// 충돌/중복 에러 (409 Conflict)
    #[error("Conflict error: {0}")]
    ConflictError(String),

    /// 인증 실패 에러 (401 Unauthorized)
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// 권한 부족 에러 (403 Forbidden)
    #[error("Authorization error: {0}")]
    AuthorizationError(String),

    /// 외부 협력자(호스트, 파일 접근 등) 에러 (500 Internal Server Error)
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// 내부 에러 (500 Internal Server Error)
    ///
    /// 파이프라인 안에서 발생한 panic도 이 변형으로 변환됩니다.
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    /// 에러에 대응하는 HTTP 상태 코드를 반환합니다.
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::ValidationError(_) => 400,
            AppError::AuthenticationError(_) => 401,
            AppError::AuthorizationError(_) => 403,
            AppError::NotFound(_) => 404,
            AppError::ConflictError(_) => 409,
            _ => 500,
        }
    }

    /// 클라이언트 측 에러(4xx)인지 확인합니다.
    ///
    /// 4xx 메시지는 그대로 노출해도 되지만 5xx 메시지는 내부 정보를 담을 수 있습니다.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }

    /// 생명주기 에러로 감쌉니다.
    pub fn lifecycle(provider: impl Into<String>, phase: LifecyclePhase, source: AppError) -> Self {
        AppError::ProviderLifecycleError {
            provider: provider.into(),
            phase,
            source: Box::new(source),
        }
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type AppResult<T> = Result<T, AppError>;

/// 외부 라이브러리 에러를 AppError로 변환하는 확장 trait
///
/// # 예제
///
/// ```rust,ignore
/// use plugin_runtime::core::errors::ErrorContext;
///
/// let bytes = std::fs::read(path).context("Failed to read manifest")?;
/// let manifest: Value = serde_json::from_slice(&bytes)
///     .config_context("composer.json is not valid JSON")?;
/// ```
pub trait ErrorContext<T> {
    /// 컨텍스트 정보와 함께 `InternalError`로 변환합니다.
    fn context(self, msg: &str) -> AppResult<T>;

    /// 클로저를 사용하여 지연 평가된 컨텍스트를 제공합니다.
    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String;

    /// 컨텍스트 정보와 함께 `ConfigurationError`로 변환합니다.
    fn config_context(self, msg: &str) -> AppResult<T>;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: fmt::Display,
{
    fn context(self, msg: &str) -> AppResult<T> {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", msg, e)))
    }

    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", f(), e)))
    }

    fn config_context(self, msg: &str) -> AppResult<T> {
        self.map_err(|e| AppError::ConfigurationError(format!("{}: {}", msg, e)))
    }
}
