//! 애플리케이션 및 서버 설정 관리 모듈
//!
//! 실행 환경 감지, 호스트 환경 프로브, 애플리케이션 설정과 데모 서버 바인딩 설정을 관리합니다.

use std::collections::HashMap;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::core::errors::AppError;
use crate::utils::string_utils::{clean_optional_string, parse_bool, parse_list};

/// 애플리케이션 실행 환경
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// 개발 환경
    Development,
    /// 테스트 환경
    Test,
    /// 스테이징 환경
    Staging,
    /// 프로덕션 환경
    Production,
}

impl Environment {
    /// 현재 실행 환경을 감지합니다.
    ///
    /// `APP_ENV`, `ENVIRONMENT` 순서로 확인하며, 설정되지 않았거나 알 수 없는 값이면
    /// `Production`을 기본값으로 사용합니다.
    pub fn current() -> Self {
        let raw = env::var("APP_ENV")
            .or_else(|_| env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "production".to_string());

        raw.parse().unwrap_or_else(|_| {
            log::warn!("Unknown environment '{}', falling back to production", raw);
            Environment::Production
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Test => "test",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl FromStr for Environment {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" | "local" => Ok(Environment::Development),
            "test" | "testing" => Ok(Environment::Test),
            "staging" | "stage" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(AppError::ConfigurationError(format!(
                "알 수 없는 실행 환경입니다: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 호스트 환경 프로브
///
/// 시작 시 한 번 조회되어 실행 환경과 콘솔(관리자) 모드 여부를 알려줍니다.
pub trait HostProbe {
    fn environment(&self) -> Environment;

    /// 명령행/관리자 모드에서 실행 중인지 여부
    fn is_console(&self) -> bool;

    /// 그 밖의 설정값
    fn var(&self, key: &str) -> Option<String>;
}

/// 프로세스 환경 변수를 읽는 프로브
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl HostProbe for ProcessEnvironment {
    fn environment(&self) -> Environment {
        Environment::current()
    }

    fn is_console(&self) -> bool {
        self.var("APP_RUNNING_IN_CONSOLE")
            .and_then(|value| parse_bool(&value))
            .unwrap_or(false)
    }

    fn var(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

/// 고정 값을 돌려주는 프로브 (임베딩/테스트용)
#[derive(Debug, Clone)]
pub struct FixedEnvironment {
    pub environment: Environment,
    pub console: bool,
    pub vars: HashMap<String, String>,
}

impl FixedEnvironment {
    pub fn new(environment: Environment, console: bool) -> Self {
        Self {
            environment,
            console,
            vars: HashMap::new(),
        }
    }

    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_string(), value.to_string());
        self
    }
}

impl HostProbe for FixedEnvironment {
    fn environment(&self) -> Environment {
        self.environment
    }

    fn is_console(&self) -> bool {
        self.console
    }

    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

/// 애플리케이션 설정
///
/// | 변수 | 기본값 |
/// |------|--------|
/// | `APP_NAME` | `plugin_runtime` |
/// | `APP_DEBUG` | 프로덕션이 아니면 `true` |
/// | `APP_BASE_PATH` | `.` |
/// | `APP_PATH` | `<base_path>/app` |
/// | `APP_MIDDLEWARE` | 비어 있음 (쉼표 구분 목록) |
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub name: String,
    pub environment: Environment,
    pub debug: bool,
    pub console: bool,
    pub base_path: PathBuf,
    pub app_path: PathBuf,
    /// 전역 미들웨어 식별자 목록
    pub middleware: Vec<String>,
}

impl AppConfig {
    /// 프로브에서 설정을 읽습니다.
    pub fn from_probe(probe: &dyn HostProbe) -> Self {
        let environment = probe.environment();
        let setting = |key: &str| clean_optional_string(probe.var(key));

        let debug = setting("APP_DEBUG")
            .and_then(|value| parse_bool(&value))
            .unwrap_or(!environment.is_production());
        let base_path = PathBuf::from(setting("APP_BASE_PATH").unwrap_or_else(|| ".".to_string()));
        let app_path = setting("APP_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| base_path.join("app"));
        let middleware = setting("APP_MIDDLEWARE")
            .map(|value| parse_list(&value))
            .unwrap_or_default();

        Self {
            name: setting("APP_NAME").unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string()),
            environment,
            debug,
            console: probe.is_console(),
            base_path,
            app_path,
            middleware,
        }
    }

    /// 프로세스 환경 변수에서 설정을 읽습니다.
    pub fn load() -> Self {
        Self::from_probe(&ProcessEnvironment)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_probe(&FixedEnvironment::new(Environment::Development, false))
    }
}

/// 서버 바인딩 설정
pub struct ServerConfig;

impl ServerConfig {
    /// 서버가 바인딩할 포트를 반환합니다. 기본값: 8080
    pub fn port() -> u16 {
        env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .unwrap_or(8080)
    }

    /// 서버가 바인딩할 호스트 주소를 반환합니다. 기본값: "0.0.0.0"
    pub fn host() -> String {
        env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_from_string() {
        assert_eq!("development".parse::<Environment>().unwrap(), Environment::Development);
        assert_eq!("TEST".parse::<Environment>().unwrap(), Environment::Test);
        assert_eq!(" stage ".parse::<Environment>().unwrap(), Environment::Staging);
        assert_eq!("prod".parse::<Environment>().unwrap(), Environment::Production);
        assert!(matches!(
            "moon".parse::<Environment>(),
            Err(AppError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_config_defaults_for_development() {
        let config = AppConfig::from_probe(&FixedEnvironment::new(Environment::Development, false));

        assert!(config.debug);
        assert!(!config.console);
        assert_eq!(config.base_path, PathBuf::from("."));
        assert_eq!(config.app_path, PathBuf::from("./app"));
        assert!(config.middleware.is_empty());
    }

    #[test]
    fn test_debug_is_off_in_production_unless_set() {
        let probe = FixedEnvironment::new(Environment::Production, true);
        assert!(!AppConfig::from_probe(&probe).debug);

        let probe = probe.with_var("APP_DEBUG", "yes");
        assert!(AppConfig::from_probe(&probe).debug);
    }

    #[test]
    fn test_config_reads_paths_and_middleware() {
        let probe = FixedEnvironment::new(Environment::Staging, true)
            .with_var("APP_NAME", "shop")
            .with_var("APP_BASE_PATH", "/srv/plugin")
            .with_var("APP_PATH", "/srv/plugin/src")
            .with_var("APP_MIDDLEWARE", "middleware.request_id, ,middleware.trim_strings");
        let config = AppConfig::from_probe(&probe);

        assert_eq!(config.name, "shop");
        assert!(config.console);
        assert_eq!(config.base_path, PathBuf::from("/srv/plugin"));
        assert_eq!(config.app_path, PathBuf::from("/srv/plugin/src"));
        assert_eq!(
            config.middleware,
            vec!["middleware.request_id".to_string(), "middleware.trim_strings".to_string()]
        );
    }

    #[test]
    fn test_server_config_defaults() {
        if env::var("PORT").is_err() {
            assert_eq!(ServerConfig::port(), 8080);
        }

        if env::var("HOST").is_err() {
            assert_eq!(ServerConfig::host(), "0.0.0.0");
        }
    }
}
