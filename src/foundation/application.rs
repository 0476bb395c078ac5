//! # Application
//!
//! 컨테이너, 프로바이더 생명주기, 미들웨어 파이프라인, 실패 경계를 묶는 진입점입니다.
//!
//! ## 부트 순서
//!
//! ```text
//! Application::new(config)
//!    ├─ 컨테이너 생성 + 현재 컨테이너로 설치
//!    ├─ config / env / files 바인딩
//!    ├─ 코어 프로바이더 register
//!    └─ 발견된 프로바이더 register (콘솔 모드에 따라 필터)
//!
//! app.boot(&source)
//!    ├─ 요청 캡처
//!    ├─ 전역 미들웨어 → 최종 액션 (request 바인딩)   ← 실패 경계 안
//!    └─ 최종 액션에 도달했고 응답이 실패가 아니면 모든 프로바이더 boot
//! ```
//!
//! 요청 하나를 처리한 뒤에는 미들웨어 구성이 고정됩니다.

use std::cell::Cell;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use once_cell::unsync::OnceCell;
use serde_json::json;

use crate::config::AppConfig;
use crate::core::binding::Instance;
use crate::core::container::Container;
use crate::core::errors::{AppError, AppResult, ErrorContext};
use crate::exceptions::ExceptionTranslator;
use crate::foundation::files::{LocalFiles, SharedFileSource};
use crate::foundation::keys;
use crate::foundation::namespace::detect_namespace;
use crate::http::{Request, RequestSource, Response};
use crate::pipeline::{MiddlewareChain, Pipeline};
use crate::providers::{
    self, ExceptionServiceProvider, MiddlewareServiceProvider, ProviderRepository, ServiceProvider,
};

pub struct Application {
    container: Arc<Container>,
    providers: ProviderRepository,
    middleware: MiddlewareChain,
    middleware_groups: HashMap<String, MiddlewareChain>,
    config: AppConfig,
    namespace: OnceCell<String>,
    /// 요청을 처리한 뒤 미들웨어 구성 고정
    frozen: bool,
    started: bool,
}

impl Application {
    /// 로컬 파일 시스템을 사용하는 애플리케이션을 만듭니다.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        Self::with_files(config, Arc::new(LocalFiles))
    }

    pub fn with_files(config: AppConfig, files: SharedFileSource) -> AppResult<Self> {
        let container = Arc::new(Container::new());
        if Container::set_current(Arc::clone(&container)).is_some() {
            log::debug!("Replacing previously installed container");
        }

        container.instance_value(keys::CONFIG, config.clone())?;
        container.instance_value(keys::ENVIRONMENT, config.environment)?;
        container.instance_value(keys::FILES, files)?;

        let mut app = Self {
            providers: ProviderRepository::new(Arc::clone(&container)),
            container,
            middleware: config.middleware.iter().collect(),
            middleware_groups: HashMap::new(),
            config,
            namespace: OnceCell::new(),
            frozen: false,
            started: false,
        };

        app.register_core_providers()?;
        app.register_discovered_providers()?;

        log::info!(
            "Application [{}] ready in {} mode with {} provider(s)",
            app.config.name,
            app.config.environment,
            app.providers.len()
        );
        Ok(app)
    }

    fn register_core_providers(&mut self) -> AppResult<()> {
        self.register::<ExceptionServiceProvider>()?;
        self.register::<MiddlewareServiceProvider>()?;
        Ok(())
    }

    fn register_discovered_providers(&mut self) -> AppResult<()> {
        for registration in providers::discovered(self.config.console) {
            log::debug!("Discovered provider [{}]", registration.name);
            self.register_provider(registration.build())?;
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // 컨테이너 표면
    // ---------------------------------------------------------------------

    /// 프로바이더를 생성해 등록합니다.
    pub fn register<P>(&mut self) -> AppResult<bool>
    where
        P: ServiceProvider + Default + 'static,
    {
        self.register_provider(Box::new(P::default()))
    }

    pub fn register_provider(&mut self, provider: Box<dyn ServiceProvider>) -> AppResult<bool> {
        self.providers.register(provider)
    }

    pub fn make(&self, identifier: &str) -> AppResult<Instance> {
        self.container.make(identifier)
    }

    pub fn make_as<T: std::any::Any + Send + Sync>(&self, identifier: &str) -> AppResult<Arc<T>> {
        self.container.make_as(identifier)
    }

    pub fn container(&self) -> &Arc<Container> {
        &self.container
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    // ---------------------------------------------------------------------
    // 미들웨어 구성
    // ---------------------------------------------------------------------

    /// 전역 미들웨어 체인에 식별자를 추가합니다.
    pub fn middleware<I, S>(&mut self, identifiers: I) -> AppResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ensure_configurable()?;
        self.middleware.extend(identifiers);
        Ok(())
    }

    /// 이름 있는 미들웨어 그룹에 식별자를 추가합니다.
    pub fn route_middleware<I, S>(&mut self, name: &str, identifiers: I) -> AppResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ensure_configurable()?;
        self.middleware_groups
            .entry(name.to_string())
            .or_default()
            .extend(identifiers);
        Ok(())
    }

    pub fn middleware_chain(&self) -> &MiddlewareChain {
        &self.middleware
    }

    pub fn middleware_group(&self, name: &str) -> Option<&MiddlewareChain> {
        self.middleware_groups.get(name)
    }

    fn ensure_configurable(&self) -> AppResult<()> {
        if self.frozen {
            return Err(AppError::ConfigurationError(
                "요청 처리 이후에는 미들웨어를 변경할 수 없습니다".to_string(),
            ));
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // 요청 처리
    // ---------------------------------------------------------------------

    /// 요청을 캡처해 전역 미들웨어를 통과시킨 뒤 프로바이더를 boot합니다.
    ///
    /// 파이프라인 실패는 응답으로 변환되고, 프로바이더 boot 실패는 그대로 돌려줍니다.
    pub fn boot(&mut self, source: &dyn RequestSource) -> AppResult<Response> {
        if self.started {
            return Err(AppError::AlreadyBootedError);
        }
        self.started = true;
        self.frozen = true;

        let request = Request::capture(source);
        log::debug!("Booting for {} {}", request.method(), request.path());

        let reached = Cell::new(false);
        let container = Arc::clone(&self.container);
        let response = self.run(request, self.middleware.clone(), |request| {
            container.instance_value(keys::REQUEST, request)?;
            reached.set(true);
            Ok(Response::ok(json!(null)))
        });

        if reached.get() && !response.is_failure() {
            self.providers.boot_all()?;
        } else {
            log::warn!("Pipeline did not complete; providers were not booted");
        }

        Ok(response)
    }

    /// 전역 미들웨어와 지정한 그룹을 합친 체인으로 액션을 실행합니다.
    ///
    /// 알 수 없는 그룹이나 액션의 실패는 실패 경계에서 응답으로 변환됩니다.
    pub fn handle<D>(&mut self, request: Request, groups: &[&str], action: D) -> Response
    where
        D: FnOnce(Request) -> AppResult<Response>,
    {
        self.frozen = true;

        let chain = groups.iter().try_fold(self.middleware.clone(), |chain, name| {
            self.middleware_groups
                .get(*name)
                .map(|group| chain.merged(group))
                .ok_or_else(|| AppError::ConfigurationError(format!("알 수 없는 미들웨어 그룹: {}", name)))
        });

        match chain {
            Ok(chain) => {
                let container = Arc::clone(&self.container);
                self.run(request, chain, move |request| {
                    container.instance_value(keys::REQUEST, request.clone())?;
                    action(request)
                })
            }
            Err(error) => ExceptionTranslator::new(&self.container).translate(&request, &error),
        }
    }

    fn run<D>(&self, request: Request, chain: MiddlewareChain, action: D) -> Response
    where
        D: FnOnce(Request) -> AppResult<Response>,
    {
        let captured = request.clone();
        ExceptionTranslator::new(&self.container).capture(&captured, || {
            Pipeline::new(&self.container)
                .send(request)
                .through(chain)
                .then(action)
        })
    }

    // ---------------------------------------------------------------------
    // 상태
    // ---------------------------------------------------------------------

    /// `<base_path>/composer.json`에서 애플리케이션 네임스페이스를 찾습니다.
    pub fn namespace(&self) -> AppResult<&str> {
        self.namespace
            .get_or_try_init(|| {
                let files = self.container.make_as::<SharedFileSource>(keys::FILES)?;
                let manifest_path = self.config.base_path.join("composer.json");
                let manifest = files
                    .read(&manifest_path)
                    .config_context(&format!("{}을 읽을 수 없습니다", manifest_path.display()))?;
                detect_namespace(&manifest, &self.config.base_path, &self.config.app_path)
            })
            .map(String::as_str)
    }

    pub fn is_booted(&self) -> bool {
        self.providers.is_booted()
    }

    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.names()
    }
}

impl Drop for Application {
    fn drop(&mut self) {
        if Container::is_current(&self.container) {
            Container::forget_current();
        }
    }
}

impl fmt::Debug for Application {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Application")
            .field("name", &self.config.name)
            .field("providers", &self.providers)
            .field("middleware", &self.middleware)
            .field("groups", &self.middleware_groups.keys().collect::<Vec<_>>())
            .field("booted", &self.is_booted())
            .finish()
    }
}
