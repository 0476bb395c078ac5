//! inventory로 제출된 프로바이더의 자동 등록

use std::sync::Arc;

use serde_json::json;

use plugin_runtime::config::{AppConfig, Environment, FixedEnvironment};
use plugin_runtime::exceptions::{ExceptionHandler, SharedExceptionHandler};
use plugin_runtime::foundation::keys;
use plugin_runtime::http::{Request, RequestPayload, Response};
use plugin_runtime::providers::{ProviderRegistration, ProviderState, discovered};
use plugin_runtime::{AppError, AppResult, Application, Container, ServiceProvider};

#[derive(Default)]
struct CatalogServiceProvider;

impl ServiceProvider for CatalogServiceProvider {
    fn register(&mut self, container: &Container) -> AppResult<()> {
        container.singleton_as("catalog.currency", |_| Ok(String::from("EUR")))
    }
}

/// register 단계에서 CatalogServiceProvider의 바인딩을 읽습니다.
#[derive(Default)]
struct PricingServiceProvider;

impl ServiceProvider for PricingServiceProvider {
    fn register(&mut self, container: &Container) -> AppResult<()> {
        let currency = container.make_as::<String>("catalog.currency")?;
        container.instance_value("pricing.label", format!("prices in {}", currency))
    }

    fn boot(&mut self, container: &Container) -> AppResult<()> {
        container.instance_value("pricing.booted", true)
    }
}

#[derive(Default)]
struct ConsoleCommandsProvider;

impl ServiceProvider for ConsoleCommandsProvider {
    fn register(&mut self, container: &Container) -> AppResult<()> {
        container.instance_value("console.commands", vec!["cache:clear".to_string()])
    }
}

/// 호스트 형식으로 실패를 그리는 예외 처리기
struct HostExceptionHandler;

impl ExceptionHandler for HostExceptionHandler {
    fn render(&self, request: &Request, error: &AppError) -> AppResult<Response> {
        Ok(Response::failure(
            error.status_code(),
            json!({ "host_error": error.to_string(), "route": request.path() }),
        ))
    }
}

/// 코어 예외 처리기를 교체하는 호스트 프로바이더
#[derive(Default)]
struct HostExceptionProvider;

impl ServiceProvider for HostExceptionProvider {
    fn register(&mut self, container: &Container) -> AppResult<()> {
        container.singleton_as(keys::EXCEPTION_HANDLER, |_| {
            Ok(Arc::new(HostExceptionHandler) as SharedExceptionHandler)
        })
    }
}

inventory::submit! {
    ProviderRegistration::of::<CatalogServiceProvider>("CatalogServiceProvider")
}

inventory::submit! {
    ProviderRegistration::of::<PricingServiceProvider>("PricingServiceProvider")
}

inventory::submit! {
    ProviderRegistration::console::<ConsoleCommandsProvider>("ConsoleCommandsProvider")
}

inventory::submit! {
    ProviderRegistration::of::<HostExceptionProvider>("HostExceptionProvider")
}

fn config(console: bool) -> AppConfig {
    AppConfig::from_probe(&FixedEnvironment::new(Environment::Test, console))
}

#[test]
fn discovered_registrations_are_sorted_and_filtered() {
    let web: Vec<_> = discovered(false).iter().map(|r| r.name).collect();
    assert_eq!(
        web,
        vec!["CatalogServiceProvider", "HostExceptionProvider", "PricingServiceProvider"]
    );

    let console: Vec<_> = discovered(true).iter().map(|r| r.name).collect();
    assert!(console.contains(&"ConsoleCommandsProvider"));
    assert_eq!(console.len(), 4);
}

#[test]
fn discovered_providers_register_after_core() {
    let app = Application::new(config(false)).unwrap();

    assert_eq!(
        app.provider_names(),
        vec![
            "ExceptionServiceProvider",
            "MiddlewareServiceProvider",
            "CatalogServiceProvider",
            "HostExceptionProvider",
            "PricingServiceProvider",
        ]
    );
    let label = app.make_as::<String>("pricing.label").unwrap();
    assert_eq!(label.as_str(), "prices in EUR");
    assert!(!app.container().bound("console.commands"));
    assert!(app.container().bound(keys::EXCEPTION_HANDLER));
}

#[test]
fn discovered_exception_handler_overrides_core_handler() {
    let mut app = Application::new(config(false)).unwrap();

    let response = app.handle(
        Request::capture(&RequestPayload::new("GET", "/catalog/9")),
        &[],
        |_| Err(AppError::NotFound("product 9".to_string())),
    );

    assert!(response.is_failure());
    assert_eq!(response.status(), 404);
    assert_eq!(response.body()["host_error"], json!("Not found: product 9"));
    assert_eq!(response.body()["route"], json!("/catalog/9"));
    assert!(response.body().get("timestamp").is_none());
}

#[test]
fn console_only_providers_register_in_console_mode() {
    let app = Application::new(config(true)).unwrap();

    assert!(app.container().bound("console.commands"));
    assert!(app.provider_names().contains(&"ConsoleCommandsProvider"));
}

#[test]
fn boot_reaches_discovered_providers() {
    let mut app = Application::new(config(false)).unwrap();
    assert!(!app.container().bound("pricing.booted"));

    let response = app.boot(&RequestPayload::new("GET", "/catalog")).unwrap();

    assert!(response.is_success());
    assert!(app.is_booted());
    assert!(*app.make_as::<bool>("pricing.booted").unwrap());
}

#[test]
fn registering_a_discovered_provider_again_is_a_no_op() {
    let mut app = Application::new(config(false)).unwrap();

    assert!(!app.register::<CatalogServiceProvider>().unwrap());
    assert_eq!(app.provider_names().len(), 5);
}

#[test]
fn provider_states_follow_lifecycle() {
    use plugin_runtime::providers::ProviderRepository;

    let mut repository = ProviderRepository::new(Arc::new(Container::new()));
    for registration in discovered(false) {
        repository.register(registration.build()).unwrap();
    }
    assert_eq!(repository.state("PricingServiceProvider"), ProviderState::Registered);

    repository.boot_all().unwrap();
    assert_eq!(repository.state("PricingServiceProvider"), ProviderState::Booted);
    assert_eq!(repository.state("ConsoleCommandsProvider"), ProviderState::Unregistered);
}
