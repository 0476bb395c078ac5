//! 플러그인 런타임 데모 호스트
//!
//! Actix-web 서버가 요청마다 `Application`을 새로 만들고 `boot()`를 호출합니다.
//! 요청 간에 컨테이너나 요청 객체를 공유하지 않습니다.

use actix_web::{App, HttpRequest, HttpResponse, HttpServer, middleware, web};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info};
use serde_json::json;

use plugin_runtime::config::{AppConfig, ServerConfig};
use plugin_runtime::core::AppResult;
use plugin_runtime::exceptions::GENERIC_MESSAGE;
use plugin_runtime::foundation::{Application, keys};
use plugin_runtime::host::{into_http_response, payload_from_http};
use plugin_runtime::http::{Request, RequestPayload, Response};
use plugin_runtime::utils::display_terminal::{
    print_boxed_title, print_final_summary, print_step_complete, print_step_start, print_sub_task,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    load_env_file();
    init_logging();

    let config = AppConfig::load();
    info!("🚀 {} 시작중... ({})", config.name, config.environment);

    print_startup_summary(&config).map_err(|e| {
        error!("애플리케이션 초기화 실패: {}", e);
        std::io::Error::other(e.to_string())
    })?;

    start_http_server(config).await
}

/// HTTP 서버를 구성하고 실행합니다
///
/// 모든 경로를 하나의 기본 서비스로 보내 런타임이 처리하게 합니다.
async fn start_http_server(config: AppConfig) -> std::io::Result<()> {
    let host = ServerConfig::host();
    let port = ServerConfig::port();

    info!("🌐 서버가 http://{}:{} 에서 실행중입니다", host, port);

    let config = web::Data::new(config);
    HttpServer::new(move || {
        App::new()
            .app_data(config.clone())
            .wrap(middleware::Logger::default())
            .default_service(web::to(dispatch))
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}

/// 요청 하나를 새 애플리케이션으로 처리합니다
async fn dispatch(
    req: HttpRequest,
    body: web::Bytes,
    config: web::Data<AppConfig>,
) -> HttpResponse {
    let payload = payload_from_http(&req, &body);

    match handle_request(config.get_ref().clone(), &payload) {
        Ok(response) => into_http_response(response),
        Err(e) => {
            error!("부트스트랩 실패: {}", e);
            HttpResponse::InternalServerError().json(json!({ "error": GENERIC_MESSAGE }))
        }
    }
}

fn handle_request(config: AppConfig, payload: &RequestPayload) -> AppResult<Response> {
    respond(Application::new(config)?, payload)
}

/// 부트 결과를 그대로 돌려주거나, 요청이 끝까지 도달했으면 에코 응답을 만듭니다
///
/// 미들웨어가 조기 응답한 경우(성공 응답 포함) 요청이 바인딩되지 않으므로 그 응답을 그대로 씁니다.
fn respond(mut app: Application, payload: &RequestPayload) -> AppResult<Response> {
    let booted = app.boot(payload)?;
    if booted.is_failure() || !app.is_booted() || !app.container().bound(keys::REQUEST) {
        return Ok(booted);
    }

    let request = app.make_as::<Request>(keys::REQUEST)?;
    let mut response = Response::ok(json!({
        "method": request.method(),
        "path": request.path(),
        "attributes": request.all(),
    }));
    for (name, value) in booted.headers() {
        response = response.with_header(name, value);
    }
    Ok(response)
}

/// 시작 시 등록되는 프로바이더와 바인딩을 출력합니다
fn print_startup_summary(config: &AppConfig) -> AppResult<()> {
    print_boxed_title(&config.name);

    print_step_start(1, "Registering providers");
    let app = Application::new(config.clone())?;
    let providers = app.provider_names();
    for name in &providers {
        print_sub_task(name, "registered");
    }
    print_step_complete(1, "Providers registered", providers.len());

    print_final_summary(
        providers.len(),
        app.container().identifiers().len(),
        app.middleware_chain().len(),
    );
    Ok(())
}

/// 환경별 설정 파일을 로드합니다
///
/// * `PROFILE=dev` - .env.dev 파일 로드 (기본값)
/// * `PROFILE=prod` - .env.prod 파일 로드
/// * 기타 - 기본 .env 파일 로드
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    match profile.as_str() {
        "prod" => {
            if let Err(e) = dotenv::from_filename(".env.prod") {
                eprintln!(".env.prod 파일 로드 실패: {}", e);
            }
        }
        "dev" => {
            if let Err(e) = dotenv::from_filename(".env.dev") {
                eprintln!(".env.dev 파일 로드 실패: {}", e);
            }
        }
        _ => {
            dotenv().ok();
        }
    }
}

/// 로깅 시스템을 초기화합니다
///
/// * `RUST_LOG` - 로깅 레벨 설정 (기본값: "info,actix_web=info")
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info,actix_web=info"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use plugin_runtime::config::{Environment, FixedEnvironment};
    use plugin_runtime::pipeline::from_fn;

    fn app() -> Application {
        let environment = FixedEnvironment::new(Environment::Test, false);
        Application::new(AppConfig::from_probe(&environment)).unwrap()
    }

    #[test]
    fn test_successful_short_circuit_is_returned_as_is() {
        let mut app = app();
        app.container()
            .singleton_as("deny", |_| {
                Ok(from_fn(|_, _| Ok(Response::new(403, json!({ "error": "editors only" })))))
            })
            .unwrap();
        app.middleware(["deny"]).unwrap();

        let response = respond(app, &RequestPayload::new("GET", "/admin")).unwrap();

        assert_eq!(response.status(), 403);
        assert_eq!(response.body()["error"], json!("editors only"));
    }

    #[test]
    fn test_completed_request_is_echoed() {
        let mut app = app();
        app.middleware([keys::MIDDLEWARE_REQUEST_ID]).unwrap();

        let payload = RequestPayload::new("POST", "/posts").with_attribute("title", "Hi");
        let response = respond(app, &payload).unwrap();

        assert!(response.is_success());
        assert_eq!(response.body()["path"], json!("/posts"));
        assert_eq!(response.body()["attributes"]["title"], json!("Hi"));
        assert!(response.header("x-request-id").is_some());
    }
}
