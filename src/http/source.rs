//! 요청 원천 (request-source collaborator)
//!
//! 호스트 런타임이 전달하는 원시 요청 데이터의 계약입니다.
//! 애플리케이션은 요청을 캡처할 때 한 번만 스냅샷을 가져갑니다.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 업로드된 파일 메타데이터
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub name: String,
    pub mime_type: String,
    pub size: u64,
    pub tmp_path: String,
}

/// 호스트가 구현하는 요청 원천
pub trait RequestSource {
    /// 쿼리/폼/JSON 본문에서 모은 속성
    fn attributes(&self) -> BTreeMap<String, Value>;

    fn cookies(&self) -> BTreeMap<String, String>;

    fn files(&self) -> BTreeMap<String, UploadedFile>;

    /// 서버/환경 맵 (`REQUEST_METHOD`, `REQUEST_URI`, `HTTP_*` 등)
    fn server(&self) -> BTreeMap<String, String>;

    /// 헤더 맵. 키는 소문자입니다.
    ///
    /// 기본 구현은 서버 맵의 `HTTP_X_FOO` 항목을 `x-foo`로 변환합니다.
    fn headers(&self) -> BTreeMap<String, String> {
        headers_from_server(&self.server())
    }
}

/// 서버 맵에서 `HTTP_` 접두사가 붙은 항목을 헤더로 변환합니다.
pub fn headers_from_server(server: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    server
        .iter()
        .filter_map(|(key, value)| {
            key.strip_prefix("HTTP_")
                .map(|name| (name.to_lowercase().replace('_', "-"), value.clone()))
        })
        .collect()
}

/// 메모리에 보관된 요청 원천
///
/// 호스트 어댑터와 테스트가 사용합니다. 명시적으로 넣은 헤더가 서버 맵에서 파생된
/// 헤더보다 우선합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestPayload {
    #[serde(default)]
    pub attributes: BTreeMap<String, Value>,
    #[serde(default)]
    pub cookies: BTreeMap<String, String>,
    #[serde(default)]
    pub files: BTreeMap<String, UploadedFile>,
    #[serde(default)]
    pub server: BTreeMap<String, String>,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl RequestPayload {
    /// 메서드와 URI만 채운 페이로드를 만듭니다.
    pub fn new(method: &str, uri: &str) -> Self {
        let mut payload = Self::default();
        payload
            .server
            .insert("REQUEST_METHOD".to_string(), method.to_uppercase());
        payload.server.insert("REQUEST_URI".to_string(), uri.to_string());
        if let Some((_, query)) = uri.split_once('?') {
            payload
                .server
                .insert("QUERY_STRING".to_string(), query.to_string());
        }
        payload
    }

    pub fn with_attribute(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_lowercase(), value.to_string());
        self
    }

    pub fn with_cookie(mut self, name: &str, value: &str) -> Self {
        self.cookies.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_file(mut self, field: &str, file: UploadedFile) -> Self {
        self.files.insert(field.to_string(), file);
        self
    }
}

impl RequestSource for RequestPayload {
    fn attributes(&self) -> BTreeMap<String, Value> {
        self.attributes.clone()
    }

    fn cookies(&self) -> BTreeMap<String, String> {
        self.cookies.clone()
    }

    fn files(&self) -> BTreeMap<String, UploadedFile> {
        self.files.clone()
    }

    fn server(&self) -> BTreeMap<String, String> {
        self.server.clone()
    }

    fn headers(&self) -> BTreeMap<String, String> {
        let mut headers = headers_from_server(&self.server);
        for (name, value) in &self.headers {
            headers.insert(name.to_lowercase(), value.clone());
        }
        headers
    }
}
