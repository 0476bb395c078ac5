//! 인바운드 요청
//!
//! 변경 가능한 속성 맵과, 캡처 시점에 고정된 전송 메타데이터 스냅샷으로 구성됩니다.
//! 속성 접근은 `get` / `set` / `has` / `remove` 타입 접근자로만 합니다.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde::Serialize;
use serde_json::Value;

use crate::core::binding::Instance;
use crate::http::source::{RequestSource, UploadedFile};

/// 요청에 대한 사용자 해석 함수
pub type UserResolver = Arc<dyn Fn(&Request) -> Option<Instance> + Send + Sync>;

/// 요청 ID를 주고받는 헤더
pub const REQUEST_ID_HEADER: &str = "x-request-id";
/// 요청 ID가 저장되는 속성 이름
pub const REQUEST_ID_ATTRIBUTE: &str = "request_id";

/// 캡처 시점의 전송 메타데이터 (불변)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RequestSnapshot {
    pub server: BTreeMap<String, String>,
    pub headers: BTreeMap<String, String>,
    pub cookies: BTreeMap<String, String>,
    pub files: BTreeMap<String, UploadedFile>,
}

/// 인바운드 요청
///
/// 한 요청의 수명 동안 애플리케이션이 단독으로 소유합니다.
#[derive(Clone)]
pub struct Request {
    attributes: BTreeMap<String, Value>,
    snapshot: Arc<RequestSnapshot>,
    request_id: Arc<OnceCell<String>>,
    user_resolver: Option<UserResolver>,
}

impl Request {
    /// 요청 원천에서 스냅샷을 한 번 가져와 요청을 만듭니다.
    pub fn capture(source: &dyn RequestSource) -> Self {
        let snapshot = RequestSnapshot {
            server: source.server(),
            headers: source.headers(),
            cookies: source.cookies(),
            files: source.files(),
        };
        Self::new(snapshot, source.attributes())
    }

    pub fn new(snapshot: RequestSnapshot, attributes: BTreeMap<String, Value>) -> Self {
        Self {
            attributes,
            snapshot: Arc::new(snapshot),
            request_id: Arc::default(),
            user_resolver: None,
        }
    }

    // ----- 속성 -----

    /// 속성을 읽습니다. 없으면 `default`를 돌려줍니다.
    pub fn get(&self, key: &str, default: Value) -> Value {
        self.attributes.get(key).cloned().unwrap_or(default)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.attributes.insert(key.to_string(), value.into());
    }

    pub fn has(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.attributes.remove(key)
    }

    /// 여러 속성을 한 번에 덮어씁니다.
    pub fn merge(&mut self, values: BTreeMap<String, Value>) {
        self.attributes.extend(values);
    }

    pub fn all(&self) -> &BTreeMap<String, Value> {
        &self.attributes
    }

    pub(crate) fn attributes_mut(&mut self) -> &mut BTreeMap<String, Value> {
        &mut self.attributes
    }

    // ----- 스냅샷 -----

    pub fn snapshot(&self) -> &RequestSnapshot {
        &self.snapshot
    }

    pub fn method(&self) -> &str {
        self.server("REQUEST_METHOD").unwrap_or("GET")
    }

    /// 쿼리 문자열을 제외한 요청 경로
    pub fn path(&self) -> &str {
        let uri = self.server("REQUEST_URI").unwrap_or("/");
        match uri.split_once('?') {
            Some((path, _)) => path,
            None => uri,
        }
    }

    /// 헤더를 읽습니다. 이름은 대소문자를 구분하지 않습니다.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.snapshot
            .headers
            .get(&name.to_lowercase())
            .map(String::as_str)
    }

    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.snapshot.cookies.get(name).map(String::as_str)
    }

    pub fn file(&self, field: &str) -> Option<&UploadedFile> {
        self.snapshot.files.get(field)
    }

    pub fn server(&self, key: &str) -> Option<&str> {
        self.snapshot.server.get(key).map(String::as_str)
    }

    // ----- 요청 ID -----

    /// 요청 ID를 기록합니다. 한 번만 기록되며 같은 요청의 복제본이 모두 공유합니다.
    pub fn assign_request_id(&self, id: &str) -> bool {
        self.request_id.set(id.to_string()).is_ok()
    }

    pub fn request_id(&self) -> Option<&str> {
        self.request_id.get().map(String::as_str)
    }

    // ----- 사용자 -----

    pub fn set_user_resolver<F>(&mut self, resolver: F)
    where
        F: Fn(&Request) -> Option<Instance> + Send + Sync + 'static,
    {
        self.user_resolver = Some(Arc::new(resolver));
    }

    pub fn user(&self) -> Option<Instance> {
        self.user_resolver.as_ref().and_then(|resolve| resolve(self))
    }

    pub fn user_as<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.user()?.downcast::<T>().ok()
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method())
            .field("path", &self.path())
            .field("attributes", &self.attributes)
            .field("request_id", &self.request_id())
            .field("has_user_resolver", &self.user_resolver.is_some())
            .finish()
    }
}
