//! 문자열 정리 미들웨어
//!
//! 요청 속성의 문자열 값을 앞뒤 공백 없이 정리하고, 빈 문자열은 null로 바꿉니다.
//! 중첩된 배열과 객체도 같은 규칙으로 처리합니다.

use serde_json::Value;

use crate::core::errors::AppResult;
use crate::http::{Request, Response};
use crate::pipeline::{Middleware, Next};
use crate::utils::string_utils::clean_optional_string;

#[derive(Debug, Clone)]
pub struct TrimStrings {
    except: Vec<String>,
}

impl TrimStrings {
    /// 제외할 속성 이름을 지정합니다.
    pub fn new<I, S>(except: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            except: except.into_iter().map(Into::into).collect(),
        }
    }

    fn clean(value: &mut Value) {
        match value {
            Value::String(text) => {
                *value = match clean_optional_string(Some(std::mem::take(text))) {
                    Some(trimmed) => Value::String(trimmed),
                    None => Value::Null,
                };
            }
            Value::Array(items) => items.iter_mut().for_each(Self::clean),
            Value::Object(map) => map.values_mut().for_each(Self::clean),
            _ => {}
        }
    }
}

impl Default for TrimStrings {
    fn default() -> Self {
        Self::new(["password", "password_confirmation"])
    }
}

impl Middleware for TrimStrings {
    fn handle(&self, mut request: Request, next: Next<'_>) -> AppResult<Response> {
        for (key, value) in request.attributes_mut().iter_mut() {
            if !self.except.iter().any(|except| except == key) {
                Self::clean(value);
            }
        }
        next(request)
    }
}
