//! # Constructor Registry - 자동 생성 테이블
//!
//! 바인딩 없이 `make`된 식별자를 위한 좁은 범위의 자동 생성 메커니즘입니다.
//! 임의의 타입을 리플렉션으로 생성하는 대신, 명시적으로 제출된 생성자만 사용합니다.
//!
//! ## 동작 원리
//!
//! ```text
//! 1. 컴파일 타임
//!    ├─ inventory::submit! { ConstructorRegistration { .. } }
//!    └─ inventory::collect! → 전역 테이블에 수집
//!
//! 2. 첫 조회 시
//!    └─ CONSTRUCTOR_CACHE (Lazy) → 식별자 → 등록정보 O(1) 매핑 구성
//!
//! 3. make(identifier)
//!    ├─ 바인딩이 있으면 바인딩 사용
//!    ├─ 없으면 이 테이블에서 생성자 검색
//!    └─ 둘 다 없으면 UnresolvableBindingError
//! ```
//!
//! ## 등록 예제
//!
//! ```rust,ignore
//! use plugin_runtime::core::registry::ConstructorRegistration;
//!
//! fn build_clock(_: &Container) -> AppResult<Instance> {
//!     Ok(Arc::new(SystemClock::default()))
//! }
//!
//! inventory::submit! {
//!     ConstructorRegistration::shared("clock", build_clock)
//! }
//! ```

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::core::binding::Instance;
use crate::core::container::Container;
use crate::core::errors::AppResult;

/// 생성자 등록 정보
pub struct ConstructorRegistration {
    /// 생성 대상 식별자 (검색 키로 사용)
    pub identifier: &'static str,
    /// `true`이면 첫 생성 결과를 싱글톤으로 캐시
    pub shared: bool,
    /// 인스턴스 생성 함수. 의존성은 전달받은 컨테이너로 해석합니다.
    pub constructor: fn(&Container) -> AppResult<Instance>,
}

impl ConstructorRegistration {
    pub const fn transient(
        identifier: &'static str,
        constructor: fn(&Container) -> AppResult<Instance>,
    ) -> Self {
        Self {
            identifier,
            shared: false,
            constructor,
        }
    }

    pub const fn shared(
        identifier: &'static str,
        constructor: fn(&Container) -> AppResult<Instance>,
    ) -> Self {
        Self {
            identifier,
            shared: true,
            constructor,
        }
    }
}

inventory::collect!(ConstructorRegistration);

/// 식별자 → 등록정보 매핑 캐시
/// 첫 접근 시 한 번만 구성되며, 같은 식별자가 여러 번 제출되면 마지막 것이 남습니다.
static CONSTRUCTOR_CACHE: Lazy<HashMap<&'static str, &'static ConstructorRegistration>> =
    Lazy::new(|| {
        let mut cache = HashMap::new();

        for registration in inventory::iter::<ConstructorRegistration>() {
            cache.insert(registration.identifier, registration);
        }

        log::debug!("Constructor table initialized with {} entries", cache.len());
        cache
    });

/// 식별자에 대한 생성자를 찾습니다.
pub fn find_constructor(identifier: &str) -> Option<&'static ConstructorRegistration> {
    CONSTRUCTOR_CACHE.get(identifier).copied()
}

/// 생성 가능한 식별자인지 확인합니다.
pub fn is_constructible(identifier: &str) -> bool {
    CONSTRUCTOR_CACHE.contains_key(identifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn build_greeting(_: &Container) -> AppResult<Instance> {
        Ok(Arc::new(String::from("hello")))
    }

    inventory::submit! {
        ConstructorRegistration::transient("tests.registry.greeting", build_greeting)
    }

    #[test]
    fn test_submitted_constructor_is_found() {
        let registration = find_constructor("tests.registry.greeting");
        assert!(registration.is_some());
        assert!(is_constructible("tests.registry.greeting"));
        assert!(!registration.map(|r| r.shared).unwrap_or(true));
    }

    #[test]
    fn test_unknown_identifier_is_not_constructible() {
        assert!(find_constructor("tests.registry.missing").is_none());
        assert!(!is_constructible("tests.registry.missing"));
    }
}
