//! # Binding Registry
//!
//! 식별자 → 바인딩 매핑을 보관하는 컨테이너의 최하위 저장소입니다.
//! 바인딩의 불변 조건은 타입으로 표현됩니다.
//!
//! - `Transient`: 해석할 때마다 팩토리를 호출
//! - `Singleton`: 팩토리를 최대 한 번 호출하고 결과를 캐시
//! - `Instance`: 저장된 값 자체가 인스턴스이며 팩토리가 존재하지 않음

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::core::container::Container;
use crate::core::errors::AppResult;

/// 컨테이너가 돌려주는 타입 소거된 인스턴스
pub type Instance = Arc<dyn Any + Send + Sync>;

/// 컨테이너를 인자로 받아 인스턴스를 생성하는 팩토리
///
/// 팩토리는 전달받은 컨테이너로 자신의 의존성을 재귀적으로 `make` 할 수 있습니다.
pub type Factory = Arc<dyn Fn(&Container) -> AppResult<Instance> + Send + Sync>;

/// 바인딩 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Transient,
    Singleton,
    Instance,
}

impl fmt::Display for BindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingKind::Transient => f.write_str("transient"),
            BindingKind::Singleton => f.write_str("singleton"),
            BindingKind::Instance => f.write_str("instance"),
        }
    }
}

/// 단일 바인딩
#[derive(Clone)]
pub enum Binding {
    Transient(Factory),
    Singleton {
        factory: Factory,
        cached: Option<Instance>,
    },
    Instance(Instance),
}

impl Binding {
    pub fn transient(factory: Factory) -> Self {
        Binding::Transient(factory)
    }

    pub fn singleton(factory: Factory) -> Self {
        Binding::Singleton {
            factory,
            cached: None,
        }
    }

    pub fn instance(value: Instance) -> Self {
        Binding::Instance(value)
    }

    pub fn kind(&self) -> BindingKind {
        match self {
            Binding::Transient(_) => BindingKind::Transient,
            Binding::Singleton { .. } => BindingKind::Singleton,
            Binding::Instance(_) => BindingKind::Instance,
        }
    }

    /// 팩토리 없이 바로 돌려줄 수 있는 값
    ///
    /// `Instance`는 항상, `Singleton`은 캐시가 채워진 경우에만 값을 가집니다.
    pub fn resolved_value(&self) -> Option<Instance> {
        match self {
            Binding::Instance(value) => Some(value.clone()),
            Binding::Singleton {
                cached: Some(value),
                ..
            } => Some(value.clone()),
            _ => None,
        }
    }

    pub fn factory(&self) -> Option<Factory> {
        match self {
            Binding::Transient(factory) | Binding::Singleton { factory, .. } => {
                Some(factory.clone())
            }
            Binding::Instance(_) => None,
        }
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cached = matches!(
            self,
            Binding::Instance(_) | Binding::Singleton { cached: Some(_), .. }
        );
        f.debug_struct("Binding")
            .field("kind", &self.kind())
            .field("resolved", &cached)
            .finish()
    }
}

/// 식별자 → 바인딩 저장소
///
/// 같은 식별자로 다시 등록하면 이전 바인딩을 조용히 덮어씁니다 (last-writer-wins).
#[derive(Debug, Default)]
pub struct BindingRegistry {
    bindings: HashMap<String, Binding>,
}

impl BindingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 바인딩을 등록하고 덮어쓴 이전 바인딩을 돌려줍니다.
    pub fn insert(&mut self, identifier: String, binding: Binding) -> Option<Binding> {
        self.bindings.insert(identifier, binding)
    }

    pub fn get(&self, identifier: &str) -> Option<&Binding> {
        self.bindings.get(identifier)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.bindings.contains_key(identifier)
    }

    pub fn remove(&mut self, identifier: &str) -> Option<Binding> {
        self.bindings.remove(identifier)
    }

    /// 싱글톤 캐시를 채웁니다.
    ///
    /// 이미 캐시가 채워져 있으면 기존 값을 유지하고 그 값을 돌려줍니다 (더블 체크).
    /// 싱글톤이 아닌 바인딩이거나 그 사이 바인딩이 교체된 경우 전달받은 값을 그대로 돌려줍니다.
    pub fn cache(&mut self, identifier: &str, value: Instance) -> Instance {
        match self.bindings.get_mut(identifier) {
            Some(Binding::Singleton { cached, .. }) => cached.get_or_insert(value).clone(),
            _ => value,
        }
    }

    /// 등록된 식별자 목록 (정렬됨)
    pub fn identifiers(&self) -> Vec<String> {
        let mut identifiers: Vec<String> = self.bindings.keys().cloned().collect();
        identifiers.sort();
        identifiers
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
