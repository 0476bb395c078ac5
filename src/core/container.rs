//! # Service Container - 의존성 주입 컨테이너
//!
//! 식별자를 인스턴스로 해석하는 IoC 컨테이너입니다.
//! 바인딩 저장은 [`BindingRegistry`]가, 바인딩 없는 식별자의 생성은
//! [`crate::core::registry`]의 생성자 테이블이 담당합니다.
//!
//! ## 해석 순서 (`make`)
//!
//! ```text
//! 1. 현재 빌드 중인 식별자에 대한 contextual 바인딩이 있으면 그 팩토리 사용
//! 2. instance 바인딩이면 저장된 값 반환
//! 3. singleton 바인딩에 캐시가 있으면 캐시 반환
//! 4. 팩토리 호출 (컨테이너 자신을 인자로 전달 → 재귀 해석 가능)
//!    └─ singleton이면 결과를 캐시
//! 5. 바인딩이 없으면 생성자 테이블 검색
//! 6. 모두 실패하면 UnresolvableBindingError
//! ```
//!
//! ## 순환 참조
//!
//! 빌드 중인 식별자를 스택으로 추적합니다. 팩토리가 완료되기 전에 같은 식별자를
//! 다시 요청하면 `CircularResolutionError`로 즉시 실패합니다. 락이 아니라 이 검사가
//! 싱글톤 팩토리의 단일 호출을 보장합니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! let container = Container::new();
//! container.singleton_as("mailer.transport", |_| Ok(SmtpTransport::default()))?;
//! container.singleton_as("mailer", |c| {
//!     let transport = c.make_as::<SmtpTransport>("mailer.transport")?;
//!     Ok(Mailer::new(transport))
//! })?;
//!
//! let mailer = container.make_as::<Mailer>("mailer")?;
//! ```

use std::any::{Any, type_name};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::core::binding::{Binding, BindingKind, BindingRegistry, Factory, Instance};
use crate::core::errors::{AppError, AppResult};
use crate::core::registry;
use crate::utils::string_utils::validate_required_string;

/// `make_with`에 전달하는 이름 → 값 매개변수
pub type Parameters = HashMap<String, Instance>;

thread_local! {
    /// 레거시 정적 조회용 현재 컨테이너 (호스트 스레드 단위)
    static CURRENT: RefCell<Option<Arc<Container>>> = const { RefCell::new(None) };
}

/// 해석 결과를 어디에 저장할지 결정하는 출처
enum Origin {
    Contextual,
    Bound(BindingKind),
    Constructed { shared: bool },
}

/// 의존성 주입 컨테이너
///
/// 프로세스(또는 요청) 수명 동안 하나의 `Application`이 소유합니다.
/// 바인딩 맵은 register 단계에서만 쓰이고, 요청 처리 중에는 싱글톤 캐시 채우기를 제외하면
/// 읽기 전용입니다.
pub struct Container {
    bindings: RwLock<BindingRegistry>,
    /// concrete → (abstract → factory)
    contextual: RwLock<HashMap<String, HashMap<String, Factory>>>,
    /// 현재 빌드 중인 식별자 스택 (순환 참조 검사 + contextual 조회용)
    build_stack: RwLock<Vec<String>>,
    /// `make_with` 매개변수 프레임 스택
    parameter_stack: RwLock<Vec<Parameters>>,
}

impl Container {
    pub fn new() -> Self {
        Self {
            bindings: RwLock::new(BindingRegistry::new()),
            contextual: RwLock::new(HashMap::new()),
            build_stack: RwLock::new(Vec::new()),
            parameter_stack: RwLock::new(Vec::new()),
        }
    }

    // ---------------------------------------------------------------------
    // 등록
    // ---------------------------------------------------------------------

    /// 식별자에 팩토리를 등록합니다.
    ///
    /// 같은 식별자의 이전 바인딩은 조용히 덮어씁니다. 테스트나 호스트별 프로바이더가
    /// 기본 바인딩을 교체하는 공식적인 방법입니다.
    ///
    /// `BindingKind::Instance`로 등록하면 팩토리를 지금 한 번 호출하고 그 결과를 저장합니다.
    pub fn bind<F>(&self, identifier: &str, factory: F, kind: BindingKind) -> AppResult<()>
    where
        F: Fn(&Container) -> AppResult<Instance> + Send + Sync + 'static,
    {
        let identifier = validate_required_string(identifier, "identifier")?;
        let factory: Factory = Arc::new(factory);

        let binding = match kind {
            BindingKind::Transient => Binding::transient(factory),
            BindingKind::Singleton => Binding::singleton(factory),
            BindingKind::Instance => Binding::instance(factory(self)?),
        };

        self.register_binding(identifier, binding);
        Ok(())
    }

    /// `bind(identifier, factory, Singleton)`의 축약형
    pub fn singleton<F>(&self, identifier: &str, factory: F) -> AppResult<()>
    where
        F: Fn(&Container) -> AppResult<Instance> + Send + Sync + 'static,
    {
        self.bind(identifier, factory, BindingKind::Singleton)
    }

    /// 이미 만들어진 값을 등록합니다. 해석 시 팩토리를 거치지 않고 항상 이 값을 돌려줍니다.
    pub fn instance(&self, identifier: &str, value: Instance) -> AppResult<()> {
        let identifier = validate_required_string(identifier, "identifier")?;
        self.register_binding(identifier, Binding::instance(value));
        Ok(())
    }

    /// 일반 값을 반환하는 팩토리를 등록합니다. 결과는 `Arc`로 감싸집니다.
    pub fn bind_as<T, F>(&self, identifier: &str, factory: F, kind: BindingKind) -> AppResult<()>
    where
        T: Any + Send + Sync,
        F: Fn(&Container) -> AppResult<T> + Send + Sync + 'static,
    {
        self.bind(
            identifier,
            move |container| factory(container).map(|value| Arc::new(value) as Instance),
            kind,
        )
    }

    pub fn singleton_as<T, F>(&self, identifier: &str, factory: F) -> AppResult<()>
    where
        T: Any + Send + Sync,
        F: Fn(&Container) -> AppResult<T> + Send + Sync + 'static,
    {
        self.bind_as(identifier, factory, BindingKind::Singleton)
    }

    pub fn instance_value<T: Any + Send + Sync>(
        &self,
        identifier: &str,
        value: T,
    ) -> AppResult<()> {
        self.instance(identifier, Arc::new(value))
    }

    fn register_binding(&self, identifier: String, binding: Binding) {
        let kind = binding.kind();
        let previous = self.write_bindings().insert(identifier.clone(), binding);

        match previous {
            Some(previous) => log::debug!(
                "Overriding {} binding [{}] with {}",
                previous.kind(),
                identifier,
                kind
            ),
            None => log::debug!("Binding [{}] as {}", identifier, kind),
        }
    }

    /// contextual 바인딩 빌더를 시작합니다.
    ///
    /// ```rust,ignore
    /// container.when("mailer").needs("logger").give(|_| Ok(Arc::new(NullLogger) as Instance));
    /// ```
    pub fn when(&self, concrete: &str) -> ContextualBindingBuilder<'_> {
        ContextualBindingBuilder {
            container: self,
            concrete: concrete.trim().to_string(),
        }
    }

    pub fn add_contextual_binding(&self, concrete: &str, abstract_id: &str, factory: Factory) {
        log::debug!("Contextual binding: [{}] needs [{}]", concrete, abstract_id);
        self.contextual
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(concrete.to_string())
            .or_default()
            .insert(abstract_id.to_string(), factory);
    }

    // ---------------------------------------------------------------------
    // 해석
    // ---------------------------------------------------------------------

    /// 식별자를 인스턴스로 해석합니다.
    pub fn make(&self, identifier: &str) -> AppResult<Instance> {
        self.resolve(identifier, Parameters::new(), false)
    }

    /// 매개변수 프레임과 함께 해석합니다.
    ///
    /// 매개변수는 팩토리 안에서 [`Container::parameter`]로 읽습니다.
    /// 매개변수가 있는 해석은 싱글톤 캐시를 읽지도 채우지도 않습니다.
    pub fn make_with(&self, identifier: &str, parameters: Parameters) -> AppResult<Instance> {
        let has_parameters = !parameters.is_empty();
        self.resolve(identifier, parameters, has_parameters)
    }

    /// `container[identifier]` 축약형. `make`와 같습니다.
    pub fn get(&self, identifier: &str) -> AppResult<Instance> {
        self.make(identifier)
    }

    /// 해석 후 구체 타입으로 다운캐스트합니다.
    pub fn make_as<T: Any + Send + Sync>(&self, identifier: &str) -> AppResult<Arc<T>> {
        downcast(identifier, self.make(identifier)?)
    }

    pub fn make_with_as<T: Any + Send + Sync>(
        &self,
        identifier: &str,
        parameters: Parameters,
    ) -> AppResult<Arc<T>> {
        downcast(identifier, self.make_with(identifier, parameters)?)
    }

    /// 현재 빌드 프레임의 매개변수를 읽습니다.
    pub fn parameter(&self, name: &str) -> Option<Instance> {
        self.parameter_stack
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .and_then(|frame| frame.get(name).cloned())
    }

    pub fn parameter_as<T: Any + Send + Sync>(&self, name: &str) -> Option<Arc<T>> {
        self.parameter(name)?.downcast::<T>().ok()
    }

    fn resolve(
        &self,
        identifier: &str,
        parameters: Parameters,
        has_parameters: bool,
    ) -> AppResult<Instance> {
        let contextual = self.contextual_factory(identifier);
        let binding = self.read_bindings().get(identifier).cloned();

        if contextual.is_none() {
            match &binding {
                Some(Binding::Instance(value)) => return Ok(value.clone()),
                Some(Binding::Singleton {
                    cached: Some(value),
                    ..
                }) if !has_parameters => return Ok(value.clone()),
                _ => {}
            }
        }

        let (factory, origin) = match (contextual, binding) {
            (Some(factory), _) => (factory, Origin::Contextual),
            (None, Some(binding)) => match binding.factory() {
                Some(factory) => (factory, Origin::Bound(binding.kind())),
                None => {
                    return Err(AppError::InternalError(format!(
                        "binding [{}] has neither a value nor a factory",
                        identifier
                    )));
                }
            },
            (None, None) => match registry::find_constructor(identifier) {
                Some(registration) => {
                    log::debug!("Constructing unbound [{}] from constructor table", identifier);
                    let factory: Factory = Arc::new(registration.constructor);
                    (
                        factory,
                        Origin::Constructed {
                            shared: registration.shared,
                        },
                    )
                }
                None => return Err(AppError::UnresolvableBindingError(identifier.to_string())),
            },
        };

        let value = {
            let _frame = self.enter(identifier, parameters)?;
            factory(self)?
        };

        if has_parameters {
            return Ok(value);
        }

        match origin {
            Origin::Bound(BindingKind::Singleton) => {
                Ok(self.write_bindings().cache(identifier, value))
            }
            Origin::Constructed { shared: true } => {
                let mut bindings = self.write_bindings();
                if let Some(existing) = bindings.get(identifier).and_then(Binding::resolved_value) {
                    return Ok(existing);
                }
                if !bindings.contains(identifier) {
                    bindings.insert(
                        identifier.to_string(),
                        Binding::Singleton {
                            factory,
                            cached: Some(value.clone()),
                        },
                    );
                }
                Ok(value)
            }
            _ => Ok(value),
        }
    }

    fn contextual_factory(&self, abstract_id: &str) -> Option<Factory> {
        let concrete = self
            .build_stack
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()?;

        self.contextual
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&concrete)
            .and_then(|needs| needs.get(abstract_id))
            .cloned()
    }

    /// 빌드 프레임을 엽니다. 프레임이 drop될 때 스택에서 제거됩니다 (panic 포함).
    fn enter(&self, identifier: &str, parameters: Parameters) -> AppResult<BuildFrame<'_>> {
        {
            let mut stack = self
                .build_stack
                .write()
                .unwrap_or_else(PoisonError::into_inner);

            if let Some(start) = stack.iter().position(|entry| entry == identifier) {
                let mut chain: Vec<&str> = stack[start..].iter().map(String::as_str).collect();
                chain.push(identifier);
                log::error!("Circular resolution detected for [{}]", identifier);
                return Err(AppError::CircularResolutionError {
                    identifier: identifier.to_string(),
                    chain: chain.join(" -> "),
                });
            }

            stack.push(identifier.to_string());
        }

        self.parameter_stack
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(parameters);

        Ok(BuildFrame { container: self })
    }

    // ---------------------------------------------------------------------
    // 조회 / 제거
    // ---------------------------------------------------------------------

    /// 바인딩이 등록되어 있는지 확인합니다.
    pub fn bound(&self, identifier: &str) -> bool {
        self.read_bindings().contains(identifier)
    }

    /// 바인딩되어 있거나 생성자 테이블로 만들 수 있는지 확인합니다.
    pub fn has(&self, identifier: &str) -> bool {
        self.bound(identifier) || registry::is_constructible(identifier)
    }

    /// 값이 이미 만들어져 있는지 (instance 또는 채워진 singleton) 확인합니다.
    pub fn resolved(&self, identifier: &str) -> bool {
        self.read_bindings()
            .get(identifier)
            .and_then(Binding::resolved_value)
            .is_some()
    }

    /// 바인딩을 제거합니다.
    pub fn forget(&self, identifier: &str) -> bool {
        self.write_bindings().remove(identifier).is_some()
    }

    pub fn binding_kind(&self, identifier: &str) -> Option<BindingKind> {
        self.read_bindings().get(identifier).map(Binding::kind)
    }

    pub fn identifiers(&self) -> Vec<String> {
        self.read_bindings().identifiers()
    }

    /// 현재 빌드 중인 식별자 스택
    pub fn building(&self) -> Vec<String> {
        self.build_stack
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    // ---------------------------------------------------------------------
    // 현재 인스턴스 접근자
    // ---------------------------------------------------------------------

    /// 현재 컨테이너를 설치하고 이전 컨테이너를 돌려줍니다.
    ///
    /// 매개변수로 컨테이너를 받을 수 없는 정적 조회 지점에서만 사용합니다.
    /// 호스트 스레드 단위로 보관되므로 다른 워커 스레드의 요청과 공유되지 않습니다.
    pub fn set_current(container: Arc<Container>) -> Option<Arc<Container>> {
        CURRENT.with(|current| current.borrow_mut().replace(container))
    }

    pub fn current() -> Option<Arc<Container>> {
        CURRENT.with(|current| current.borrow().clone())
    }

    pub fn forget_current() -> Option<Arc<Container>> {
        CURRENT.with(|current| current.borrow_mut().take())
    }

    /// 주어진 컨테이너가 현재 설치된 컨테이너인지 확인합니다.
    pub fn is_current(container: &Arc<Container>) -> bool {
        CURRENT.with(|current| {
            current
                .borrow()
                .as_ref()
                .is_some_and(|installed| Arc::ptr_eq(installed, container))
        })
    }

    fn read_bindings(&self) -> RwLockReadGuard<'_, BindingRegistry> {
        self.bindings.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_bindings(&self) -> RwLockWriteGuard<'_, BindingRegistry> {
        self.bindings.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("bindings", &self.identifiers())
            .field("building", &self.building())
            .finish()
    }
}

struct BuildFrame<'a> {
    container: &'a Container,
}

impl Drop for BuildFrame<'_> {
    fn drop(&mut self) {
        self.container
            .build_stack
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .pop();
        self.container
            .parameter_stack
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .pop();
    }
}

fn downcast<T: Any + Send + Sync>(identifier: &str, instance: Instance) -> AppResult<Arc<T>> {
    instance
        .downcast::<T>()
        .map_err(|_| AppError::TypeMismatchError {
            identifier: identifier.to_string(),
            expected: type_name::<T>(),
        })
}

/// `when(concrete)`가 돌려주는 빌더
pub struct ContextualBindingBuilder<'c> {
    container: &'c Container,
    concrete: String,
}

impl<'c> ContextualBindingBuilder<'c> {
    pub fn needs(self, abstract_id: &str) -> ContextualNeeds<'c> {
        ContextualNeeds {
            container: self.container,
            concrete: self.concrete,
            needs: abstract_id.trim().to_string(),
        }
    }
}

/// `when(concrete).needs(abstract)`가 돌려주는 빌더
pub struct ContextualNeeds<'c> {
    container: &'c Container,
    concrete: String,
    needs: String,
}

impl ContextualNeeds<'_> {
    pub fn give<F>(self, factory: F)
    where
        F: Fn(&Container) -> AppResult<Instance> + Send + Sync + 'static,
    {
        self.container
            .add_contextual_binding(&self.concrete, &self.needs, Arc::new(factory));
    }

    pub fn give_instance(self, value: Instance) {
        self.give(move |_| Ok(value.clone()));
    }
}
