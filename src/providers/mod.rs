//! # Service Providers
//!
//! 독립적으로 작성된 모듈이 컨테이너에 바인딩을 기여하는 단위입니다.
//!
//! ## 두 단계 부트스트랩
//!
//! ```text
//! 1. register 단계 (모든 프로바이더)
//!    ├─ 각자 바인딩만 등록
//!    └─ 다른 프로바이더의 boot 부수효과를 관찰하지 않음
//!
//! 2. boot 단계 (등록 순서대로 한 번)
//!    └─ 어떤 프로바이더가 등록한 식별자든 make 가능
//! ```
//!
//! 프로바이더 상태는 `Unregistered → Registered → Booted`로만 이동합니다.
//!
//! ## 자동 등록
//!
//! `inventory::submit!`으로 제출된 [`ProviderRegistration`]은 애플리케이션 생성 시
//! 코어 프로바이더 다음에 등록됩니다.
//!
//! ```rust,ignore
//! #[derive(Default)]
//! struct BillingServiceProvider;
//!
//! impl ServiceProvider for BillingServiceProvider {
//!     fn register(&mut self, container: &Container) -> AppResult<()> {
//!         container.singleton_as("billing.gateway", |_| Ok(StripeGateway::default()))
//!     }
//! }
//!
//! inventory::submit! {
//!     ProviderRegistration::of::<BillingServiceProvider>("BillingServiceProvider")
//! }
//! ```

pub mod builtin;
pub mod repository;

use crate::core::container::Container;
use crate::core::errors::AppResult;
use crate::utils::string_utils::short_type_name;

pub use builtin::{ExceptionServiceProvider, MiddlewareServiceProvider};
pub use repository::{ProviderRepository, ProviderState};

/// 서비스 프로바이더
///
/// `boot`는 선택 사항이며 기본 구현은 아무것도 하지 않습니다.
pub trait ServiceProvider: Send {
    /// 중복 등록 판단과 로그에 쓰이는 이름
    fn name(&self) -> &'static str {
        short_type_name(std::any::type_name::<Self>())
    }

    /// 바인딩을 등록합니다.
    fn register(&mut self, container: &Container) -> AppResult<()>;

    /// 모든 프로바이더가 등록된 뒤 한 번 호출됩니다.
    fn boot(&mut self, _container: &Container) -> AppResult<()> {
        Ok(())
    }
}

/// 자동 등록 정보
pub struct ProviderRegistration {
    pub name: &'static str,
    /// 콘솔(관리자) 모드에서만 등록
    pub console_only: bool,
    pub constructor: fn() -> Box<dyn ServiceProvider>,
}

impl ProviderRegistration {
    pub const fn of<P>(name: &'static str) -> Self
    where
        P: ServiceProvider + Default + 'static,
    {
        Self {
            name,
            console_only: false,
            constructor: construct::<P>,
        }
    }

    pub const fn console<P>(name: &'static str) -> Self
    where
        P: ServiceProvider + Default + 'static,
    {
        Self {
            name,
            console_only: true,
            constructor: construct::<P>,
        }
    }

    pub fn build(&self) -> Box<dyn ServiceProvider> {
        (self.constructor)()
    }
}

inventory::collect!(ProviderRegistration);

fn construct<P: ServiceProvider + Default + 'static>() -> Box<dyn ServiceProvider> {
    Box::new(P::default())
}

/// 현재 모드에서 등록할 프로바이더 목록 (이름순)
///
/// 수집 순서는 링크 순서에 따라 달라지므로 이름순으로 고정합니다.
pub fn discovered(console: bool) -> Vec<&'static ProviderRegistration> {
    let mut registrations: Vec<_> = inventory::iter::<ProviderRegistration>()
        .filter(|registration| console || !registration.console_only)
        .collect();
    registrations.sort_by_key(|registration| registration.name);
    registrations
}
