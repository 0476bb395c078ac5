//! 프로바이더 생명주기 관리
//!
//! 등록 순서를 유지하는 프로바이더 목록과 각 프로바이더의 상태를 관리합니다.
//! register/boot 훅의 실패는 여기서 잡지 않고 `ProviderLifecycleError`로 감싸 돌려줍니다.

use std::fmt;
use std::sync::Arc;

use crate::core::container::Container;
use crate::core::errors::{AppError, AppResult, LifecyclePhase};
use crate::providers::ServiceProvider;

/// 프로바이더 상태 (역방향 전이 없음)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderState {
    Unregistered,
    Registered,
    Booted,
}

struct ProviderEntry {
    provider: Box<dyn ServiceProvider>,
    state: ProviderState,
}

pub struct ProviderRepository {
    container: Arc<Container>,
    entries: Vec<ProviderEntry>,
    booted: bool,
}

impl ProviderRepository {
    pub fn new(container: Arc<Container>) -> Self {
        Self {
            container,
            entries: Vec::new(),
            booted: false,
        }
    }

    /// 프로바이더를 등록하고 register 훅을 즉시 실행합니다.
    ///
    /// 같은 이름의 프로바이더가 이미 있으면 아무것도 하지 않고 `false`를 돌려줍니다.
    /// boot 단계가 이미 끝났다면 새 프로바이더를 바로 boot합니다.
    pub fn register(&mut self, mut provider: Box<dyn ServiceProvider>) -> AppResult<bool> {
        let name = provider.name();
        if self.state(name) != ProviderState::Unregistered {
            log::debug!("Provider [{}] already registered", name);
            return Ok(false);
        }

        provider
            .register(&self.container)
            .map_err(|e| AppError::lifecycle(name, LifecyclePhase::Register, e))?;
        log::info!("Registered provider [{}]", name);

        self.entries.push(ProviderEntry {
            provider,
            state: ProviderState::Registered,
        });

        if self.booted {
            let container = &self.container;
            if let Some(entry) = self.entries.last_mut() {
                Self::boot_entry(container, entry)?;
            }
        }

        Ok(true)
    }

    /// 등록 순서대로 boot 훅을 실행합니다. 첫 실패에서 중단합니다.
    pub fn boot_all(&mut self) -> AppResult<()> {
        if self.booted {
            return Err(AppError::AlreadyBootedError);
        }
        self.booted = true;

        let container = &self.container;
        for entry in self.entries.iter_mut() {
            if entry.state == ProviderState::Registered {
                Self::boot_entry(container, entry)?;
            }
        }

        log::info!("Booted {} provider(s)", self.entries.len());
        Ok(())
    }

    fn boot_entry(container: &Container, entry: &mut ProviderEntry) -> AppResult<()> {
        let name = entry.provider.name();
        entry
            .provider
            .boot(container)
            .map_err(|e| AppError::lifecycle(name, LifecyclePhase::Boot, e))?;
        entry.state = ProviderState::Booted;
        log::debug!("Booted provider [{}]", name);
        Ok(())
    }

    pub fn is_booted(&self) -> bool {
        self.booted
    }

    pub fn state(&self, name: &str) -> ProviderState {
        self.entries
            .iter()
            .find(|entry| entry.provider.name() == name)
            .map(|entry| entry.state)
            .unwrap_or(ProviderState::Unregistered)
    }

    /// 등록 순서대로의 프로바이더 이름
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|entry| entry.provider.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn container(&self) -> &Arc<Container> {
        &self.container
    }
}

impl fmt::Debug for ProviderRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRepository")
            .field("providers", &self.names())
            .field("booted", &self.booted)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    type Log = Arc<Mutex<Vec<String>>>;

    struct Database {
        dsn: String,
    }

    struct Mailer {
        dsn: String,
    }

    struct DatabaseProvider {
        log: Log,
    }

    impl ServiceProvider for DatabaseProvider {
        fn name(&self) -> &'static str {
            "DatabaseProvider"
        }

        fn register(&mut self, container: &Container) -> AppResult<()> {
            self.log.lock().unwrap().push("register-db".to_string());
            container.singleton_as("db", |_| {
                Ok(Database {
                    dsn: "sqlite::memory:".to_string(),
                })
            })
        }

        fn boot(&mut self, _container: &Container) -> AppResult<()> {
            self.log.lock().unwrap().push("boot-db".to_string());
            Ok(())
        }
    }

    /// register 단계에서 DatabaseProvider의 바인딩을 사용합니다.
    struct MailerProvider {
        log: Log,
    }

    impl ServiceProvider for MailerProvider {
        fn name(&self) -> &'static str {
            "MailerProvider"
        }

        fn register(&mut self, container: &Container) -> AppResult<()> {
            self.log.lock().unwrap().push("register-mailer".to_string());
            let db = container.make_as::<Database>("db")?;
            container.instance_value("mailer", Mailer { dsn: db.dsn.clone() })
        }

        fn boot(&mut self, container: &Container) -> AppResult<()> {
            let mailer = container.make_as::<Mailer>("mailer")?;
            self.log.lock().unwrap().push(format!("boot-mailer:{}", mailer.dsn));
            Ok(())
        }
    }

    /// boot 훅이 없는 프로바이더
    #[derive(Default)]
    struct PlainProvider;

    impl ServiceProvider for PlainProvider {
        fn register(&mut self, container: &Container) -> AppResult<()> {
            container.instance_value("plain", 1u8)
        }
    }

    struct FailingProvider {
        phase: LifecyclePhase,
    }

    impl ServiceProvider for FailingProvider {
        fn name(&self) -> &'static str {
            "FailingProvider"
        }

        fn register(&mut self, _container: &Container) -> AppResult<()> {
            match self.phase {
                LifecyclePhase::Register => Err(AppError::InternalError("no config".to_string())),
                LifecyclePhase::Boot => Ok(()),
            }
        }

        fn boot(&mut self, _container: &Container) -> AppResult<()> {
            Err(AppError::InternalError("boot exploded".to_string()))
        }
    }

    fn repository() -> ProviderRepository {
        ProviderRepository::new(Arc::new(Container::new()))
    }

    #[test]
    fn test_two_phase_order() {
        let log: Log = Arc::default();
        let mut providers = repository();

        providers.register(Box::new(DatabaseProvider { log: log.clone() })).unwrap();
        providers.register(Box::new(MailerProvider { log: log.clone() })).unwrap();
        assert_eq!(providers.state("MailerProvider"), ProviderState::Registered);

        providers.boot_all().unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            vec!["register-db", "register-mailer", "boot-db", "boot-mailer:sqlite::memory:"]
        );
        assert_eq!(providers.state("DatabaseProvider"), ProviderState::Booted);
        assert_eq!(providers.state("MailerProvider"), ProviderState::Booted);
    }

    #[test]
    fn test_default_name_and_missing_boot_hook() {
        let mut providers = repository();
        providers.register(Box::new(PlainProvider)).unwrap();

        assert_eq!(providers.names(), vec!["PlainProvider"]);
        providers.boot_all().unwrap();
        assert_eq!(providers.state("PlainProvider"), ProviderState::Booted);
    }

    #[test]
    fn test_duplicate_registration_is_ignored() {
        let mut providers = repository();
        assert!(providers.register(Box::new(PlainProvider)).unwrap());
        assert!(!providers.register(Box::new(PlainProvider)).unwrap());
        assert_eq!(providers.len(), 1);
    }

    #[test]
    fn test_register_failure_is_lifecycle_error() {
        let mut providers = repository();
        let result = providers.register(Box::new(FailingProvider {
            phase: LifecyclePhase::Register,
        }));

        match result {
            Err(AppError::ProviderLifecycleError { provider, phase, .. }) => {
                assert_eq!(provider, "FailingProvider");
                assert_eq!(phase, LifecyclePhase::Register);
            }
            other => panic!("unexpected: {:?}", other),
        }
        assert_eq!(providers.state("FailingProvider"), ProviderState::Unregistered);
    }

    #[test]
    fn test_boot_failure_aborts_remaining_boots() {
        let log: Log = Arc::default();
        let mut providers = repository();
        providers
            .register(Box::new(FailingProvider {
                phase: LifecyclePhase::Boot,
            }))
            .unwrap();
        providers.register(Box::new(DatabaseProvider { log: log.clone() })).unwrap();

        let result = providers.boot_all();

        assert!(matches!(
            result,
            Err(AppError::ProviderLifecycleError {
                phase: LifecyclePhase::Boot,
                ..
            })
        ));
        assert_eq!(providers.state("FailingProvider"), ProviderState::Registered);
        assert_eq!(providers.state("DatabaseProvider"), ProviderState::Registered);
        assert!(!log.lock().unwrap().contains(&"boot-db".to_string()));
    }

    #[test]
    fn test_boot_all_runs_once() {
        let mut providers = repository();
        providers.boot_all().unwrap();
        assert!(matches!(providers.boot_all(), Err(AppError::AlreadyBootedError)));
    }

    #[test]
    fn test_late_registration_boots_immediately() {
        let log: Log = Arc::default();
        let mut providers = repository();
        providers.boot_all().unwrap();

        providers.register(Box::new(DatabaseProvider { log: log.clone() })).unwrap();

        assert_eq!(providers.state("DatabaseProvider"), ProviderState::Booted);
        assert_eq!(*log.lock().unwrap(), vec!["register-db", "boot-db"]);
    }

    #[test]
    fn test_later_provider_overrides_binding() {
        struct Override;

        impl ServiceProvider for Override {
            fn register(&mut self, container: &Container) -> AppResult<()> {
                container.instance_value("plain", 2u8)
            }
        }

        let mut providers = repository();
        providers.register(Box::new(PlainProvider)).unwrap();
        providers.register(Box::new(Override)).unwrap();

        let value = providers.container().make_as::<u8>("plain").unwrap();
        assert_eq!(*value, 2);
    }
}
