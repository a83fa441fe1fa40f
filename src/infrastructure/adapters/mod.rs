//! 애플리케이션 포트를 실제 인프라 구현체로 연결하는 어댑터 계층.

mod config_repository;
mod host_settings_resolver;
mod reporter;

pub use config_repository::JsonConfigRepository;
pub use host_settings_resolver::DefaultHostSettingsResolver;
pub use reporter::ConsoleReporter;
