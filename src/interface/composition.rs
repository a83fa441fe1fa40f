//! 애플리케이션 조립(composition root) 모듈.

use anyhow::Result;

use crate::application::config::BusSettings;
use crate::application::ports::{ConfigRepository, Reporter};
use crate::application::usecases::inspect_config::InspectConfigUseCase;
use crate::application::usecases::provision_bus::ProvisionBusUseCase;
use crate::infrastructure::adapters::{
    ConsoleReporter, DefaultHostSettingsResolver, JsonConfigRepository,
};
use crate::infrastructure::bus::InMemoryBusFactory;

/// 실행 시점 의존성을 한 곳에서 조립하는 컨테이너.
pub struct AppComposition {
    config_repo: JsonConfigRepository,
    resolver: DefaultHostSettingsResolver,
    bus_factory: InMemoryBusFactory,
    reporter: ConsoleReporter,
}

impl Default for AppComposition {
    fn default() -> Self {
        Self {
            config_repo: JsonConfigRepository,
            resolver: DefaultHostSettingsResolver,
            bus_factory: InMemoryBusFactory,
            reporter: ConsoleReporter,
        }
    }
}

impl AppComposition {
    /// 설정 점검 유스케이스를 생성한다.
    pub fn inspect_config_usecase(&self) -> InspectConfigUseCase<'_> {
        InspectConfigUseCase {
            config_repo: &self.config_repo,
            reporter: &self.reporter,
        }
    }

    /// 시작 시 한 번 호출해 프로세스 전역 스냅샷을 만든다.
    pub fn load_bus_settings(&self) -> Result<BusSettings> {
        self.config_repo.load_bus_settings()
    }

    /// 버스 프로비저닝 유스케이스를 생성한다.
    pub fn provision_bus_usecase<'a>(&'a self, settings: &'a BusSettings) -> ProvisionBusUseCase<'a> {
        ProvisionBusUseCase {
            settings,
            resolver: &self.resolver,
            bus_factory: &self.bus_factory,
        }
    }

    pub fn reporter(&self) -> &dyn Reporter {
        &self.reporter
    }
}
