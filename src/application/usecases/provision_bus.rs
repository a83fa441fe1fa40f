//! 해석된 호스트 설정으로 버스를 구성하는 프로비저닝 유스케이스.
//!
//! 설정 오류는 호스트 등록/구성 콜백 호출 전에 모두 걸러진다.
//! 네트워크 연결은 열지 않으며, 반환된 핸들의 `start`에서 시작된다.

use anyhow::Result;
use thiserror::Error;
use tracing::{debug, info};

use crate::application::bus::{HostRegistration, ServiceConfigurator};
use crate::application::config::BusSettings;
use crate::application::ports::{
    BusControl, BusFactory, BusFactoryConfigurator, HostSettingsResolver,
};
use crate::domain::error::ConfigurationError;
use crate::domain::service_name::normalize_service_name;

#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// 버스 빌더 또는 호출자 구성 콜백이 반환한 오류(수정 없이 전달).
    #[error(transparent)]
    Bus(anyhow::Error),
}

/// 서비스 이름 정규화 → 설정 해석 → 주소 검증 → 호스트 등록 → 서비스 구성 순으로 조율한다.
pub struct ProvisionBusUseCase<'a> {
    pub settings: &'a BusSettings,
    pub resolver: &'a dyn HostSettingsResolver,
    pub bus_factory: &'a dyn BusFactory,
}

impl<'a> ProvisionBusUseCase<'a> {
    /// `configure_service`는 호스트 등록 직후 정확히 한 번 호출된다.
    pub fn execute<F>(
        &self,
        service_name: &str,
        configure_service: F,
    ) -> Result<Box<dyn BusControl>, ProvisionError>
    where
        F: FnOnce(&mut ServiceConfigurator<'_>) -> Result<()>,
    {
        let service_name = normalize_service_name(service_name);

        let settings = self
            .resolver
            .resolve(&self.settings.service_bus, &service_name)
            .inspect_err(|err| debug!(service_name = %service_name, "host settings rejected: {err}"))?;

        // 해석기 구현과 무관하게 주소가 있어야만 등록 단계로 넘어간다.
        let Some(service_uri) = settings.service_uri.clone() else {
            return Err(ConfigurationError::MissingServiceUri.into());
        };

        let registration = HostRegistration::from_settings(
            settings,
            service_uri,
            self.settings.amqp_transport.effective(),
        );

        self.bus_factory
            .create(Box::new(move |configurator: &mut dyn BusFactoryConfigurator| {
                let host = configurator.host(registration)?;
                info!("Configuring Host: {}", host.address());

                let mut service = ServiceConfigurator::new(configurator, host);
                configure_service(&mut service)
            }))
            .map_err(ProvisionError::Bus)
    }
}
