//! 애플리케이션 계층이 의존하는 포트(추상 인터페이스) 모음.

use anyhow::Result;
use async_trait::async_trait;
use url::Url;

use crate::application::bus::{BusProbe, HostHandle, HostRegistration, ReceiveEndpointDefinition};
use crate::application::config::BusSettings;
use crate::domain::error::ConfigurationError;
use crate::domain::host::HostSettings;
use crate::domain::settings::RawServiceSettings;

/// 설정 로딩/점검을 담당하는 저장소 포트.
pub trait ConfigRepository: Send + Sync {
    /// 필수 섹션이 빠져 있으면 `ConfigurationError`를 담아 실패한다.
    fn load_bus_settings(&self) -> Result<BusSettings>;
    fn inspect_pretty_json(&self) -> Result<String>;
}

/// 원시 설정을 `HostSettings`로 해석하는 포트.
pub trait HostSettingsResolver: Send + Sync {
    fn resolve(
        &self,
        raw: &RawServiceSettings,
        service_name: &str,
    ) -> Result<HostSettings, ConfigurationError>;
}

/// 버스 빌더에 한 번만 전달되는 구성 콜백.
pub type ConfigureBus<'a> = Box<dyn FnOnce(&mut dyn BusFactoryConfigurator) -> Result<()> + 'a>;

/// 호스트 구성기/버스 빌더 협력자 포트.
pub trait BusFactory: Send + Sync {
    fn create(&self, configure: ConfigureBus<'_>) -> Result<Box<dyn BusControl>>;
}

/// 버스 구성 중 호스트 등록과 수신 엔드포인트 선언을 받는 구성기.
pub trait BusFactoryConfigurator {
    fn host(&mut self, registration: HostRegistration) -> Result<HostHandle>;
    fn receive_endpoint(
        &mut self,
        host: &HostHandle,
        definition: ReceiveEndpointDefinition,
    ) -> Result<()>;
}

/// 생성된 버스의 시작/중지 제어 핸들.
#[async_trait]
pub trait BusControl: Send + Sync {
    fn address(&self) -> Option<&Url>;
    fn probe(&self) -> BusProbe;
    async fn start(&self) -> Result<()>;
    async fn stop(&self) -> Result<()>;
}

/// 콘솔/로그 출력 추상화 포트.
pub trait Reporter: Send + Sync {
    fn section(&self, name: &str);
    fn kv(&self, key: &str, value: &str);
    fn status(&self, scope: &str, message: &str);
    fn raw(&self, line: &str);
}
