//! sbhost library root.
//! Service Bus 호스트 설정 해석과 버스 프로비저닝을 Clean Architecture 계층으로 노출한다.

use anyhow::Result;

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interface;

use application::bus::ServiceConfigurator;
use application::config::BusSettings;
use application::ports::BusControl;
use interface::composition::AppComposition;

/// 설정 파일과 환경변수에서 불변 스냅샷을 만든다. 프로세스 시작 시 한 번 호출한다.
pub fn load_bus_settings() -> Result<BusSettings> {
    AppComposition::default().load_bus_settings()
}

/// 주어진 스냅샷으로 메모리 내 버스를 구성한다. 디스크/환경변수는 읽지 않는다.
pub fn provision<F>(
    settings: &BusSettings,
    service_name: &str,
    configure_service: F,
) -> Result<Box<dyn BusControl>>
where
    F: FnOnce(&mut ServiceConfigurator<'_>) -> Result<()>,
{
    let composition = AppComposition::default();
    Ok(composition
        .provision_bus_usecase(settings)
        .execute(service_name, configure_service)?)
}

/// 설정 점검 JSON 출력용 함수.
pub fn inspect_config_pretty_json() -> Result<String> {
    infrastructure::config::inspect_pretty_json()
}
