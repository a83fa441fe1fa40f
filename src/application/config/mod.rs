//! 애플리케이션이 사용하는 설정 스키마(순수 데이터).
//!
//! 주의: 파일/환경변수 접근은 `infrastructure`에서만 수행한다.

use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigurationError;
use crate::domain::settings::{AmqpTransportSettings, RawServiceSettings};

pub const SERVICE_BUS_SECTION: &str = "ServiceBus";
pub const AMQP_TRANSPORT_SECTION: &str = "ServiceBusAmqpTransport";

/// 설정 파일 최상위 구조(이름 있는 섹션 모음).
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(rename = "ServiceBus", default)]
    pub service_bus: Option<RawServiceSettings>,
    #[serde(rename = "ServiceBusAmqpTransport", default)]
    pub amqp_transport: Option<AmqpTransportSettings>,
}

impl Config {
    /// 후순위(나중 파일) 값으로 덮어쓰는 병합 규칙.
    pub(crate) fn merge_from(&mut self, other: Config) {
        match (self.service_bus.as_mut(), other.service_bus) {
            (Some(existing), Some(next)) => existing.merge_from(next),
            (None, Some(next)) => self.service_bus = Some(next),
            _ => {}
        }
        match (self.amqp_transport.as_mut(), other.amqp_transport) {
            (Some(existing), Some(next)) => existing.merge_from(next),
            (None, Some(next)) => self.amqp_transport = Some(next),
            _ => {}
        }
    }
}

/// 시작 시 한 번 만들어 모든 프로비저닝 호출에 전달하는 불변 스냅샷.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BusSettings {
    pub service_bus: RawServiceSettings,
    pub amqp_transport: AmqpTransportSettings,
}

impl BusSettings {
    /// 두 섹션이 모두 있어야 한다.
    pub fn from_config(config: &Config) -> Result<Self, ConfigurationError> {
        let service_bus = config
            .service_bus
            .clone()
            .ok_or_else(|| ConfigurationError::missing_section(SERVICE_BUS_SECTION))?;
        let amqp_transport = config
            .amqp_transport
            .clone()
            .ok_or_else(|| ConfigurationError::missing_section(AMQP_TRANSPORT_SECTION))?;

        Ok(Self {
            service_bus,
            amqp_transport,
        })
    }
}
