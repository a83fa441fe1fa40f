//! 적용 설정 진단(inspection) 뷰 모델.
//!
//! 비밀값은 출력하지 않고 출처 라벨만 노출한다.

use std::env;

use serde::Serialize;

use super::loader::LoadedConfig;
use super::resolve::{resolve_secrets, secret_source_label};
use crate::domain::credentials::TokenScope;
use crate::domain::host::AuthenticationMode;
use crate::domain::settings::{
    DEFAULT_OPERATION_TIMEOUT, DEFAULT_RETRY_LIMIT, DEFAULT_RETRY_MAX_BACKOFF,
    DEFAULT_RETRY_MIN_BACKOFF, DEFAULT_TOKEN_TIME_TO_LIVE, EffectiveAmqpTransport,
    RawServiceSettings, TransportType, non_blank,
};

#[derive(Debug, Clone, Serialize)]
pub struct ConfigInspection {
    pub searched_paths: Vec<String>,
    pub loaded_paths: Vec<String>,
    pub service_bus: Option<ServiceBusInspection>,
    pub amqp_transport: Option<EffectiveAmqpTransport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceBusInspection {
    /// 비밀값 해석 후 선택될 인증 경로
    pub authentication_mode: AuthenticationMode,
    pub connection_string_source: Option<String>,
    pub namespace: Option<String>,
    pub service_path: Option<String>,
    pub key_name: Option<String>,
    pub shared_access_key_source: Option<String>,
    pub effective: EffectiveHostDefaults,
}

#[derive(Debug, Clone, Serialize)]
pub struct EffectiveHostDefaults {
    pub token_time_to_live_ms: u64,
    pub operation_timeout_ms: u64,
    pub retry_min_backoff_ms: u64,
    pub retry_max_backoff_ms: u64,
    pub retry_limit: u32,
    pub token_scope: TokenScope,
    pub transport_type: TransportType,
}

impl ConfigInspection {
    pub(crate) fn from_loaded(loaded: LoadedConfig) -> Self {
        Self {
            searched_paths: loaded
                .searched_paths
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            loaded_paths: loaded
                .loaded_paths
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            service_bus: loaded.config.service_bus.as_ref().map(service_bus_inspection),
            amqp_transport: loaded.config.amqp_transport.as_ref().map(|a| a.effective()),
        }
    }
}

fn service_bus_inspection(raw: &RawServiceSettings) -> ServiceBusInspection {
    let lookup = |name: &str| env::var(name).ok();
    let resolved = resolve_secrets(raw);
    let authentication_mode = if non_blank(resolved.connection_string.as_deref()).is_some() {
        AuthenticationMode::ConnectionString
    } else {
        AuthenticationMode::SharedAccessKey
    };

    ServiceBusInspection {
        authentication_mode,
        connection_string_source: secret_source_label(
            raw.connection_string.as_deref(),
            raw.connection_string_env.as_deref(),
            lookup,
        ),
        namespace: non_blank(raw.namespace.as_deref()).map(str::to_string),
        service_path: non_blank(raw.service_path.as_deref()).map(str::to_string),
        key_name: non_blank(raw.key_name.as_deref()).map(str::to_string),
        shared_access_key_source: secret_source_label(
            raw.shared_access_key.as_deref(),
            raw.shared_access_key_env.as_deref(),
            lookup,
        ),
        effective: EffectiveHostDefaults {
            token_time_to_live_ms: millis(raw.token_time_to_live.unwrap_or(DEFAULT_TOKEN_TIME_TO_LIVE)),
            operation_timeout_ms: millis(raw.operation_timeout.unwrap_or(DEFAULT_OPERATION_TIMEOUT)),
            retry_min_backoff_ms: millis(raw.retry_min_backoff.unwrap_or(DEFAULT_RETRY_MIN_BACKOFF)),
            retry_max_backoff_ms: millis(raw.retry_max_backoff.unwrap_or(DEFAULT_RETRY_MAX_BACKOFF)),
            retry_limit: raw.retry_limit.unwrap_or(DEFAULT_RETRY_LIMIT),
            token_scope: raw.token_scope.unwrap_or_default(),
            transport_type: raw.transport_type.unwrap_or_default(),
        },
    }
}

fn millis(d: std::time::Duration) -> u64 {
    d.as_millis() as u64
}
