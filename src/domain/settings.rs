//! 설정 제공자에서 읽어온 원시(raw) 서비스 설정 스키마.
//!
//! 값은 로딩 이후 변경되지 않으며, 기본값 적용은 해석 단계에서 지연 수행한다.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::credentials::TokenScope;

pub const DEFAULT_TOKEN_TIME_TO_LIVE: Duration = Duration::from_secs(24 * 60 * 60);
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_RETRY_MIN_BACKOFF: Duration = Duration::ZERO;
pub const DEFAULT_RETRY_MAX_BACKOFF: Duration = Duration::from_secs(2);
pub const DEFAULT_RETRY_LIMIT: u32 = 10;

pub const DEFAULT_BATCH_FLUSH_INTERVAL: Duration = Duration::from_millis(20);
pub const DEFAULT_MAX_FRAME_SIZE: u32 = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportType {
    #[default]
    Amqp,
    AmqpWebSockets,
}

/// `ServiceBus` 섹션.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct RawServiceSettings {
    /// 연결 문자열(있으면 나머지 인증 필드보다 우선)
    pub connection_string: Option<String>,
    /// 연결 문자열을 읽을 환경변수 이름
    pub connection_string_env: Option<String>,
    /// 네임스페이스 이름 또는 완전한 호스트 이름
    pub namespace: Option<String>,
    /// 서비스 경로 override(없으면 정규화된 서비스 이름)
    pub service_path: Option<String>,
    pub key_name: Option<String>,
    /// SAS 키(민감정보: 권장하지 않음)
    pub shared_access_key: Option<String>,
    /// SAS 키를 읽을 환경변수 이름
    pub shared_access_key_env: Option<String>,

    #[serde(default, rename = "token_time_to_live_ms", with = "optional_millis")]
    pub token_time_to_live: Option<Duration>,
    #[serde(default, rename = "operation_timeout_ms", with = "optional_millis")]
    pub operation_timeout: Option<Duration>,
    #[serde(default, rename = "retry_min_backoff_ms", with = "optional_millis")]
    pub retry_min_backoff: Option<Duration>,
    #[serde(default, rename = "retry_max_backoff_ms", with = "optional_millis")]
    pub retry_max_backoff: Option<Duration>,
    pub retry_limit: Option<u32>,

    pub token_scope: Option<TokenScope>,
    pub transport_type: Option<TransportType>,
}

/// `ServiceBusAmqpTransport` 섹션.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct AmqpTransportSettings {
    #[serde(default, rename = "batch_flush_interval_ms", with = "optional_millis")]
    pub batch_flush_interval: Option<Duration>,
    pub max_frame_size: Option<u32>,
    pub use_ssl_stream_security: Option<bool>,
}

/// 기본값이 적용된 AMQP 전송 설정.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EffectiveAmqpTransport {
    pub batch_flush_interval_ms: u64,
    pub max_frame_size: u32,
    pub use_ssl_stream_security: bool,
}

impl RawServiceSettings {
    /// 후순위 값으로 덮어쓰는 병합 규칙.
    pub(crate) fn merge_from(&mut self, other: RawServiceSettings) {
        if other.connection_string.is_some() {
            self.connection_string = other.connection_string;
        }
        if other.connection_string_env.is_some() {
            self.connection_string_env = other.connection_string_env;
        }
        if other.namespace.is_some() {
            self.namespace = other.namespace;
        }
        if other.service_path.is_some() {
            self.service_path = other.service_path;
        }
        if other.key_name.is_some() {
            self.key_name = other.key_name;
        }
        if other.shared_access_key.is_some() {
            self.shared_access_key = other.shared_access_key;
        }
        if other.shared_access_key_env.is_some() {
            self.shared_access_key_env = other.shared_access_key_env;
        }
        if other.token_time_to_live.is_some() {
            self.token_time_to_live = other.token_time_to_live;
        }
        if other.operation_timeout.is_some() {
            self.operation_timeout = other.operation_timeout;
        }
        if other.retry_min_backoff.is_some() {
            self.retry_min_backoff = other.retry_min_backoff;
        }
        if other.retry_max_backoff.is_some() {
            self.retry_max_backoff = other.retry_max_backoff;
        }
        if other.retry_limit.is_some() {
            self.retry_limit = other.retry_limit;
        }
        if other.token_scope.is_some() {
            self.token_scope = other.token_scope;
        }
        if other.transport_type.is_some() {
            self.transport_type = other.transport_type;
        }
    }
}

impl AmqpTransportSettings {
    pub fn effective(&self) -> EffectiveAmqpTransport {
        EffectiveAmqpTransport {
            batch_flush_interval_ms: self
                .batch_flush_interval
                .unwrap_or(DEFAULT_BATCH_FLUSH_INTERVAL)
                .as_millis() as u64,
            max_frame_size: self.max_frame_size.unwrap_or(DEFAULT_MAX_FRAME_SIZE),
            use_ssl_stream_security: self.use_ssl_stream_security.unwrap_or(true),
        }
    }

    pub(crate) fn merge_from(&mut self, other: AmqpTransportSettings) {
        if other.batch_flush_interval.is_some() {
            self.batch_flush_interval = other.batch_flush_interval;
        }
        if other.max_frame_size.is_some() {
            self.max_frame_size = other.max_frame_size;
        }
        if other.use_ssl_stream_security.is_some() {
            self.use_ssl_stream_security = other.use_ssl_stream_security;
        }
    }
}

/// 공백만 있는 값은 미설정과 동일하게 취급한다.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// `Option<Duration>` <-> 밀리초 정수.
mod optional_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => serializer.serialize_some(&(d.as_millis() as u64)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_are_read_as_milliseconds() {
        let raw: RawServiceSettings = serde_json::from_str(
            r#"{"namespace":"contoso","operation_timeout_ms":1500,"token_scope":"entity","transport_type":"amqp_web_sockets"}"#,
        )
        .unwrap();

        assert_eq!(raw.operation_timeout, Some(Duration::from_millis(1500)));
        assert_eq!(raw.token_time_to_live, None);
        assert_eq!(raw.token_scope, Some(TokenScope::Entity));
        assert_eq!(raw.transport_type, Some(TransportType::AmqpWebSockets));
    }

    #[test]
    fn merge_keeps_earlier_values_when_later_is_unset() {
        let mut base = RawServiceSettings {
            namespace: Some("contoso".into()),
            key_name: Some("k1".into()),
            ..Default::default()
        };
        base.merge_from(RawServiceSettings {
            key_name: Some("k2".into()),
            retry_limit: Some(3),
            ..Default::default()
        });

        assert_eq!(base.namespace.as_deref(), Some("contoso"));
        assert_eq!(base.key_name.as_deref(), Some("k2"));
        assert_eq!(base.retry_limit, Some(3));
    }

    #[test]
    fn amqp_defaults_apply_when_unset() {
        let effective = AmqpTransportSettings::default().effective();
        assert_eq!(effective.batch_flush_interval_ms, 20);
        assert_eq!(effective.max_frame_size, 65_536);
        assert!(effective.use_ssl_stream_security);
    }

    #[test]
    fn blank_values_count_as_absent() {
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some(" x ")), Some("x"));
    }
}
