//! 원시 설정 → 검증된 `HostSettings` 해석.
//!
//! 인증 경로는 두 가지(연결 문자열 / SAS 키)이며 서로 배타적이다.
//! 연결 문자열이 있으면 키 필드는 검증하지 않는다.

use std::time::Duration;

use serde::Serialize;
use url::Url;

use crate::domain::connection_string::ConnectionStringDescriptor;
use crate::domain::credentials::{Secret, TokenProvider, TokenScope};
use crate::domain::endpoint::service_uri;
use crate::domain::error::ConfigurationError;
use crate::domain::service_name::normalize_service_name;
use crate::domain::settings::{
    DEFAULT_OPERATION_TIMEOUT, DEFAULT_RETRY_LIMIT, DEFAULT_RETRY_MAX_BACKOFF,
    DEFAULT_RETRY_MIN_BACKOFF, DEFAULT_TOKEN_TIME_TO_LIVE, RawServiceSettings, TransportType,
    non_blank,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthenticationMode {
    ConnectionString,
    SharedAccessKey,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostAuthentication {
    /// 연결 문자열에서 파생된 자격 증명을 그대로 사용한다.
    ConnectionString { token_provider: TokenProvider },
    /// 키 이름/키로 SAS 토큰을 지연 생성한다.
    SharedAccessKey {
        key_name: String,
        shared_access_key: Secret,
    },
}

impl HostAuthentication {
    pub fn mode(&self) -> AuthenticationMode {
        match self {
            HostAuthentication::ConnectionString { .. } => AuthenticationMode::ConnectionString,
            HostAuthentication::SharedAccessKey { .. } => AuthenticationMode::SharedAccessKey,
        }
    }
}

/// 브로커 엔드포인트에 접속하기 위한 해석 완료 설정. 생성 후 변경하지 않는다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSettings {
    /// 해석기는 성공 시 항상 채운다. 연결 문자열에 주소가 없으면 비어 있을 수 있다.
    pub service_uri: Option<Url>,
    pub authentication: HostAuthentication,
    pub token_time_to_live: Duration,
    pub operation_timeout: Duration,
    pub retry_min_backoff: Duration,
    pub retry_max_backoff: Duration,
    pub retry_limit: u32,
    pub token_scope: TokenScope,
    pub transport_type: TransportType,
}

impl HostSettings {
    pub fn authentication_mode(&self) -> AuthenticationMode {
        self.authentication.mode()
    }

    /// 인증 경로에 맞는 토큰 공급자.
    pub fn token_provider(&self) -> TokenProvider {
        match &self.authentication {
            HostAuthentication::ConnectionString { token_provider } => token_provider.clone(),
            HostAuthentication::SharedAccessKey {
                key_name,
                shared_access_key,
            } => TokenProvider::shared_access_key(
                key_name.clone(),
                shared_access_key.clone(),
                self.token_time_to_live,
                self.token_scope,
            ),
        }
    }
}

/// 원시 설정과 논리 서비스 이름으로 `HostSettings`를 해석한다.
/// 첫 번째로 누락된 필드에서 즉시 실패한다(누적 검증 없음).
pub fn resolve_host_settings(
    raw: &RawServiceSettings,
    service_name: &str,
) -> Result<HostSettings, ConfigurationError> {
    let service_name = normalize_service_name(service_name);

    let token_time_to_live = raw.token_time_to_live.unwrap_or(DEFAULT_TOKEN_TIME_TO_LIVE);
    let token_scope = raw.token_scope.unwrap_or_default();

    let (service_uri, authentication) = match non_blank(raw.connection_string.as_deref()) {
        Some(connection_string) => {
            let descriptor = ConnectionStringDescriptor::parse(connection_string);
            let token_provider = descriptor.token_provider(token_time_to_live, token_scope);
            (
                descriptor.address,
                HostAuthentication::ConnectionString { token_provider },
            )
        }
        None => {
            let namespace =
                non_blank(raw.namespace.as_deref()).ok_or(ConfigurationError::MissingNamespace)?;
            // 공백 여부는 존재 판정에만 쓰고, 서명 키는 입력 그대로 보관한다.
            let key_name = raw
                .key_name
                .as_deref()
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigurationError::MissingKeyName)?;
            let shared_access_key = raw
                .shared_access_key
                .as_deref()
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigurationError::MissingSharedAccessKey)?;

            let path = non_blank(raw.service_path.as_deref()).unwrap_or(&service_name);
            (
                Some(service_uri(namespace, path)?),
                HostAuthentication::SharedAccessKey {
                    key_name: key_name.to_string(),
                    shared_access_key: Secret::new(shared_access_key),
                },
            )
        }
    };

    Ok(HostSettings {
        service_uri,
        authentication,
        token_time_to_live,
        operation_timeout: raw.operation_timeout.unwrap_or(DEFAULT_OPERATION_TIMEOUT),
        retry_min_backoff: raw.retry_min_backoff.unwrap_or(DEFAULT_RETRY_MIN_BACKOFF),
        retry_max_backoff: raw.retry_max_backoff.unwrap_or(DEFAULT_RETRY_MAX_BACKOFF),
        retry_limit: raw.retry_limit.unwrap_or(DEFAULT_RETRY_LIMIT),
        token_scope,
        transport_type: raw.transport_type.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_settings() -> RawServiceSettings {
        RawServiceSettings {
            namespace: Some("contoso".into()),
            key_name: Some("k1".into()),
            shared_access_key: Some("s3cr3t".into()),
            ..Default::default()
        }
    }

    #[test]
    fn key_path_derives_uri_from_namespace_and_service_name() {
        let settings = resolve_host_settings(&key_settings(), "Order Service").unwrap();

        assert_eq!(settings.authentication_mode(), AuthenticationMode::SharedAccessKey);
        let uri = settings.service_uri.unwrap();
        assert!(uri.host_str().unwrap().contains("contoso"));
        assert!(uri.path().contains("order_service"));
    }

    #[test]
    fn service_path_overrides_service_name() {
        let raw = RawServiceSettings {
            service_path: Some("shared/orders".into()),
            ..key_settings()
        };
        let settings = resolve_host_settings(&raw, "Order Service").unwrap();
        assert_eq!(settings.service_uri.unwrap().path(), "/shared/orders");
    }

    #[test]
    fn blank_service_path_falls_back_to_normalized_name() {
        let raw = RawServiceSettings {
            service_path: Some("  ".into()),
            ..key_settings()
        };
        let settings = resolve_host_settings(&raw, "  My Service  ").unwrap();
        assert_eq!(settings.service_uri.unwrap().path(), "/my_service");
    }

    #[test]
    fn empty_service_name_targets_namespace_root() {
        let settings = resolve_host_settings(&key_settings(), "   ").unwrap();
        assert_eq!(
            settings.service_uri.unwrap().as_str(),
            "sb://contoso.servicebus.windows.net/"
        );
    }

    #[test]
    fn connection_string_takes_precedence_over_key_fields() {
        let raw = RawServiceSettings {
            connection_string: Some("Endpoint=sb://x/;SharedAccessKeyName=a;SharedAccessKey=b".into()),
            ..key_settings()
        };
        let settings = resolve_host_settings(&raw, "Order Service").unwrap();

        assert_eq!(settings.authentication_mode(), AuthenticationMode::ConnectionString);
        assert_eq!(settings.service_uri.unwrap().as_str(), "sb://x/");
    }

    #[test]
    fn connection_string_address_ignores_service_name() {
        let raw = RawServiceSettings {
            connection_string: Some("Endpoint=sb://x/;SharedAccessKeyName=a;SharedAccessKey=b".into()),
            ..Default::default()
        };
        let first = resolve_host_settings(&raw, "Order Service").unwrap();
        let second = resolve_host_settings(&raw, "Billing").unwrap();
        assert_eq!(first.service_uri, second.service_uri);
    }

    #[test]
    fn connection_string_without_endpoint_resolves_without_address() {
        let raw = RawServiceSettings {
            connection_string: Some("SharedAccessKeyName=a;SharedAccessKey=b".into()),
            ..Default::default()
        };
        let settings = resolve_host_settings(&raw, "svc").unwrap();
        assert!(settings.service_uri.is_none());
    }

    #[test]
    fn blank_connection_string_uses_key_path() {
        let raw = RawServiceSettings {
            connection_string: Some("   ".into()),
            ..key_settings()
        };
        let settings = resolve_host_settings(&raw, "svc").unwrap();
        assert_eq!(settings.authentication_mode(), AuthenticationMode::SharedAccessKey);
    }

    #[test]
    fn missing_namespace_is_reported_first() {
        let raw = RawServiceSettings {
            namespace: Some(" ".into()),
            key_name: None,
            shared_access_key: None,
            ..Default::default()
        };
        let err = resolve_host_settings(&raw, "svc").unwrap_err();
        assert_eq!(err, ConfigurationError::MissingNamespace);
        assert!(err.to_string().contains("Namespace"));
    }

    #[test]
    fn missing_key_name_is_reported_before_key() {
        let raw = RawServiceSettings {
            key_name: None,
            shared_access_key: None,
            ..key_settings()
        };
        let err = resolve_host_settings(&raw, "svc").unwrap_err();
        assert_eq!(err, ConfigurationError::MissingKeyName);
        assert!(err.to_string().contains("KeyName"));
    }

    #[test]
    fn missing_shared_access_key_is_reported() {
        let raw = RawServiceSettings {
            shared_access_key: Some("".into()),
            ..key_settings()
        };
        let err = resolve_host_settings(&raw, "svc").unwrap_err();
        assert!(err.to_string().contains("SharedAccessKey"));
    }

    #[test]
    fn whitespace_only_key_counts_as_missing() {
        let raw = RawServiceSettings {
            shared_access_key: Some("   ".into()),
            ..key_settings()
        };
        let err = resolve_host_settings(&raw, "svc").unwrap_err();
        assert_eq!(err, ConfigurationError::MissingSharedAccessKey);
    }

    #[test]
    fn key_material_is_kept_verbatim() {
        let raw = RawServiceSettings {
            key_name: Some(" k1 ".into()),
            shared_access_key: Some(" s3cr3t ".into()),
            ..key_settings()
        };
        let settings = resolve_host_settings(&raw, "svc").unwrap();

        let HostAuthentication::SharedAccessKey {
            key_name,
            shared_access_key,
        } = settings.authentication
        else {
            panic!("expected shared access key authentication");
        };
        assert_eq!(key_name, " k1 ");
        assert_eq!(shared_access_key.expose(), " s3cr3t ");
    }

    #[test]
    fn defaults_apply_to_unset_fields() {
        let settings = resolve_host_settings(&key_settings(), "svc").unwrap();

        assert_eq!(settings.token_time_to_live, Duration::from_secs(86_400));
        assert_eq!(settings.operation_timeout, Duration::from_secs(30));
        assert_eq!(settings.retry_min_backoff, Duration::ZERO);
        assert_eq!(settings.retry_max_backoff, Duration::from_secs(2));
        assert_eq!(settings.retry_limit, 10);
        assert_eq!(settings.token_scope, TokenScope::Namespace);
        assert_eq!(settings.transport_type, TransportType::Amqp);
    }

    #[test]
    fn supplied_values_pass_through_unchanged() {
        let raw = RawServiceSettings {
            token_time_to_live: Some(Duration::from_secs(600)),
            operation_timeout: Some(Duration::from_secs(5)),
            retry_min_backoff: Some(Duration::from_millis(100)),
            retry_max_backoff: Some(Duration::from_secs(9)),
            retry_limit: Some(0),
            token_scope: Some(TokenScope::Entity),
            transport_type: Some(TransportType::AmqpWebSockets),
            ..key_settings()
        };
        let settings = resolve_host_settings(&raw, "svc").unwrap();

        assert_eq!(settings.token_time_to_live, Duration::from_secs(600));
        assert_eq!(settings.operation_timeout, Duration::from_secs(5));
        assert_eq!(settings.retry_min_backoff, Duration::from_millis(100));
        assert_eq!(settings.retry_max_backoff, Duration::from_secs(9));
        assert_eq!(settings.retry_limit, 0);
        assert_eq!(settings.token_scope, TokenScope::Entity);
        assert_eq!(settings.transport_type, TransportType::AmqpWebSockets);
    }

    #[test]
    fn resolving_twice_yields_equal_settings() {
        let raw = key_settings();
        assert_eq!(
            resolve_host_settings(&raw, "Order Service").unwrap(),
            resolve_host_settings(&raw, "Order Service").unwrap()
        );
    }

    #[test]
    fn key_path_token_provider_carries_ttl_and_scope() {
        let raw = RawServiceSettings {
            token_time_to_live: Some(Duration::from_secs(120)),
            token_scope: Some(TokenScope::Entity),
            ..key_settings()
        };
        let settings = resolve_host_settings(&raw, "svc").unwrap();

        assert_eq!(
            settings.token_provider(),
            TokenProvider::shared_access_key(
                "k1",
                Secret::new("s3cr3t"),
                Duration::from_secs(120),
                TokenScope::Entity,
            )
        );
    }
}
