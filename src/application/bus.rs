//! 버스 빌더(협력자)와 주고받는 경계 타입.
//!
//! 호스트 등록 정보, 서비스 구성 컨텍스트, 버스 진단(probe) 모델을 정의한다.

use std::time::Duration;

use anyhow::{Result, bail};
use serde::Serialize;
use url::Url;

use crate::application::ports::BusFactoryConfigurator;
use crate::domain::credentials::{Secret, TokenProvider, TokenScope};
use crate::domain::host::{AuthenticationMode, HostAuthentication, HostSettings};
use crate::domain::settings::{EffectiveAmqpTransport, TransportType};

/// 호스트에 설치할 토큰 발급 방식.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCredentials {
    /// 연결 문자열에서 미리 만들어진 자격 증명을 그대로 설치한다.
    TokenProvider(TokenProvider),
    /// 키 파라미터만 넘기고 서명은 버스 런타임이 지연 생성한다.
    SharedAccessSignature {
        key_name: String,
        shared_access_key: Secret,
        token_time_to_live: Duration,
        token_scope: TokenScope,
    },
}

impl HostCredentials {
    pub fn mode(&self) -> AuthenticationMode {
        match self {
            HostCredentials::TokenProvider(_) => AuthenticationMode::ConnectionString,
            HostCredentials::SharedAccessSignature { .. } => AuthenticationMode::SharedAccessKey,
        }
    }

    /// SAS 파라미터를 실제 토큰 공급자로 만든다.
    pub fn token_provider(&self) -> TokenProvider {
        match self {
            HostCredentials::TokenProvider(provider) => provider.clone(),
            HostCredentials::SharedAccessSignature {
                key_name,
                shared_access_key,
                token_time_to_live,
                token_scope,
            } => TokenProvider::shared_access_key(
                key_name.clone(),
                shared_access_key.clone(),
                *token_time_to_live,
                *token_scope,
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub min_backoff: Duration,
    pub max_backoff: Duration,
    pub limit: u32,
}

/// 호스트 구성기에 전달되는 (주소, 자격 증명 전략) 묶음.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostRegistration {
    pub service_uri: Url,
    pub credentials: HostCredentials,
    pub operation_timeout: Duration,
    pub retry_policy: RetryPolicy,
    pub transport_type: TransportType,
    pub amqp: EffectiveAmqpTransport,
}

impl HostRegistration {
    /// `HostSettings`를 소비해 등록 정보로 바꾼다. 이후 설정 객체는 보관하지 않는다.
    pub fn from_settings(
        settings: HostSettings,
        service_uri: Url,
        amqp: EffectiveAmqpTransport,
    ) -> Self {
        let credentials = match settings.authentication {
            HostAuthentication::ConnectionString { token_provider } => {
                HostCredentials::TokenProvider(token_provider)
            }
            HostAuthentication::SharedAccessKey {
                key_name,
                shared_access_key,
            } => HostCredentials::SharedAccessSignature {
                key_name,
                shared_access_key,
                token_time_to_live: settings.token_time_to_live,
                token_scope: settings.token_scope,
            },
        };

        Self {
            service_uri,
            credentials,
            operation_timeout: settings.operation_timeout,
            retry_policy: RetryPolicy {
                min_backoff: settings.retry_min_backoff,
                max_backoff: settings.retry_max_backoff,
                limit: settings.retry_limit,
            },
            transport_type: settings.transport_type,
            amqp,
        }
    }
}

/// 등록된 호스트 식별자.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostHandle {
    index: usize,
    address: Url,
}

impl HostHandle {
    pub fn new(index: usize, address: Url) -> Self {
        Self { index, address }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn address(&self) -> &Url {
        &self.address
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReceiveEndpointDefinition {
    pub queue_name: String,
    pub prefetch_count: Option<u16>,
    pub max_concurrent_calls: Option<u16>,
    pub consumers: Vec<String>,
}

/// 수신 엔드포인트 선언 빌더.
pub struct ReceiveEndpointConfigurator {
    definition: ReceiveEndpointDefinition,
}

impl ReceiveEndpointConfigurator {
    pub fn prefetch_count(&mut self, count: u16) -> &mut Self {
        self.definition.prefetch_count = Some(count);
        self
    }

    pub fn max_concurrent_calls(&mut self, calls: u16) -> &mut Self {
        self.definition.max_concurrent_calls = Some(calls);
        self
    }

    pub fn consumer(&mut self, name: impl Into<String>) -> &mut Self {
        self.definition.consumers.push(name.into());
        self
    }
}

/// 등록된 호스트에 묶인 서비스 구성 컨텍스트.
/// 호출자는 여기서 자신의 메시지 처리 토폴로지를 선언한다.
pub struct ServiceConfigurator<'a> {
    bus: &'a mut dyn BusFactoryConfigurator,
    host: HostHandle,
}

impl<'a> ServiceConfigurator<'a> {
    pub fn new(bus: &'a mut dyn BusFactoryConfigurator, host: HostHandle) -> Self {
        Self { bus, host }
    }

    pub fn host(&self) -> &HostHandle {
        &self.host
    }

    pub fn receive_endpoint<F>(&mut self, queue_name: &str, configure: F) -> Result<()>
    where
        F: FnOnce(&mut ReceiveEndpointConfigurator),
    {
        let queue_name = queue_name.trim();
        if queue_name.is_empty() {
            bail!("receive endpoint queue name is empty");
        }

        let mut endpoint = ReceiveEndpointConfigurator {
            definition: ReceiveEndpointDefinition {
                queue_name: queue_name.to_string(),
                ..Default::default()
            },
        };
        configure(&mut endpoint);

        self.bus.receive_endpoint(&self.host, endpoint.definition)
    }
}

/// 버스 상태 진단 결과.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BusProbe {
    pub address: Option<String>,
    pub state: String,
    pub hosts: Vec<HostProbe>,
    pub receive_endpoints: Vec<ReceiveEndpointProbe>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostProbe {
    pub address: String,
    pub authentication_mode: AuthenticationMode,
    pub transport_type: TransportType,
    pub operation_timeout_ms: u64,
    pub retry_limit: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiveEndpointProbe {
    pub host: String,
    pub queue_name: String,
    pub input_address: String,
    pub prefetch_count: Option<u16>,
    pub max_concurrent_calls: Option<u16>,
    pub consumers: Vec<String>,
}
