//! 메모리 내 버스 제어 핸들.

use std::sync::Mutex;
use std::time::SystemTime;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use tracing::info;
use url::Url;

use super::BusTopology;
use crate::application::bus::{BusProbe, HostProbe, ReceiveEndpointProbe};
use crate::application::ports::BusControl;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BusState {
    Created,
    Started,
    Stopped,
}

impl BusState {
    fn label(self) -> &'static str {
        match self {
            BusState::Created => "created",
            BusState::Started => "started",
            BusState::Stopped => "stopped",
        }
    }
}

pub struct InMemoryBusControl {
    topology: BusTopology,
    address: Option<Url>,
    state: Mutex<BusState>,
}

impl InMemoryBusControl {
    pub(crate) fn new(topology: BusTopology) -> Self {
        let address = topology.hosts.first().map(|h| h.service_uri.clone());
        Self {
            topology,
            address,
            state: Mutex::new(BusState::Created),
        }
    }

    pub fn topology(&self) -> &BusTopology {
        &self.topology
    }

    fn lock_state(&self) -> Result<std::sync::MutexGuard<'_, BusState>> {
        self.state
            .lock()
            .map_err(|_| anyhow!("bus state lock poisoned"))
    }
}

#[async_trait]
impl BusControl for InMemoryBusControl {
    fn address(&self) -> Option<&Url> {
        self.address.as_ref()
    }

    fn probe(&self) -> BusProbe {
        let state = self
            .state
            .lock()
            .map(|s| s.label())
            .unwrap_or("poisoned");

        BusProbe {
            address: self.address.as_ref().map(Url::to_string),
            state: state.to_string(),
            hosts: self
                .topology
                .hosts
                .iter()
                .map(|h| HostProbe {
                    address: h.service_uri.to_string(),
                    authentication_mode: h.credentials.mode(),
                    transport_type: h.transport_type,
                    operation_timeout_ms: h.operation_timeout.as_millis() as u64,
                    retry_limit: h.retry_policy.limit,
                })
                .collect(),
            receive_endpoints: self
                .topology
                .endpoints
                .iter()
                .filter_map(|(idx, e)| {
                    let host = self.topology.hosts.get(*idx)?;
                    Some(ReceiveEndpointProbe {
                        host: host.service_uri.to_string(),
                        queue_name: e.queue_name.clone(),
                        input_address: input_address(&host.service_uri, &e.queue_name),
                        prefetch_count: e.prefetch_count,
                        max_concurrent_calls: e.max_concurrent_calls,
                        consumers: e.consumers.clone(),
                    })
                })
                .collect(),
        }
    }

    /// 각 호스트 자격 증명으로 토큰 발급이 가능한지 확인한 뒤 시작 상태로 전환한다.
    async fn start(&self) -> Result<()> {
        let mut state = self.lock_state()?;
        if *state == BusState::Started {
            return Ok(());
        }

        let now = SystemTime::now();
        for host in &self.topology.hosts {
            host.credentials
                .token_provider()
                .get_token(&host.service_uri, now)
                .with_context(|| format!("failed to issue token for {}", host.service_uri))?;
        }

        *state = BusState::Started;
        info!(
            address = self.address.as_ref().map(Url::as_str).unwrap_or("-"),
            endpoints = self.topology.endpoints.len(),
            "bus started"
        );
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        let mut state = self.lock_state()?;
        if *state != BusState::Started {
            return Ok(());
        }

        *state = BusState::Stopped;
        info!(
            address = self.address.as_ref().map(Url::as_str).unwrap_or("-"),
            "bus stopped"
        );
        Ok(())
    }
}

/// 호스트 주소 하위에 큐 이름을 붙인 입력 주소.
fn input_address(host: &Url, queue_name: &str) -> String {
    let base = host.as_str().trim_end_matches('/');
    format!("{base}/{queue_name}")
}
