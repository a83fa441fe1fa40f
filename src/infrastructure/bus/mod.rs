//! 메모리 내 버스 빌더 구현.
//!
//! 호스트 등록과 수신 엔드포인트 선언을 기록해 두고, 실제 소켓은 열지 않는다.

mod control;

use anyhow::{Result, bail};

use crate::application::bus::{HostHandle, HostRegistration, ReceiveEndpointDefinition};
use crate::application::ports::{BusControl, BusFactory, BusFactoryConfigurator, ConfigureBus};

pub use control::InMemoryBusControl;

/// 구성 콜백이 선언한 토폴로지.
#[derive(Debug, Clone, Default)]
pub struct BusTopology {
    pub hosts: Vec<HostRegistration>,
    /// (호스트 인덱스, 엔드포인트 정의)
    pub endpoints: Vec<(usize, ReceiveEndpointDefinition)>,
}

#[derive(Debug, Default)]
pub struct InMemoryBusFactory;

impl BusFactory for InMemoryBusFactory {
    fn create(&self, configure: ConfigureBus<'_>) -> Result<Box<dyn BusControl>> {
        let mut topology = BusTopology::default();
        configure(&mut topology)?;

        if topology.hosts.is_empty() {
            bail!("no host was configured for the bus");
        }

        Ok(Box::new(InMemoryBusControl::new(topology)))
    }
}

impl BusFactoryConfigurator for BusTopology {
    fn host(&mut self, registration: HostRegistration) -> Result<HostHandle> {
        if self
            .hosts
            .iter()
            .any(|h| h.service_uri == registration.service_uri)
        {
            bail!("host already configured: {}", registration.service_uri);
        }

        let handle = HostHandle::new(self.hosts.len(), registration.service_uri.clone());
        self.hosts.push(registration);
        Ok(handle)
    }

    fn receive_endpoint(
        &mut self,
        host: &HostHandle,
        definition: ReceiveEndpointDefinition,
    ) -> Result<()> {
        let Some(registered) = self.hosts.get(host.index()) else {
            bail!(
                "receive endpoint {} declared for unknown host {}",
                definition.queue_name,
                host.address()
            );
        };
        if &registered.service_uri != host.address() {
            bail!(
                "receive endpoint {} declared for unknown host {}",
                definition.queue_name,
                host.address()
            );
        }

        if self
            .endpoints
            .iter()
            .any(|(idx, e)| *idx == host.index() && e.queue_name == definition.queue_name)
        {
            bail!("receive endpoint already declared: {}", definition.queue_name);
        }

        self.endpoints.push((host.index(), definition));
        Ok(())
    }
}
