//! `provision` 명령 실행 흐름.

use anyhow::Result;

use crate::application::config::BusSettings;
use crate::domain::service_name::normalize_service_name;
use crate::interface::cli::ProvisionOptions;
use crate::interface::composition::AppComposition;

/// 버스를 구성하고 진단 결과를 출력한다. `--start`면 시작/중지 생명주기까지 수행한다.
pub async fn run_provision(
    composition: &AppComposition,
    settings: &BusSettings,
    options: ProvisionOptions,
) -> Result<()> {
    let reporter = composition.reporter();
    reporter.section("Provision");
    reporter.kv("Service", &options.service_name);

    let queues = if options.queues.is_empty() {
        vec![normalize_service_name(&options.service_name)]
    } else {
        options.queues.clone()
    };

    let bus = composition
        .provision_bus_usecase(settings)
        .execute(&options.service_name, |service| {
            for queue in &queues {
                service.receive_endpoint(queue, |endpoint| {
                    if let Some(count) = options.prefetch_count {
                        endpoint.prefetch_count(count);
                    }
                })?;
            }
            Ok(())
        })?;

    if let Some(address) = bus.address() {
        reporter.kv("Address", address.as_str());
    }
    reporter.kv("Endpoints", &queues.join(", "));

    if options.start {
        reporter.section("Lifecycle");
        reporter.status("bus", "starting");
        bus.start().await?;
        reporter.status("bus", "started");
        reporter.status("bus", "stopping");
        bus.stop().await?;
        reporter.status("bus", "stopped");
    }

    reporter.section("Probe");
    reporter.raw(&serde_json::to_string_pretty(&bus.probe())?);
    Ok(())
}
