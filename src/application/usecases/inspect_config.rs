//! 버스 설정 진단 유스케이스.
//!
//! 병합된 설정을 비밀값 없이 출력하고, 두 필수 섹션으로 스냅샷을 만들 수 있는지 판정한다.

use anyhow::Result;

use crate::application::ports::{ConfigRepository, Reporter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsReadiness {
    Ready,
    /// 스냅샷을 만들 수 없는 이유(누락 섹션, 잘못된 JSON 등).
    Incomplete(String),
}

pub struct InspectConfigUseCase<'a> {
    pub config_repo: &'a dyn ConfigRepository,
    pub reporter: &'a dyn Reporter,
}

impl<'a> InspectConfigUseCase<'a> {
    /// 진단 JSON을 출력한 뒤 스냅샷 생성 가능 여부를 돌려준다.
    /// 진단 자체를 만들 수 없을 때만 `Err`를 반환한다.
    pub fn execute(&self) -> Result<SettingsReadiness> {
        let inspection = self.config_repo.inspect_pretty_json()?;
        self.reporter.section("Config");
        self.reporter.raw(&inspection);

        self.reporter.section("Snapshot");
        let readiness = match self.config_repo.load_bus_settings() {
            Ok(_) => {
                self.reporter.status("settings", "ready");
                SettingsReadiness::Ready
            }
            Err(err) => {
                self.reporter.status("settings", "error");
                self.reporter.kv("Reason", &format!("{err:#}"));
                SettingsReadiness::Incomplete(format!("{err:#}"))
            }
        };
        Ok(readiness)
    }
}
