//! 호스트 설정 해석 포트 구현.

use crate::application::ports::HostSettingsResolver;
use crate::domain::error::ConfigurationError;
use crate::domain::host::{HostSettings, resolve_host_settings};
use crate::domain::settings::RawServiceSettings;

/// 도메인 해석 규칙을 그대로 사용하는 기본 해석기.
pub struct DefaultHostSettingsResolver;

impl HostSettingsResolver for DefaultHostSettingsResolver {
    fn resolve(
        &self,
        raw: &RawServiceSettings,
        service_name: &str,
    ) -> Result<HostSettings, ConfigurationError> {
        resolve_host_settings(raw, service_name)
    }
}
