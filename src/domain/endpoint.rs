//! 네임스페이스 + 서비스 경로로 정규 서비스 주소(`sb://...`)를 만든다.

use url::Url;

use crate::domain::error::ConfigurationError;

pub const SERVICE_BUS_SCHEME: &str = "sb";
pub const SERVICE_BUS_HOST_SUFFIX: &str = "servicebus.windows.net";

/// `sb://{namespace}.servicebus.windows.net/{path}`.
/// 이미 `.`을 포함한 네임스페이스는 완전한 호스트 이름으로 간주한다.
pub fn service_uri(namespace: &str, service_path: &str) -> Result<Url, ConfigurationError> {
    let namespace = namespace.trim().to_lowercase();
    let host = if namespace.contains('.') {
        namespace.clone()
    } else {
        format!("{namespace}.{SERVICE_BUS_HOST_SUFFIX}")
    };

    let invalid = || ConfigurationError::InvalidNamespace {
        namespace: namespace.clone(),
    };

    let mut uri = Url::parse(&format!("{SERVICE_BUS_SCHEME}://{host}/")).map_err(|_| invalid())?;
    // 경로/포트/사용자 정보가 섞여 들어온 네임스페이스를 걸러낸다.
    if uri.host_str() != Some(host.as_str()) || uri.path() != "/" {
        return Err(invalid());
    }

    let path = service_path.trim().trim_matches('/');
    if !path.is_empty() {
        uri.set_path(path);
    }
    Ok(uri)
}
