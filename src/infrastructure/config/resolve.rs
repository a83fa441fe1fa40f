//! 설정의 비밀값 간접 참조(`*_env`)를 실제 런타임 값으로 해석한다.
//!
//! - 환경변수 접근은 인프라 계층에서만, 스냅샷 생성 시 한 번 수행한다.

use std::env;

use crate::domain::settings::{RawServiceSettings, non_blank};

/// 인라인 값이 비어 있을 때만 환경변수 값으로 채운다.
pub fn resolve_secrets(raw: &RawServiceSettings) -> RawServiceSettings {
    resolve_secrets_with(raw, |name| env::var(name).ok())
}

pub fn resolve_secrets_with<F>(raw: &RawServiceSettings, lookup: F) -> RawServiceSettings
where
    F: Fn(&str) -> Option<String>,
{
    let mut resolved = raw.clone();

    if non_blank(raw.connection_string.as_deref()).is_none()
        && let Some(value) = lookup_env(raw.connection_string_env.as_deref(), &lookup)
    {
        resolved.connection_string = Some(value);
    }

    if non_blank(raw.shared_access_key.as_deref()).is_none()
        && let Some(value) = lookup_env(raw.shared_access_key_env.as_deref(), &lookup)
    {
        resolved.shared_access_key = Some(value);
    }

    resolved
}

/// 진단 출력용 출처 라벨(`inline`, `env:NAME`, `env:NAME (missing)`).
pub fn secret_source_label<F>(inline: Option<&str>, env_name: Option<&str>, lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    if non_blank(inline).is_some() {
        return Some("inline".to_string());
    }
    non_blank(env_name).map(|name| {
        if lookup_env(Some(name), &lookup).is_some() {
            format!("env:{name}")
        } else {
            format!("env:{name} (missing)")
        }
    })
}

fn lookup_env<F>(env_name: Option<&str>, lookup: &F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    let name = non_blank(env_name)?;
    lookup(name).filter(|v| !v.trim().is_empty())
}
