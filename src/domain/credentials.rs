//! Shared Access Signature(SAS) 자격 증명과 토큰 발급.
//!
//! 연결 문자열에서 파생된 자격 증명과 키 기반 자격 증명을 같은 `TokenProvider`로 표현한다.

use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;
use url::Url;

const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// 로그/디버그 출력에 노출되면 안 되는 비밀 값.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// 서명 대상 범위. `Namespace`는 네임스페이스 루트, `Entity`는 전체 audience를 서명한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenScope {
    #[default]
    Namespace,
    Entity,
}

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("system clock is before the unix epoch")]
    ClockBeforeEpoch,
    #[error("token expiry overflows: ttl {0:?}")]
    ExpiryOverflow(Duration),
    #[error("shared access key cannot be used as a signing key")]
    InvalidKey,
}

/// 브로커에 제시할 보안 토큰.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityToken {
    pub value: Secret,
    pub audience: String,
    /// 만료 시각(unix epoch 초). 사전 발급된 서명은 알 수 없으므로 None.
    pub expires_at: Option<u64>,
}

/// 토큰 발급 전략.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenProvider {
    /// 키 이름/키로 요청 시점마다 SAS 토큰을 서명한다.
    SharedAccessKey {
        key_name: String,
        shared_access_key: Secret,
        token_time_to_live: Duration,
        token_scope: TokenScope,
    },
    /// 연결 문자열에 포함된 사전 발급 서명.
    SharedAccessSignature { signature: Secret },
    /// 자격 증명이 없는 연결 문자열.
    Anonymous,
}

impl TokenProvider {
    pub fn shared_access_key(
        key_name: impl Into<String>,
        shared_access_key: Secret,
        token_time_to_live: Duration,
        token_scope: TokenScope,
    ) -> Self {
        Self::SharedAccessKey {
            key_name: key_name.into(),
            shared_access_key,
            token_time_to_live,
            token_scope,
        }
    }

    /// `audience`에 대한 토큰을 발급한다. 익명 공급자는 `None`을 반환한다.
    pub fn get_token(
        &self,
        audience: &Url,
        now: SystemTime,
    ) -> Result<Option<SecurityToken>, CredentialError> {
        match self {
            TokenProvider::SharedAccessKey {
                key_name,
                shared_access_key,
                token_time_to_live,
                token_scope,
            } => {
                let resource = signing_resource(audience, *token_scope);
                let expiry = now
                    .duration_since(UNIX_EPOCH)
                    .map_err(|_| CredentialError::ClockBeforeEpoch)?
                    .as_secs()
                    .checked_add(token_time_to_live.as_secs())
                    .ok_or(CredentialError::ExpiryOverflow(*token_time_to_live))?;
                let value = build_signature(key_name, shared_access_key, &resource, expiry)?;

                Ok(Some(SecurityToken {
                    value: Secret::new(value),
                    audience: resource,
                    expires_at: Some(expiry),
                }))
            }
            TokenProvider::SharedAccessSignature { signature } => Ok(Some(SecurityToken {
                value: signature.clone(),
                audience: audience.as_str().to_string(),
                expires_at: None,
            })),
            TokenProvider::Anonymous => Ok(None),
        }
    }
}

fn signing_resource(audience: &Url, scope: TokenScope) -> String {
    match scope {
        TokenScope::Namespace => match audience.host_str() {
            Some(host) => format!("{}://{}/", audience.scheme(), host),
            None => audience.as_str().to_string(),
        },
        TokenScope::Entity => audience.as_str().to_string(),
    }
    .to_lowercase()
}

fn build_signature(
    key_name: &str,
    key: &Secret,
    resource: &str,
    expiry: u64,
) -> Result<String, CredentialError> {
    let encoded_resource = utf8_percent_encode(resource, COMPONENT).to_string();
    let string_to_sign = format!("{encoded_resource}\n{expiry}");

    let mut mac = Hmac::<Sha256>::new_from_slice(key.expose().as_bytes())
        .map_err(|_| CredentialError::InvalidKey)?;
    mac.update(string_to_sign.as_bytes());
    let signature = STANDARD.encode(mac.finalize().into_bytes());

    Ok(format!(
        "SharedAccessSignature sr={}&sig={}&se={}&skn={}",
        encoded_resource,
        utf8_percent_encode(&signature, COMPONENT),
        expiry,
        utf8_percent_encode(key_name, COMPONENT)
    ))
}
