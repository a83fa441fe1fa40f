//! 브로커 연결 문자열(`Key=Value;...`) 해석.
//!
//! 연결 문자열은 자기 서술적이므로 여기서는 구조만 읽고 추가 검증은 하지 않는다.
//! 주소가 없거나 URI로 해석되지 않으면 `address`는 `None`이 된다.

use std::time::Duration;

use url::Url;

use crate::domain::credentials::{Secret, TokenProvider, TokenScope};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConnectionStringDescriptor {
    pub address: Option<Url>,
    pub shared_access_key_name: Option<String>,
    pub shared_access_key: Option<Secret>,
    pub shared_access_signature: Option<Secret>,
    pub entity_path: Option<String>,
}

impl ConnectionStringDescriptor {
    /// 키 이름은 대소문자를 구분하지 않고, 값에는 `=`가 포함될 수 있다.
    pub fn parse(connection_string: &str) -> Self {
        let mut descriptor = Self::default();

        for pair in connection_string.split(';') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            let value = value.trim();
            if value.is_empty() {
                continue;
            }

            match key.trim().to_ascii_lowercase().as_str() {
                "endpoint" => descriptor.address = Url::parse(value).ok(),
                "sharedaccesskeyname" => descriptor.shared_access_key_name = Some(value.to_string()),
                "sharedaccesskey" => descriptor.shared_access_key = Some(Secret::new(value)),
                "sharedaccesssignature" => {
                    descriptor.shared_access_signature = Some(Secret::new(value))
                }
                "entitypath" => descriptor.entity_path = Some(value.to_string()),
                _ => {}
            }
        }

        descriptor
    }

    /// 키 이름+키 > 사전 발급 서명 > 익명 순으로 토큰 공급자를 고른다.
    pub fn token_provider(
        &self,
        token_time_to_live: Duration,
        token_scope: TokenScope,
    ) -> TokenProvider {
        if let (Some(key_name), Some(key)) = (&self.shared_access_key_name, &self.shared_access_key)
        {
            return TokenProvider::shared_access_key(
                key_name.clone(),
                key.clone(),
                token_time_to_live,
                token_scope,
            );
        }

        if let Some(signature) = &self.shared_access_signature {
            return TokenProvider::SharedAccessSignature {
                signature: signature.clone(),
            };
        }

        TokenProvider::Anonymous
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_endpoint_and_key_pair() {
        let descriptor = ConnectionStringDescriptor::parse(
            "Endpoint=sb://x/;SharedAccessKeyName=a;SharedAccessKey=b",
        );

        assert_eq!(descriptor.address.as_ref().map(Url::as_str), Some("sb://x/"));
        assert_eq!(descriptor.shared_access_key_name.as_deref(), Some("a"));
        assert_eq!(descriptor.shared_access_key, Some(Secret::new("b")));
        assert!(descriptor.shared_access_signature.is_none());
    }

    #[test]
    fn keys_are_case_insensitive_and_values_keep_equals_signs() {
        let descriptor = ConnectionStringDescriptor::parse(
            "endpoint=sb://contoso.servicebus.windows.net/; sharedaccesskeyname=root;SHAREDACCESSKEY=abc==;EntityPath=orders",
        );

        assert_eq!(descriptor.shared_access_key_name.as_deref(), Some("root"));
        assert_eq!(descriptor.shared_access_key, Some(Secret::new("abc==")));
        assert_eq!(descriptor.entity_path.as_deref(), Some("orders"));
    }

    #[test]
    fn missing_or_invalid_endpoint_leaves_no_address() {
        assert!(ConnectionStringDescriptor::parse("SharedAccessKeyName=a;SharedAccessKey=b")
            .address
            .is_none());
        assert!(ConnectionStringDescriptor::parse("Endpoint=not a uri").address.is_none());
    }

    #[test]
    fn key_pair_wins_over_signature() {
        let descriptor = ConnectionStringDescriptor::parse(
            "Endpoint=sb://x/;SharedAccessKeyName=a;SharedAccessKey=b;SharedAccessSignature=sig",
        );

        let provider = descriptor.token_provider(Duration::from_secs(60), TokenScope::Namespace);
        assert!(matches!(provider, TokenProvider::SharedAccessKey { ref key_name, .. } if key_name == "a"));
    }

    #[test]
    fn signature_only_yields_signature_provider() {
        let descriptor =
            ConnectionStringDescriptor::parse("Endpoint=sb://x/;SharedAccessSignature=SharedAccessSignature sr=x&sig=y");

        assert_eq!(
            descriptor.token_provider(Duration::from_secs(60), TokenScope::Namespace),
            TokenProvider::SharedAccessSignature {
                signature: Secret::new("SharedAccessSignature sr=x&sig=y"),
            }
        );
    }

    #[test]
    fn no_credentials_yields_anonymous_provider() {
        let descriptor = ConnectionStringDescriptor::parse("Endpoint=sb://x/");
        assert_eq!(
            descriptor.token_provider(Duration::from_secs(60), TokenScope::Namespace),
            TokenProvider::Anonymous
        );
    }
}
