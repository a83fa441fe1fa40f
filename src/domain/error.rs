//! 호스트 설정 해석/프로비저닝 단계에서 발생하는 설정 오류.

use thiserror::Error;

/// 배포 설정이 잘못되었음을 나타내는 유일한 오류 종류.
/// 재시도 대상이 아니며 호출자에게 그대로 전파된다.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("The {section} settings were not available")]
    MissingSection { section: String },

    #[error("The ServiceBus Namespace setting has not been configured")]
    MissingNamespace,

    #[error("The ServiceBus KeyName setting has not been configured")]
    MissingKeyName,

    #[error("The ServiceBus SharedAccessKey setting has not been configured")]
    MissingSharedAccessKey,

    #[error("The ServiceBus ServiceUri setting has not been configured")]
    MissingServiceUri,

    #[error("The ServiceBus Namespace setting is not a valid host name: {namespace}")]
    InvalidNamespace { namespace: String },
}

impl ConfigurationError {
    pub fn missing_section(section: &str) -> Self {
        Self::MissingSection {
            section: section.to_string(),
        }
    }
}
