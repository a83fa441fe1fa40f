//! Domain layer
//! 호스트 설정 해석 규칙(검증/기본값/주소 파생/자격 증명)을 외부 의존성 없이 표현한다.

pub mod connection_string;
pub mod credentials;
pub mod endpoint;
pub mod error;
pub mod host;
pub mod service_name;
pub mod settings;
