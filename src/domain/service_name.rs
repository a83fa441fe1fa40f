//! 논리 서비스 이름 정규화.

/// 소문자화 → 앞뒤 공백 제거 → 내부 공백을 `_`로 치환한다.
pub fn normalize_service_name(service_name: &str) -> String {
    service_name.to_lowercase().trim().replace(' ', "_")
}
