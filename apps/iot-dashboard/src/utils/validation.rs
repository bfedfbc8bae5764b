//! 查询参数验证辅助函数
//!
//! - normalize_required：必填参数，去除空格并检查非空
//! - normalize_filter：可选过滤条件，空字符串视为未设置（对应"全部"）
//! - normalize_limit：条数上限必须为正数

use crate::utils::response::bad_request_error;
use axum::response::Response;

/// 验证必填参数，去除空格并检查非空
pub fn normalize_required(value: Option<String>, field: &str) -> Result<String, Response> {
    match value.as_deref().map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => Ok(trimmed.to_string()),
        _ => Err(bad_request_error(format!("{field} required"))),
    }
}

/// 可选过滤条件：去除空格，空值视为不过滤
pub fn normalize_filter(value: Option<String>) -> Option<String> {
    let trimmed = value?.trim().to_string();
    (!trimmed.is_empty()).then_some(trimmed)
}

pub fn normalize_limit(limit: Option<usize>) -> Result<Option<usize>, Response> {
    match limit {
        Some(0) => Err(bad_request_error("limit must be positive")),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_treat_blank_as_unset() {
        assert_eq!(normalize_filter(Some("  HIGH ".to_string())), Some("HIGH".to_string()));
        assert_eq!(normalize_filter(Some("   ".to_string())), None);
        assert_eq!(normalize_filter(None), None);
    }

    #[test]
    fn required_rejects_blank() {
        assert_eq!(
            normalize_required(Some(" temp ".to_string()), "sensor").ok(),
            Some("temp".to_string())
        );
        assert!(normalize_required(Some(" ".to_string()), "sensor").is_err());
        assert!(normalize_required(None, "sensor").is_err());
        assert!(normalize_limit(Some(0)).is_err());
        assert_eq!(normalize_limit(Some(5)).ok(), Some(Some(5)));
    }
}
