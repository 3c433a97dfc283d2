//! slug 规则：非空，仅 ASCII 字母、数字和 `-`，大小写不敏感（统一小写存储）

/// 新建或修改链接时允许的 slug 最大长度
pub const MAX_SLUG_LENGTH: usize = 128;

/// 只检查字符集，不限制长度；超长 slug 查询时按未命中处理
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty() && slug.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// 可写入存储的 slug：字符集合法且不超过列宽
pub fn is_storable_slug(slug: &str) -> bool {
    is_valid_slug(slug) && slug.len() <= MAX_SLUG_LENGTH
}

/// 归一化为小写
pub fn normalize_slug(slug: &str) -> String {
    slug.to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_slugs() {
        assert!(is_valid_slug("promo-2024"));
        assert!(is_valid_slug("ABC"));
        assert!(is_valid_slug("a"));
        assert!(is_valid_slug(&"x".repeat(MAX_SLUG_LENGTH + 1)));
    }

    #[test]
    fn test_invalid_slugs() {
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("bad_slug!"));
        assert!(!is_valid_slug("under_score"));
        assert!(!is_valid_slug("with space"));
        assert!(!is_valid_slug("a/b"));
        assert!(!is_valid_slug("ção"));
    }

    #[test]
    fn test_storable_length_cap() {
        assert!(is_storable_slug(&"x".repeat(MAX_SLUG_LENGTH)));
        assert!(!is_storable_slug(&"x".repeat(MAX_SLUG_LENGTH + 1)));
        assert!(!is_storable_slug("bad_slug"));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_slug("Promo-2024"), "promo-2024");
    }
}
