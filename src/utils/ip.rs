//! 客户端 IP 解析
//!
//! 优先取 `X-Forwarded-For` 的第一个地址，其次取连接对端地址。

pub const FORWARDED_FOR: &str = "x-forwarded-for";

/// 取逗号分隔列表中的第一个地址（去空白，空则视为缺失）
pub fn first_forwarded_ip(header: &str) -> Option<String> {
    header
        .split(',')
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub fn resolve_client_ip(forwarded_for: Option<&str>, peer_ip: Option<&str>) -> Option<String> {
    forwarded_for
        .and_then(first_forwarded_ip)
        .or_else(|| peer_ip.map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_forwarded_ip() {
        assert_eq!(
            first_forwarded_ip("203.0.113.7, 10.0.0.1").as_deref(),
            Some("203.0.113.7")
        );
        assert_eq!(first_forwarded_ip("  198.51.100.2 ").as_deref(), Some("198.51.100.2"));
        assert_eq!(first_forwarded_ip(""), None);
        assert_eq!(first_forwarded_ip(" ,10.0.0.1"), None);
    }

    #[test]
    fn test_forwarded_header_wins_over_peer() {
        assert_eq!(
            resolve_client_ip(Some("203.0.113.7, 10.0.0.1"), Some("127.0.0.1")).as_deref(),
            Some("203.0.113.7")
        );
    }

    #[test]
    fn test_falls_back_to_peer() {
        assert_eq!(
            resolve_client_ip(None, Some("192.0.2.10")).as_deref(),
            Some("192.0.2.10")
        );
        assert_eq!(
            resolve_client_ip(Some(" "), Some("192.0.2.10")).as_deref(),
            Some("192.0.2.10")
        );
        assert_eq!(resolve_client_ip(None, None), None);
    }
}
