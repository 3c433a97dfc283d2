pub mod ip;
pub mod slug;
pub mod url_validator;

/// 百分号解码，空串（或解码后全空白）视为缺失
///
/// 解码失败时保留原值，平台头偶尔会带未编码的字符。
pub fn decode_non_empty(raw: &str) -> Option<String> {
    let decoded = urlencoding::decode(raw)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| raw.to_string());
    let trimmed = decoded.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
