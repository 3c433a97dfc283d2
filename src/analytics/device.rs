use serde::Serialize;
use strum::{AsRefStr, EnumIter};

/// 基于 User-Agent 子串的粗粒度设备分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, AsRefStr, EnumIter)]
pub enum DeviceClass {
    #[strum(serialize = "iOS")]
    #[serde(rename = "iOS")]
    Ios,
    Android,
    Windows,
    #[strum(serialize = "macOS")]
    #[serde(rename = "macOS")]
    MacOs,
    Linux,
    Outro,
    Desconhecido,
}

/// 按顺序匹配，先命中者优先（Android UA 同时包含 Linux）
const RULES: &[(DeviceClass, &[&str])] = &[
    (DeviceClass::Ios, &["iPhone", "iPad", "iPod"]),
    (DeviceClass::Android, &["Android"]),
    (DeviceClass::Windows, &["Windows"]),
    (DeviceClass::MacOs, &["Macintosh", "Mac OS"]),
    (DeviceClass::Linux, &["Linux"]),
];

impl DeviceClass {
    pub fn label(&self) -> &str {
        self.as_ref()
    }
}

impl std::fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_ref())
    }
}

pub fn classify_user_agent(user_agent: Option<&str>) -> DeviceClass {
    let ua = match user_agent.map(str::trim) {
        Some(ua) if !ua.is_empty() => ua,
        _ => return DeviceClass::Desconhecido,
    };

    RULES
        .iter()
        .find(|(_, needles)| needles.iter().any(|n| ua.contains(n)))
        .map(|(class, _)| *class)
        .unwrap_or(DeviceClass::Outro)
}
