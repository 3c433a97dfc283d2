use serde::{Deserialize, Serialize};

/// 静态配置（从 TOML 加载，启动时使用）
///
/// 包含：
/// - server: 服务器地址、端口、CPU 数量
/// - database: 数据库连接配置
/// - redirect: 扫码重定向行为（fallback、超时）
/// - scan_log: 扫码日志字段提取
/// - realtime: 实时推送通道
/// - admin: 管理 API
/// - logging: 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub redirect: RedirectConfig,
    #[serde(default)]
    pub scan_log: ScanLogConfig,
    #[serde(default)]
    pub realtime: RealtimeConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > TOML 文件 > 默认值
    /// ENV 前缀：QRLINK，分隔符：__
    /// 示例：QRLINK__SERVER__PORT=9999
    pub fn load(path: Option<&str>) -> Self {
        use config::{Config, Environment, File};

        let path = path.unwrap_or("config.toml");

        let builder = Config::builder()
            // 1. 从 TOML 文件加载（可选）
            .add_source(File::with_name(path).required(false))
            // 2. 从环境变量覆盖，前缀 QRLINK，分隔符 __
            .add_source(
                Environment::with_prefix("QRLINK")
                    .separator("__")
                    .try_parsing(true),
            );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<StaticConfig>() {
                Ok(config) => {
                    if std::path::Path::new(path).exists() {
                        eprintln!("[INFO] Configuration loaded from: {}", path);
                    }
                    config
                }
                Err(e) => {
                    eprintln!("[ERROR] Failed to deserialize config: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("[ERROR] Failed to build config: {}", e);
                Self::default()
            }
        }
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> crate::errors::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::errors::QrlinkError::serialization(e.to_string()))?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
}

/// 数据库连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_database_pool_size")]
    pub pool_size: u32,
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
    #[serde(default = "default_retry_max_delay_ms")]
    pub retry_max_delay_ms: u64,
}

/// 重定向配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedirectConfig {
    /// 扫码入口前缀，完整路径为 `{route_prefix}/{slug}`
    #[serde(default = "default_redirect_prefix")]
    pub route_prefix: String,
    /// 查询异常时的兜底跳转地址
    #[serde(default = "default_fallback_url")]
    pub fallback_url: String,
    #[serde(default = "default_lookup_timeout_ms")]
    pub lookup_timeout_ms: u64,
    /// true: 写完扫码日志再响应；false: 后台写入
    #[serde(default = "default_true")]
    pub await_scan_log: bool,
}

/// 扫码日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanLogConfig {
    #[serde(default = "default_insert_timeout_ms")]
    pub insert_timeout_ms: u64,
    #[serde(default = "default_country_header")]
    pub country_header: String,
    #[serde(default = "default_region_header")]
    pub region_header: String,
    #[serde(default = "default_city_header")]
    pub city_header: String,
}

/// 实时推送配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
    #[serde(default = "default_keepalive_secs")]
    pub keepalive_secs: u64,
    #[serde(default = "default_highlight_ms")]
    pub highlight_ms: u64,
}

/// 管理 API 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// 为空时禁用管理 API
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_admin_prefix")]
    pub route_prefix: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_true")]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions
// ============================================================

fn default_true() -> bool {
    true
}

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_database_url() -> String {
    "qrlink.db".to_string()
}

fn default_database_pool_size() -> u32 {
    10
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    100
}

fn default_retry_max_delay_ms() -> u64 {
    2000
}

fn default_redirect_prefix() -> String {
    "/qr".to_string()
}

fn default_fallback_url() -> String {
    "/".to_string()
}

fn default_lookup_timeout_ms() -> u64 {
    3000
}

fn default_insert_timeout_ms() -> u64 {
    3000
}

fn default_country_header() -> String {
    "x-vercel-ip-country".to_string()
}

fn default_region_header() -> String {
    "x-vercel-ip-country-region".to_string()
}

fn default_city_header() -> String {
    "x-vercel-ip-city".to_string()
}

fn default_channel_capacity() -> usize {
    256
}

fn default_keepalive_secs() -> u64 {
    15
}

fn default_highlight_ms() -> u64 {
    1500
}

fn default_admin_prefix() -> String {
    "/admin".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            cpu_count: default_cpu_count(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            pool_size: default_database_pool_size(),
            retry_count: default_retry_count(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            retry_max_delay_ms: default_retry_max_delay_ms(),
        }
    }
}

impl Default for RedirectConfig {
    fn default() -> Self {
        Self {
            route_prefix: default_redirect_prefix(),
            fallback_url: default_fallback_url(),
            lookup_timeout_ms: default_lookup_timeout_ms(),
            await_scan_log: true,
        }
    }
}

impl Default for ScanLogConfig {
    fn default() -> Self {
        Self {
            insert_timeout_ms: default_insert_timeout_ms(),
            country_header: default_country_header(),
            region_header: default_region_header(),
            city_header: default_city_header(),
        }
    }
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
            keepalive_secs: default_keepalive_secs(),
            highlight_ms: default_highlight_ms(),
        }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            route_prefix: default_admin_prefix(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StaticConfig::default();
        assert_eq!(config.redirect.route_prefix, "/qr");
        assert_eq!(config.redirect.fallback_url, "/");
        assert!(config.redirect.await_scan_log);
        assert_eq!(config.scan_log.country_header, "x-vercel-ip-country");
        assert_eq!(config.realtime.channel_capacity, 256);
        assert!(config.admin.token.is_empty());
    }

    #[test]
    fn test_sample_config_round_trips_through_toml() {
        let sample = StaticConfig::generate_sample_config();
        assert!(sample.contains("[redirect]"));
        let parsed: StaticConfig = toml::from_str(&sample).expect("sample must parse");
        assert_eq!(parsed.server.port, 8080);
        assert_eq!(parsed.admin.route_prefix, "/admin");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed: StaticConfig = toml::from_str(
            r#"
            [redirect]
            fallback_url = "https://example.com/home"
            "#,
        )
        .expect("partial config must parse");
        assert_eq!(parsed.redirect.fallback_url, "https://example.com/home");
        assert_eq!(parsed.redirect.lookup_timeout_ms, 3000);
        assert_eq!(parsed.database.database_url, "qrlink.db");
    }
}
