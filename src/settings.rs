//! 适配器配置
//!
//! 显式字段 + 严格校验：配置从JSON解析时未知键直接报错，
//! 不做按名称动态赋值。优先级：调用方显式配置 > 进程级默认 > 内置默认。

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::error::{AdapterError, Result};

pub const DEFAULT_ENDPOINT: &str = "s3.amazonaws.com";
pub const DEFAULT_REGION: &str = "us-east-1";

/// Complete adapter settings / 完整配置（构造后不可变）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Settings {
    /// Access Key ID
    pub access_key: String,
    /// Secret Access Key
    pub secret_key: String,
    /// 存储桶名称（构造时可为空，任何远程操作前必须非空）
    #[serde(default)]
    pub bucket: String,
    /// 端点主机，默认AWS官方端点；自建MinIO等填自己的域名
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// 是否走HTTPS
    #[serde(default = "default_use_ssl")]
    pub use_ssl: bool,
    /// SigV4签名区域
    #[serde(default = "default_region")]
    pub region: String,
    /// 强制路径风格（URL为 endpoint/bucket/key 形式）
    #[serde(default = "default_path_style")]
    pub force_path_style: bool,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_use_ssl() -> bool {
    true
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

fn default_path_style() -> bool {
    true
}

impl S3Settings {
    /// 校验硬前置条件：密钥必须非空
    pub fn validate(&self) -> Result<()> {
        if self.access_key.is_empty() || self.secret_key.is_empty() {
            return Err(AdapterError::Config("S3密钥未配置，无法连接".to_string()));
        }
        Ok(())
    }
}

/// Partial settings overlay / 部分配置（所有字段可选，用于合并）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartialSettings {
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub bucket: Option<String>,
    pub endpoint: Option<String>,
    pub use_ssl: Option<bool>,
    pub region: Option<String>,
    pub force_path_style: Option<bool>,
}

static PROCESS_DEFAULTS: OnceCell<PartialSettings> = OnceCell::new();

/// 设置进程级默认配置，整个进程只能设置一次
pub fn set_process_defaults(defaults: PartialSettings) -> Result<()> {
    PROCESS_DEFAULTS
        .set(defaults)
        .map_err(|_| AdapterError::Config("进程级默认配置已设置，不能重复设置".to_string()))
}

fn process_defaults() -> PartialSettings {
    PROCESS_DEFAULTS.get().cloned().unwrap_or_default()
}

impl PartialSettings {
    /// 从JSON值严格解析，未知键报错
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value)
            .map_err(|e| AdapterError::Config(format!("配置解析失败: {}", e)))
    }

    /// 逐字段覆盖：self优先，缺失的字段取fallback
    fn overlay(self, fallback: PartialSettings) -> PartialSettings {
        PartialSettings {
            access_key: self.access_key.or(fallback.access_key),
            secret_key: self.secret_key.or(fallback.secret_key),
            bucket: self.bucket.or(fallback.bucket),
            endpoint: self.endpoint.or(fallback.endpoint),
            use_ssl: self.use_ssl.or(fallback.use_ssl),
            region: self.region.or(fallback.region),
            force_path_style: self.force_path_style.or(fallback.force_path_style),
        }
    }

    /// 合并进程级默认值并校验，得到完整配置
    pub fn resolve(self) -> Result<S3Settings> {
        let merged = self.overlay(process_defaults());

        let access_key = merged.access_key.unwrap_or_default();
        let secret_key = merged.secret_key.unwrap_or_default();
        if access_key.is_empty() || secret_key.is_empty() {
            return Err(AdapterError::Config("S3密钥未配置，无法连接".to_string()));
        }

        Ok(S3Settings {
            access_key,
            secret_key,
            bucket: merged.bucket.unwrap_or_default(),
            endpoint: merged
                .endpoint
                .filter(|e| !e.is_empty())
                .unwrap_or_else(default_endpoint),
            use_ssl: merged.use_ssl.unwrap_or_else(default_use_ssl),
            region: merged
                .region
                .filter(|r| !r.is_empty())
                .unwrap_or_else(default_region),
            force_path_style: merged.force_path_style.unwrap_or_else(default_path_style),
        })
    }
}
