//! S3存储适配器
//!
//! 面向Web后端控制器的薄封装：读取配置、转发到对象存储客户端、
//! 把结果整理成固定结构。每个操作就是一次阻塞等待的客户端调用，
//! 没有重试、分页和流式传输。

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use bytes::Bytes;
use url::Url;

use crate::acl::Acl;
use crate::client::{ObjectClient, RustS3Client};
use crate::error::{AdapterError, Result, Sentinel};
use crate::models::{ObjectDescriptor, ObjectEntry, ObjectMeta};
use crate::settings::{PartialSettings, S3Settings};
use crate::utils;

/// 预签名URL默认有效期（秒）
pub const DEFAULT_AUTH_URL_LIFETIME: u32 = 60;

/// S3 storage adapter / S3存储适配器
///
/// 配置在构造后不可变；[`with_bucket`](S3Adapter::with_bucket)返回
/// 指向另一个桶的新实例，而不是修改自身。
#[derive(Clone)]
pub struct S3Adapter {
    settings: S3Settings,
    client: Arc<dyn ObjectClient>,
}

impl S3Adapter {
    /// 从完整配置创建适配器，密钥缺失直接报错
    pub fn new(settings: S3Settings) -> Result<Self> {
        settings.validate()?;
        let client = Arc::new(RustS3Client::new(settings.clone()));
        Ok(Self { settings, client })
    }

    /// 从部分配置创建（合并进程级默认值）
    pub fn from_partial(partial: PartialSettings) -> Result<Self> {
        Self::new(partial.resolve()?)
    }

    /// 从JSON配置创建，未知键报错
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Self::from_partial(PartialSettings::from_value(value)?)
    }

    /// 注入自定义客户端（测试mock等）
    pub fn with_client(settings: S3Settings, client: Arc<dyn ObjectClient>) -> Result<Self> {
        settings.validate()?;
        Ok(Self { settings, client })
    }

    /// 当前桶名
    pub fn bucket(&self) -> &str {
        &self.settings.bucket
    }

    /// 返回指向另一个桶的新适配器，共享底层客户端
    pub fn with_bucket(&self, bucket: impl Into<String>) -> Self {
        let mut settings = self.settings.clone();
        settings.bucket = bucket.into();
        Self {
            settings,
            client: Arc::clone(&self.client),
        }
    }

    /// 按符号名查ACL（private / public_read / public_read_write / authenticated_read）
    pub fn permission(name: &str) -> Result<Acl> {
        Acl::from_str(name)
    }

    fn require_bucket(&self) -> Result<&str> {
        if self.settings.bucket.is_empty() {
            return Err(AdapterError::Config("未配置存储桶名称".to_string()));
        }
        Ok(&self.settings.bucket)
    }

    /// 列出整个桶的内容
    pub async fn list_bucket_contents(&self) -> Result<Vec<ObjectEntry>> {
        let bucket = self.require_bucket()?;
        self.client.list_bucket(bucket).await
    }

    /// 旧版兼容：任何失败都返回空列表
    pub async fn list_bucket_contents_or_empty(&self) -> Vec<ObjectEntry> {
        self.list_bucket_contents().await.sentinel().unwrap_or_default()
    }

    /// 列出"文件夹"内容
    ///
    /// S3没有真实目录，这里按目录前缀过滤整桶列表：只保留key的目录
    /// 部分加"/"恰好等于folder的条目，子目录和桶根的条目都排除。
    pub async fn list_folder_contents(&self, folder: &str) -> Result<Vec<ObjectEntry>> {
        let contents = self.list_bucket_contents().await?;
        Ok(contents
            .into_iter()
            .filter(|entry| utils::key_dir(&entry.name) == folder)
            .collect())
    }

    /// 旧版兼容：任何失败都返回空列表
    pub async fn list_folder_contents_or_empty(&self, folder: &str) -> Vec<ObjectEntry> {
        self.list_folder_contents(folder).await.sentinel().unwrap_or_default()
    }

    /// 上传本地文件到当前桶的key位置
    ///
    /// mime为None时按key后缀自动识别。成功后回读对象大小，
    /// 返回 {name, url, size} 描述。
    pub async fn put_object(
        &self,
        local: impl AsRef<Path>,
        key: &str,
        acl: Acl,
        mime: Option<&str>,
    ) -> Result<ObjectDescriptor> {
        let bucket = self.require_bucket()?;
        self.client
            .put_object(local.as_ref(), bucket, key, acl, mime)
            .await?;
        let info = self.client.object_info(bucket, key).await?;
        Ok(self.descriptor(bucket, key, info.size))
    }

    /// 创建"文件夹"：上传一个key以"/"结尾的零字节占位对象
    ///
    /// destination为None或"/"时在桶根创建。文件夹名为空在任何网络
    /// 调用之前报错。占位用的本地临时文件离开作用域必定删除。
    pub async fn create_folder(
        &self,
        destination: Option<&str>,
        folder_name: &str,
        acl: Acl,
    ) -> Result<ObjectDescriptor> {
        if folder_name.is_empty() {
            return Err(AdapterError::MissingArgument("folder_name"));
        }

        let prefix = match destination {
            Some(d) if !d.is_empty() && d != "/" => format!("{}/", d.trim_matches('/')),
            _ => String::new(),
        };
        let key = format!("{}{}/", prefix, folder_name.trim_matches('/'));

        let marker = tempfile::NamedTempFile::new()?;
        self.put_object(marker.path(), &key, acl, None).await
    }

    /// 复制对象，源桶与目标桶默认都是当前配置桶
    ///
    /// 返回的描述指向目标桶里的新对象。
    pub async fn copy_object(
        &self,
        src_key: &str,
        dst_key: &str,
        src_bucket: Option<&str>,
        dst_bucket: Option<&str>,
        acl: Acl,
        mime: Option<&str>,
    ) -> Result<ObjectDescriptor> {
        let configured = self.require_bucket()?;
        let src_bucket = src_bucket.filter(|b| !b.is_empty()).unwrap_or(configured);
        let dst_bucket = dst_bucket.filter(|b| !b.is_empty()).unwrap_or(configured);

        self.client
            .copy_object(src_bucket, src_key, dst_bucket, dst_key, acl, mime)
            .await?;
        let info = self.client.object_info(dst_bucket, dst_key).await?;
        Ok(self.descriptor(dst_bucket, dst_key, info.size))
    }

    /// 获取对象元数据（HEAD）
    pub async fn object_info(&self, key: &str) -> Result<ObjectMeta> {
        let bucket = self.require_bucket()?;
        self.client.object_info(bucket, key).await
    }

    /// 删除对象
    pub async fn delete_object(&self, key: &str) -> Result<()> {
        let bucket = self.require_bucket()?;
        self.client.delete_object(bucket, key).await
    }

    /// 旧版兼容：成功true，任何失败false
    pub async fn delete_object_ok(&self, key: &str) -> bool {
        self.delete_object(key).await.sentinel().is_some()
    }

    /// 获取对象内容；给定local路径时写入本地文件并返回None
    pub async fn get_object(&self, key: &str, local: Option<&Path>) -> Result<Option<Bytes>> {
        let bucket = self.require_bucket()?;
        let data = self.client.get_object(bucket, key).await?;
        match local {
            Some(path) => {
                tokio::fs::write(path, &data).await?;
                Ok(None)
            }
            None => Ok(Some(data)),
        }
    }

    /// 拼接对象的完整URL（纯字符串构造，无I/O）
    pub fn build_url_to_file(&self, key: &str) -> String {
        self.url_for(&self.settings.bucket, key)
    }

    fn url_for(&self, bucket: &str, key: &str) -> String {
        let scheme = if self.settings.use_ssl { "https" } else { "http" };
        format!("{}://{}/{}/{}", scheme, self.settings.endpoint, bucket, key)
    }

    fn descriptor(&self, bucket: &str, key: &str, size: u64) -> ObjectDescriptor {
        ObjectDescriptor {
            name: utils::basename(key).to_string(),
            url: self.url_for(bucket, key),
            size,
        }
    }

    /// 从完整URL还原桶内key（[`build_url_to_file`](S3Adapter::build_url_to_file)的逆操作）
    ///
    /// 输入不是合法URL时报错。
    pub fn relative_path(&self, url: &str) -> Result<String> {
        Url::parse(url).map_err(|_| AdapterError::BadUrl(url.to_string()))?;

        let scheme = if self.settings.use_ssl {
            "https://"
        } else {
            "http://"
        };
        let mut remove = vec![scheme.to_string(), format!("{}/", self.settings.endpoint)];
        if !self.settings.bucket.is_empty() {
            remove.push(format!("{}/", self.settings.bucket));
        }

        let mut path = url.to_string();
        for piece in remove {
            path = path.replacen(&piece, "", 1);
        }
        Ok(path)
    }

    /// 生成限时预签名URL，用于访问私有对象
    ///
    /// 输入为对象的完整URL，有效期默认60秒。
    pub async fn authenticated_url(&self, url: &str, lifetime_secs: Option<u32>) -> Result<String> {
        let bucket = self.require_bucket()?;
        let key = self.relative_path(url)?;
        let lifetime = lifetime_secs.unwrap_or(DEFAULT_AUTH_URL_LIFETIME);
        self.client.authenticated_url(bucket, &key, lifetime).await
    }
}
