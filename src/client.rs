//! 对象存储客户端边界
//!
//! 协议细节（请求签名、HTTP传输、XML解析）全部由rust-s3承担，
//! 本层只做方法转发和错误归类。[`ObjectClient`]是可替换的接口，
//! 测试里用mock实现模拟服务端故障。

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;
use s3::bucket::Bucket;
use s3::creds::Credentials;
use s3::error::S3Error;
use s3::Region;
use tokio::sync::Mutex;

use crate::acl::Acl;
use crate::error::{AdapterError, Result};
use crate::models::{ObjectEntry, ObjectMeta};
use crate::settings::S3Settings;

/// External object-storage client boundary / 外部对象存储客户端接口
#[async_trait]
pub trait ObjectClient: Send + Sync {
    /// 列出整桶对象（key为完整路径）
    async fn list_bucket(&self, bucket: &str) -> Result<Vec<ObjectEntry>>;

    /// 上传本地文件；mime为None时按key后缀自动识别
    async fn put_object(
        &self,
        local: &Path,
        bucket: &str,
        key: &str,
        acl: Acl,
        mime: Option<&str>,
    ) -> Result<()>;

    /// HEAD对象元数据
    async fn object_info(&self, bucket: &str, key: &str) -> Result<ObjectMeta>;

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()>;

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes>;

    /// 复制对象，源桶与目标桶可以不同
    async fn copy_object(
        &self,
        src_bucket: &str,
        src_key: &str,
        dst_bucket: &str,
        dst_key: &str,
        acl: Acl,
        mime: Option<&str>,
    ) -> Result<()>;

    /// 生成限时预签名URL
    async fn authenticated_url(&self, bucket: &str, key: &str, lifetime_secs: u32)
        -> Result<String>;
}

/// rust-s3 client implementation / rust-s3客户端实现
pub struct RustS3Client {
    settings: S3Settings,
    // 按桶名缓存Bucket句柄，首次访问时创建
    handles: Mutex<HashMap<String, Box<Bucket>>>,
}

impl RustS3Client {
    pub fn new(settings: S3Settings) -> Self {
        Self {
            settings,
            handles: Mutex::new(HashMap::new()),
        }
    }

    fn region(&self) -> Region {
        let scheme = if self.settings.use_ssl { "https" } else { "http" };
        Region::Custom {
            region: self.settings.region.clone(),
            endpoint: format!("{}://{}", scheme, self.settings.endpoint),
        }
    }

    async fn bucket_handle(&self, bucket: &str) -> Result<Box<Bucket>> {
        let mut guard = self.handles.lock().await;
        if let Some(handle) = guard.get(bucket) {
            return Ok(handle.clone());
        }

        let credentials = Credentials::new(
            Some(&self.settings.access_key),
            Some(&self.settings.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| AdapterError::Config(format!("创建S3凭证失败: {}", e)))?;

        let mut handle = Bucket::new(bucket, self.region(), credentials)
            .map_err(|e| AdapterError::Config(format!("创建S3 Bucket失败: {}", e)))?;
        if self.settings.force_path_style {
            handle = handle.with_path_style();
        }

        guard.insert(bucket.to_string(), handle.clone());
        Ok(handle)
    }

    /// 带ACL头的句柄（克隆后再加头，不污染缓存）
    async fn bucket_handle_with_acl(&self, bucket: &str, acl: Acl) -> Result<Box<Bucket>> {
        let mut handle = self.bucket_handle(bucket).await?;
        handle.add_header("x-amz-acl", acl.as_str());
        Ok(handle)
    }
}

/// 将rust-s3错误按HTTP状态码归类
fn classify(err: S3Error, what: &str) -> AdapterError {
    match err {
        S3Error::HttpFailWithBody(404, _) => AdapterError::NotFound(what.to_string()),
        S3Error::HttpFailWithBody(401, _) | S3Error::HttpFailWithBody(403, _) => {
            AdapterError::AccessDenied(what.to_string())
        }
        other => AdapterError::Transport(format!("{}: {}", what, other)),
    }
}

fn status_error(code: u16, what: &str) -> AdapterError {
    match code {
        404 => AdapterError::NotFound(what.to_string()),
        401 | 403 => AdapterError::AccessDenied(what.to_string()),
        other => AdapterError::Transport(format!("{}: HTTP {}", what, other)),
    }
}

fn content_type_for(key: &str, mime: Option<&str>) -> String {
    match mime {
        Some(m) => m.to_string(),
        None => mime_guess::from_path(key).first_or_octet_stream().to_string(),
    }
}

#[async_trait]
impl ObjectClient for RustS3Client {
    async fn list_bucket(&self, bucket: &str) -> Result<Vec<ObjectEntry>> {
        let handle = self.bucket_handle(bucket).await?;
        let pages = handle
            .list(String::new(), None)
            .await
            .map_err(|e| classify(e, "列出桶内容"))?;

        let mut entries = Vec::new();
        for page in pages {
            for obj in page.contents {
                entries.push(ObjectEntry {
                    name: obj.key,
                    size: obj.size as u64,
                    last_modified: Some(obj.last_modified),
                    etag: obj.e_tag,
                });
            }
        }
        Ok(entries)
    }

    async fn put_object(
        &self,
        local: &Path,
        bucket: &str,
        key: &str,
        acl: Acl,
        mime: Option<&str>,
    ) -> Result<()> {
        let data = tokio::fs::read(local).await?;
        let content_type = content_type_for(key, mime);
        let handle = self.bucket_handle_with_acl(bucket, acl).await?;

        tracing::debug!(
            "S3 PutObject: bucket={}, key={}, size={}, mime={}",
            bucket,
            key,
            data.len(),
            content_type
        );

        handle
            .put_object_with_content_type(key, &data, &content_type)
            .await
            .map_err(|e| classify(e, "上传对象"))?;
        Ok(())
    }

    async fn object_info(&self, bucket: &str, key: &str) -> Result<ObjectMeta> {
        let handle = self.bucket_handle(bucket).await?;
        let (head, code) = handle
            .head_object(key)
            .await
            .map_err(|e| classify(e, "获取对象信息"))?;
        if code != 200 {
            return Err(status_error(code, "获取对象信息"));
        }

        Ok(ObjectMeta {
            size: head.content_length.unwrap_or(0) as u64,
            content_type: head.content_type,
            last_modified: head.last_modified,
            etag: head.e_tag,
        })
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        let handle = self.bucket_handle(bucket).await?;
        tracing::debug!("S3 DeleteObject: bucket={}, key={}", bucket, key);
        handle
            .delete_object(key)
            .await
            .map_err(|e| classify(e, "删除对象"))?;
        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes> {
        let handle = self.bucket_handle(bucket).await?;
        let response = handle
            .get_object(key)
            .await
            .map_err(|e| classify(e, "获取对象"))?;
        Ok(Bytes::from(response.bytes().to_vec()))
    }

    async fn copy_object(
        &self,
        src_bucket: &str,
        src_key: &str,
        dst_bucket: &str,
        dst_key: &str,
        acl: Acl,
        mime: Option<&str>,
    ) -> Result<()> {
        if src_bucket == dst_bucket {
            // 同桶走服务端复制，源key需URL编码（中文等非ASCII字符）
            // 服务端复制保留源对象元数据，mime参数在此路径不生效
            let handle = self.bucket_handle_with_acl(dst_bucket, acl).await?;
            let encoded_src = urlencoding::encode(src_key);

            tracing::debug!(
                "S3 CopyObject: src_key={}, encoded={}, dst_key={}",
                src_key,
                encoded_src,
                dst_key
            );

            let result = handle
                .copy_object_internal(&encoded_src, dst_key)
                .await
                .map_err(|e| classify(e, "复制对象"))?;
            tracing::debug!("S3 CopyObject返回: {:?}", result);

            // 验证新文件是否存在
            let (_, code) = handle
                .head_object(dst_key)
                .await
                .map_err(|e| classify(e, "验证复制结果"))?;
            if code != 200 {
                return Err(status_error(code, "复制对象"));
            }
            Ok(())
        } else {
            // rust-s3没有公开的跨桶复制接口，退化为先取后传
            tracing::debug!(
                "S3 跨桶复制: {}/{} -> {}/{}",
                src_bucket,
                src_key,
                dst_bucket,
                dst_key
            );
            let data = self.get_object(src_bucket, src_key).await?;
            let content_type = content_type_for(dst_key, mime);
            let handle = self.bucket_handle_with_acl(dst_bucket, acl).await?;
            handle
                .put_object_with_content_type(dst_key, &data, &content_type)
                .await
                .map_err(|e| classify(e, "复制对象"))?;
            Ok(())
        }
    }

    async fn authenticated_url(
        &self,
        bucket: &str,
        key: &str,
        lifetime_secs: u32,
    ) -> Result<String> {
        let handle = self.bucket_handle(bucket).await?;
        let url = handle
            .presign_get(key, lifetime_secs, None)
            .await
            .map_err(|e| classify(e, "生成预签名URL"))?;
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_mapping() {
        assert!(matches!(status_error(404, "x"), AdapterError::NotFound(_)));
        assert!(matches!(status_error(403, "x"), AdapterError::AccessDenied(_)));
        assert!(matches!(status_error(500, "x"), AdapterError::Transport(_)));
    }

    #[test]
    fn test_content_type_autodetect() {
        assert_eq!(content_type_for("a/b.png", None), "image/png");
        assert_eq!(content_type_for("a/b.bin", Some("text/plain")), "text/plain");
        assert_eq!(
            content_type_for("folder/", None),
            "application/octet-stream"
        );
    }
}
