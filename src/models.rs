//! 返回值结构定义

use serde::{Deserialize, Serialize};

/// Upload/copy result descriptor / 上传与复制操作的结果描述
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectDescriptor {
    /// 文件名（key的最后一段）
    pub name: String,
    /// 完整访问URL
    pub url: String,
    /// 对象字节大小
    pub size: u64,
}

/// Bucket listing entry / 桶列表条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectEntry {
    /// 完整key路径
    pub name: String,
    pub size: u64,
    pub last_modified: Option<String>,
    pub etag: Option<String>,
}

/// Object metadata (HEAD result) / 对象元数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMeta {
    pub size: u64,
    pub content_type: Option<String>,
    pub last_modified: Option<String>,
    pub etag: Option<String>,
}
