//! 错误类型定义
//!
//! 所有远程操作统一返回带分类的错误（不存在/无权限/传输失败），
//! 旧版"吞错误返回false/空"的行为通过 [`Sentinel`] 视图提供。

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AdapterError>;

/// 存储适配器错误
#[derive(Debug, Error)]
pub enum AdapterError {
    /// 配置错误（密钥缺失、桶未配置等），构造期或调用前检查
    #[error("配置错误: {0}")]
    Config(String),

    /// 缺少必填参数
    #[error("缺少必填参数: {0}")]
    MissingArgument(&'static str),

    /// URL格式不合法
    #[error("URL格式错误: {0}")]
    BadUrl(String),

    /// 服务端返回404
    #[error("对象不存在: {0}")]
    NotFound(String),

    /// 服务端返回401/403
    #[error("访问被拒绝: {0}")]
    AccessDenied(String),

    /// 本地文件读写失败
    #[error("本地文件错误: {0}")]
    Io(#[from] std::io::Error),

    /// 网络或服务异常
    #[error("传输失败: {0}")]
    Transport(String),

    /// 无法归类的客户端错误
    #[error("未知错误: {0}")]
    Unknown(String),
}

impl AdapterError {
    /// Whether the error means the object does not exist / 是否为"对象不存在"
    pub fn is_not_found(&self) -> bool {
        matches!(self, AdapterError::NotFound(_))
    }
}

/// Legacy sentinel view / 旧版兼容视图
///
/// 原适配器对网络/服务失败一律吞掉异常并返回false或空列表。
/// 新接口统一返回类型化错误；需要旧行为的调用方通过本trait转换，
/// 被吞掉的错误以warn级别日志留痕。
pub trait Sentinel<T> {
    /// Ok(v) -> Some(v)，Err -> None（记录warn日志）
    fn sentinel(self) -> Option<T>;
}

impl<T> Sentinel<T> for Result<T> {
    fn sentinel(self) -> Option<T> {
        match self {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!("S3操作失败，按旧版行为返回哨兵值: {}", e);
                None
            }
        }
    }
}
