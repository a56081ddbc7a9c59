//! 对象ACL权限
//!
//! 封闭枚举替代按字符串拼接查常量的做法，到线上ACL字符串的映射
//! 由编译器保证完整。

use std::fmt;
use std::str::FromStr;

use crate::error::AdapterError;

/// Object ACL / 对象访问权限
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Acl {
    Private,
    /// 上传/复制操作的默认权限
    #[default]
    PublicRead,
    PublicReadWrite,
    AuthenticatedRead,
}

impl Acl {
    /// 对应的S3线上ACL字符串
    pub fn as_str(&self) -> &'static str {
        match self {
            Acl::Private => "private",
            Acl::PublicRead => "public-read",
            Acl::PublicReadWrite => "public-read-write",
            Acl::AuthenticatedRead => "authenticated-read",
        }
    }
}

impl fmt::Display for Acl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Acl {
    type Err = AdapterError;

    /// 按符号名解析，未知名称直接报错（不静默回退默认值）
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "private" => Ok(Acl::Private),
            "public_read" | "public-read" => Ok(Acl::PublicRead),
            "public_read_write" | "public-read-write" => Ok(Acl::PublicReadWrite),
            "authenticated_read" | "authenticated-read" => Ok(Acl::AuthenticatedRead),
            other => Err(AdapterError::Config(format!("未知的ACL权限名: {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acl_wire_strings() {
        assert_eq!(Acl::Private.as_str(), "private");
        assert_eq!(Acl::PublicRead.as_str(), "public-read");
        assert_eq!(Acl::PublicReadWrite.as_str(), "public-read-write");
        assert_eq!(Acl::AuthenticatedRead.as_str(), "authenticated-read");
    }

    #[test]
    fn test_acl_from_symbolic_name() {
        assert_eq!("public_read_write".parse::<Acl>().unwrap(), Acl::PublicReadWrite);
        assert_eq!("private".parse::<Acl>().unwrap(), Acl::Private);
        assert_eq!("authenticated_read".parse::<Acl>().unwrap(), Acl::AuthenticatedRead);
        assert!("everyone".parse::<Acl>().is_err());
    }

    #[test]
    fn test_default_is_public_read() {
        assert_eq!(Acl::default(), Acl::PublicRead);
    }
}
