//! 纯函数工具：文件名清洗与key路径处理

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Generate a safe filename / 生成安全文件名
///
/// 小写化、解码HTML实体、去掉™和引号、连续空白折叠为单个下划线、
/// 合并重复下划线并去掉首尾下划线。空输入原样返回。
pub fn safe_filename(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }

    let decoded = decode_html_entities(input);
    let mut name = decoded.replace(' ', "_").to_lowercase();
    name = name.replace(['™', '"', '\''], "");
    name = WHITESPACE_RUN.replace_all(&name, "_").into_owned();

    while name.contains("__") {
        name = name.replace("__", "_");
    }

    name.trim_matches('_').to_string()
}

/// Decode common HTML entities / 解码常见HTML实体（含数字实体）
pub fn decode_html_entities(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];

        // 实体形如 &name; 或 &#123; / &#x7f;，最长限制防止扫过头
        let end = rest[1..].find(';').map(|i| i + 1);
        match end {
            Some(end) if end <= 10 => {
                let body = &rest[1..end];
                match decode_entity(body) {
                    Some(ch) => {
                        out.push(ch);
                        rest = &rest[end + 1..];
                    }
                    None => {
                        out.push('&');
                        rest = &rest[1..];
                    }
                }
            }
            _ => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn decode_entity(body: &str) -> Option<char> {
    match body {
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "nbsp" => Some('\u{a0}'),
        "trade" => Some('™'),
        "copy" => Some('©'),
        "reg" => Some('®'),
        _ => {
            let code = body.strip_prefix('#')?;
            let value = if let Some(hex) = code.strip_prefix('x').or_else(|| code.strip_prefix('X'))
            {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                code.parse::<u32>().ok()?
            };
            char::from_u32(value)
        }
    }
}

/// key的最后一段（文件名）
pub fn basename(key: &str) -> &str {
    key.trim_end_matches('/').rsplit('/').next().unwrap_or(key)
}

/// key的目录部分加"/"；根级key返回"./"
///
/// 用于文件夹语义模拟：S3没有真实目录，按目录前缀过滤整桶列表。
pub fn key_dir(key: &str) -> String {
    match key.rsplit_once('/') {
        Some((dir, _)) if !dir.is_empty() => format!("{}/", dir),
        Some(_) => "/".to_string(),
        None => "./".to_string(),
    }
}
