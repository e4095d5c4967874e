use super::resolver;
use crate::modules::common::error::TrimmerError;
use crate::modules::common::utils;
use crate::modules::host::{Host, Presence, RegRoot};

/// 按前缀分流：HK 开头走注册表，其余经解析器走文件系统
pub fn dispatch(host: &dyn Host, value: &str) -> Result<bool, TrimmerError> {
    let value = value.trim();
    if utils::starts_with_ignore_case(value, "HK") {
        Ok(reg_exists(host, value))
    } else {
        resolver::path_exists(host, value)
    }
}

/// 注册表键是否存在，权限不足视为存在
///
/// 根必须是 HKCU/HKLM/HKU/HKCR 之一；HKLM\Software 未命中时
/// 按 WOW6432Node 视图重试一次。
pub fn reg_exists(host: &dyn Host, path: &str) -> bool {
    let (root, subkey) = match RegRoot::split_path(path) {
        Some(split) => split,
        None => {
            tracing::debug!("无效的注册表根: {}", path);
            return false;
        }
    };

    match host.reg_presence(root, subkey) {
        Presence::Hit | Presence::Denied => return true,
        Presence::Miss => {}
    }

    if root == RegRoot::Hklm {
        if let Some(rest) = strip_software_prefix(subkey) {
            let wow = format!(r"Software\WOW6432Node\{}", rest);
            return host.reg_presence(root, &wow).exists();
        }
    }

    false
}

/// 取 Software\ 前缀之后的部分，已在 WOW6432Node 视图下的路径不再重试
fn strip_software_prefix(subkey: &str) -> Option<&str> {
    const PREFIX: &str = "Software\\";
    if !utils::starts_with_ignore_case(subkey, PREFIX) {
        return None;
    }
    let rest = &subkey[PREFIX.len()..];
    if utils::starts_with_ignore_case(rest, "WOW6432Node") {
        return None;
    }
    Some(rest)
}
