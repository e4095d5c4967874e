pub mod live;

#[cfg(test)]
pub mod fake;

pub use live::LiveHost;

/// 探测结果，权限不足单独成档，由上层按规则折叠
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// 目标存在
    Hit,
    /// 目标不存在
    Miss,
    /// 访问被拒
    Denied,
}

impl Presence {
    /// 折叠为布尔，权限不足视为存在的证据
    pub fn exists(self) -> bool {
        matches!(self, Presence::Hit | Presence::Denied)
    }
}

/// 单层目录枚举结果
#[derive(Debug, Clone)]
pub enum DirListing {
    Entries(Vec<String>),
    Denied,
    Missing,
}

/// 注册表根
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegRoot {
    Hkcu,
    Hklm,
    Hku,
    Hkcr,
}

impl RegRoot {
    /// 拆分 `HKXX\子路径` 形式的注册表路径，根不在许可表内时返回 None
    pub fn split_path(path: &str) -> Option<(RegRoot, &str)> {
        let path = path.trim();
        let (root, rest) = match path.split_once('\\') {
            Some((root, rest)) => (root, rest),
            None => (path, ""),
        };

        let root = match root.to_ascii_uppercase().as_str() {
            "HKCU" | "HKEY_CURRENT_USER" => RegRoot::Hkcu,
            "HKLM" | "HKEY_LOCAL_MACHINE" => RegRoot::Hklm,
            "HKU" | "HKEY_USERS" => RegRoot::Hku,
            "HKCR" | "HKEY_CLASSES_ROOT" => RegRoot::Hkcr,
            _ => return None,
        };

        Some((root, rest))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RegRoot::Hkcu => "HKCU",
            RegRoot::Hklm => "HKLM",
            RegRoot::Hku => "HKU",
            RegRoot::Hkcr => "HKCR",
        }
    }
}

/// 主机探测能力：操作系统版本、环境变量、文件系统与注册表
pub trait Host {
    /// 操作系统主次版本（如 6.1、10.0），实现方负责缓存
    fn os_version(&self) -> f64;

    /// 环境变量查询
    fn env_var(&self, name: &str) -> Option<String>;

    /// 路径是否存在（文件或目录）
    fn path_presence(&self, path: &str) -> Presence;

    /// 路径是否为已存在的目录
    fn dir_presence(&self, path: &str) -> Presence;

    /// 枚举子目录名（单层）
    fn child_dirs(&self, path: &str) -> DirListing;

    /// 枚举子项名（单层，目录与文件）
    fn child_entries(&self, path: &str) -> DirListing;

    /// 注册表键是否存在
    fn reg_presence(&self, root: RegRoot, subkey: &str) -> Presence;
}
