use std::sync::OnceLock;

use super::{DirListing, Host, Presence, RegRoot};

/// 真实主机：文件系统走 std::fs，注册表走 winreg
///
/// Windows 之外的平台上注册表查询一律返回不存在，便于交叉编译与测试。
#[derive(Debug, Default)]
pub struct LiveHost {
    os_version: OnceLock<f64>,
}

impl LiveHost {
    pub fn new() -> Self {
        Self {
            os_version: OnceLock::new(),
        }
    }
}

fn presence_from_io(err: &std::io::Error) -> Presence {
    if err.kind() == std::io::ErrorKind::PermissionDenied {
        Presence::Denied
    } else {
        Presence::Miss
    }
}

impl Host for LiveHost {
    fn os_version(&self) -> f64 {
        *self.os_version.get_or_init(read_os_version)
    }

    fn env_var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn path_presence(&self, path: &str) -> Presence {
        match std::fs::metadata(path) {
            Ok(_) => Presence::Hit,
            Err(e) => presence_from_io(&e),
        }
    }

    fn dir_presence(&self, path: &str) -> Presence {
        match std::fs::metadata(path) {
            Ok(meta) if meta.is_dir() => Presence::Hit,
            Ok(_) => Presence::Miss,
            Err(e) => presence_from_io(&e),
        }
    }

    fn child_dirs(&self, path: &str) -> DirListing {
        list_children(path, true)
    }

    fn child_entries(&self, path: &str) -> DirListing {
        list_children(path, false)
    }

    fn reg_presence(&self, root: RegRoot, subkey: &str) -> Presence {
        reg_presence_impl(root, subkey)
    }
}

/// 单层枚举子项名，非法路径按不存在处理
fn list_children(path: &str, dirs_only: bool) -> DirListing {
    let iter = match std::fs::read_dir(path) {
        Ok(iter) => iter,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => return DirListing::Denied,
        Err(_) => return DirListing::Missing,
    };

    let mut names = Vec::new();
    for entry in iter {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                return DirListing::Denied;
            }
            Err(_) => continue,
        };

        if dirs_only {
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            if !is_dir {
                continue;
            }
        }

        names.push(entry.file_name().to_string_lossy().to_string());
    }

    DirListing::Entries(names)
}

/// 操作系统主次版本，只读一次
///
/// Windows 10 起主次版本存放在独立的 DWORD 值里，旧系统使用
/// "6.1" 形式的 CurrentVersion 字符串。读取失败时回退 10.0。
#[cfg(windows)]
fn read_os_version() -> f64 {
    use winreg::enums::HKEY_LOCAL_MACHINE;
    use winreg::RegKey;

    let key = match RegKey::predef(HKEY_LOCAL_MACHINE)
        .open_subkey(r"SOFTWARE\Microsoft\Windows NT\CurrentVersion")
    {
        Ok(key) => key,
        Err(_) => return 10.0,
    };

    if let Ok(major) = key.get_value::<u32, _>("CurrentMajorVersionNumber") {
        let minor: u32 = key.get_value("CurrentMinorVersionNumber").unwrap_or(0);
        return format!("{}.{}", major, minor).parse().unwrap_or(10.0);
    }

    key.get_value::<String, _>("CurrentVersion")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(10.0)
}

#[cfg(not(windows))]
fn read_os_version() -> f64 {
    10.0
}

#[cfg(windows)]
fn reg_presence_impl(root: RegRoot, subkey: &str) -> Presence {
    use winreg::enums::*;
    use winreg::RegKey;

    let hkey = match root {
        RegRoot::Hkcu => HKEY_CURRENT_USER,
        RegRoot::Hklm => HKEY_LOCAL_MACHINE,
        RegRoot::Hku => HKEY_USERS,
        RegRoot::Hkcr => HKEY_CLASSES_ROOT,
    };

    match RegKey::predef(hkey).open_subkey(subkey) {
        Ok(_) => Presence::Hit,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => Presence::Denied,
        Err(_) => Presence::Miss,
    }
}

#[cfg(not(windows))]
fn reg_presence_impl(_root: RegRoot, _subkey: &str) -> Presence {
    Presence::Miss
}
