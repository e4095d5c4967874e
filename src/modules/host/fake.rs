//! 测试用内存主机

use std::collections::{HashMap, HashSet};

use super::{DirListing, Host, Presence, RegRoot};

/// 内存中的假主机：环境变量、文件系统与注册表均为预置表
///
/// 路径与注册表键按 Windows 规则不区分大小写存储（统一小写）。
#[derive(Debug, Default)]
pub struct FakeHost {
    os_version: f64,
    env: HashMap<String, String>,
    dirs: HashSet<String>,
    files: HashSet<String>,
    denied_paths: HashSet<String>,
    reg_keys: HashSet<String>,
    denied_reg: HashSet<String>,
}

fn norm(path: &str) -> String {
    path.trim().trim_end_matches('\\').to_ascii_lowercase()
}

impl FakeHost {
    pub fn new(os_version: f64) -> Self {
        Self {
            os_version,
            ..Default::default()
        }
    }

    pub fn with_env(mut self, name: &str, value: &str) -> Self {
        self.env.insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    /// 登记目录及其全部祖先目录
    pub fn with_dir(mut self, path: &str) -> Self {
        let mut p = norm(path);
        loop {
            self.dirs.insert(p.clone());
            match p.rfind('\\') {
                Some(i) if i > 0 => p.truncate(i),
                _ => break,
            }
        }
        self
    }

    pub fn with_file(mut self, path: &str) -> Self {
        let p = norm(path);
        if let Some(i) = p.rfind('\\') {
            let parent = p[..i].to_string();
            self = self.with_dir(&parent);
        }
        self.files.insert(p);
        self
    }

    pub fn with_denied_path(mut self, path: &str) -> Self {
        self.denied_paths.insert(norm(path));
        self
    }

    pub fn with_reg_key(mut self, path: &str) -> Self {
        self.reg_keys.insert(norm(path));
        self
    }

    pub fn with_denied_reg(mut self, path: &str) -> Self {
        self.denied_reg.insert(norm(path));
        self
    }

    fn list(&self, path: &str, dirs_only: bool) -> DirListing {
        let p = norm(path);
        if self.denied_paths.contains(&p) {
            return DirListing::Denied;
        }
        if !self.dirs.contains(&p) {
            return DirListing::Missing;
        }

        let prefix = format!("{}\\", p);
        let mut names = Vec::new();

        for dir in &self.dirs {
            if let Some(rest) = dir.strip_prefix(&prefix) {
                if !rest.contains('\\') {
                    names.push(rest.to_string());
                }
            }
        }
        if !dirs_only {
            for file in &self.files {
                if let Some(rest) = file.strip_prefix(&prefix) {
                    if !rest.contains('\\') {
                        names.push(rest.to_string());
                    }
                }
            }
        }

        names.sort();
        DirListing::Entries(names)
    }
}

impl Host for FakeHost {
    fn os_version(&self) -> f64 {
        self.os_version
    }

    fn env_var(&self, name: &str) -> Option<String> {
        self.env.get(&name.to_ascii_lowercase()).cloned()
    }

    fn path_presence(&self, path: &str) -> Presence {
        let p = norm(path);
        if self.denied_paths.contains(&p) {
            Presence::Denied
        } else if self.files.contains(&p) || self.dirs.contains(&p) {
            Presence::Hit
        } else {
            Presence::Miss
        }
    }

    fn dir_presence(&self, path: &str) -> Presence {
        let p = norm(path);
        if self.denied_paths.contains(&p) {
            Presence::Denied
        } else if self.dirs.contains(&p) {
            Presence::Hit
        } else {
            Presence::Miss
        }
    }

    fn child_dirs(&self, path: &str) -> DirListing {
        self.list(path, true)
    }

    fn child_entries(&self, path: &str) -> DirListing {
        self.list(path, false)
    }

    fn reg_presence(&self, root: RegRoot, subkey: &str) -> Presence {
        let full = norm(&format!("{}\\{}", root.as_str(), subkey));
        if self.denied_reg.contains(&full) {
            Presence::Denied
        } else if self.reg_keys.contains(&full) {
            Presence::Hit
        } else {
            Presence::Miss
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_dir_registers_ancestors() {
        let host = FakeHost::new(10.0).with_dir(r"C:\Users\a\AppData\Local");
        assert_eq!(host.dir_presence(r"C:\Users"), Presence::Hit);
        assert_eq!(host.dir_presence(r"c:\users\A\appdata"), Presence::Hit);
    }

    #[test]
    fn listing_is_single_level() {
        let host = FakeHost::new(10.0)
            .with_dir(r"C:\Program Files\Acme\Sub")
            .with_file(r"C:\Program Files\readme.txt");

        match host.child_dirs(r"C:\Program Files") {
            DirListing::Entries(names) => assert_eq!(names, vec!["acme"]),
            other => panic!("意外的结果: {:?}", other),
        }
        match host.child_entries(r"C:\Program Files") {
            DirListing::Entries(names) => assert_eq!(names, vec!["acme", "readme.txt"]),
            other => panic!("意外的结果: {:?}", other),
        }
    }

    #[test]
    fn denied_paths_surface_as_denied() {
        let host = FakeHost::new(10.0).with_denied_path(r"C:\Secret");
        assert_eq!(host.path_presence(r"C:\Secret"), Presence::Denied);
        assert!(matches!(host.child_dirs(r"C:\Secret"), DirListing::Denied));
    }
}
