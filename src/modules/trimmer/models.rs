use std::collections::HashSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::modules::common::utils;
use crate::modules::ini::models::{IniFile, IniKey, IniSection};

/// 键角色，由键名前缀推导
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyRole {
    DetectOs,
    Detect,
    DetectFile,
    SpecialDetect,
    FileKey,
    RegKey,
    ExcludeKey,
    Other,
}

impl KeyRole {
    /// 前缀判定，最长前缀优先（DetectOS 先于 DetectFile 先于 Detect）
    pub fn from_key_name(name: &str) -> KeyRole {
        let name = name.trim();
        if utils::starts_with_ignore_case(name, "DetectOS") {
            KeyRole::DetectOs
        } else if utils::starts_with_ignore_case(name, "DetectFile") {
            KeyRole::DetectFile
        } else if utils::starts_with_ignore_case(name, "Detect") {
            KeyRole::Detect
        } else if utils::starts_with_ignore_case(name, "SpecialDetect") {
            KeyRole::SpecialDetect
        } else if utils::starts_with_ignore_case(name, "FileKey") {
            KeyRole::FileKey
        } else if utils::starts_with_ignore_case(name, "RegKey") {
            KeyRole::RegKey
        } else if utils::starts_with_ignore_case(name, "ExcludeKey") {
            KeyRole::ExcludeKey
        } else {
            KeyRole::Other
        }
    }

    /// 重新编号时使用的键名前缀
    pub fn prefix(&self) -> &'static str {
        match self {
            KeyRole::DetectOs => "DetectOS",
            KeyRole::Detect => "Detect",
            KeyRole::DetectFile => "DetectFile",
            KeyRole::SpecialDetect => "SpecialDetect",
            KeyRole::FileKey => "FileKey",
            KeyRole::RegKey => "RegKey",
            KeyRole::ExcludeKey => "ExcludeKey",
            KeyRole::Other => "",
        }
    }
}

/// 从键值导出探测用路径串
///
/// FileKey/RegKey 取首个 `|` 之前的部分；ExcludeKey 可能带
/// FILE|/PATH|/REG| 前导标记，取标记后的路径段；检测类键取整个值。
pub fn path_string(role: KeyRole, value: &str) -> String {
    let value = value.trim();
    match role {
        KeyRole::FileKey | KeyRole::RegKey => value
            .split('|')
            .next()
            .unwrap_or_default()
            .trim()
            .to_string(),
        KeyRole::ExcludeKey => {
            let parts: Vec<&str> = value.split('|').collect();
            if parts.len() >= 2
                && matches!(
                    parts[0].trim().to_ascii_uppercase().as_str(),
                    "FILE" | "PATH" | "REG"
                )
            {
                parts[1].trim().to_string()
            } else {
                parts[0].trim().to_string()
            }
        }
        _ => value.to_string(),
    }
}

/// 一条规则（winapp2.ini 中的一个节），键按角色分列
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrimEntry {
    pub name: String,
    /// 节头之前的分类分隔注释，原样写回
    pub comments: Vec<String>,
    pub detect_os: Vec<IniKey>,
    pub detects: Vec<IniKey>,
    pub detect_files: Vec<IniKey>,
    pub special_detects: Vec<IniKey>,
    pub file_keys: Vec<IniKey>,
    pub reg_keys: Vec<IniKey>,
    pub exclude_keys: Vec<IniKey>,
    pub others: Vec<IniKey>,
}

impl TrimEntry {
    pub fn from_section(section: &IniSection) -> Self {
        let mut entry = TrimEntry {
            name: section.name.clone(),
            comments: section.comments.clone(),
            ..Default::default()
        };

        for key in &section.keys {
            match KeyRole::from_key_name(&key.name) {
                KeyRole::DetectOs => entry.detect_os.push(key.clone()),
                KeyRole::Detect => entry.detects.push(key.clone()),
                KeyRole::DetectFile => entry.detect_files.push(key.clone()),
                KeyRole::SpecialDetect => entry.special_detects.push(key.clone()),
                KeyRole::FileKey => entry.file_keys.push(key.clone()),
                KeyRole::RegKey => entry.reg_keys.push(key.clone()),
                KeyRole::ExcludeKey => entry.exclude_keys.push(key.clone()),
                KeyRole::Other => entry.others.push(key.clone()),
            }
        }

        entry
    }

    /// 还原为 INI 节，键按 winapp2 惯例顺序排布
    pub fn to_section(&self) -> IniSection {
        let mut section = IniSection::new(self.name.clone());
        section.comments = self.comments.clone();
        for list in [
            &self.others,
            &self.detect_os,
            &self.detects,
            &self.detect_files,
            &self.special_detects,
            &self.file_keys,
            &self.reg_keys,
            &self.exclude_keys,
        ] {
            section.keys.extend(list.iter().cloned());
        }
        section
    }

    /// 所属分类（LangSecRef 或 Section 键的值）
    pub fn category(&self) -> Option<String> {
        self.others
            .iter()
            .find(|k| {
                k.name.eq_ignore_ascii_case("LangSecRef") || k.name.eq_ignore_ascii_case("Section")
            })
            .map(|k| k.value.clone())
    }

    /// 是否声明了任何检测条件
    pub fn has_detectors(&self) -> bool {
        !self.detect_os.is_empty()
            || !self.detects.is_empty()
            || !self.detect_files.is_empty()
            || !self.special_detects.is_empty()
    }
}

/// 顶层分组：LangSecRef/Section 值相同的连续条目
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryGroup {
    pub label: Option<String>,
    pub entries: Vec<TrimEntry>,
}

/// 已分组的规则文件
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Winapp2File {
    pub header: Vec<String>,
    pub groups: Vec<EntryGroup>,
    pub trailing: Vec<String>,
}

impl Winapp2File {
    pub fn from_ini(ini: &IniFile) -> Self {
        let mut groups: Vec<EntryGroup> = Vec::new();

        for section in &ini.sections {
            let entry = TrimEntry::from_section(section);
            let label = entry.category();
            match groups.last_mut() {
                Some(group) if group.label == label => group.entries.push(entry),
                _ => groups.push(EntryGroup {
                    label,
                    entries: vec![entry],
                }),
            }
        }

        Winapp2File {
            header: ini.header.clone(),
            groups,
            trailing: ini.trailing.clone(),
        }
    }

    pub fn to_ini(&self) -> IniFile {
        IniFile {
            header: self.header.clone(),
            sections: self
                .groups
                .iter()
                .flat_map(|g| g.entries.iter().map(TrimEntry::to_section))
                .collect(),
            trailing: self.trailing.clone(),
        }
    }

    pub fn entry_count(&self) -> usize {
        self.groups.iter().map(|g| g.entries.len()).sum()
    }
}

/// 强制保留/剔除覆盖表，来自 includes.ini / excludes.ini 的节名
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub use_includes: bool,
    pub use_excludes: bool,
    pub includes: HashSet<String>,
    pub excludes: HashSet<String>,
}

/// 修剪配置，由命令行装配后整体传入
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrimConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub includes_path: PathBuf,
    pub excludes_path: PathBuf,
    pub use_includes: bool,
    pub use_excludes: bool,
    pub download: bool,
    pub virtual_store: bool,
}

impl Default for TrimConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("./winapp2.ini"),
            output: PathBuf::from("./winapp2.ini"),
            includes_path: PathBuf::from("./includes.ini"),
            excludes_path: PathBuf::from("./excludes.ini"),
            use_includes: false,
            use_excludes: false,
            download: false,
            virtual_store: true,
        }
    }
}

/// 修剪结果统计
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrimSummary {
    pub initial: usize,
    pub remaining: usize,
}

impl TrimSummary {
    pub fn removed(&self) -> usize {
        self.initial - self.remaining
    }

    /// 移除百分比，四舍五入到整数
    pub fn percent_removed(&self) -> u32 {
        if self.initial == 0 {
            return 0;
        }
        (self.removed() as f64 * 100.0 / self.initial as f64).round() as u32
    }
}
