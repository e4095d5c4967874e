use serde::{Deserialize, Serialize};

/// 单个键（名称 + 原始值）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IniKey {
    pub name: String,
    pub value: String,
}

impl IniKey {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// 一个节，按声明顺序保存键，允许同名键重复出现
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IniSection {
    pub name: String,
    /// 紧贴在节头之前的注释行（winapp2.ini 用作分类分隔）
    pub comments: Vec<String>,
    pub keys: Vec<IniKey>,
}

impl IniSection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comments: Vec::new(),
            keys: Vec::new(),
        }
    }

    /// 取首个同名键的值（键名不区分大小写）
    pub fn get_value(&self, name: &str) -> Option<&str> {
        self.keys
            .iter()
            .find(|k| k.name.eq_ignore_ascii_case(name))
            .map(|k| k.value.as_str())
    }
}

/// 整个 INI 文件：文件头注释 + 节列表 + 文件尾注释
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IniFile {
    pub header: Vec<String>,
    pub sections: Vec<IniSection>,
    pub trailing: Vec<String>,
}

impl IniFile {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
