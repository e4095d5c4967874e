use super::models::{IniFile, IniKey, IniSection};
use crate::modules::common::error::TrimmerError;

/// 解析 winapp2.ini 方言
///
/// 行格式: `[节名]` 开始一节, `key=value` 归属当前节, `;` 开头为注释。
/// 第一节之前的注释作为文件头保留；节与节之间的注释（社区文件用作
/// 分类分隔）挂到紧随其后的节上；文件尾注释单独保留。
pub fn parse_ini(text: &str) -> Result<IniFile, TrimmerError> {
    let mut header = Vec::new();
    let mut sections: Vec<IniSection> = Vec::new();
    let mut pending: Vec<String> = Vec::new();

    for (lineno, raw) in text.lines().enumerate() {
        // 首行可能带 BOM
        let line = raw.trim_start_matches('\u{feff}').trim();

        if line.is_empty() {
            continue;
        }

        if line.starts_with(';') {
            if sections.is_empty() {
                header.push(line.to_string());
            } else {
                pending.push(line.to_string());
            }
            continue;
        }

        if line.starts_with('[') {
            let name = line
                .strip_prefix('[')
                .and_then(|s| s.strip_suffix(']'))
                .ok_or_else(|| {
                    TrimmerError::Parse(format!("第 {} 行: 非法的节头: {}", lineno + 1, line))
                })?;
            let mut section = IniSection::new(name.trim());
            section.comments = std::mem::take(&mut pending);
            sections.push(section);
            continue;
        }

        match line.split_once('=') {
            Some((name, value)) => {
                let section = sections.last_mut().ok_or_else(|| {
                    TrimmerError::Parse(format!("第 {} 行: 键出现在任何节之前", lineno + 1))
                })?;
                section.keys.push(IniKey::new(name.trim(), value.trim()));
            }
            None => {
                return Err(TrimmerError::Parse(format!(
                    "第 {} 行: 无法解析: {}",
                    lineno + 1,
                    line
                )));
            }
        }
    }

    Ok(IniFile {
        header,
        sections,
        trailing: pending,
    })
}
