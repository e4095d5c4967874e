use std::collections::HashSet;

use super::models::{path_string, KeyRole, TrimEntry};
use super::probe;
use crate::modules::common::utils;
use crate::modules::host::Host;
use crate::modules::ini::models::IniKey;

/// 原前缀 -> VirtualStore 镜像前缀（FileKey/ExcludeKey 用全表）
const FILE_MIRRORS: [(&str, &str); 4] = [
    (r"%ProgramFiles%", r"%LocalAppData%\VirtualStore\Program Files*"),
    (r"%CommonAppData%", r"%LocalAppData%\VirtualStore\ProgramData"),
    (
        r"%CommonProgramFiles%",
        r"%LocalAppData%\VirtualStore\Program Files*\Common Files",
    ),
    (r"HKLM\Software", r"HKCU\Software\Classes\VirtualStore\MACHINE\SOFTWARE"),
];

/// RegKey 只做注册表行的重写
const REG_MIRRORS: [(&str, &str); 1] = [(
    r"HKLM\Software",
    r"HKCU\Software\Classes\VirtualStore\MACHINE\SOFTWARE",
)];

/// 为保留条目补充存在于 VirtualStore 重定向区的镜像键
///
/// 只增不减；有追加时整列按值重排并从 1 连续编号。
pub fn augment(host: &dyn Host, entry: &mut TrimEntry) {
    augment_list(host, &mut entry.file_keys, KeyRole::FileKey, &FILE_MIRRORS);
    augment_list(host, &mut entry.exclude_keys, KeyRole::ExcludeKey, &FILE_MIRRORS);
    augment_list(host, &mut entry.reg_keys, KeyRole::RegKey, &REG_MIRRORS);
}

fn augment_list(
    host: &dyn Host,
    keys: &mut Vec<IniKey>,
    role: KeyRole,
    mirrors: &[(&str, &str)],
) {
    if keys.is_empty() {
        return;
    }

    // 现有值快照，用于候选去重
    let snapshot: HashSet<String> = keys.iter().map(|k| k.value.clone()).collect();
    let mut appended: Vec<IniKey> = Vec::new();

    for key in keys.iter() {
        for (from, to) in mirrors {
            let candidate = match utils::replace_first_ignore_case(&key.value, from, to) {
                Some(candidate) => candidate,
                None => continue,
            };
            if candidate == key.value || snapshot.contains(&candidate) {
                continue;
            }
            if appended.iter().any(|k| k.value == candidate) {
                continue;
            }

            let target = path_string(role, &candidate);
            if probe::dispatch(host, &target).unwrap_or(false) {
                appended.push(IniKey::new(key.name.clone(), candidate));
            }
        }
    }

    if appended.is_empty() {
        return;
    }

    keys.extend(appended);
    renumber(keys, role);
}

/// 按值排序后从 1 连续编号；`|` 视为低序分隔符，多段值保持聚簇
fn renumber(keys: &mut [IniKey], role: KeyRole) {
    keys.sort_by_key(|k| sort_key(&k.value));
    for (i, key) in keys.iter_mut().enumerate() {
        key.name = format!("{}{}", role.prefix(), i + 1);
    }
}

fn sort_key(value: &str) -> Vec<String> {
    value.split('|').map(|s| s.to_string()).collect()
}
