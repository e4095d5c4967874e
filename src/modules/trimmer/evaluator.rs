use super::probe;
use super::resolver;
use crate::modules::common::error::TrimmerError;
use crate::modules::host::Host;
use crate::modules::ini::models::IniKey;

/// DET_CHROME 的检测目标：Chromium 系浏览器的安装路径与注册表键
pub const CHROME_TARGETS: [&str; 19] = [
    r"%AppData%\ChromePlus\chrome.exe",
    r"%LocalAppData%\Chromium\Application\chrome.exe",
    r"%LocalAppData%\Chromium\chrome.exe",
    r"%LocalAppData%\Flock\Application\flock.exe",
    r"%LocalAppData%\Google\Chrome SxS\Application\chrome.exe",
    r"%LocalAppData%\Google\Chrome\Application\chrome.exe",
    r"%LocalAppData%\RockMelt\Application\rockmelt.exe",
    r"%LocalAppData%\SRWare Iron\iron.exe",
    r"%ProgramFiles%\Chromium\Application\chrome.exe",
    r"%ProgramFiles%\SRWare Iron\iron.exe",
    r"%ProgramFiles%\Chromium\chrome.exe",
    r"%ProgramFiles%\Flock\Application\flock.exe",
    r"%ProgramFiles%\Google\Chrome SxS\Application\chrome.exe",
    r"%ProgramFiles%\Google\Chrome\Application\chrome.exe",
    r"%ProgramFiles%\RockMelt\Application\rockmelt.exe",
    r"HKCU\Software\Chromium",
    r"HKCU\Software\SuperBird",
    r"HKCU\Software\Torch",
    r"HKCU\Software\Vivaldi",
];

/// DetectOS：任一键的版本区间包含主机版本
pub fn detect_os_satisfied(host: &dyn Host, keys: &[IniKey]) -> bool {
    if keys.is_empty() {
        return false;
    }
    keys.iter()
        .any(|k| os_range_satisfied(host.os_version(), &k.value))
}

/// 版本区间：|V 为上界，V| 为下界，V1|V2 为闭区间；解析失败按 0 处理
fn os_range_satisfied(host: f64, value: &str) -> bool {
    let value = value.trim();
    match value.split_once('|') {
        Some((lo, hi)) => {
            let lo_ok = lo.trim().is_empty() || host >= parse_version(lo);
            let hi_ok = hi.trim().is_empty() || host <= parse_version(hi);
            lo_ok && hi_ok
        }
        // 无分隔符按下界处理
        None => host >= parse_version(value),
    }
}

fn parse_version(s: &str) -> f64 {
    s.trim().parse().unwrap_or(0.0)
}

/// Detects：任一注册表键存在
pub fn detects_satisfied(host: &dyn Host, keys: &[IniKey]) -> bool {
    keys.iter().any(|k| probe::reg_exists(host, k.value.trim()))
}

/// DetectFiles：任一路径存在（经变量与通配符解析）
pub fn detect_files_satisfied(host: &dyn Host, keys: &[IniKey]) -> Result<bool, TrimmerError> {
    for key in keys {
        if resolver::path_exists(host, key.value.trim())? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// SpecialDetect：固定标签词表，未知标签视为未命中
pub fn special_detect_satisfied(host: &dyn Host, keys: &[IniKey]) -> Result<bool, TrimmerError> {
    for key in keys {
        if special_tag_satisfied(host, key.value.trim())? {
            return Ok(true);
        }
    }
    Ok(false)
}

fn special_tag_satisfied(host: &dyn Host, tag: &str) -> Result<bool, TrimmerError> {
    match tag.to_ascii_uppercase().as_str() {
        "DET_CHROME" => {
            for target in CHROME_TARGETS {
                if probe::dispatch(host, target)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        "DET_MOZILLA" => resolver::path_exists(host, r"%AppData%\Mozilla\Firefox"),
        "DET_THUNDERBIRD" => resolver::path_exists(host, r"%AppData%\Thunderbird"),
        "DET_OPERA" => resolver::path_exists(host, r"%AppData%\Opera Software"),
        _ => {
            tracing::debug!("未知的 SpecialDetect 标签: {}", tag);
            Ok(false)
        }
    }
}
