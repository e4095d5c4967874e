use super::evaluator;
use super::models::{Overrides, TrimEntry};
use crate::modules::common::error::TrimmerError;
use crate::modules::host::Host;

/// 单条目裁决，规则先命中者生效：
///
/// 1. includes 表强制保留
/// 2. excludes 表强制剔除
/// 3. DetectOS 不满足即剔除（其余检测不再参与）
/// 4. 任一检测命中即保留
/// 5. 仅声明 DetectOS 且已满足则保留
/// 6. 无任何检测条件则保留（无条件条目不可被修剪掉）
/// 7. 其余剔除
pub fn should_retain(host: &dyn Host, entry: &TrimEntry, overrides: &Overrides) -> bool {
    if overrides.use_includes && overrides.includes.contains(&entry.name) {
        return true;
    }
    if overrides.use_excludes && overrides.excludes.contains(&entry.name) {
        return false;
    }

    let has_os = !entry.detect_os.is_empty();
    if has_os && !evaluator::detect_os_satisfied(host, &entry.detect_os) {
        return false;
    }

    match other_detectors_satisfied(host, entry) {
        Ok(true) => return true,
        Ok(false) => {}
        Err(e) => {
            // 坏的检测条件不能导致条目被静默剔除
            tracing::warn!("条目 [{}] 的检测条件无法解析，保留该条目: {}", entry.name, e);
            return true;
        }
    }

    let has_other_detectors = !entry.detects.is_empty()
        || !entry.detect_files.is_empty()
        || !entry.special_detects.is_empty();

    if has_os && !has_other_detectors {
        return true;
    }
    if !entry.has_detectors() {
        return true;
    }

    false
}

fn other_detectors_satisfied(host: &dyn Host, entry: &TrimEntry) -> Result<bool, TrimmerError> {
    if evaluator::detects_satisfied(host, &entry.detects) {
        return Ok(true);
    }
    if evaluator::detect_files_satisfied(host, &entry.detect_files)? {
        return Ok(true);
    }
    evaluator::special_detect_satisfied(host, &entry.special_detects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::host::fake::FakeHost;
    use crate::modules::ini::models::IniKey;

    fn entry(name: &str) -> TrimEntry {
        TrimEntry {
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn host_with_acme() -> FakeHost {
        FakeHost::new(10.0)
            .with_env("AppData", r"C:\Users\demo\AppData\Roaming")
            .with_dir(r"C:\Users\demo\AppData\Roaming\Acme")
    }

    #[test]
    fn includes_force_retention_regardless_of_host() {
        let mut e = entry("Acme *");
        e.detects.push(IniKey::new("Detect1", r"HKCU\Software\Missing"));

        let overrides = Overrides {
            use_includes: true,
            includes: ["Acme *".to_string()].into_iter().collect(),
            ..Default::default()
        };
        assert!(should_retain(&FakeHost::new(10.0), &e, &overrides));
    }

    #[test]
    fn includes_beat_excludes_when_both_match() {
        let e = entry("Acme *");
        let overrides = Overrides {
            use_includes: true,
            use_excludes: true,
            includes: ["Acme *".to_string()].into_iter().collect(),
            excludes: ["Acme *".to_string()].into_iter().collect(),
        };
        assert!(should_retain(&FakeHost::new(10.0), &e, &overrides));
    }

    #[test]
    fn excludes_force_discard_even_when_detected() {
        let mut e = entry("Acme *");
        e.detect_files.push(IniKey::new("DetectFile1", r"%AppData%\Acme"));

        let overrides = Overrides {
            use_excludes: true,
            excludes: ["Acme *".to_string()].into_iter().collect(),
            ..Default::default()
        };
        assert!(!should_retain(&host_with_acme(), &e, &overrides));
    }

    #[test]
    fn detect_os_miss_short_circuits_other_detectors() {
        let mut e = entry("Acme *");
        e.detect_os.push(IniKey::new("DetectOS", "|6.0"));
        e.detect_files.push(IniKey::new("DetectFile1", r"%AppData%\Acme"));

        // 文件检测会命中，但 DetectOS 未满足，仍须剔除
        assert!(!should_retain(&host_with_acme(), &e, &Overrides::default()));
    }

    #[test]
    fn satisfied_detect_os_alone_retains() {
        let mut e = entry("Acme *");
        e.detect_os.push(IniKey::new("DetectOS", "6.0|"));
        assert!(should_retain(&FakeHost::new(10.0), &e, &Overrides::default()));
    }

    #[test]
    fn satisfied_detect_os_with_missed_detectors_discards() {
        let mut e = entry("Acme *");
        e.detect_os.push(IniKey::new("DetectOS", "6.0|"));
        e.detects.push(IniKey::new("Detect1", r"HKCU\Software\Missing"));
        assert!(!should_retain(&FakeHost::new(10.0), &e, &Overrides::default()));
    }

    #[test]
    fn entry_without_criteria_is_always_retained() {
        assert!(should_retain(&FakeHost::new(10.0), &entry("Acme *"), &Overrides::default()));
    }

    #[test]
    fn missed_detectors_discard() {
        let mut e = entry("Acme *");
        e.detects.push(IniKey::new("Detect1", r"HKCU\Software\Missing"));
        assert!(!should_retain(&FakeHost::new(10.0), &e, &Overrides::default()));
    }

    #[test]
    fn malformed_variable_retains_with_warning() {
        let mut e = entry("Acme *");
        e.detect_files.push(IniKey::new("DetectFile1", r"%NotAVariable%\x"));
        assert!(should_retain(&FakeHost::new(10.0), &e, &Overrides::default()));
    }

    #[test]
    fn added_permission_never_flips_retain_to_discard() {
        // 同一内容，仅把"拒绝访问"变成"可读"：结论只会从保留变保留
        let mut e = entry("Acme *");
        e.detect_files.push(IniKey::new("DetectFile1", r"%AppData%\Acme"));

        let denied = FakeHost::new(10.0)
            .with_env("AppData", r"C:\Users\demo\AppData\Roaming")
            .with_denied_path(r"C:\Users\demo\AppData\Roaming\Acme");
        let readable = host_with_acme();

        assert!(should_retain(&denied, &e, &Overrides::default()));
        assert!(should_retain(&readable, &e, &Overrides::default()));
    }
}
