/// 规范化路径（统一反斜杠、折叠连续分隔符）
pub fn normalize_path(path: &str) -> String {
    let mut path = path.replace('/', "\\");

    // 处理连续的反斜杠
    while path.contains("\\\\") {
        path = path.replace("\\\\", "\\");
    }

    path
}

/// 大小写不敏感地查找子串（按 ASCII 规则，注册表与 Windows 路径均不区分大小写）
pub fn find_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack
        .to_ascii_lowercase()
        .find(&needle.to_ascii_lowercase())
}

/// 大小写不敏感的前缀判断
pub fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len() && s[..prefix.len()].eq_ignore_ascii_case(prefix)
}

/// 大小写不敏感地替换第一处出现的子串，未命中返回 None
pub fn replace_first_ignore_case(s: &str, from: &str, to: &str) -> Option<String> {
    let pos = find_ignore_case(s, from)?;
    let mut out = String::with_capacity(s.len() - from.len() + to.len());
    out.push_str(&s[..pos]);
    out.push_str(to);
    out.push_str(&s[pos + from.len()..]);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_path_collapses_separators() {
        assert_eq!(normalize_path(r"C:\ProgramData\\Foo"), r"C:\ProgramData\Foo");
        assert_eq!(normalize_path("C:/Users/a"), r"C:\Users\a");
    }

    #[test]
    fn find_ignore_case_matches_mixed_case() {
        assert_eq!(find_ignore_case(r"HKLM\Software\Acme", r"hklm\software"), Some(0));
        assert_eq!(find_ignore_case("abc", "zzz"), None);
    }

    #[test]
    fn replace_first_ignore_case_only_touches_first_occurrence() {
        assert_eq!(
            replace_first_ignore_case(r"HKLM\SOFTWARE\Software", r"HKLM\Software", "X").as_deref(),
            Some(r"X\Software")
        );
        assert_eq!(replace_first_ignore_case("abc", "x", "y"), None);
    }
}
