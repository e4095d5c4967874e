use regex::Regex;

use crate::modules::common::error::TrimmerError;
use crate::modules::common::utils;
use crate::modules::host::{DirListing, Host, Presence};

/// 变量替换结果
#[derive(Debug, Clone)]
struct Expanded {
    path: String,
    /// 值里出现过 %ProgramFiles%，未命中时要用 ProgramFiles(x86) 重试一次
    program_files: bool,
}

/// 原始值（可含 %VAR% 与 *）在主机上是否有匹配目标
///
/// 变量无法解析时返回错误，由裁决层保留条目并告警。
pub fn path_exists(host: &dyn Host, raw: &str) -> Result<bool, TrimmerError> {
    let expanded = substitute(host, raw, None)?;

    if target_exists(host, &expanded.path) {
        return Ok(true);
    }

    // %ProgramFiles% 未命中时退回 (x86) 目录重试一次
    if expanded.program_files {
        if let Some(x86) = host.env_var("ProgramFiles(x86)") {
            let retry = substitute(host, raw, Some(&x86))?;
            if target_exists(host, &retry.path) {
                return Ok(true);
            }
        }
    }

    Ok(false)
}

/// 替换全部 %VAR% 占位符
///
/// 按 % 切分后偶数段为字面文本、奇数段为变量名；% 不配对即为坏值。
/// 变量查找的结果不再二次展开。
fn substitute(
    host: &dyn Host,
    raw: &str,
    program_files_override: Option<&str>,
) -> Result<Expanded, TrimmerError> {
    let raw = raw.trim();
    if !raw.contains('%') {
        return Ok(Expanded {
            path: utils::normalize_path(raw),
            program_files: false,
        });
    }

    let parts: Vec<&str> = raw.split('%').collect();
    if parts.len() < 3 || parts.len() % 2 == 0 {
        return Err(TrimmerError::Variable(format!("变量占位符不完整: {}", raw)));
    }

    let mut out = String::new();
    let mut program_files = false;

    for (i, part) in parts.iter().enumerate() {
        if i % 2 == 0 {
            out.push_str(part);
            continue;
        }
        if part.eq_ignore_ascii_case("ProgramFiles") {
            program_files = true;
        }
        out.push_str(&resolve_variable(host, part, program_files_override)?);
    }

    Ok(Expanded {
        path: utils::normalize_path(&out),
        program_files,
    })
}

/// 伪变量优先于真实环境变量
///
/// XP 系（5.1/5.2）与之后的系统用户目录布局不同。
fn resolve_variable(
    host: &dyn Host,
    name: &str,
    program_files_override: Option<&str>,
) -> Result<String, TrimmerError> {
    let env = |var: &str| {
        host.env_var(var)
            .ok_or_else(|| TrimmerError::Variable(format!("环境变量未定义: {}", var)))
    };
    let xp = is_xp_like(host.os_version());

    match name.to_ascii_lowercase().as_str() {
        "programfiles" => {
            if let Some(x86) = program_files_override {
                return Ok(x86.to_string());
            }
            env("ProgramFiles")
        }
        "documents" => Ok(if xp {
            format!("{}\\My Documents", env("UserProfile")?)
        } else {
            format!("{}\\Documents", env("UserProfile")?)
        }),
        "commonappdata" => Ok(if xp {
            format!("{}\\Application Data\\", env("AllUsersProfile")?)
        } else {
            format!("{}\\", env("AllUsersProfile")?)
        }),
        "locallowappdata" => Ok(replace_last_component(&env("LocalAppData")?, "Local", "LocalLow")),
        "pictures" => Ok(if xp {
            format!("{}\\My Documents\\My Pictures", env("UserProfile")?)
        } else {
            format!("{}\\Pictures", env("UserProfile")?)
        }),
        "music" => Ok(if xp {
            format!("{}\\My Documents\\My Music", env("UserProfile")?)
        } else {
            format!("{}\\Music", env("UserProfile")?)
        }),
        "video" => Ok(if xp {
            format!("{}\\My Documents\\My Videos", env("UserProfile")?)
        } else {
            format!("{}\\Videos", env("UserProfile")?)
        }),
        _ => env(name),
    }
}

fn is_xp_like(version: f64) -> bool {
    version == 5.1 || version == 5.2
}

/// 路径末段等于 from 时替换为 to
fn replace_last_component(path: &str, from: &str, to: &str) -> String {
    match path.rfind('\\') {
        Some(i) if path[i + 1..].eq_ignore_ascii_case(from) => format!("{}\\{}", &path[..i], to),
        _ => path.to_string(),
    }
}

fn target_exists(host: &dyn Host, path: &str) -> bool {
    if path.contains('*') {
        wildcard_exists(host, path)
    } else {
        host.path_presence(path).exists()
    }
}

/// 逐段展开通配符，维护"当前真实前缀"工作集
///
/// 中间段的 * 只匹配子目录，末段也匹配文件；枚举被拒即命中，
/// 工作集一旦为空即未命中。
fn wildcard_exists(host: &dyn Host, path: &str) -> bool {
    let segments: Vec<&str> = path.split('\\').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        return false;
    }

    let mut working = vec![segments[0].to_string()];

    for (index, segment) in segments.iter().enumerate().skip(1) {
        let last = index == segments.len() - 1;
        let mut next = Vec::new();

        if segment.contains('*') {
            let matcher = match wildcard_regex(segment) {
                Some(re) => re,
                None => return false,
            };
            for prefix in &working {
                let listing = if last {
                    host.child_entries(prefix)
                } else {
                    host.child_dirs(prefix)
                };
                match listing {
                    DirListing::Entries(names) => {
                        for name in names {
                            if matcher.is_match(&name) {
                                next.push(format!("{}\\{}", prefix, name));
                            }
                        }
                    }
                    DirListing::Denied => return true,
                    DirListing::Missing => {}
                }
            }
        } else {
            for prefix in &working {
                let candidate = format!("{}\\{}", prefix, segment);
                if last {
                    next.push(candidate);
                } else {
                    match host.dir_presence(&candidate) {
                        Presence::Hit => next.push(candidate),
                        Presence::Denied => return true,
                        Presence::Miss => {}
                    }
                }
            }
        }

        if next.is_empty() {
            return false;
        }
        working = next;
    }

    working.iter().any(|p| host.path_presence(p).exists())
}

/// shell 风格 * 转整段正则，不区分大小写
fn wildcard_regex(segment: &str) -> Option<Regex> {
    let body = segment
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");
    Regex::new(&format!("(?i)^{}$", body)).ok()
}
