pub mod auditor;
pub mod evaluator;
pub mod models;
pub mod probe;
pub mod resolver;
pub mod virtualstore;

use crate::modules::host::Host;
use models::{Overrides, TrimSummary, Winapp2File};

/// 修剪驱动：按声明顺序逐组逐条裁决
///
/// 未通过裁决的条目被移除并记录日志，保留条目按需补充
/// VirtualStore 镜像键。序列化交还给调用方。
pub fn trim_ruleset(
    file: &mut Winapp2File,
    host: &dyn Host,
    overrides: &Overrides,
    virtual_store: bool,
) -> TrimSummary {
    let initial = file.entry_count();

    for group in &mut file.groups {
        group.entries.retain_mut(|entry| {
            let keep = auditor::should_retain(host, entry, overrides);
            if !keep {
                tracing::info!("剔除条目: [{}]", entry.name);
            } else if virtual_store {
                virtualstore::augment(host, entry);
            }
            keep
        });
    }

    file.groups.retain(|group| !group.entries.is_empty());

    TrimSummary {
        initial,
        remaining: file.entry_count(),
    }
}
