use anyhow::Result;
use clap::Parser;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::download;
use crate::modules::host::LiveHost;
use crate::modules::ini::{parser, writer};
use crate::modules::trimmer;
use crate::modules::trimmer::models::{Overrides, TrimConfig, Winapp2File};

#[derive(Parser, Debug)]
pub struct TrimCommand {
    /// 输入文件
    #[arg(long, default_value = "./winapp2.ini")]
    pub input: PathBuf,

    /// 输出文件 (不指定则覆盖输入)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// 强制保留列表文件
    #[arg(long, default_value = "./includes.ini")]
    pub includes: PathBuf,

    /// 强制剔除列表文件
    #[arg(long, default_value = "./excludes.ini")]
    pub excludes: PathBuf,

    /// 启用强制保留列表
    #[arg(long)]
    pub use_includes: bool,

    /// 启用强制剔除列表
    #[arg(long)]
    pub use_excludes: bool,

    /// 先从远程下载最新规则再修剪
    #[arg(long)]
    pub download: bool,

    /// 不补充 VirtualStore 镜像键
    #[arg(long)]
    pub no_virtual_store: bool,
}

impl TrimCommand {
    fn into_config(self) -> TrimConfig {
        let output = self.output.unwrap_or_else(|| self.input.clone());
        TrimConfig {
            input: self.input,
            output,
            includes_path: self.includes,
            excludes_path: self.excludes,
            use_includes: self.use_includes,
            use_excludes: self.use_excludes,
            download: self.download,
            virtual_store: !self.no_virtual_store,
        }
    }
}

pub async fn execute(cmd: TrimCommand) -> Result<()> {
    let config = cmd.into_config();

    // 1. 读取规则文件
    let text = if config.download {
        download::fetch_ruleset().await?
    } else {
        std::fs::read_to_string(&config.input)?
    };

    if text.trim().is_empty() {
        anyhow::bail!("输入文件为空: {}", config.input.display());
    }

    let ini = parser::parse_ini(&text)?;
    if ini.is_empty() {
        anyhow::bail!("输入文件不含任何条目: {}", config.input.display());
    }
    let mut file = Winapp2File::from_ini(&ini);

    // 2. 装载强制保留/剔除表
    let overrides = load_overrides(&config)?;

    // 3. 按当前主机逐条裁决
    println!("正在按当前主机修剪 {} 个条目...", file.entry_count());
    let host = LiveHost::new();
    let summary = trimmer::trim_ruleset(&mut file, &host, &overrides, config.virtual_store);

    // 4. 写回
    std::fs::write(&config.output, writer::write_ini(&file.to_ini()))?;

    // 5. 汇总
    println!("\n--- 修剪完成 ---");
    println!("  初始条目: {}", summary.initial);
    println!("  保留条目: {}", summary.remaining);
    println!("  移除条目: {}", summary.removed());
    println!("  移除比例: {}%", summary.percent_removed());
    println!("  已写入: {}", config.output.display());

    Ok(())
}

/// 读取覆盖表，仅在对应开关打开时读取对应文件
fn load_overrides(config: &TrimConfig) -> Result<Overrides> {
    let mut overrides = Overrides {
        use_includes: config.use_includes,
        use_excludes: config.use_excludes,
        ..Default::default()
    };

    if config.use_includes {
        overrides.includes = load_section_names(&config.includes_path)?;
    }
    if config.use_excludes {
        overrides.excludes = load_section_names(&config.excludes_path)?;
    }

    Ok(overrides)
}

/// 覆盖表文件里每个节名就是一个条目名
fn load_section_names(path: &Path) -> Result<HashSet<String>> {
    let text = std::fs::read_to_string(path)?;
    let ini = parser::parse_ini(&text)?;
    Ok(ini.sections.into_iter().map(|s| s.name).collect())
}
