use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// 社区维护的 winapp2.ini 原始文件地址
pub const WINAPP2_URL: &str =
    "https://raw.githubusercontent.com/MoscaDotTo/Winapp2/master/Winapp2.ini";

#[derive(Parser, Debug)]
pub struct DownloadCommand {
    /// 保存路径
    #[arg(long, default_value = "./winapp2.ini")]
    pub output: PathBuf,
}

pub async fn execute(cmd: DownloadCommand) -> Result<()> {
    println!("正在下载 winapp2.ini ...");

    let text = fetch_ruleset().await?;
    std::fs::write(&cmd.output, &text)?;

    println!("已保存到: {}", cmd.output.display());
    Ok(())
}

/// 拉取远程规则文件，离线时拒绝执行
pub async fn fetch_ruleset() -> Result<String> {
    if !is_online().await {
        anyhow::bail!("网络不可用，无法下载 winapp2.ini");
    }

    tracing::info!("下载规则文件: {}", WINAPP2_URL);
    let response = reqwest::get(WINAPP2_URL).await?;
    if !response.status().is_success() {
        anyhow::bail!("下载失败: HTTP {}", response.status());
    }

    Ok(response.text().await?)
}

/// 联机检查：对下载地址发一次 HEAD 请求
pub async fn is_online() -> bool {
    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
    {
        Ok(client) => client,
        Err(_) => return false,
    };

    client.head(WINAPP2_URL).send().await.is_ok()
}
