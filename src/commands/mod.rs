pub mod download;
pub mod trim;

use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// 按当前主机修剪 winapp2.ini 规则
    Trim(trim::TrimCommand),

    /// 下载最新的社区版 winapp2.ini
    Download(download::DownloadCommand),
}
