use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "posture-review")]
#[command(about = "動画を姿勢解析サービスへ送信し、結果をレビューするツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 解析サービスのベースURL（設定ファイル・環境変数より優先）
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 動画を送信して解析結果を表示
    Analyze {
        /// 動画ファイル（省略時は対話入力）
        video: Option<PathBuf>,

        /// 結果をJSONで出力
        #[arg(long)]
        json: bool,

        /// 失敗時に再送信を確認しない
        #[arg(long)]
        no_retry: bool,
    },

    /// 設定を表示/編集
    Config {
        /// 解析サービスのベースURLを設定
        #[arg(long)]
        set_api_url: Option<String>,

        /// タイムアウト秒数を設定
        #[arg(long)]
        set_timeout: Option<u64>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
