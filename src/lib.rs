//! 姿勢解析サービス向けのアップロード・レビュークライアント
//!
//! 状態機械は `posture_review_common`、ここではHTTP送信・設定・ログ・ディスパッチループを持つ。

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod runner;
