//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

/// 送信失敗の種別
///
/// どちらもユーザーには同じ失敗通知として見せる。詳細はログにのみ残す。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// 送信できなかった、またはレスポンスを受け取れなかった
    #[error("transport error: {0}")]
    Transport(String),

    /// レスポンスは届いたが成功ステータスでない、または本文が不正
    #[error("response error: {0}")]
    Response(String),
}
