//! レビューワークフローで扱う型定義
//!
//! - SelectedFile: ユーザーが選んだ動画（ピッカー/ドラッグ&ドロップ）
//! - AnalysisResult: 解析サービスのレスポンス（処理済み動画URL + フィードバック）
//! - Feedback: 文字列 または ラベル→値 のペア列

use crate::error::{Error, Result};
use bytes::Bytes;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// ファイルピッカーで受け付ける拡張子（あくまで目安。検証はサービス側）
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv", "webm", "m4v"];

/// 選択された動画ファイル
///
/// 中身には触れない。新しい選択で丸ごと置き換える。
#[derive(Clone, PartialEq, Eq)]
pub struct SelectedFile {
    name: String,
    mime: String,
    bytes: Bytes,
}

impl SelectedFile {
    /// ファイル名からMIMEタイプを推定して作成
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        let name = name.into();
        let mime = mime_guess::from_path(&name)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Self {
            name,
            mime,
            bytes: bytes.into(),
        }
    }

    /// MIMEタイプのヒントを上書き（ブラウザ/OSが知っている場合）
    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        let mime = mime.into();
        if !mime.trim().is_empty() {
            self.mime = mime;
        }
        self
    }

    /// ディスク上のファイルを読み込む
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| Error::Parse(format!("ファイル名がありません: {}", path.display())))?;
        Ok(Self::new(name, bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// 中身を共有したままの参照（コピーしない）
    pub fn shared_bytes(&self) -> Bytes {
        self.bytes.clone()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// MIMEヒントが動画かどうか
    pub fn is_video_hint(&self) -> bool {
        self.mime.starts_with("video/")
    }
}

impl std::fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectedFile")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// 解析結果のフィードバック
///
/// サービスは文字列かオブジェクトのどちらかを返す。ラベルは固定されていない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FeedbackRepr", into = "FeedbackRepr")]
pub enum Feedback {
    Text(String),
    /// 受信した順序を保持したラベルと値
    Fields(Vec<(String, String)>),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum FeedbackRepr {
    Text(String),
    Fields(IndexMap<String, serde_json::Value>),
}

impl From<FeedbackRepr> for Feedback {
    fn from(repr: FeedbackRepr) -> Self {
        match repr {
            FeedbackRepr::Text(text) => Feedback::Text(text),
            FeedbackRepr::Fields(map) => Feedback::Fields(
                map.into_iter()
                    .map(|(label, value)| (label, printable(value)))
                    .collect(),
            ),
        }
    }
}

impl From<Feedback> for FeedbackRepr {
    fn from(feedback: Feedback) -> Self {
        match feedback {
            Feedback::Text(text) => FeedbackRepr::Text(text),
            Feedback::Fields(fields) => FeedbackRepr::Fields(
                fields
                    .into_iter()
                    .map(|(label, value)| (label, serde_json::Value::String(value)))
                    .collect(),
            ),
        }
    }
}

/// 値を表示用の文字列にする（文字列はそのまま、nullは空）
fn printable(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// 解析サービスの成功レスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// 処理済み動画のURL（絶対URLまたはサービス起点の相対URL）
    pub video_url: String,
    pub feedback: Feedback,
}

impl AnalysisResult {
    /// レスポンス本文をパース
    ///
    /// 片方だけ揃った結果は作らない。どちらかが欠けていればエラー。
    pub fn from_json(body: &str) -> Result<Self> {
        let result: AnalysisResult = serde_json::from_str(body.trim())?;
        if result.video_url.trim().is_empty() {
            return Err(Error::Parse("video_url is empty".into()));
        }
        Ok(result)
    }
}
