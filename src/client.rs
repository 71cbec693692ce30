//! 姿勢解析サービスへのアップロード
//!
//! `POST {base}/analyze-posture/` に `file` フィールド1つのマルチパートで動画を送る。

use crate::config::Config;
use crate::error::Result;
use async_trait::async_trait;
use posture_review_common::{AnalysisResult, SelectedFile, SubmitError};
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// 解析エンドポイントのパス
pub const ANALYZE_PATH: &str = "/analyze-posture/";

/// マルチパートのフィールド名
pub const UPLOAD_FIELD: &str = "file";

/// 解析サービス
///
/// 1回の呼び出しで1回だけ送信する。リトライはしない。
#[async_trait]
pub trait AnalysisService: Send + Sync {
    async fn analyze(&self, file: &SelectedFile) -> std::result::Result<AnalysisResult, SubmitError>;
}

/// reqwestによるHTTP実装
#[derive(Debug, Clone)]
pub struct HttpAnalysisService {
    client: reqwest::Client,
    base: Url,
    endpoint: Url,
}

impl HttpAnalysisService {
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_base_url(
            &config.effective_base_url(None),
            Duration::from_secs(config.timeout_seconds),
        )
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        // 相対URLの解決用に末尾スラッシュ付きで持つ
        let base = Url::parse(&format!("{}/", trimmed))?;
        let endpoint = Url::parse(&format!("{}{}", trimmed, ANALYZE_PATH))?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// レスポンスの `video_url` を絶対URLにする
    ///
    /// 再生に使うので http / https 以外は不正なレスポンスとして扱う。
    pub fn resolve_video_url(&self, video_url: &str) -> std::result::Result<String, SubmitError> {
        let url = self
            .base
            .join(video_url.trim())
            .map_err(|e| SubmitError::Response(format!("invalid video_url {:?}: {}", video_url, e)))?;
        match url.scheme() {
            "http" | "https" => Ok(url.to_string()),
            scheme => Err(SubmitError::Response(format!(
                "unsupported video_url scheme {:?}: {}",
                scheme, video_url
            ))),
        }
    }
}

#[async_trait]
impl AnalysisService for HttpAnalysisService {
    async fn analyze(&self, file: &SelectedFile) -> std::result::Result<AnalysisResult, SubmitError> {
        // 動画本体は共有バッファのまま渡す
        let part = Part::stream_with_length(file.shared_bytes(), file.len() as u64)
            .file_name(file.name().to_string())
            .mime_str(file.mime())
            .map_err(|e| SubmitError::Transport(e.to_string()))?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        debug!(endpoint = %self.endpoint, name = file.name(), "POST multipart");
        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        if !status.is_success() {
            debug!(%status, body = %body, "service returned error status");
            return Err(SubmitError::Response(format!("HTTP {}", status)));
        }

        let mut result =
            AnalysisResult::from_json(&body).map_err(|e| SubmitError::Response(e.to_string()))?;
        result.video_url = self.resolve_video_url(&result.video_url)?;
        Ok(result)
    }
}
