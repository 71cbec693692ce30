//! 解析結果の表示モデル
//!
//! 状態から表示内容を決める純粋関数と、動画プレイヤーの再初期化判定。

use crate::session::{RequestState, Session};
use crate::types::Feedback;

/// サマリーの1行
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryLine {
    /// 文字列フィードバック（そのまま表示）
    Text(String),
    /// ラベル付きの値
    Labeled { label: String, value: String },
}

impl std::fmt::Display for SummaryLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SummaryLine::Text(text) => write!(f, "{}", text),
            SummaryLine::Labeled { label, value } => write!(f, "{}: {}", label, value),
        }
    }
}

/// 結果ブロックの内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadyView<'a> {
    pub video_url: &'a str,
    pub summary: Vec<SummaryLine>,
}

/// 結果エリアに何を出すか
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultView<'a> {
    /// 何も表示しない（Idle / Failed）
    Empty,
    /// 解析中インジケータ
    InProgress,
    Ready(ReadyView<'a>),
}

impl<'a> ResultView<'a> {
    /// プレイヤーに渡すURL
    pub fn video_url(&self) -> Option<&'a str> {
        match self {
            ResultView::Ready(view) => Some(view.video_url),
            _ => None,
        }
    }
}

/// セッションの状態から表示内容を決める
pub fn present(session: &Session) -> ResultView<'_> {
    match (session.request_state(), session.result()) {
        (RequestState::Submitting, _) => ResultView::InProgress,
        (RequestState::Succeeded, Some(result)) => ResultView::Ready(ReadyView {
            video_url: &result.video_url,
            summary: summary_lines(&result.feedback),
        }),
        _ => ResultView::Empty,
    }
}

/// フィードバックを表示行に変換（キーは決め打ちしない）
pub fn summary_lines(feedback: &Feedback) -> Vec<SummaryLine> {
    match feedback {
        Feedback::Text(text) => vec![SummaryLine::Text(text.clone())],
        Feedback::Fields(fields) => fields
            .iter()
            .map(|(label, value)| SummaryLine::Labeled {
                label: label.clone(),
                value: value.clone(),
            })
            .collect(),
    }
}

/// プレイヤーへの指示
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerAction {
    /// 新しいURL。前の再生状態を捨てて作り直す
    Load { url: String, generation: u64 },
    /// 同じURLのまま
    Keep,
    /// 表示するものがない
    Unload,
}

/// 動画プレイヤーの枠
///
/// URLが変わるたびに世代を進める。表示側は世代をキーにしてプレイヤーを作り直す。
#[derive(Debug, Clone, Default)]
pub struct PlayerSlot {
    source: Option<String>,
    generation: u64,
}

impl PlayerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sync(&mut self, url: Option<&str>) -> PlayerAction {
        match url {
            Some(url) if self.source.as_deref() == Some(url) => PlayerAction::Keep,
            Some(url) => {
                self.generation += 1;
                self.source = Some(url.to_string());
                PlayerAction::Load {
                    url: url.to_string(),
                    generation: self.generation,
                }
            }
            None if self.source.is_none() => PlayerAction::Keep,
            None => {
                self.source = None;
                PlayerAction::Unload
            }
        }
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
