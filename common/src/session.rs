//! レビューセッションの状態コンテナ
//!
//! 選択・送信・結果表示の状態はすべて `Session` が持つ。
//! 状態を変えられるのは `Session::apply` に渡したイベントだけ。

use crate::error::SubmitError;
use crate::selection::DragPhase;
use crate::types::{AnalysisResult, SelectedFile};

/// 送信のライフサイクル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

impl RequestState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestState::Idle => "idle",
            RequestState::Submitting => "submitting",
            RequestState::Succeeded => "succeeded",
            RequestState::Failed => "failed",
        }
    }
}

/// 送信ごとに発行する番号
///
/// 解決イベントは自分の番号が現在の送信と一致するときだけ反映される。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Ticket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 通知の種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// 送信前の入力不備（ファイル未選択）
    Validation,
    /// 解析を完了できなかった
    Failure,
}

/// ユーザー向けの一時的な通知
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub(crate) fn validation() -> Self {
        Self {
            kind: NoticeKind::Validation,
            message: "Please select a video file first.".to_string(),
        }
    }

    pub(crate) fn failure() -> Self {
        Self {
            kind: NoticeKind::Failure,
            message: "Processing failed: the video could not be analyzed. Please try again."
                .to_string(),
        }
    }
}

/// 状態機械への入力
#[derive(Debug, Clone)]
pub enum Event {
    /// ファイルダイアログで選択された
    PickerChanged(SelectedFile),
    /// ドロップされた（先頭のみ使用）
    Dropped(Vec<SelectedFile>),
    /// ドロップ領域上のドラッグ状態
    Drag(DragPhase),
    /// 送信ボタン
    SubmitClicked,
    /// 送信が完了した
    Settled {
        ticket: Ticket,
        outcome: Result<AnalysisResult, SubmitError>,
    },
}

/// 状態機械がシェルに依頼する副作用
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `file` を解析サービスへ1回だけ送信し、結果を `Event::Settled` で返す
    Upload { ticket: Ticket, file: SelectedFile },
}

impl Command {
    pub fn ticket(&self) -> Ticket {
        match self {
            Command::Upload { ticket, .. } => *ticket,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) enum Phase {
    #[default]
    Idle,
    Submitting(Ticket),
    Succeeded(AnalysisResult),
    Failed,
}

/// 単一所有者の状態コンテナ
#[derive(Debug, Default)]
pub struct Session {
    pub(crate) selected: Option<SelectedFile>,
    pub(crate) phase: Phase,
    pub(crate) notice: Option<Notice>,
    pub(crate) drag_active: bool,
    pub(crate) issued: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// イベントを1つ適用し、必要なら副作用を返す
    pub fn apply(&mut self, event: Event) -> Option<Command> {
        match event {
            Event::PickerChanged(file) => {
                self.select_from_picker(file);
                None
            }
            Event::Dropped(files) => {
                self.select_from_drop(files);
                None
            }
            Event::Drag(phase) => {
                self.drag_state_change(phase);
                None
            }
            Event::SubmitClicked => self.submit().ok(),
            Event::Settled { ticket, outcome } => {
                self.settle(ticket, outcome);
                None
            }
        }
    }

    pub fn request_state(&self) -> RequestState {
        match self.phase {
            Phase::Idle => RequestState::Idle,
            Phase::Submitting(_) => RequestState::Submitting,
            Phase::Succeeded(_) => RequestState::Succeeded,
            Phase::Failed => RequestState::Failed,
        }
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    /// 表示中の解析結果（`Succeeded` のときだけ存在）
    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.phase {
            Phase::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    /// 送信中の番号
    pub fn in_flight(&self) -> Option<Ticket> {
        match self.phase {
            Phase::Submitting(ticket) => Some(ticket),
            _ => None,
        }
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// 通知を閉じる（状態は変えない）
    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn drag_active(&self) -> bool {
        self.drag_active
    }

    pub(crate) fn next_ticket(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    /// 選択変更で下流の状態をすべて破棄する
    pub(crate) fn reset_downstream(&mut self) {
        self.phase = Phase::Idle;
        self.notice = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Feedback;

    fn video(name: &str) -> SelectedFile {
        SelectedFile::new(name, vec![0u8; 8])
    }

    fn sitting() -> AnalysisResult {
        AnalysisResult {
            video_url: "https://x/out.mp4".to_string(),
            feedback: Feedback::Text("ok posture".to_string()),
        }
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = Session::new();
        assert_eq!(session.request_state(), RequestState::Idle);
        assert!(session.selected().is_none());
        assert!(session.result().is_none());
        assert!(session.notice().is_none());
        assert!(!session.drag_active());
    }

    #[test]
    fn test_apply_full_cycle() {
        let mut session = Session::new();
        assert_eq!(session.apply(Event::PickerChanged(video("a.mp4"))), None);

        let command = session.apply(Event::SubmitClicked).expect("upload command");
        let Command::Upload { ticket, file } = command;
        assert_eq!(file.name(), "a.mp4");
        assert_eq!(session.request_state(), RequestState::Submitting);
        assert_eq!(session.in_flight(), Some(ticket));

        let next = session.apply(Event::Settled {
            ticket,
            outcome: Ok(sitting()),
        });
        assert_eq!(next, None);
        assert_eq!(session.request_state(), RequestState::Succeeded);
        assert_eq!(session.result(), Some(&sitting()));
        assert_eq!(session.in_flight(), None);
    }

    #[test]
    fn test_tickets_increase() {
        let mut session = Session::new();
        let first = session.next_ticket();
        let second = session.next_ticket();
        assert!(second > first);
        assert_eq!(first.to_string(), "#1");
    }

    #[test]
    fn test_dismiss_notice_keeps_state() {
        let mut session = Session::new();
        session.apply(Event::SubmitClicked);
        assert!(session.notice().is_some());

        session.dismiss_notice();
        assert!(session.notice().is_none());
        assert_eq!(session.request_state(), RequestState::Idle);
    }

    #[test]
    fn test_request_state_as_str() {
        assert_eq!(RequestState::Idle.as_str(), "idle");
        assert_eq!(RequestState::Submitting.as_str(), "submitting");
        assert_eq!(RequestState::Succeeded.as_str(), "succeeded");
        assert_eq!(RequestState::Failed.as_str(), "failed");
    }
}
