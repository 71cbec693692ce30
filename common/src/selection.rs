//! 入力ファイルの選択（ファイルピッカー / ドラッグ&ドロップ）

use crate::session::Session;
use crate::types::SelectedFile;
use tracing::{debug, warn};

/// ドロップ領域上のドラッグ状態の変化
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Enter,
    Over,
    Leave,
    /// ドロップ処理が完了した
    Dropped,
}

impl DragPhase {
    /// この段階でドラッグ中表示にするか
    pub fn is_active(&self) -> bool {
        matches!(self, DragPhase::Enter | DragPhase::Over)
    }
}

impl Session {
    /// ファイルダイアログでの選択。無条件に置き換える。
    pub fn select_from_picker(&mut self, file: SelectedFile) {
        self.replace_selection(file);
    }

    /// ドロップされたファイル群から先頭だけを採用する
    ///
    /// 空のドロップは何も変えない。選択が変わったら `true`。
    pub fn select_from_drop(&mut self, files: Vec<SelectedFile>) -> bool {
        let total = files.len();
        let Some(first) = files.into_iter().next() else {
            debug!("empty drop ignored");
            return false;
        };
        if total > 1 {
            debug!(ignored = total - 1, "multi-file drop, using the first file only");
        }
        self.replace_selection(first);
        true
    }

    /// ドラッグ中の見た目用フラグだけを更新する
    pub fn drag_state_change(&mut self, phase: DragPhase) {
        self.drag_active = phase.is_active();
    }

    fn replace_selection(&mut self, file: SelectedFile) {
        if !file.is_video_hint() {
            warn!(name = file.name(), mime = file.mime(), "selected file does not look like a video");
        }
        if let Some(ticket) = self.in_flight() {
            debug!(%ticket, "selection changed while submitting; response will be ignored");
        }
        debug!(name = file.name(), bytes = file.len(), "file selected");
        self.selected = Some(file);
        self.reset_downstream();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SubmitError;
    use crate::session::{Event, RequestState};
    use crate::types::{AnalysisResult, Feedback};

    fn video(name: &str) -> SelectedFile {
        SelectedFile::new(name, vec![0u8; 8])
    }

    fn succeeded_session() -> Session {
        let mut session = Session::new();
        session.select_from_picker(video("first.mp4"));
        let ticket = session.submit().unwrap().ticket();
        session.settle(
            ticket,
            Ok(AnalysisResult {
                video_url: "https://x/first.mp4".to_string(),
                feedback: Feedback::Text("ok posture".to_string()),
            }),
        );
        assert_eq!(session.request_state(), RequestState::Succeeded);
        session
    }

    #[test]
    fn test_picker_replaces_selection() {
        let mut session = Session::new();
        session.select_from_picker(video("a.mp4"));
        session.select_from_picker(video("b.mp4"));
        assert_eq!(session.selected().unwrap().name(), "b.mp4");
    }

    #[test]
    fn test_second_selection_clears_result() {
        let mut session = succeeded_session();
        session.select_from_picker(video("second.mp4"));

        assert_eq!(session.request_state(), RequestState::Idle);
        assert!(session.result().is_none());
        assert_eq!(session.selected().unwrap().name(), "second.mp4");
    }

    #[test]
    fn test_drop_clears_result_like_picker() {
        let mut session = succeeded_session();
        assert!(session.select_from_drop(vec![video("dropped.mov")]));

        assert_eq!(session.request_state(), RequestState::Idle);
        assert!(session.result().is_none());
    }

    #[test]
    fn test_selection_clears_failure_notice() {
        let mut session = Session::new();
        session.select_from_picker(video("a.mp4"));
        let ticket = session.submit().unwrap().ticket();
        session.settle(ticket, Err(SubmitError::Transport("refused".into())));
        assert_eq!(session.request_state(), RequestState::Failed);
        assert!(session.notice().is_some());

        session.select_from_picker(video("b.mp4"));
        assert_eq!(session.request_state(), RequestState::Idle);
        assert!(session.notice().is_none());
    }

    #[test]
    fn test_drop_uses_first_file_only() {
        let mut session = Session::new();
        let changed = session.select_from_drop(vec![video("one.mp4"), video("two.mp4"), video("three.mp4")]);
        assert!(changed);
        assert_eq!(session.selected().unwrap().name(), "one.mp4");
    }

    #[test]
    fn test_empty_drop_keeps_everything() {
        let mut session = succeeded_session();
        assert!(!session.select_from_drop(Vec::new()));

        assert_eq!(session.request_state(), RequestState::Succeeded);
        assert!(session.result().is_some());
        assert_eq!(session.selected().unwrap().name(), "first.mp4");
    }

    #[test]
    fn test_non_video_is_still_accepted() {
        let mut session = Session::new();
        session.select_from_picker(SelectedFile::new("notes.txt", b"text".to_vec()));
        assert_eq!(session.selected().unwrap().name(), "notes.txt");
    }

    #[test]
    fn test_drag_phases() {
        let mut session = Session::new();
        session.apply(Event::Drag(DragPhase::Enter));
        assert!(session.drag_active());
        session.apply(Event::Drag(DragPhase::Over));
        assert!(session.drag_active());
        session.apply(Event::Drag(DragPhase::Leave));
        assert!(!session.drag_active());
        session.apply(Event::Drag(DragPhase::Over));
        session.apply(Event::Drag(DragPhase::Dropped));
        assert!(!session.drag_active());
    }

    #[test]
    fn test_drag_does_not_touch_selection_or_state() {
        let mut session = succeeded_session();
        session.drag_state_change(DragPhase::Enter);
        session.drag_state_change(DragPhase::Leave);

        assert_eq!(session.request_state(), RequestState::Succeeded);
        assert!(session.result().is_some());
        assert_eq!(session.selected().unwrap().name(), "first.mp4");
    }
}
