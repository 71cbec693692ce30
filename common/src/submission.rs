//! 送信のライフサイクル管理

use crate::error::SubmitError;
use crate::session::{Command, Notice, Phase, Session, Ticket};
use crate::types::AnalysisResult;
use tracing::{debug, info, warn};

/// 送信が受け付けられなかった理由
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejected {
    /// ファイル未選択（検証通知を出す）
    NoFile,
    /// 既に送信中
    InFlight,
}

impl std::fmt::Display for SubmitRejected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmitRejected::NoFile => write!(f, "no file selected"),
            SubmitRejected::InFlight => write!(f, "a submission is already in flight"),
        }
    }
}

impl Session {
    /// 選択中のファイルの送信を開始する
    ///
    /// 成功すると `Submitting` になり、シェルが実行すべき `Command::Upload` を返す。
    pub fn submit(&mut self) -> Result<Command, SubmitRejected> {
        if let Phase::Submitting(ticket) = self.phase {
            debug!(%ticket, "submit ignored while submitting");
            return Err(SubmitRejected::InFlight);
        }
        let Some(file) = self.selected.clone() else {
            self.notice = Some(Notice::validation());
            return Err(SubmitRejected::NoFile);
        };

        let ticket = self.next_ticket();
        self.phase = Phase::Submitting(ticket);
        self.notice = None;
        info!(%ticket, name = file.name(), bytes = file.len(), "submitting video");

        Ok(Command::Upload { ticket, file })
    }

    /// 送信結果を反映する
    ///
    /// 現在送信中の番号と一致しない結果は破棄する。反映したら `true`。
    pub fn settle(&mut self, ticket: Ticket, outcome: Result<AnalysisResult, SubmitError>) -> bool {
        if self.in_flight() != Some(ticket) {
            debug!(%ticket, current = ?self.in_flight(), "stale response ignored");
            return false;
        }

        match outcome {
            Ok(result) => {
                info!(%ticket, video_url = %result.video_url, "analysis succeeded");
                self.phase = Phase::Succeeded(result);
                self.notice = None;
            }
            Err(err) => {
                warn!(%ticket, error = %err, "analysis failed");
                self.phase = Phase::Failed;
                self.notice = Some(Notice::failure());
            }
        }
        true
    }
}
