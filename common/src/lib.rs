//! Posture Review Common Library
//!
//! CLIとデスクトップで共有される状態機械と型
//!
//! - selection: ファイル選択（ピッカー / ドラッグ&ドロップ）
//! - submission: 送信ライフサイクル
//! - presenter: 結果表示モデル

pub mod error;
pub mod presenter;
pub mod selection;
pub mod session;
pub mod submission;
pub mod types;

pub use error::{Error, Result, SubmitError};
pub use presenter::{present, summary_lines, PlayerAction, PlayerSlot, ReadyView, ResultView, SummaryLine};
pub use selection::DragPhase;
pub use session::{Command, Event, Notice, NoticeKind, RequestState, Session, Ticket};
pub use submission::SubmitRejected;
pub use types::{AnalysisResult, Feedback, SelectedFile, VIDEO_EXTENSIONS};
