//! イベント駆動のディスパッチループ
//!
//! `Session` を1か所で所有し、イベントチャネルから順に適用する。
//! アップロードはタスクとして走らせ、完了を同じチャネルに `Settled` として戻す。

use crate::client::AnalysisService;
use posture_review_common::{Command, Event, RequestState, Session};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

pub struct Runner<S> {
    session: Session,
    service: Arc<S>,
    tx: UnboundedSender<Event>,
    rx: UnboundedReceiver<Event>,
}

impl<S> Runner<S>
where
    S: AnalysisService + 'static,
{
    pub fn new(service: Arc<S>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            session: Session::new(),
            service,
            tx,
            rx,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// 外部（UIなど）からイベントを送るための送信側
    pub fn sender(&self) -> UnboundedSender<Event> {
        self.tx.clone()
    }

    /// イベントを即座に適用し、副作用があれば実行する
    pub fn dispatch(&mut self, event: Event) {
        if let Some(command) = self.session.apply(event) {
            self.execute(command);
        }
    }

    fn execute(&self, command: Command) {
        match command {
            Command::Upload { ticket, file } => {
                let service = Arc::clone(&self.service);
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let outcome = service.analyze(&file).await;
                    debug!(%ticket, ok = outcome.is_ok(), "upload settled");
                    // 受信側が先に終了していれば結果は捨てる
                    let _ = tx.send(Event::Settled { ticket, outcome });
                });
            }
        }
    }

    /// チャネルから次のイベントを1つ受け取って適用する
    pub async fn step(&mut self) -> bool {
        match self.rx.recv().await {
            Some(event) => {
                self.dispatch(event);
                true
            }
            None => false,
        }
    }

    /// `Submitting` を抜けるまでイベントを処理する
    ///
    /// 古い送信の結果が先に届いても無視されるので、そのまま待ち続ける。
    pub async fn run_until_settled(&mut self) -> RequestState {
        while self.session.request_state() == RequestState::Submitting {
            if !self.step().await {
                break;
            }
        }
        self.session.request_state()
    }
}
