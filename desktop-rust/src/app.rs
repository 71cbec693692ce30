use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use eframe::egui::{self, Color32, RichText};
use posture_review::client::{AnalysisService, HttpAnalysisService};
use posture_review_common::{
    present, Command, DragPhase, Event, Notice, NoticeKind, PlayerAction, PlayerSlot, ReadyView,
    RequestState, ResultView, Session, SubmitError, SummaryLine,
};

use crate::io::{load_dropped, load_video, pick_video};

const NOTICE_TTL: Duration = Duration::from_secs(6);

pub struct DesktopApp {
    session: Session,
    player: PlayerSlot,
    service: Arc<HttpAnalysisService>,
    endpoint: String,
    tx: Sender<Event>,
    rx: Receiver<Event>,
    status: String,
    shown_notice: Option<(Notice, Instant)>,
}

impl DesktopApp {
    pub fn new(service: HttpAnalysisService) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            session: Session::new(),
            player: PlayerSlot::new(),
            endpoint: service.endpoint().to_string(),
            service: Arc::new(service),
            tx,
            rx,
            status: String::new(),
            shown_notice: None,
        }
    }

    fn dispatch(&mut self, event: Event, ctx: &egui::Context) {
        if let Some(command) = self.session.apply(event) {
            self.execute(command, ctx);
        }
    }

    fn execute(&self, command: Command, ctx: &egui::Context) {
        match command {
            Command::Upload { ticket, file } => {
                let service = Arc::clone(&self.service);
                let sender = self.tx.clone();
                let ctx = ctx.clone();

                std::thread::spawn(move || {
                    let outcome = match tokio::runtime::Builder::new_current_thread()
                        .enable_all()
                        .build()
                    {
                        Ok(runtime) => runtime.block_on(service.analyze(&file)),
                        Err(err) => Err(SubmitError::Transport(format!("runtime: {err}"))),
                    };
                    let _ = sender.send(Event::Settled { ticket, outcome });
                    ctx.request_repaint();
                });
            }
        }
    }

    fn open_video(&mut self, ctx: &egui::Context) {
        let Some(path) = pick_video() else {
            return;
        };
        match load_video(&path) {
            Ok(file) => {
                self.status = format!("Selected {}", path.display());
                self.dispatch(Event::PickerChanged(file), ctx);
            }
            Err(err) => self.status = format!("Load failed: {err:#}"),
        }
    }

    fn poll_messages(&mut self, ctx: &egui::Context) {
        while let Ok(event) = self.rx.try_recv() {
            self.dispatch(event, ctx);
        }
    }

    fn handle_file_drag(&mut self, ctx: &egui::Context) {
        let (hovering, dropped) =
            ctx.input(|i| (!i.raw.hovered_files.is_empty(), i.raw.dropped_files.clone()));

        if !dropped.is_empty() {
            self.dispatch(Event::Drag(DragPhase::Dropped), ctx);
            if dropped.len() > 1 {
                tracing::debug!(count = dropped.len(), "multiple files dropped, reading the first");
            }
            // only the first entry is used, so only the first is read from disk
            match dropped.first().map(load_dropped) {
                Some(Ok(file)) => {
                    self.status = format!("Dropped {}", file.name());
                    self.dispatch(Event::Dropped(vec![file]), ctx);
                }
                Some(Err(err)) => self.status = format!("Load failed: {err:#}"),
                None => {}
            }
            return;
        }

        if hovering && !self.session.drag_active() {
            self.dispatch(Event::Drag(DragPhase::Enter), ctx);
        } else if !hovering && self.session.drag_active() {
            self.dispatch(Event::Drag(DragPhase::Leave), ctx);
        }
    }

    fn expire_notice(&mut self) {
        let Some(current) = self.session.notice().cloned() else {
            self.shown_notice = None;
            return;
        };

        let same = matches!(&self.shown_notice, Some((shown, _)) if *shown == current);
        if !same {
            self.shown_notice = Some((current, Instant::now()));
            return;
        }

        let expired = self
            .shown_notice
            .as_ref()
            .is_some_and(|(_, since)| since.elapsed() >= NOTICE_TTL);
        if expired {
            self.session.dismiss_notice();
            self.shown_notice = None;
        }
    }

    fn render_drop_zone(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let active = self.session.drag_active();
        let frame = egui::Frame::none()
            .fill(if active { Color32::from_rgb(31, 35, 48) } else { Color32::from_rgb(24, 28, 40) })
            .stroke(egui::Stroke::new(
                1.0,
                if active { Color32::from_rgb(246, 196, 69) } else { Color32::from_gray(60) },
            ))
            .rounding(egui::Rounding::same(10.0))
            .inner_margin(egui::Margin::same(16.0));

        frame.show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.vertical_centered(|ui| {
                match self.session.selected() {
                    Some(file) => {
                        ui.label(RichText::new(file.name()).strong().size(16.0));
                        ui.label(
                            RichText::new(format!("{} · {} bytes", file.mime(), file.len()))
                                .color(Color32::from_gray(170)),
                        );
                    }
                    None => {
                        ui.label("Drop a video here");
                    }
                }
                ui.add_space(6.0);
                if ui.button("Choose video...").clicked() {
                    self.open_video(ctx);
                }
            });
        });
    }

    fn render_notice(&mut self, ui: &mut egui::Ui) {
        let Some(notice) = self.session.notice().cloned() else {
            return;
        };
        let color = match notice.kind {
            NoticeKind::Validation => Color32::from_rgb(246, 196, 69),
            NoticeKind::Failure => Color32::from_rgb(235, 87, 87),
        };
        ui.horizontal(|ui| {
            ui.label(RichText::new(&notice.message).color(color));
            if ui.small_button("Dismiss").clicked() {
                self.session.dismiss_notice();
            }
        });
    }

    fn render_result(&self, ui: &mut egui::Ui, view: &ReadyView<'_>) {
        ui.heading("Result");
        ui.separator();

        // keyed by generation so a new URL never reuses the previous player's state
        ui.push_id(("player", self.player.generation()), |ui| {
            ui.group(|ui| {
                ui.label(RichText::new("Processed video").strong());
                ui.hyperlink_to(view.video_url, view.video_url);
            });
        });

        ui.add_space(8.0);
        ui.group(|ui| {
            ui.set_min_width(ui.available_width());
            for line in &view.summary {
                match line {
                    SummaryLine::Text(text) => {
                        ui.label(text);
                    }
                    SummaryLine::Labeled { label, value } => {
                        ui.horizontal(|ui| {
                            ui.label(RichText::new(format!("{label}:")).strong());
                            ui.label(value.as_str());
                        });
                    }
                }
            }
        });
    }
}

impl eframe::App for DesktopApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_messages(ctx);
        self.handle_file_drag(ctx);
        self.expire_notice();

        if self.shown_notice.is_some() {
            ctx.request_repaint_after(Duration::from_millis(500));
        }

        let submitting = self.session.request_state() == RequestState::Submitting;

        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Video").clicked() {
                        self.open_video(ctx);
                        ui.close_menu();
                    }
                });

                // a missing file still dispatches so the validation notice shows up
                if ui.add_enabled(!submitting, egui::Button::new("Analyze")).clicked() {
                    self.dispatch(Event::SubmitClicked, ctx);
                }

                ui.separator();
                ui.label(RichText::new(&self.endpoint).color(Color32::from_gray(140)));
                if !self.status.is_empty() {
                    ui.separator();
                    ui.label(RichText::new(&self.status).color(Color32::from_gray(170)));
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Posture Review");
            ui.add_space(8.0);
            self.render_drop_zone(ui, ctx);
            ui.add_space(8.0);
            self.render_notice(ui);
            ui.add_space(8.0);

            let view = present(&self.session);
            if let PlayerAction::Load { url, generation } = self.player.sync(view.video_url()) {
                tracing::debug!(%url, generation, "player source changed");
            }

            egui::ScrollArea::vertical().show(ui, |ui| match &view {
                ResultView::Empty => {}
                ResultView::InProgress => {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Analyzing...");
                    });
                }
                ResultView::Ready(ready) => self.render_result(ui, ready),
            });
        });
    }
}
