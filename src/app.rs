use crate::coordinator::FetchCoordinator;
use crate::event::AppEvent;
use crate::report::{Outline, SectionStatus};
use crate::theme::Theme;
use crate::tracker::{ActivationTracker, BandObserver, Span};
use crate::ui::section::SectionView;
use crate::ui::simulator::IdeaSimulator;
use eframe::egui::{self, RichText, ScrollArea};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const POLL_INTERVAL: Duration = Duration::from_millis(250);
/// Oldest diagnostics are dropped past this many lines.
const MAX_DIAGNOSTIC_LINES: usize = 500;

pub struct ReportApp {
    rx: Receiver<AppEvent>,
    outline: Outline,
    coordinator: FetchCoordinator,
    tracker: ActivationTracker<BandObserver>,
    simulator: IdeaSimulator,
    theme: Theme,
    model_name: String,
    diagnostics_log: Vec<String>,
    scroll_target: Option<String>,
    visuals_applied: bool,
}

impl ReportApp {
    pub fn new(
        rx: Receiver<AppEvent>,
        outline: Outline,
        coordinator: FetchCoordinator,
        simulator: IdeaSimulator,
        model_name: String,
    ) -> Self {
        let initial = outline.first().map(|item| item.id.clone());
        let mut tracker = ActivationTracker::new(BandObserver::default(), initial);
        tracker.sync_sections(&outline.ids());

        Self {
            rx,
            outline,
            coordinator,
            tracker,
            simulator,
            theme: Theme::default(),
            model_name,
            diagnostics_log: Vec::new(),
            scroll_target: None,
            visuals_applied: false,
        }
    }

    fn timestamp() -> String {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(duration) => duration.as_secs().to_string(),
            Err(_) => "0".to_string(),
        }
    }

    fn log_diagnostic(&mut self, message: impl Into<String>) {
        self.diagnostics_log
            .push(format!("[{}] {}", Self::timestamp(), message.into()));
        if self.diagnostics_log.len() > MAX_DIAGNOSTIC_LINES {
            let excess = self.diagnostics_log.len() - MAX_DIAGNOSTIC_LINES;
            self.diagnostics_log.drain(..excess);
        }
    }

    fn drain_events(&mut self, ctx: &egui::Context) {
        let mut layout_changed = false;
        loop {
            match self.rx.try_recv() {
                Ok(event) => {
                    layout_changed |= self.apply_event(event);
                    ctx.request_repaint();
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.log_diagnostic("event channel disconnected");
                    break;
                }
            }
        }

        if layout_changed {
            self.tracker.sync_sections(&self.outline.ids());
        }
    }

    /// Returns true when the event changed the height of a section.
    fn apply_event(&mut self, event: AppEvent) -> bool {
        match event {
            AppEvent::SectionResolved { id } => {
                self.log_diagnostic(format!("section loaded: {id}"));
                true
            }
            AppEvent::SectionFailed { id } => {
                self.log_diagnostic(format!("section failed: {id}"));
                true
            }
            AppEvent::IdeaEvaluated(idea) => {
                if idea.placeholder {
                    self.log_diagnostic("project evaluation failed");
                } else {
                    self.log_diagnostic(format!("project evaluated: {}", idea.project_name));
                }
                self.simulator.apply_result(idea);
                true
            }
        }
    }

    fn navigate_to(&mut self, id: &str) {
        self.tracker.select(id);
        if self.coordinator.request_section(id).is_some() {
            self.log_diagnostic(format!("requested section: {id}"));
        }
        self.scroll_target = Some(id.to_string());
    }

    fn has_outstanding_work(&self) -> bool {
        let state = self.coordinator.state();
        self.simulator.is_pending()
            || self.outline.items().iter().any(|item| {
                matches!(
                    state.status(&item.id),
                    SectionStatus::Unrequested | SectionStatus::InFlight
                )
            })
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        let theme = &self.theme;
        let active_title = self
            .tracker
            .active()
            .and_then(|id| self.outline.get(id))
            .map(|item| item.short_title().to_string())
            .unwrap_or_default();
        let loaded = self.coordinator.state().resolved_count();
        let fetching = self.coordinator.state().in_flight_count();
        let total = self.outline.len();

        egui::TopBottomPanel::top("top_bar")
            .frame(
                egui::Frame::new()
                    .fill(theme.surface_0)
                    .inner_margin(egui::Margin::symmetric(16, 10)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new("Post-Labor Society Report")
                            .color(theme.text_primary)
                            .strong(),
                    );
                    ui.separator();
                    ui.label(RichText::new(active_title).color(theme.accent_primary));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            RichText::new(format!("{loaded}/{total} loaded"))
                                .color(theme.text_muted)
                                .monospace(),
                        );
                        if fetching > 0 {
                            ui.label(
                                RichText::new(format!("{fetching} fetching"))
                                    .color(theme.warning)
                                    .size(12.0),
                            );
                            ui.spinner();
                        }
                        if total > 0 {
                            ui.add(
                                egui::ProgressBar::new(loaded as f32 / total as f32)
                                    .desired_width(120.0)
                                    .fill(theme.accent_strong),
                            );
                        }
                    });
                });
            });
    }

    fn render_diagnostics(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("diagnostics_panel")
            .resizable(false)
            .show(ctx, |ui| {
                egui::CollapsingHeader::new("Diagnostics")
                    .default_open(false)
                    .show(ui, |ui| {
                        ScrollArea::vertical()
                            .id_salt("diagnostics_log")
                            .max_height(90.0)
                            .stick_to_bottom(true)
                            .show(ui, |ui| {
                                for entry in &self.diagnostics_log {
                                    ui.label(RichText::new(entry).monospace().size(11.0));
                                }
                            });
                    });
            });
    }

    fn render_left_panel(&mut self, ctx: &egui::Context) {
        let mut clicked: Option<String> = None;
        let theme = &self.theme;
        let state = self.coordinator.state();
        let active = self.tracker.active();

        egui::SidePanel::left("outline_panel")
            .resizable(false)
            .exact_width(280.0)
            .frame(
                egui::Frame::new()
                    .fill(theme.surface_1)
                    .inner_margin(egui::Margin::same(theme.spacing_16 as i8)),
            )
            .show(ctx, |ui| {
                ui.label(
                    RichText::new("The Post-Labor Society")
                        .color(theme.text_primary)
                        .size(20.0)
                        .strong(),
                );
                ui.label(
                    RichText::new("Futures research report")
                        .color(theme.accent_primary)
                        .size(12.0),
                );
                ui.add_space(theme.spacing_16);
                ui.label(
                    RichText::new("CONTENTS")
                        .color(theme.text_muted)
                        .monospace()
                        .size(11.0),
                );
                ui.add_space(theme.spacing_8);

                ScrollArea::vertical()
                    .id_salt("outline_nav")
                    .max_height(ui.available_height() - 40.0)
                    .show(ui, |ui| {
                        for item in self.outline.items() {
                            let is_active = active == Some(item.id.as_str());
                            let (fill, title_color) = if is_active {
                                (theme.surface_2, theme.accent_primary)
                            } else {
                                (theme.surface_1, theme.text_body)
                            };
                            let marker = match state.status(&item.id) {
                                SectionStatus::Resolved => theme.success,
                                SectionStatus::InFlight => theme.warning,
                                SectionStatus::Failed => theme.danger,
                                SectionStatus::Unrequested => theme.surface_3,
                            };

                            let response = egui::Frame::new()
                                .fill(fill)
                                .corner_radius(egui::CornerRadius::same(theme.radius_8))
                                .inner_margin(egui::Margin::same(theme.spacing_8 as i8))
                                .show(ui, |ui| {
                                    ui.set_width(ui.available_width());
                                    ui.horizontal(|ui| {
                                        let (dot, _) = ui.allocate_exact_size(
                                            egui::vec2(8.0, 8.0),
                                            egui::Sense::hover(),
                                        );
                                        ui.painter().circle_filled(dot.center(), 3.5, marker);
                                        ui.label(
                                            RichText::new(item.short_title())
                                                .color(title_color)
                                                .strong(),
                                        );
                                    });
                                    if let Some(teaser) = item.sub_items.first() {
                                        ui.label(
                                            RichText::new(teaser)
                                                .color(theme.text_muted)
                                                .size(11.0),
                                        );
                                    }
                                })
                                .response
                                .interact(egui::Sense::click())
                                .on_hover_cursor(egui::CursorIcon::PointingHand);
                            if response.clicked() {
                                clicked = Some(item.id.clone());
                            }
                            ui.add_space(theme.spacing_4);
                        }
                    });

                ui.with_layout(egui::Layout::bottom_up(egui::Align::Min), |ui| {
                    ui.label(
                        RichText::new(format!("Powered by {}", self.model_name))
                            .color(theme.text_muted)
                            .size(11.0),
                    );
                });
            });

        if let Some(id) = clicked {
            self.navigate_to(&id);
        }
    }

    fn render_center_panel(&mut self, ctx: &egui::Context) {
        let state = self.coordinator.state().clone();
        let mut spans: Vec<(String, Span)> = Vec::with_capacity(self.outline.len());
        let mut viewport = Span::new(0.0, 0.0);

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(self.theme.surface_0))
            .show(ctx, |ui| {
                ScrollArea::vertical()
                    .id_salt("report_sections")
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        let clip = ui.clip_rect();
                        viewport = Span::new(clip.top(), clip.bottom());

                        egui::Frame::new()
                            .inner_margin(egui::Margin::symmetric(48, 0))
                            .show(ui, |ui| {
                                ui.set_max_width(960.0);
                                for (index, item) in self.outline.items().iter().enumerate() {
                                    let content = state.get(&item.id);
                                    let failure = state.failure(&item.id);
                                    let view = SectionView {
                                        index,
                                        item,
                                        status: state.status(&item.id),
                                        content: content.as_deref(),
                                        failure: failure.as_deref(),
                                    };
                                    let rect = view.show(ui, &self.theme, &mut self.simulator);

                                    if self.scroll_target.as_deref() == Some(item.id.as_str()) {
                                        ui.scroll_to_rect(rect, Some(egui::Align::TOP));
                                        self.scroll_target = None;
                                    }
                                    spans.push((item.id.clone(), Span::new(rect.top(), rect.bottom())));
                                }
                            });
                    });
            });

        self.tracker.observer_mut().measure(
            viewport,
            spans.iter().map(|(id, span)| (id.as_str(), *span)),
        );
        if let Some(active) = self.tracker.poll() {
            tracing::debug!(section = %active, "active section changed");
        }
    }
}

impl eframe::App for ReportApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.visuals_applied {
            self.theme.apply_visuals(ctx);
            self.visuals_applied = true;
        }

        self.drain_events(ctx);
        self.render_top_bar(ctx);
        self.render_left_panel(ctx);
        self.render_diagnostics(ctx);
        self.render_center_panel(ctx);

        if self.has_outstanding_work() {
            ctx.request_repaint_after(POLL_INTERVAL);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.coordinator.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PrefetchPolicy;
    use crate::error::ProviderError;
    use crate::provider::{ContentProvider, ContentService, IdeaRequest, SectionRequest};
    use crate::report::{OutlineItem, SessionState};
    use async_trait::async_trait;
    use std::sync::{mpsc, Arc};
    use tokio::runtime::Handle;
    use tokio::time::sleep;

    struct OfflineProvider;

    #[async_trait]
    impl ContentProvider for OfflineProvider {
        fn name(&self) -> &str {
            "offline"
        }

        async fn generate_section(&self, _request: &SectionRequest) -> Result<String, ProviderError> {
            Err(ProviderError::Network("connection refused".to_string()))
        }

        async fn evaluate_idea(&self, _request: &IdeaRequest) -> Result<String, ProviderError> {
            Err(ProviderError::EmptyResponse)
        }
    }

    fn app() -> ReportApp {
        let outline = Outline::new(vec![
            OutlineItem::new("a", "A", &[]),
            OutlineItem::new("b", "B", &[]),
            OutlineItem::new("c", "C", &[]),
        ]);
        let service = ContentService::new(Arc::new(OfflineProvider));
        let (tx, rx) = mpsc::channel();
        let coordinator = FetchCoordinator::new(
            outline.clone(),
            SessionState::new(),
            service.clone(),
            tx.clone(),
            Handle::current(),
            PrefetchPolicy {
                initial_delay: Duration::from_millis(1000),
                step: Duration::from_millis(1000),
            },
        );
        let simulator = IdeaSimulator::new(service, Handle::current(), tx);
        ReportApp::new(rx, outline, coordinator, simulator, "offline".to_string())
    }

    fn layout() -> [(&'static str, Span); 3] {
        [
            ("a", Span::new(0.0, 500.0)),
            ("b", Span::new(500.0, 1000.0)),
            ("c", Span::new(1000.0, 1500.0)),
        ]
    }

    #[tokio::test(start_paused = true)]
    async fn selection_survives_a_failed_fetch() {
        let mut app = app();
        let ctx = egui::Context::default();
        app.navigate_to("c");
        assert_eq!(app.tracker.active(), Some("c"));

        sleep(Duration::from_millis(50)).await;
        app.drain_events(&ctx);
        assert_eq!(app.coordinator.state().status("c"), SectionStatus::Failed);
        assert!(app
            .diagnostics_log
            .iter()
            .any(|entry| entry.ends_with("section failed: c")));
        assert_eq!(app.tracker.active(), Some("c"));

        // The failure notice is laid out where "c" scrolled to; the band lands inside it.
        app.tracker
            .observer_mut()
            .measure(Span::new(800.0, 1800.0), layout());
        app.tracker.poll();
        assert_eq!(app.tracker.active(), Some("c"));

        assert!(app.coordinator.request_section("c").is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn diagnostics_keep_only_the_newest_lines() {
        let mut app = app();
        for index in 0..MAX_DIAGNOSTIC_LINES + 10 {
            app.log_diagnostic(format!("entry {index}"));
        }
        assert_eq!(app.diagnostics_log.len(), MAX_DIAGNOSTIC_LINES);
        assert!(app.diagnostics_log[0].ends_with("] entry 10"));
        assert!(app
            .diagnostics_log
            .last()
            .is_some_and(|entry| entry.ends_with(&format!("entry {}", MAX_DIAGNOSTIC_LINES + 9))));
    }
}
