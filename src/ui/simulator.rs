use crate::event::AppEvent;
use crate::provider::ContentService;
use crate::report::ProjectIdea;
use crate::theme::Theme;
use eframe::egui::{self, RichText};
use std::sync::mpsc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// "Project Society" form: proposes a project for a skill and an interest and
/// prices it in energy credits.
pub struct IdeaSimulator {
    service: ContentService,
    runtime: Handle,
    tx: mpsc::Sender<AppEvent>,
    skill: String,
    interest: String,
    pending: bool,
    result: Option<ProjectIdea>,
}

impl IdeaSimulator {
    pub fn new(service: ContentService, runtime: Handle, tx: mpsc::Sender<AppEvent>) -> Self {
        Self {
            service,
            runtime,
            tx,
            skill: String::new(),
            interest: String::new(),
            pending: false,
            result: None,
        }
    }

    pub fn can_submit(&self) -> bool {
        !self.pending && !self.skill.trim().is_empty() && !self.interest.trim().is_empty()
    }

    pub fn submit(&mut self) -> Option<JoinHandle<()>> {
        if !self.can_submit() {
            return None;
        }
        self.pending = true;

        let service = self.service.clone();
        let tx = self.tx.clone();
        let skill = self.skill.trim().to_string();
        let interest = self.interest.trim().to_string();
        Some(self.runtime.spawn(async move {
            let idea = service.evaluate_idea(&skill, &interest).await;
            let _ = tx.send(AppEvent::IdeaEvaluated(idea));
        }))
    }

    pub fn apply_result(&mut self, idea: ProjectIdea) {
        self.pending = false;
        self.result = Some(idea);
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn render(&mut self, ui: &mut egui::Ui, theme: &Theme) {
        theme
            .panel_frame(theme.surface_1, theme.spacing_24 as i8)
            .stroke(egui::Stroke::new(1.0, theme.accent_strong.gamma_multiply(0.5)))
            .show(ui, |ui| {
                ui.label(
                    RichText::new("Project Society Simulator")
                        .color(theme.accent_primary)
                        .size(20.0)
                        .strong(),
                );
                ui.label(
                    RichText::new(
                        "In a society without labor, which project would you create value with? \
                         Enter your skill and interest to see your future role and Energy Credit (EC) reward.",
                    )
                    .color(theme.text_muted),
                );
                ui.add_space(theme.spacing_12);

                ui.columns(2, |columns| {
                    columns[0].label(
                        RichText::new("Core skill (e.g. coding, cooking, writing)")
                            .color(theme.text_body)
                            .size(12.0),
                    );
                    columns[0].add(
                        egui::TextEdit::singleline(&mut self.skill)
                            .desired_width(f32::INFINITY)
                            .hint_text("Your ability"),
                    );
                    columns[1].label(
                        RichText::new("Field of interest (e.g. space, history, environment)")
                            .color(theme.text_body)
                            .size(12.0),
                    );
                    columns[1].add(
                        egui::TextEdit::singleline(&mut self.interest)
                            .desired_width(f32::INFINITY)
                            .hint_text("A topic you care about"),
                    );
                });
                ui.add_space(theme.spacing_8);

                let label = if self.pending {
                    "Evaluating..."
                } else {
                    "Propose a project & evaluate Energy Credits"
                };
                let button = egui::Button::new(RichText::new(label).color(theme.text_primary).strong())
                    .fill(theme.accent_strong)
                    .corner_radius(egui::CornerRadius::same(theme.radius_8))
                    .min_size(egui::vec2(ui.available_width(), theme.button_height));
                if ui.add_enabled(self.can_submit(), button).clicked() {
                    self.submit();
                }

                if let Some(idea) = &self.result {
                    ui.add_space(theme.spacing_12);
                    render_result(ui, theme, idea);
                }
            });
    }
}

fn render_result(ui: &mut egui::Ui, theme: &Theme, idea: &ProjectIdea) {
    theme.card_frame().fill(theme.surface_0).show(ui, |ui| {
        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                ui.label(
                    RichText::new(&idea.project_name)
                        .color(theme.text_primary)
                        .size(18.0)
                        .strong(),
                );
                let (status, color) = if idea.placeholder {
                    ("Evaluation failed", theme.danger)
                } else {
                    ("Project proposal approved", theme.accent_primary)
                };
                ui.label(RichText::new(status).color(color).size(12.0));
            });
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
                ui.vertical(|ui| {
                    ui.label(
                        RichText::new(format!("{:.0} EC", idea.energy_credits))
                            .color(theme.warning)
                            .size(22.0)
                            .strong(),
                    );
                    ui.label(RichText::new("Expected reward").color(theme.text_muted).size(11.0));
                });
            });
        });
        ui.add_space(theme.spacing_8);
        ui.label(RichText::new(&idea.description).color(theme.text_body));
        ui.add_space(theme.spacing_8);
        ui.label(
            RichText::new(format!("Why it matters: {}", idea.reasoning))
                .color(theme.text_muted)
                .italics(),
        );
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use crate::provider::{ContentProvider, IdeaRequest, SectionRequest};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct IdeaProvider;

    #[async_trait]
    impl ContentProvider for IdeaProvider {
        fn name(&self) -> &str {
            "idea"
        }

        async fn generate_section(&self, _request: &SectionRequest) -> Result<String, ProviderError> {
            Err(ProviderError::EmptyResponse)
        }

        async fn evaluate_idea(&self, request: &IdeaRequest) -> Result<String, ProviderError> {
            Ok(format!(
                r#"{{"projectName":"{} for {}","description":"d","energyCredits":750,"reasoning":"r"}}"#,
                request.skill, request.interest
            ))
        }
    }

    fn simulator() -> (IdeaSimulator, mpsc::Receiver<AppEvent>) {
        let (tx, rx) = mpsc::channel();
        let simulator = IdeaSimulator::new(
            ContentService::new(Arc::new(IdeaProvider)),
            Handle::current(),
            tx,
        );
        (simulator, rx)
    }

    #[tokio::test]
    async fn blank_inputs_cannot_be_submitted() {
        let (mut simulator, _rx) = simulator();
        assert!(!simulator.can_submit());
        simulator.skill = "coding".to_string();
        simulator.interest = "   ".to_string();
        assert!(simulator.submit().is_none());
        assert!(!simulator.is_pending());
    }

    #[tokio::test]
    async fn submission_round_trip_updates_result() {
        let (mut simulator, rx) = simulator();
        simulator.skill = " coding ".to_string();
        simulator.interest = "space".to_string();

        let task = simulator.submit().expect("submission starts");
        assert!(simulator.is_pending());
        assert!(simulator.submit().is_none());
        task.await.expect("evaluation task");

        let Ok(AppEvent::IdeaEvaluated(idea)) = rx.try_recv() else {
            panic!("expected an idea evaluation event");
        };
        assert_eq!(idea.project_name, "coding for space");
        simulator.apply_result(idea);
        assert!(!simulator.is_pending());
        assert!(simulator.can_submit());
        assert_eq!(
            simulator.result.as_ref().map(|idea| idea.energy_credits),
            Some(750.0)
        );
    }
}
