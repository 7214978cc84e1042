use crate::report::{GeneratedContent, OutlineItem, SectionStatus, IDEA_SECTION_ID};
use crate::theme::Theme;
use crate::ui::{chart, markdown, simulator::IdeaSimulator, timeline};
use eframe::egui::{self, RichText};

const MIN_SECTION_HEIGHT: f32 = 480.0;

pub struct SectionView<'a> {
    pub index: usize,
    pub item: &'a OutlineItem,
    pub status: SectionStatus,
    pub content: Option<&'a GeneratedContent>,
    pub failure: Option<&'a GeneratedContent>,
}

impl SectionView<'_> {
    /// Draws the section and returns its full extent, used for scroll-spy.
    pub fn show(
        &self,
        ui: &mut egui::Ui,
        theme: &Theme,
        simulator: &mut IdeaSimulator,
    ) -> egui::Rect {
        let response = ui.vertical(|ui| {
            ui.set_min_height(MIN_SECTION_HEIGHT);
            ui.add_space(theme.spacing_24);
            self.header(ui, theme);
            ui.add_space(theme.spacing_16);

            match (self.content, self.status) {
                (Some(content), _) => {
                    markdown::render(ui, theme, &content.markdown);
                    ui.add_space(theme.spacing_16);
                    timeline::render(ui, theme, content.timeline());
                    if content.has_chart() {
                        ui.add_space(theme.spacing_16);
                        chart::render(ui, theme, content);
                    }
                    if self.item.id == IDEA_SECTION_ID {
                        ui.add_space(theme.spacing_24);
                        simulator.render(ui, theme);
                    }
                }
                (None, SectionStatus::Failed) => self.failure_card(ui, theme),
                (None, _) => skeleton(ui, theme),
            }
            ui.add_space(theme.spacing_24);
        });
        ui.separator();
        response.response.rect
    }

    fn header(&self, ui: &mut egui::Ui, theme: &Theme) {
        ui.label(
            RichText::new(format!(
                "CHAPTER {:02} \u{2014} {}",
                self.index + 1,
                self.item.id.to_uppercase()
            ))
            .color(theme.accent_strong)
            .monospace()
            .size(12.0),
        );
        ui.label(
            RichText::new(&self.item.title)
                .color(theme.text_primary)
                .size(30.0)
                .strong(),
        );
        if !self.item.sub_items.is_empty() {
            ui.add_space(theme.spacing_8);
            ui.horizontal_wrapped(|ui| {
                for sub_item in &self.item.sub_items {
                    theme.chip_frame().show(ui, |ui| {
                        ui.label(RichText::new(sub_item).color(theme.text_muted).size(11.0));
                    });
                }
            });
        }
    }

    fn failure_card(&self, ui: &mut egui::Ui, theme: &Theme) {
        theme.error_frame().show(ui, |ui| {
            ui.label(
                RichText::new("Report generation failed. Please try again shortly.")
                    .color(theme.danger)
                    .strong(),
            );
            if let Some(notice) = self.failure {
                ui.add_space(theme.spacing_8);
                markdown::render(ui, theme, &notice.markdown);
            }
            ui.add_space(theme.spacing_8);
            ui.label(
                RichText::new("Select this chapter again to retry.")
                    .color(theme.text_muted)
                    .size(12.0),
            );
        });
    }
}

fn skeleton(ui: &mut egui::Ui, theme: &Theme) {
    ui.horizontal(|ui| {
        ui.spinner();
        ui.label(
            RichText::new("AI research agent is analysing data...")
                .color(theme.text_muted)
                .monospace(),
        );
    });
    ui.add_space(theme.spacing_12);
    let width = ui.available_width();
    for fraction in [0.75, 1.0, 0.85, 0.6, 0.9] {
        let (rect, _) = ui.allocate_exact_size(
            egui::vec2(width * fraction, 14.0),
            egui::Sense::hover(),
        );
        ui.painter().rect_filled(rect, 4.0, theme.surface_2);
    }
    ui.add_space(theme.spacing_16);
    let (rect, _) = ui.allocate_exact_size(egui::vec2(width, 180.0), egui::Sense::hover());
    ui.painter().rect_filled(rect, 12.0, theme.surface_1);
}
