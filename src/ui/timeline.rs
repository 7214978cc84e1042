use crate::report::TimelineEvent;
use crate::theme::Theme;
use eframe::egui::{self, RichText};

pub fn render(ui: &mut egui::Ui, theme: &Theme, events: &[TimelineEvent]) {
    if events.is_empty() {
        return;
    }

    theme.card_frame().show(ui, |ui| {
        ui.label(
            RichText::new("Future Timeline")
                .color(theme.text_primary)
                .size(17.0)
                .strong(),
        );
        ui.add_space(theme.spacing_12);

        for (index, event) in events.iter().enumerate() {
            ui.horizontal_top(|ui| {
                let (rect, _) = ui.allocate_exact_size(egui::vec2(16.0, 48.0), egui::Sense::hover());
                let dot = egui::pos2(rect.center().x, rect.top() + 8.0);
                if index + 1 < events.len() {
                    ui.painter().line_segment(
                        [dot, egui::pos2(dot.x, rect.bottom() + theme.spacing_8)],
                        egui::Stroke::new(2.0, theme.surface_3),
                    );
                }
                ui.painter().circle_filled(dot, 6.0, theme.chart_color(index));

                ui.vertical(|ui| {
                    ui.horizontal(|ui| {
                        ui.label(
                            RichText::new(&event.year)
                                .color(theme.accent_primary)
                                .monospace()
                                .strong(),
                        );
                        ui.label(RichText::new(&event.title).color(theme.text_primary).strong());
                    });
                    ui.label(RichText::new(&event.description).color(theme.text_muted));
                });
            });
            ui.add_space(theme.spacing_4);
        }
    });
}
