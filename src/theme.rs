use eframe::egui::{self, Color32, CornerRadius, FontId, Frame, Margin, Stroke, TextStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

const HANGUL_FONT_NAME: &str = "hangul";

const HANGUL_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/google-noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/truetype/nanum/NanumGothic.ttf",
    "/System/Library/Fonts/AppleSDGothicNeo.ttc",
    "C:\\Windows\\Fonts\\malgun.ttf",
];

#[derive(Debug, Clone)]
pub struct Theme {
    pub surface_0: Color32,
    pub surface_1: Color32,
    pub surface_2: Color32,
    pub surface_3: Color32,
    pub accent_primary: Color32,
    pub accent_soft: Color32,
    pub accent_strong: Color32,
    pub success: Color32,
    pub warning: Color32,
    pub danger: Color32,
    pub danger_tint: Color32,
    pub text_primary: Color32,
    pub text_body: Color32,
    pub text_muted: Color32,
    pub border_subtle: Color32,
    pub chart_grid: Color32,
    pub chart_palette: [Color32; 6],
    pub spacing_4: f32,
    pub spacing_8: f32,
    pub spacing_12: f32,
    pub spacing_16: f32,
    pub spacing_24: f32,
    pub radius_8: u8,
    pub radius_12: u8,
    pub button_height: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            surface_0: Color32::from_rgb(0x02, 0x06, 0x17),
            surface_1: Color32::from_rgb(0x0F, 0x17, 0x2A),
            surface_2: Color32::from_rgb(0x1E, 0x29, 0x3B),
            surface_3: Color32::from_rgb(0x33, 0x41, 0x55),
            accent_primary: Color32::from_rgb(0x22, 0xD3, 0xEE),
            accent_soft: Color32::from_rgba_premultiplied(0x06, 0x1F, 0x26, 40),
            accent_strong: Color32::from_rgb(0x08, 0x91, 0xB2),
            success: Color32::from_rgb(0x10, 0xB9, 0x81),
            warning: Color32::from_rgb(0xF5, 0x9E, 0x0B),
            danger: Color32::from_rgb(0xF8, 0x71, 0x71),
            danger_tint: Color32::from_rgba_premultiplied(0x3A, 0x0A, 0x0A, 60),
            text_primary: Color32::from_rgb(0xF8, 0xFA, 0xFC),
            text_body: Color32::from_rgb(0xCB, 0xD5, 0xE1),
            text_muted: Color32::from_rgb(0x94, 0xA3, 0xB8),
            border_subtle: Color32::from_rgba_premultiplied(255, 255, 255, 13),
            chart_grid: Color32::from_rgb(0x33, 0x41, 0x55),
            chart_palette: [
                Color32::from_rgb(0x06, 0xB6, 0xD4),
                Color32::from_rgb(0x8B, 0x5C, 0xF6),
                Color32::from_rgb(0xF5, 0x9E, 0x0B),
                Color32::from_rgb(0x10, 0xB9, 0x81),
                Color32::from_rgb(0xEF, 0x44, 0x44),
                Color32::from_rgb(0xEC, 0x48, 0x99),
            ],
            spacing_4: 4.0,
            spacing_8: 8.0,
            spacing_12: 12.0,
            spacing_16: 16.0,
            spacing_24: 24.0,
            radius_8: 8,
            radius_12: 12,
            button_height: 35.0,
        }
    }
}

impl Theme {
    pub fn apply_visuals(&self, ctx: &egui::Context) {
        let mut visuals = egui::Visuals::dark();
        visuals.panel_fill = self.surface_0;
        visuals.override_text_color = Some(self.text_body);
        visuals.widgets.noninteractive.bg_fill = self.surface_1;
        visuals.widgets.noninteractive.weak_bg_fill = self.surface_1;
        visuals.widgets.noninteractive.bg_stroke = Stroke::NONE;
        visuals.widgets.inactive.bg_fill = self.surface_2;
        visuals.widgets.inactive.weak_bg_fill = self.surface_1;
        visuals.widgets.inactive.bg_stroke = Stroke::NONE;
        visuals.widgets.hovered.bg_fill = self.surface_3;
        visuals.widgets.hovered.weak_bg_fill = self.surface_2;
        visuals.widgets.hovered.bg_stroke = Stroke::NONE;
        visuals.widgets.active.bg_fill = self.accent_strong;
        visuals.widgets.active.bg_stroke = Stroke::NONE;
        visuals.selection.bg_fill = self.accent_strong;
        visuals.hyperlink_color = self.accent_primary;
        visuals.extreme_bg_color = self.surface_0;
        visuals.window_fill = self.surface_1;
        visuals.window_stroke = Stroke::NONE;

        let mut style = (*ctx.style()).clone();
        style.visuals = visuals;
        style.spacing.item_spacing = egui::vec2(10.0, 8.0);
        style.spacing.button_padding = egui::vec2(12.0, 8.0);
        style.text_styles.insert(TextStyle::Heading, FontId::proportional(26.0));
        style.text_styles.insert(TextStyle::Body, FontId::proportional(15.0));
        style.text_styles.insert(TextStyle::Monospace, FontId::monospace(12.0));
        style.text_styles.insert(TextStyle::Small, FontId::proportional(11.0));
        ctx.set_style(style);
    }

    pub fn panel_frame(&self, fill: Color32, inner_padding: i8) -> Frame {
        Frame::new()
            .fill(fill)
            .inner_margin(Margin::same(inner_padding))
            .corner_radius(CornerRadius::same(self.radius_12))
            .stroke(Stroke::new(1.0, self.border_subtle))
    }

    pub fn card_frame(&self) -> Frame {
        self.panel_frame(self.surface_1, self.spacing_16 as i8)
    }

    pub fn error_frame(&self) -> Frame {
        Frame::new()
            .fill(self.danger_tint)
            .inner_margin(Margin::same(self.spacing_12 as i8))
            .corner_radius(CornerRadius::same(self.radius_8))
            .stroke(Stroke::new(1.0, self.danger.gamma_multiply(0.4)))
    }

    pub fn chip_frame(&self) -> Frame {
        Frame::new()
            .fill(self.surface_1)
            .inner_margin(Margin::symmetric(self.spacing_8 as i8, self.spacing_4 as i8))
            .corner_radius(CornerRadius::same(4))
            .stroke(Stroke::new(1.0, self.surface_2))
    }

    pub fn chart_color(&self, index: usize) -> Color32 {
        self.chart_palette[index % self.chart_palette.len()]
    }
}

/// First readable font among `explicit` and `candidates`, in that order.
pub fn find_hangul_font(explicit: Option<&Path>, candidates: &[&Path]) -> Option<PathBuf> {
    if let Some(path) = explicit {
        if path.is_file() {
            return Some(path.to_path_buf());
        }
        warn!(path = %path.display(), "configured font not found, searching system fonts");
    }
    candidates
        .iter()
        .find(|path| path.is_file())
        .map(|path| path.to_path_buf())
}

/// Adds a Hangul-capable font as fallback for both font families. egui's bundled
/// fonts have no Hangul glyphs, so without it Korean text renders as boxes.
pub fn install_hangul_font(ctx: &egui::Context, explicit: Option<&Path>) -> bool {
    let candidates: Vec<&Path> = HANGUL_FONT_CANDIDATES.iter().map(Path::new).collect();
    let Some(path) = find_hangul_font(explicit, &candidates) else {
        warn!("no Hangul font found; set REPORT_FONT_PATH to a .ttf/.ttc file");
        return false;
    };
    let bytes = match std::fs::read(&path) {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to read font");
            return false;
        }
    };

    let mut fonts = egui::FontDefinitions::default();
    fonts.font_data.insert(
        HANGUL_FONT_NAME.to_string(),
        Arc::new(egui::FontData::from_owned(bytes)),
    );
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        fonts
            .families
            .entry(family)
            .or_default()
            .push(HANGUL_FONT_NAME.to_string());
    }
    ctx.set_fonts(fonts);
    info!(path = %path.display(), "loaded Hangul font");
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_font(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("report-viewer-{}-{name}", std::process::id()));
        fs::write(&path, b"not really a font").expect("write scratch file");
        path
    }

    #[test]
    fn configured_font_wins_over_system_fonts() {
        let configured = scratch_font("configured.ttf");
        let system = scratch_font("system.ttf");
        let found = find_hangul_font(Some(configured.as_path()), &[system.as_path()]);
        assert_eq!(found, Some(configured.clone()));
        let _ = fs::remove_file(configured);
        let _ = fs::remove_file(system);
    }

    #[test]
    fn missing_configured_font_falls_back_to_system_fonts() {
        let system = scratch_font("fallback.ttf");
        let missing = Path::new("/definitely/not/here.ttf");
        let found = find_hangul_font(Some(missing), &[missing, system.as_path()]);
        assert_eq!(found, Some(system.clone()));
        let _ = fs::remove_file(system);
    }

    #[test]
    fn no_font_anywhere_is_none() {
        let missing = Path::new("/definitely/not/here.ttc");
        assert_eq!(find_hangul_font(None, &[missing]), None);
    }

    #[test]
    fn chart_colors_cycle_through_the_palette() {
        let theme = Theme::default();
        assert_eq!(theme.chart_color(0), theme.chart_color(theme.chart_palette.len()));
    }
}
