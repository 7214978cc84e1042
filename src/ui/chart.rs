use crate::report::{ChartDataPoint, ChartType, GeneratedContent};
use crate::theme::Theme;
use eframe::egui::{self, pos2, vec2, Align2, FontId, Pos2, Rect, RichText, Shape, Stroke};
use std::f32::consts::TAU;

const CHART_HEIGHT: f32 = 280.0;
const AXIS_MARGIN: f32 = 36.0;
const CATEGORY_MARGIN: f32 = 96.0;
const PIE_SEGMENT_RADIANS: f32 = 0.05;

/// Lower and upper bound of the value axis. Always includes zero.
pub fn value_bounds(points: &[ChartDataPoint]) -> (f64, f64) {
    let (min, max) = points.iter().fold((0.0_f64, 0.0_f64), |(min, max), point| {
        (min.min(point.value), max.max(point.value))
    });
    if (max - min).abs() < f64::EPSILON {
        (min, min + 1.0)
    } else {
        (min, max)
    }
}

/// Share of the whole for each slice. Negative values count as zero.
pub fn pie_fractions(points: &[ChartDataPoint]) -> Vec<f32> {
    let total: f64 = points.iter().map(|point| point.value.max(0.0)).sum();
    if total <= 0.0 {
        return vec![0.0; points.len()];
    }
    points
        .iter()
        .map(|point| (point.value.max(0.0) / total) as f32)
        .collect()
}

pub fn render(ui: &mut egui::Ui, theme: &Theme, content: &GeneratedContent) {
    let Some(points) = content.chart_data.as_deref().filter(|points| !points.is_empty()) else {
        return;
    };
    let chart_type = content.chart_type.unwrap_or(ChartType::Bar);

    theme.card_frame().show(ui, |ui| {
        ui.horizontal(|ui| {
            ui.label(
                RichText::new(content.chart_title.as_deref().unwrap_or("Data"))
                    .color(theme.text_primary)
                    .size(17.0)
                    .strong(),
            );
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    RichText::new(chart_type.as_str())
                        .color(theme.text_muted)
                        .monospace(),
                );
            });
        });
        ui.add_space(theme.spacing_8);

        let (rect, _) = ui.allocate_exact_size(
            vec2(ui.available_width(), CHART_HEIGHT),
            egui::Sense::hover(),
        );
        let painter = ui.painter_at(rect);
        match chart_type {
            ChartType::Pie => paint_pie(&painter, theme, rect, points),
            ChartType::Bar => paint_bars(&painter, theme, rect, points, content),
            ChartType::Line => paint_cartesian(&painter, theme, rect, points, content, Series::Line),
            ChartType::Area => paint_cartesian(&painter, theme, rect, points, content, Series::Area),
        }
    });
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Series {
    Line,
    Area,
}

/// Fill between the segment `a`-`b` and the zero line. A segment that crosses zero is
/// split at the crossing so each piece stays convex.
fn area_polygons(a: Pos2, b: Pos2, zero_y: f32) -> Vec<Vec<Pos2>> {
    let (da, db) = (a.y - zero_y, b.y - zero_y);
    if da * db < 0.0 {
        let t = da / (da - db);
        let cross = pos2(a.x + t * (b.x - a.x), zero_y);
        vec![
            vec![a, cross, pos2(a.x, zero_y)],
            vec![cross, b, pos2(b.x, zero_y)],
        ]
    } else {
        vec![vec![a, b, pos2(b.x, zero_y), pos2(a.x, zero_y)]]
    }
}

/// Horizontal bars: categories down the side, values along the bottom.
fn paint_bars(
    painter: &egui::Painter,
    theme: &Theme,
    rect: Rect,
    points: &[ChartDataPoint],
    content: &GeneratedContent,
) {
    let plot = Rect::from_min_max(
        pos2(rect.left() + CATEGORY_MARGIN, rect.top() + theme.spacing_8),
        pos2(rect.right() - theme.spacing_8, rect.bottom() - AXIS_MARGIN),
    );
    let (min, max) = value_bounds(points);
    let x_for = |value: f64| -> f32 {
        let t = ((value - min) / (max - min)) as f32;
        plot.left() + t * plot.width()
    };

    let grid = Stroke::new(1.0, theme.chart_grid);
    for step in 0..=4 {
        let x = plot.left() + plot.width() * step as f32 / 4.0;
        painter.line_segment([pos2(x, plot.top()), pos2(x, plot.bottom())], grid);
        let value = min + (max - min) * f64::from(step) / 4.0;
        painter.text(
            pos2(x, plot.bottom() + theme.spacing_4),
            Align2::CENTER_TOP,
            format_value(value),
            FontId::proportional(10.0),
            theme.text_muted,
        );
    }

    let slot = plot.height() / points.len() as f32;
    let zero_x = x_for(0.0);
    for (index, point) in points.iter().enumerate() {
        let center_y = plot.top() + slot * (index as f32 + 0.5);
        let half = (slot * 0.3).max(2.0);
        let value_x = x_for(point.value);
        let bar = Rect::from_x_y_ranges(
            zero_x.min(value_x)..=zero_x.max(value_x),
            (center_y - half)..=(center_y + half),
        );
        painter.rect_filled(bar, 4.0, theme.chart_color(index));
        painter.text(
            pos2(plot.left() - theme.spacing_4, center_y),
            Align2::RIGHT_CENTER,
            &point.name,
            FontId::proportional(10.0),
            theme.text_muted,
        );
    }

    if let Some(label) = &content.chart_x_label {
        painter.text(
            pos2(plot.right(), rect.bottom()),
            Align2::RIGHT_BOTTOM,
            label,
            FontId::proportional(11.0),
            theme.text_muted,
        );
    }
    if let Some(label) = &content.chart_y_label {
        painter.text(
            pos2(rect.left(), rect.top()),
            Align2::LEFT_TOP,
            label,
            FontId::proportional(11.0),
            theme.text_muted,
        );
    }
}

fn paint_cartesian(
    painter: &egui::Painter,
    theme: &Theme,
    rect: Rect,
    points: &[ChartDataPoint],
    content: &GeneratedContent,
    series: Series,
) {
    let plot = Rect::from_min_max(
        pos2(rect.left() + AXIS_MARGIN, rect.top() + theme.spacing_8),
        pos2(rect.right() - theme.spacing_8, rect.bottom() - AXIS_MARGIN),
    );
    let (min, max) = value_bounds(points);
    let y_for = |value: f64| -> f32 {
        let t = ((value - min) / (max - min)) as f32;
        plot.bottom() - t * plot.height()
    };

    let grid = Stroke::new(1.0, theme.chart_grid);
    for step in 0..=4 {
        let y = plot.bottom() - plot.height() * step as f32 / 4.0;
        painter.line_segment([pos2(plot.left(), y), pos2(plot.right(), y)], grid);
        let value = min + (max - min) * f64::from(step) / 4.0;
        painter.text(
            pos2(plot.left() - theme.spacing_4, y),
            Align2::RIGHT_CENTER,
            format_value(value),
            FontId::proportional(10.0),
            theme.text_muted,
        );
    }

    let slot = plot.width() / points.len() as f32;
    let centers: Vec<Pos2> = points
        .iter()
        .enumerate()
        .map(|(index, point)| pos2(plot.left() + slot * (index as f32 + 0.5), y_for(point.value)))
        .collect();
    let zero_y = y_for(0.0);

    let color = match series {
        Series::Line => theme.chart_color(0),
        Series::Area => theme.chart_color(1),
    };
    if series == Series::Area {
        for pair in centers.windows(2) {
            for polygon in area_polygons(pair[0], pair[1], zero_y) {
                painter.add(Shape::convex_polygon(
                    polygon,
                    color.gamma_multiply(0.3),
                    Stroke::NONE,
                ));
            }
        }
    }
    painter.add(Shape::line(centers.clone(), Stroke::new(3.0, color)));
    for center in &centers {
        painter.circle_filled(*center, 4.0, color);
    }

    for (point, center) in points.iter().zip(&centers) {
        painter.text(
            pos2(center.x, plot.bottom() + theme.spacing_4),
            Align2::CENTER_TOP,
            &point.name,
            FontId::proportional(10.0),
            theme.text_muted,
        );
    }

    if let Some(label) = &content.chart_x_label {
        painter.text(
            pos2(plot.right(), rect.bottom()),
            Align2::RIGHT_BOTTOM,
            label,
            FontId::proportional(11.0),
            theme.text_muted,
        );
    }
    if let Some(label) = &content.chart_y_label {
        painter.text(
            pos2(rect.left(), rect.top()),
            Align2::LEFT_TOP,
            label,
            FontId::proportional(11.0),
            theme.text_muted,
        );
    }
}

fn paint_pie(painter: &egui::Painter, theme: &Theme, rect: Rect, points: &[ChartDataPoint]) {
    let legend_width = rect.width() * 0.4;
    let pie_rect = Rect::from_min_max(rect.min, pos2(rect.right() - legend_width, rect.bottom()));
    let center = pie_rect.center();
    let radius = pie_rect.width().min(pie_rect.height()) * 0.42;

    let mut start = -TAU / 4.0;
    for (index, fraction) in pie_fractions(points).into_iter().enumerate() {
        let sweep = fraction * TAU;
        let segments = ((sweep / PIE_SEGMENT_RADIANS).ceil() as usize).max(1);
        let color = theme.chart_color(index);
        for segment in 0..segments {
            let a0 = start + sweep * segment as f32 / segments as f32;
            let a1 = start + sweep * (segment + 1) as f32 / segments as f32;
            painter.add(Shape::convex_polygon(
                vec![
                    center,
                    center + radius * vec2(a0.cos(), a0.sin()),
                    center + radius * vec2(a1.cos(), a1.sin()),
                ],
                color,
                Stroke::NONE,
            ));
        }
        start += sweep;
    }

    let mut y = rect.top() + theme.spacing_8;
    for (index, point) in points.iter().enumerate() {
        let x = rect.right() - legend_width + theme.spacing_8;
        painter.circle_filled(pos2(x + 5.0, y + 7.0), 5.0, theme.chart_color(index));
        painter.text(
            pos2(x + 16.0, y),
            Align2::LEFT_TOP,
            format!("{} ({})", point.name, format_value(point.value)),
            FontId::proportional(11.0),
            theme.text_body,
        );
        y += 18.0;
    }
}

fn format_value(value: f64) -> String {
    if value.fract().abs() < 1e-9 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(name: &str, value: f64) -> ChartDataPoint {
        ChartDataPoint {
            name: name.to_string(),
            value,
            group: None,
        }
    }

    #[test]
    fn bounds_include_zero_and_negative_values() {
        assert_eq!(value_bounds(&[point("a", 10.0), point("b", 40.0)]), (0.0, 40.0));
        assert_eq!(value_bounds(&[point("a", -5.0), point("b", 3.0)]), (-5.0, 3.0));
    }

    #[test]
    fn flat_series_gets_non_empty_range() {
        assert_eq!(value_bounds(&[point("a", 0.0)]), (0.0, 1.0));
    }

    #[test]
    fn pie_fractions_sum_to_one() {
        let fractions = pie_fractions(&[point("a", 1.0), point("b", 3.0), point("c", -2.0)]);
        assert_eq!(fractions, vec![0.25, 0.75, 0.0]);
    }

    #[test]
    fn pie_with_no_positive_values_is_empty() {
        assert_eq!(pie_fractions(&[point("a", 0.0)]), vec![0.0]);
    }

    #[test]
    fn area_segment_crossing_zero_is_split_at_the_crossing() {
        let polygons = area_polygons(pos2(0.0, 50.0), pos2(10.0, 150.0), 100.0);
        assert_eq!(polygons.len(), 2);
        assert_eq!(polygons[0][1], pos2(5.0, 100.0));
        assert_eq!(polygons[1][0], pos2(5.0, 100.0));
        assert!(polygons.iter().all(|polygon| polygon.len() == 3));
    }

    #[test]
    fn area_segment_on_one_side_is_a_single_quad() {
        let polygons = area_polygons(pos2(0.0, 20.0), pos2(10.0, 60.0), 100.0);
        assert_eq!(
            polygons,
            vec![vec![
                pos2(0.0, 20.0),
                pos2(10.0, 60.0),
                pos2(10.0, 100.0),
                pos2(0.0, 100.0)
            ]]
        );
    }

    #[test]
    fn values_are_formatted_compactly() {
        assert_eq!(format_value(1200.0), "1200");
        assert_eq!(format_value(12.34), "12.3");
    }
}
