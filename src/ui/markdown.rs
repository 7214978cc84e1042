use crate::theme::Theme;
use eframe::egui::{self, text::LayoutJob, FontId, TextFormat};
use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};

/// Blocks of model-written markdown, flattened for immediate-mode rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// `#` and `##`; demoted below the section title.
    Heading(Vec<Inline>),
    /// `###` and deeper.
    Subheading(Vec<Inline>),
    /// List item text. `marker` is `None` for continuation paragraphs of a loose item.
    Item {
        depth: usize,
        marker: Option<Marker>,
        spans: Vec<Inline>,
    },
    Paragraph(Vec<Inline>),
    Rule,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Bullet,
    Number(u64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inline {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub code: bool,
}

#[derive(Default)]
struct BlockBuilder {
    blocks: Vec<Block>,
    spans: Vec<Inline>,
    bold: usize,
    italic: usize,
    /// Next number per open list; `None` for bullet lists.
    lists: Vec<Option<u64>>,
    /// Marker of each open item, taken by its first flushed line.
    items: Vec<Option<Marker>>,
}

impl BlockBuilder {
    fn push_text(&mut self, text: &str, code: bool) {
        let bold = self.bold > 0;
        let italic = self.italic > 0;
        if let Some(last) = self.spans.last_mut() {
            if last.bold == bold && last.italic == italic && last.code == code {
                last.text.push_str(text);
                return;
            }
        }
        self.spans.push(Inline {
            text: text.to_string(),
            bold,
            italic,
            code,
        });
    }

    fn take_spans(&mut self) -> Option<Vec<Inline>> {
        let spans = std::mem::take(&mut self.spans);
        if spans.iter().all(|span| span.text.trim().is_empty()) {
            None
        } else {
            Some(spans)
        }
    }

    fn flush_text(&mut self) {
        let Some(spans) = self.take_spans() else {
            return;
        };
        if self.items.is_empty() {
            self.blocks.push(Block::Paragraph(spans));
        } else {
            let marker = self.items.last_mut().and_then(Option::take);
            self.blocks.push(Block::Item {
                depth: self.lists.len().saturating_sub(1),
                marker,
                spans,
            });
        }
    }

    fn start_item(&mut self) {
        let marker = match self.lists.last_mut() {
            Some(Some(next)) => {
                let number = *next;
                *next += 1;
                Marker::Number(number)
            }
            _ => Marker::Bullet,
        };
        self.items.push(Some(marker));
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(Tag::Strong) => self.bold += 1,
            Event::End(TagEnd::Strong) => self.bold = self.bold.saturating_sub(1),
            Event::Start(Tag::Emphasis) => self.italic += 1,
            Event::End(TagEnd::Emphasis) => self.italic = self.italic.saturating_sub(1),
            Event::Start(Tag::List(first)) => {
                // Text of the parent item comes before its nested list.
                self.flush_text();
                self.lists.push(first);
            }
            Event::End(TagEnd::List(_)) => {
                self.lists.pop();
            }
            Event::Start(Tag::Item) => self.start_item(),
            Event::End(TagEnd::Item) => {
                self.flush_text();
                self.items.pop();
            }
            Event::End(TagEnd::Paragraph) => self.flush_text(),
            Event::End(TagEnd::Heading(level)) => {
                if let Some(spans) = self.take_spans() {
                    self.blocks.push(if matches!(level, HeadingLevel::H1 | HeadingLevel::H2) {
                        Block::Heading(spans)
                    } else {
                        Block::Subheading(spans)
                    });
                }
            }
            Event::Text(text) => self.push_text(&text, false),
            Event::Code(text) => self.push_text(&text, true),
            Event::SoftBreak => self.push_text(" ", false),
            Event::HardBreak => self.push_text("\n", false),
            Event::Rule => self.blocks.push(Block::Rule),
            _ => {}
        }
    }
}

pub fn parse(markdown: &str) -> Vec<Block> {
    let mut builder = BlockBuilder::default();
    for event in Parser::new(markdown) {
        builder.handle(event);
    }
    builder.flush_text();
    builder.blocks
}

pub fn render(ui: &mut egui::Ui, theme: &Theme, markdown: &str) {
    for block in parse(markdown) {
        match block {
            Block::Heading(spans) => {
                ui.add_space(theme.spacing_16);
                ui.label(layout(theme, &spans, 20.0, theme.text_primary, true));
                ui.add_space(theme.spacing_4);
            }
            Block::Subheading(spans) => {
                ui.add_space(theme.spacing_12);
                ui.horizontal(|ui| {
                    let (rect, _) =
                        ui.allocate_exact_size(egui::vec2(4.0, 16.0), egui::Sense::hover());
                    ui.painter()
                        .rect_filled(rect, 2.0, theme.accent_strong);
                    ui.label(layout(theme, &spans, 17.0, theme.accent_primary, true));
                });
            }
            Block::Item {
                depth,
                marker,
                spans,
            } => {
                ui.horizontal_wrapped(|ui| {
                    ui.add_space(theme.spacing_12 + depth as f32 * theme.spacing_16);
                    let marker = match marker {
                        Some(Marker::Bullet) => "\u{2022}".to_string(),
                        Some(Marker::Number(number)) => format!("{number}."),
                        None => " ".to_string(),
                    };
                    ui.colored_label(theme.accent_strong, marker);
                    ui.label(layout(theme, &spans, 15.0, theme.text_body, false));
                });
            }
            Block::Paragraph(spans) => {
                ui.label(layout(theme, &spans, 15.0, theme.text_body, false));
                ui.add_space(theme.spacing_8);
            }
            Block::Rule => {
                ui.separator();
            }
        }
    }
}

fn layout(
    theme: &Theme,
    spans: &[Inline],
    size: f32,
    color: egui::Color32,
    strong: bool,
) -> LayoutJob {
    let mut job = LayoutJob::default();
    for span in spans {
        let mut format = TextFormat {
            font_id: FontId::proportional(size),
            color: if span.bold && !strong {
                theme.accent_primary
            } else {
                color
            },
            italics: span.italic,
            ..Default::default()
        };
        if span.code {
            format.font_id = FontId::monospace(size - 1.0);
            format.background = theme.accent_soft;
        }
        job.append(&span.text, 0.0, format);
    }
    job
}
