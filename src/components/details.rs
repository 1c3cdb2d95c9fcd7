use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget, Wrap},
};

use crate::explorer::render::Details;
use crate::theme::ThemeColors;

/// Details panel for the selected node.
pub struct DetailsWidget<'a> {
    details: Option<&'a Details>,
    theme: &'a ThemeColors,
    block: Option<Block<'a>>,
}

impl<'a> DetailsWidget<'a> {
    pub fn new(details: Option<&'a Details>, theme: &'a ThemeColors) -> Self {
        Self {
            details,
            theme,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    fn field(&self, label: &'a str, value: String) -> Line<'a> {
        Line::from(vec![
            Span::styled(
                format!("{:<10}", label),
                Style::default().fg(self.theme.dim_fg),
            ),
            Span::styled(value, Style::default().fg(self.theme.tree_fg)),
        ])
    }
}

impl<'a> Widget for DetailsWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = match self.details {
            None => vec![Line::from(Span::styled(
                "Select an item to see details",
                Style::default()
                    .fg(self.theme.dim_fg)
                    .add_modifier(Modifier::ITALIC),
            ))],
            Some(details) => {
                let mut lines = vec![
                    Line::from(Span::styled(
                        details.path.clone(),
                        Style::default()
                            .fg(self.theme.accent_fg)
                            .add_modifier(Modifier::BOLD),
                    )),
                    Line::default(),
                    self.field("Type:", details.type_label.to_string()),
                    self.field("Size:", details.size_label.clone()),
                ];
                if let Some(contains) = details.contains_label() {
                    lines.push(self.field("Contains:", contains));
                }
                lines
            }
        };

        let mut paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
        if let Some(block) = self.block {
            paragraph = paragraph.block(block);
        }
        paragraph.render(area, buf);
    }
}
