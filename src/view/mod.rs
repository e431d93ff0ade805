//! Terminal rendering of a virtualized list (impure shell)
//!
//! One unit of row height is one terminal line. Rows are drawn at their
//! absolute offset minus the scroll offset and clipped to the area.

use crate::engine::RenderedList;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Widget};

/// Widget drawing the rows of one render pass.
///
/// Rows whose height is still estimated are dimmed. While the list is not
/// revealed only the placeholder (if any) is drawn.
#[derive(Debug, Clone)]
pub struct ListView<'a> {
    list: &'a RenderedList<Line<'a>>,
    scroll_top: f64,
    block: Option<Block<'a>>,
    placeholder: Option<Line<'a>>,
}

impl<'a> ListView<'a> {
    pub fn new(list: &'a RenderedList<Line<'a>>, scroll_top: f64) -> Self {
        Self {
            list,
            scroll_top,
            block: None,
            placeholder: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// Line shown instead of the rows while the list is hidden.
    pub fn placeholder(mut self, line: impl Into<Line<'a>>) -> Self {
        self.placeholder = Some(line.into());
        self
    }
}

impl Widget for ListView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = match self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.render(area, buf);
                inner
            }
            None => area,
        };
        if inner.is_empty() {
            return;
        }

        if !self.list.revealed {
            if let Some(placeholder) = &self.placeholder {
                buf.set_line(inner.x, inner.y, placeholder, inner.width);
            }
            return;
        }

        for row in &self.list.rows {
            let line_offset = (row.top - self.scroll_top).round();
            if line_offset < 0.0 || line_offset >= f64::from(inner.height) {
                continue;
            }
            let y = inner.y + line_offset as u16;
            buf.set_line(inner.x, y, &row.content, inner.width);

            if !row.height.is_measured() {
                let lines = (row.height.value.round() as u16)
                    .clamp(1, inner.bottom() - y);
                buf.set_style(
                    Rect::new(inner.x, y, inner.width, lines),
                    Style::new().add_modifier(Modifier::DIM),
                );
            }
        }
    }
}

/// Convert a ratatui buffer to text, one line per terminal row.
///
/// Trailing whitespace is trimmed and empty trailing lines are removed.
pub fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area();
    let mut lines = Vec::new();

    for y in area.top()..area.bottom() {
        let mut line = String::new();
        for x in area.left()..area.right() {
            line.push_str(buffer[(x, y)].symbol());
        }
        lines.push(line.trim_end().to_string());
    }

    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}
