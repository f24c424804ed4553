//! Log overlay widget.

use crate::state::{OverlayState, LINE_PREFIX};
use crate::theme::OverlayTheme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Widget};

const TITLE: &str = " scriptlog (swipe left to hide, tap to show) ";

/// Widget rendering an [`OverlayState`] over the given area.
///
/// The newest line sits on the bottom row; moving the panel down reveals
/// older lines.
pub struct OverlayView<'a, T: OverlayTheme> {
    state: &'a OverlayState,
    theme: &'a T,
}

impl<'a, T: OverlayTheme> OverlayView<'a, T> {
    pub fn new(state: &'a OverlayState, theme: &'a T) -> Self {
        Self { state, theme }
    }

    /// Columns covered by a full-width panel centered at `center_x`
    fn columns(area: Rect, center_x: f32) -> Option<Rect> {
        let width = f32::from(area.width);
        let left = (center_x / 2.0 * width).round();
        let right = ((center_x / 2.0 + 1.0) * width).round();
        let left = left.clamp(0.0, width) as u16;
        let right = right.clamp(0.0, width) as u16;
        if right <= left {
            return None;
        }
        Some(Rect {
            x: area.x + left,
            width: right - left,
            ..area
        })
    }

    fn render_strip(&self, area: Rect, buf: &mut Buffer) {
        if let Some(strip) = Self::columns(area, self.state.strip_x) {
            Clear.render(strip, buf);
            buf.set_style(strip, self.theme.backdrop(self.state.backdrop_alpha));
        }
    }

    fn render_panel(&self, area: Rect, buf: &mut Buffer) {
        let Some(panel) = Self::columns(area, self.state.center.x) else {
            return;
        };
        Clear.render(panel, buf);

        let block = Block::default()
            .title(TITLE)
            .borders(Borders::ALL)
            .border_style(self.theme.border())
            .title_style(self.theme.title())
            .style(self.theme.backdrop(self.state.backdrop_alpha));
        let inner = block.inner(panel);
        block.render(panel, buf);

        if inner.height == 0 {
            return;
        }

        let text = self.state.display_text();
        let rows: Vec<&str> = text.split('\n').collect();
        let height = i64::from(inner.height);
        let count = rows.len() as i64;
        let shift = (self.state.center.y * inner.height as f32 / 2.0).round() as i64;

        for (index, row_text) in rows.iter().enumerate() {
            let row = (height - 1) - (count - 1 - index as i64) - shift;
            if !(0..height).contains(&row) {
                continue;
            }
            let line = self.styled_line(row_text);
            buf.set_line(inner.x, inner.y + row as u16, &line, inner.width);
        }
    }

    fn styled_line(&self, row_text: &str) -> Line<'static> {
        let marker = LINE_PREFIX.trim_start_matches('\n');
        match row_text.strip_prefix(marker) {
            Some(rest) => Line::from(vec![
                Span::styled(">>>  ", self.theme.prefix()),
                Span::styled(rest.replace('\t', "  "), self.theme.text()),
            ]),
            None => Line::from(Span::styled(row_text.replace('\t', "  "), self.theme.text())),
        }
    }
}

impl<T: OverlayTheme> Widget for OverlayView<'_, T> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.state.visible {
            self.render_panel(area, buf);
        } else {
            self.render_strip(area, buf);
        }
    }
}
