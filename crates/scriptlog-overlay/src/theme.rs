//! Trait for providing colors to the log overlay.

use ratatui::style::{Color, Modifier, Style};

/// Provides styles for the log overlay.
///
/// Implement this trait to match the overlay to the host application's theme.
pub trait OverlayTheme {
    /// Log text.
    fn text(&self) -> Style;

    /// The `>>>` marker in front of each line.
    fn prefix(&self) -> Style {
        self.text().add_modifier(Modifier::DIM)
    }

    /// Panel border.
    fn border(&self) -> Style {
        self.text()
    }

    /// Panel title.
    fn title(&self) -> Style {
        self.text().add_modifier(Modifier::BOLD)
    }

    /// Panel and touch strip background for a given opacity.
    fn backdrop(&self, alpha: f32) -> Style;
}

/// Green terminal text on a black backdrop.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTheme;

impl OverlayTheme for DefaultTheme {
    fn text(&self) -> Style {
        Style::default().fg(Color::Rgb(18, 148, 18))
    }

    fn backdrop(&self, alpha: f32) -> Style {
        // terminals have no opacity, so a weaker backdrop is drawn lighter
        let shade = ((1.0 - alpha.clamp(0.0, 1.0)) * 64.0).round() as u8;
        Style::default().bg(Color::Rgb(shade, shade, shade))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backdrop_lightens_with_lower_alpha() {
        let theme = DefaultTheme;
        assert_eq!(theme.backdrop(1.0).bg, Some(Color::Rgb(0, 0, 0)));
        assert_eq!(theme.backdrop(0.9).bg, Some(Color::Rgb(6, 6, 6)));
        assert_eq!(theme.backdrop(0.6).bg, Some(Color::Rgb(26, 26, 26)));
    }

    #[test]
    fn test_default_styles_derive_from_text() {
        let theme = DefaultTheme;
        assert_eq!(theme.border().fg, theme.text().fg);
        assert!(theme.title().add_modifier.contains(Modifier::BOLD));
    }
}
