//! Terminal front end for the overlay
//!
//! Mouse input stands in for touch: press, drag and release map to the touch
//! actions, a release close to the press point is a tap. Frames tick at about
//! 60 per second.

use crate::host::ScriptHost;
use crate::samples;
use anyhow::Result;
use ratatui::{
    backend::CrosstermBackend,
    crossterm::{
        event::{
            self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind,
            MouseButton, MouseEventKind,
        },
        execute,
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    },
    layout::Rect,
    Terminal,
};
use scriptlog::Console;
use scriptlog_overlay::{DefaultTheme, Overlay, OverlayAction, OverlayView, Vec2};
use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::time::{Duration, Instant};

const FRAME: Duration = Duration::from_millis(16);

/// Largest normalized movement between press and release still read as a tap
const TAP_SLOP: f32 = 0.02;

type Backend = CrosstermBackend<io::Stdout>;

pub fn run(console: &mut Console, overlay: Rc<RefCell<Overlay>>, host: &ScriptHost) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = run_loop(&mut terminal, console, &overlay, host);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_loop(
    terminal: &mut Terminal<Backend>,
    console: &mut Console,
    overlay: &Rc<RefCell<Overlay>>,
    host: &ScriptHost,
) -> Result<()> {
    let mut press: Option<Vec2> = None;
    let mut last_tick = Instant::now();

    loop {
        let mut area = Rect::default();
        terminal.draw(|frame| {
            area = frame.area();
            let overlay = overlay.borrow();
            frame.render_widget(OverlayView::new(overlay.state(), &DefaultTheme), area);
        })?;

        let timeout = FRAME.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Char('l') => samples::run(console, host)?,
                    _ => {}
                },
                Event::Mouse(mouse) => {
                    let pos = normalize(area, mouse.column, mouse.row);
                    let mut overlay = overlay.borrow_mut();
                    match mouse.kind {
                        MouseEventKind::Down(MouseButton::Left) => {
                            press = Some(pos);
                            overlay.dispatch(OverlayAction::TouchStart(pos));
                        }
                        MouseEventKind::Drag(MouseButton::Left) => {
                            overlay.dispatch(OverlayAction::TouchMove(pos));
                        }
                        MouseEventKind::Up(MouseButton::Left) => {
                            overlay.dispatch(OverlayAction::TouchEnd);
                            if press.take().is_some_and(|start| is_tap(start, pos)) {
                                overlay.dispatch(OverlayAction::Tap);
                            }
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
        }

        if last_tick.elapsed() >= FRAME {
            overlay.borrow_mut().dispatch(OverlayAction::Tick);
            last_tick = Instant::now();
        }
    }

    Ok(())
}

/// Terminal cell to screen coordinates in `0.0..=1.0`
fn normalize(area: Rect, column: u16, row: u16) -> Vec2 {
    let width = f32::from(area.width.max(1));
    let height = f32::from(area.height.max(1));
    Vec2::new(
        f32::from(column.saturating_sub(area.x)) / width,
        f32::from(row.saturating_sub(area.y)) / height,
    )
}

fn is_tap(start: Vec2, end: Vec2) -> bool {
    (end.x - start.x).abs() <= TAP_SLOP && (end.y - start.y).abs() <= TAP_SLOP
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_cells() {
        let area = Rect::new(0, 0, 100, 50);
        assert_eq!(normalize(area, 0, 0), Vec2::new(0.0, 0.0));
        assert_eq!(normalize(area, 50, 25), Vec2::new(0.5, 0.5));
    }

    #[test]
    fn test_normalize_empty_area() {
        assert_eq!(normalize(Rect::default(), 3, 4), Vec2::new(3.0, 4.0));
    }

    #[test]
    fn test_tap_detection() {
        let start = Vec2::new(0.5, 0.5);
        assert!(is_tap(start, Vec2::new(0.51, 0.5)));
        assert!(!is_tap(start, Vec2::new(0.2, 0.5)));
        assert!(!is_tap(start, Vec2::new(0.5, 0.6)));
    }
}
