// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Terminal viewer using ratatui over crossterm

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::prelude::*;
use std::io::{self, Stdout};
use tracing::debug;

use super::widgets::{max_scroll, render_body, viewport_height, FigureView};
use super::{KeyPress, Viewer};
use crate::figure::Figure;
use crate::{LabelError, Result};

/// Terminal type alias for convenience
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Map a terminal key event; `None` for events that don't count as a press
fn key_press(key: KeyEvent) -> Result<Option<KeyPress>> {
    if key.kind != KeyEventKind::Press {
        return Ok(None);
    }
    let press = match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return Err(LabelError::Interrupted)
        }
        KeyCode::Esc => KeyPress::Dismissed,
        KeyCode::Char(ch) => KeyPress::Char(ch),
        other => KeyPress::Named(format!("{:?}", other)),
    };
    Ok(Some(press))
}

/// New scroll offset for a navigation key, or `None` if the key doesn't scroll
fn scroll_target(code: KeyCode, scroll: u16, page: u16, max: u16) -> Option<u16> {
    let target = match code {
        KeyCode::Up => scroll.saturating_sub(1),
        KeyCode::Down => scroll.saturating_add(1),
        KeyCode::PageUp => scroll.saturating_sub(page),
        KeyCode::PageDown => scroll.saturating_add(page),
        KeyCode::Home => 0,
        KeyCode::End => max,
        _ => return None,
    };
    Some(target.min(max))
}

/// Raw mode plus alternate screen, undone on drop
struct TerminalSession {
    terminal: Tui,
}

impl TerminalSession {
    fn start() -> Result<Self> {
        enable_raw_mode()?;

        // If any subsequent operation fails, raw mode must be restored
        let result = (|| -> Result<Tui> {
            let mut stdout = io::stdout();
            execute!(stdout, EnterAlternateScreen)?;
            let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
            terminal.hide_cursor()?;
            Ok(terminal)
        })();

        match result {
            Ok(terminal) => Ok(Self { terminal }),
            Err(e) => {
                let _ = disable_raw_mode();
                let _ = execute!(io::stdout(), LeaveAlternateScreen);
                Err(e)
            }
        }
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Interactive viewer drawing into the controlling terminal
pub struct TerminalViewer {
    session: Option<TerminalSession>,
}

impl TerminalViewer {
    pub fn new() -> Result<Self> {
        if !io::stdout().is_tty() {
            return Err(LabelError::NotInteractive);
        }
        Ok(Self { session: None })
    }
}

impl Viewer for TerminalViewer {
    fn present(&mut self, figure: &Figure) -> Result<KeyPress> {
        let session = match self.session.take() {
            Some(session) => self.session.insert(session),
            None => self.session.insert(TerminalSession::start()?),
        };
        let terminal = &mut session.terminal;

        let mut size = terminal.size()?;
        let mut body = render_body(figure, size.width)?;
        let mut scroll = 0u16;

        loop {
            scroll = scroll.min(max_scroll(&body, size.height));
            terminal.draw(|frame| {
                frame.render_widget(FigureView::new(&figure.title, &body, scroll), frame.area())
            })?;

            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    let page = viewport_height(size.height).max(1);
                    if let Some(target) = scroll_target(key.code, scroll, page, max_scroll(&body, size.height)) {
                        scroll = target;
                        continue;
                    }
                    if let Some(press) = key_press(key)? {
                        debug!("Key pressed: {:?}", press);
                        return Ok(press);
                    }
                }
                Event::Resize(width, height) => {
                    if width != size.width {
                        body = render_body(figure, width)?;
                    }
                    size = Size::new(width, height);
                }
                _ => {}
            }
        }
    }

    fn close(&mut self) -> Result<()> {
        self.session = None;
        Ok(())
    }
}
