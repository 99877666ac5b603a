// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! ratatui widgets for drawing a figure
//!
//! Each grid cell is half of an upper-half-block glyph: the foreground paints
//! the upper cell, the background the one below it. One glyph is one column
//! wide and half a text row tall per cell, which keeps cells roughly square.
//!
//! The figure body is rendered once into an off-screen [`Buffer`] as tall as
//! it needs to be; [`FigureView`] then copies a window of it onto the screen
//! between a fixed title line and a fixed key-help line.

use ratatui::layout::Flex;
use ratatui::prelude::*;
use std::ops::Range;

use crate::figure::{Figure, Panel};
use crate::palette;
use crate::Result;

const HALF_BLOCK: char = '▀';
const COLUMN_GAP: u16 = 3;
const FOOTER: &str = "[y] yes  [n] no  [other] skip  [Esc] close  [Ctrl-C] quit";

fn cell_color(value: u8) -> Color {
    palette::PALETTE
        .get(value as usize)
        .map_or(Color::Reset, |c| Color::Rgb(c.rgb[0], c.rgb[1], c.rgb[2]))
}

/// One titled grid
pub struct GridPanel<'a> {
    panel: &'a Panel,
}

impl<'a> GridPanel<'a> {
    pub fn new(panel: &'a Panel) -> Self {
        Self { panel }
    }

    pub fn width(&self) -> u16 {
        self.panel.grid.cols().max(self.panel.title.chars().count()) as u16
    }

    /// Title line plus one text row per two grid rows
    pub fn height(&self) -> u16 {
        1 + self.panel.grid.rows().div_ceil(2) as u16
    }
}

impl Widget for GridPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [title, grid] = Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);
        Line::from(self.panel.title.as_str()).bold().render(title, buf);

        let cells = &self.panel.grid.0;
        for (pair, upper) in cells.iter().step_by(2).enumerate() {
            let y = grid.y + pair as u16;
            if y >= grid.bottom() {
                break;
            }
            let lower = cells.get(pair * 2 + 1);
            for (c, &value) in upper.iter().enumerate() {
                let x = grid.x + c as u16;
                if x >= grid.right() {
                    break;
                }
                let bg = lower.and_then(|row| row.get(c)).map_or(Color::Reset, |&v| cell_color(v));
                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.set_char(HALF_BLOCK).set_fg(cell_color(value)).set_bg(bg);
                }
            }
        }
    }
}

/// Split columns into bands that each fit in `width` characters
pub(crate) fn bands(col_widths: &[u16], width: u16) -> Vec<Range<usize>> {
    let mut bands = Vec::new();
    let mut start = 0;
    let mut used = 0u16;
    for (i, &w) in col_widths.iter().enumerate() {
        let needed = if i == start { w } else { used.saturating_add(COLUMN_GAP + w) };
        if i > start && needed > width {
            bands.push(start..i);
            start = i;
            used = w;
        } else {
            used = needed;
        }
    }
    if start < col_widths.len() {
        bands.push(start..col_widths.len());
    }
    bands
}

/// Render every panel of the figure into an off-screen buffer `width` columns wide
///
/// Columns that don't fit side by side wrap into further bands below. The
/// buffer is as tall as the content; a single column wider than `width`
/// widens the buffer instead of being squeezed.
pub fn render_body(figure: &Figure, width: u16) -> Result<Buffer> {
    figure.validate()?;

    let col_widths: Vec<u16> = (0..figure.columns())
        .map(|c| {
            figure
                .rows
                .iter()
                .filter_map(|row| row.get(c))
                .map(|p| GridPanel::new(p).width())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let bands = bands(&col_widths, width);
    let band_width = |band: &Range<usize>| {
        col_widths[band.clone()].iter().sum::<u16>() + COLUMN_GAP * band.len().saturating_sub(1) as u16
    };
    let buf_width = bands.iter().map(band_width).max().unwrap_or(0).max(width);

    // (band, row of the figure, strip height including the gap below)
    let strips: Vec<(Range<usize>, usize, u16)> = bands
        .iter()
        .flat_map(|band| {
            figure.rows.iter().enumerate().map(move |(r, row)| {
                let height = row[band.clone()]
                    .iter()
                    .map(|p| GridPanel::new(p).height())
                    .max()
                    .unwrap_or(1);
                (band.clone(), r, height + 1)
            })
        })
        .collect();

    let total_height = strips.iter().map(|s| s.2).sum();
    let mut buf = Buffer::empty(Rect::new(0, 0, buf_width, total_height));

    let mut y = 0;
    for (band, r, height) in strips {
        let area = Rect::new(0, y, buf_width, height - 1);
        let columns = Layout::horizontal(col_widths[band.clone()].iter().map(|&w| Constraint::Length(w)))
            .spacing(COLUMN_GAP)
            .flex(Flex::Start)
            .split(area);
        for (panel, rect) in figure.rows[r][band].iter().zip(columns.iter()) {
            GridPanel::new(panel).render(*rect, &mut buf);
        }
        y += height;
    }

    Ok(buf)
}

/// Screen rows left for the body once the title and footer lines are placed
pub fn viewport_height(screen_height: u16) -> u16 {
    screen_height.saturating_sub(2)
}

/// Furthest the body can be scrolled on a screen `screen_height` rows tall
pub fn max_scroll(body: &Buffer, screen_height: u16) -> u16 {
    body.area.height.saturating_sub(viewport_height(screen_height))
}

/// Title, a scrolled window of the body, and the key help line
pub struct FigureView<'a> {
    title: &'a str,
    body: &'a Buffer,
    scroll: u16,
}

impl<'a> FigureView<'a> {
    pub fn new(title: &'a str, body: &'a Buffer, scroll: u16) -> Self {
        Self { title, body, scroll }
    }
}

impl Widget for FigureView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [title, body, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(area);

        let content = self.body.area;
        let hint = (content.height > body.height).then(|| {
            let last = self.scroll.saturating_add(body.height).min(content.height);
            format!("rows {}-{} of {}  [↑↓ PgUp PgDn]", self.scroll + 1, last, content.height)
        });
        let hint_width = hint.as_ref().map_or(0, |h| h.chars().count() as u16);
        let [title_area, hint_area] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(hint_width)]).areas(title);
        Line::from(self.title).bold().render(title_area, buf);
        if let Some(hint) = hint {
            Line::from(hint).dim().render(hint_area, buf);
        }

        for dy in 0..body.height {
            let sy = self.scroll.saturating_add(dy);
            if sy >= content.height {
                break;
            }
            for dx in 0..body.width.min(content.width) {
                if let (Some(src), Some(dst)) = (self.body.cell((dx, sy)), buf.cell_mut((body.x + dx, body.y + dy))) {
                    *dst = src.clone();
                }
            }
        }

        Line::from(FOOTER).dim().render(footer, buf);
    }
}
