// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Rasterize figures to images for export

use image::{Rgb, RgbImage};
use std::path::Path;
use tracing::debug;

use crate::config::ViewConfig;
use crate::figure::{Figure, Panel};
use crate::palette::{self, GRID_LINE};
use crate::Result;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Pixel geometry for rasterizing
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub cell_size: u32,
    pub grid_line: u32,
    /// Gap around and between panels
    pub padding: u32,
}

impl From<&ViewConfig> for RenderOptions {
    fn from(view: &ViewConfig) -> Self {
        Self {
            cell_size: view.cell_size,
            grid_line: view.grid_line,
            padding: view.cell_size,
        }
    }
}

impl RenderOptions {
    fn panel_size(&self, panel: &Panel) -> (u32, u32) {
        let span = |cells: usize| {
            let cells = cells as u32;
            if cells == 0 {
                0
            } else {
                cells * self.cell_size + (cells + 1) * self.grid_line
            }
        };
        (span(panel.grid.cols()), span(panel.grid.rows()))
    }
}

/// Compose every panel of the figure into one image
pub fn rasterize(figure: &Figure, options: &RenderOptions) -> Result<RgbImage> {
    figure.validate()?;

    let columns = figure.columns();
    let col_widths: Vec<u32> = (0..columns)
        .map(|c| {
            figure
                .rows
                .iter()
                .filter_map(|row| row.get(c))
                .map(|p| options.panel_size(p).0)
                .max()
                .unwrap_or(0)
        })
        .collect();
    let row_heights: Vec<u32> = figure
        .rows
        .iter()
        .map(|row| row.iter().map(|p| options.panel_size(p).1).max().unwrap_or(0))
        .collect();

    let pad = options.padding;
    let width = col_widths.iter().sum::<u32>() + pad * (columns as u32 + 1);
    let height = row_heights.iter().sum::<u32>() + pad * (row_heights.len() as u32 + 1);
    let mut img = RgbImage::from_pixel(width.max(1), height.max(1), BACKGROUND);

    let mut y = pad;
    for (row, row_height) in figure.rows.iter().zip(&row_heights) {
        let mut x = pad;
        for (panel, col_width) in row.iter().zip(&col_widths) {
            draw_panel(&mut img, panel, x, y, options)?;
            x += col_width + pad;
        }
        y += row_height + pad;
    }

    Ok(img)
}

fn draw_panel(img: &mut RgbImage, panel: &Panel, x0: u32, y0: u32, options: &RenderOptions) -> Result<()> {
    let (w, h) = options.panel_size(panel);
    fill(img, x0, y0, w, h, Rgb(GRID_LINE.rgb));

    let step = options.cell_size + options.grid_line;
    for (r, row) in panel.grid.0.iter().enumerate() {
        for (c, &value) in row.iter().enumerate() {
            let color = palette::color_for(value)?;
            fill(
                img,
                x0 + options.grid_line + c as u32 * step,
                y0 + options.grid_line + r as u32 * step,
                options.cell_size,
                options.cell_size,
                Rgb(color.rgb),
            );
        }
    }
    Ok(())
}

fn fill(img: &mut RgbImage, x0: u32, y0: u32, w: u32, h: u32, color: Rgb<u8>) {
    for y in y0..(y0 + h).min(img.height()) {
        for x in x0..(x0 + w).min(img.width()) {
            img.put_pixel(x, y, color);
        }
    }
}

/// Rasterize and write a PNG, creating parent directories
pub fn export_png(figure: &Figure, options: &RenderOptions, path: &Path) -> Result<()> {
    let img = rasterize(figure, options)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    img.save_with_format(path, image::ImageFormat::Png)?;
    debug!("Exported figure to {:?}", path);
    Ok(())
}
