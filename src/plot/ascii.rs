//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - observed values: `o`
//! - connecting line: `-`, drawn only inside gap-free segments

use crate::domain::Record;
use crate::view::chart::{chart_data, x_to_date};

/// Render one series over `records` (assumed range-filtered and sorted).
///
/// Missing observations break the line; the plot never bridges a gap as if
/// the value were zero.
pub fn render_ascii_chart(records: &[Record], column: &str, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let Some(data) = chart_data(records, column) else {
        return format!("No observations for '{column}' in this window.");
    };

    let [x_min, x_max] = data.x_bounds;
    let [y_min, y_max] = data.y_bounds;

    let mut grid = vec![vec![' '; width]; height];

    for segment in &data.segments {
        let mut prev = None;
        for &(x, y) in segment {
            let gx = map_x(x, x_min, x_max, width);
            let gy = map_y(y, y_min, y_max, height);
            if let Some((px, py)) = prev {
                draw_line(&mut grid, px, py, gx, gy, '-');
            }
            prev = Some((gx, gy));
        }
    }

    // Observed points overlay the line.
    for &(x, y) in &data.points {
        let gx = map_x(x, x_min, x_max, width);
        let gy = map_y(y, y_min, y_max, height);
        grid[gy][gx] = 'o';
    }

    let window = match (x_to_date(x_min), x_to_date(x_max)) {
        (Some(a), Some(b)) => format!("{a} to {b}"),
        _ => "-".to_string(),
    };

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: {column} | {window} | y=[{y_min:.2}, {y_max:.2}]\n"
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
