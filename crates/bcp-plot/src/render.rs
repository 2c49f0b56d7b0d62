//! Rasterise figures through `plotters`.
//!
//! Data coordinates are mapped to pixels here rather than through a chart
//! context, so y ticks sit exactly where the axes say and dash patterns
//! stay uniform on screen whatever the data aspect.

use crate::color::Rgba;
use crate::error::{PlotError, Result};
use crate::figure::{Anchor, Artist, ArtistKind, Axes, Figure, LineStyle};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;
use tracing::info;

const TICK_LENGTH: f64 = 5.0;
const TICK_LABEL_GAP: i32 = 8;
const LEGEND_SAMPLE: i32 = 40;
const LEGEND_PAD: i32 = 10;

impl Figure {
    /// Render to an in-memory SVG document.
    pub fn to_svg(&self) -> Result<String> {
        let mut buffer = String::new();
        {
            let root =
                SVGBackend::with_string(&mut buffer, (self.width, self.height)).into_drawing_area();
            draw(self, &root)?;
            root.present().map_err(render_error)?;
        }
        Ok(buffer)
    }

    /// Write an SVG file.
    pub fn save_svg(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_svg()?)?;
        info!(path = %path.display(), format = "svg", "figure saved");
        Ok(())
    }

    /// Write a PNG file. The bitmap has no alpha channel, so the background
    /// is painted white.
    ///
    /// Bitmap text needs a font backend; without the `ttf` feature this
    /// fails with [`PlotError::UnsupportedFormat`] before touching `path`.
    pub fn save_png(&self, path: &Path) -> Result<()> {
        if !cfg!(feature = "ttf") {
            return Err(PlotError::UnsupportedFormat(
                "png (build with feature ttf)".to_string(),
            ));
        }
        {
            let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
            root.fill(&WHITE).map_err(render_error)?;
            draw(self, &root)?;
            root.present().map_err(render_error)?;
        }
        info!(path = %path.display(), format = "png", "figure saved");
        Ok(())
    }

    /// Write to `path`, choosing the format from its extension.
    pub fn save(&self, path: &Path) -> Result<()> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "svg" => self.save_svg(path),
            "png" => self.save_png(path),
            other => Err(PlotError::UnsupportedFormat(other.to_string())),
        }
    }
}

fn render_error<E: std::error::Error + Send + Sync>(err: DrawingAreaErrorKind<E>) -> PlotError {
    PlotError::Render(err.to_string())
}

/// Pixel rectangle of the plot area and its data window.
#[derive(Debug, Clone, Copy)]
struct Frame {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    x: (f64, f64),
    y: (f64, f64),
}

impl Frame {
    fn new(figure: &Figure) -> Self {
        let axes = &figure.axes;
        let m = axes.margins;
        let mut left = m.left as f64;
        let mut top = m.top as f64;
        let mut width = figure.width.saturating_sub(m.left + m.right).max(1) as f64;
        let mut height = figure.height.saturating_sub(m.top + m.bottom).max(1) as f64;
        let x = span(axes.x_range);
        let y = span(axes.y_range);
        if axes.equal_aspect {
            let scale = (width / (x.1 - x.0)).min(height / (y.1 - y.0));
            let w = scale * (x.1 - x.0);
            let h = scale * (y.1 - y.0);
            left += (width - w) / 2.0;
            top += (height - h) / 2.0;
            width = w;
            height = h;
        }
        Self {
            left,
            top,
            width,
            height,
            x,
            y,
        }
    }

    fn map(&self, p: [f64; 2]) -> (f64, f64) {
        let fx = (p[0] - self.x.0) / (self.x.1 - self.x.0);
        let fy = (p[1] - self.y.0) / (self.y.1 - self.y.0);
        (self.left + fx * self.width, self.top + (1.0 - fy) * self.height)
    }

    fn px(&self, p: [f64; 2]) -> (i32, i32) {
        to_px(self.map(p))
    }

    fn bottom(&self) -> f64 {
        self.top + self.height
    }

    fn right(&self) -> f64 {
        self.left + self.width
    }
}

fn span(range: (f64, f64)) -> (f64, f64) {
    if range.1 > range.0 {
        range
    } else {
        (range.0 - 0.5, range.0 + 0.5)
    }
}

fn to_px(p: (f64, f64)) -> (i32, i32) {
    (p.0.round() as i32, p.1.round() as i32)
}

fn color(c: Rgba) -> RGBAColor {
    let (r, g, b) = c.to_rgb8();
    RGBAColor(r, g, b, c.a)
}

fn stroke(c: Rgba, width: f64) -> ShapeStyle {
    color(c).stroke_width(width.round().max(1.0) as u32)
}

fn text_style(size: f64, bold: bool, anchor: Anchor) -> TextStyle<'static> {
    let weight = if bold {
        FontStyle::Bold
    } else {
        FontStyle::Normal
    };
    let pos = match anchor {
        Anchor::TopCenter => Pos::new(HPos::Center, VPos::Top),
        Anchor::BottomCenter => Pos::new(HPos::Center, VPos::Bottom),
        Anchor::CenterRight => Pos::new(HPos::Right, VPos::Center),
        Anchor::CenterLeft => Pos::new(HPos::Left, VPos::Center),
    };
    TextStyle::from(FontDesc::new(FontFamily::SansSerif, size, weight))
        .color(&BLACK)
        .pos(pos)
}

fn draw<DB: DrawingBackend>(figure: &Figure, root: &DrawingArea<DB, Shift>) -> Result<()> {
    if !figure.transparent {
        root.fill(&WHITE).map_err(render_error)?;
    }
    let frame = Frame::new(figure);
    for artist in figure.axes.draw_order() {
        draw_artist(root, &frame, artist)?;
    }
    draw_frame(root, &frame, &figure.axes)?;
    if figure.axes.show_legend && !figure.axes.legend.is_empty() {
        draw_legend(root, &frame, &figure.axes)?;
    }
    Ok(())
}

fn draw_artist<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    frame: &Frame,
    artist: &Artist,
) -> Result<()> {
    match &artist.kind {
        ArtistKind::Line {
            points,
            color: c,
            width,
            style,
        } => {
            let pixels: Vec<(f64, f64)> = points.iter().map(|p| frame.map(*p)).collect();
            draw_polyline(root, &pixels, *c, *width, *style)?;
        }
        ArtistKind::Polygon { points, edge, fill } => {
            let pixels: Vec<(i32, i32)> = points.iter().map(|p| frame.px(*p)).collect();
            if let Some(fill) = fill {
                root.draw(&Polygon::new(pixels.clone(), color(*fill).filled()))
                    .map_err(render_error)?;
            }
            if let Some((edge_color, width)) = edge {
                let mut closed = pixels;
                if let Some(first) = closed.first().copied() {
                    closed.push(first);
                }
                root.draw(&PathElement::new(closed, stroke(*edge_color, *width)))
                    .map_err(render_error)?;
            }
        }
        ArtistKind::Scatter {
            points,
            colors,
            radius,
            clip,
        } => {
            let r = radius.round().max(1.0) as i32;
            let clip = clip.map(|tri| tri.map(|v| frame.map(v)));
            for (p, c) in points.iter().zip(colors) {
                let mut center = frame.map(*p);
                if let Some(tri) = &clip {
                    center = inset(center, tri, r as f64);
                }
                root.draw(&Circle::new(to_px(center), r, color(*c).filled()))
                    .map_err(render_error)?;
            }
        }
        ArtistKind::VLine { x, color: c, width } => {
            let (px, _) = frame.map([*x, frame.y.0]);
            let line = vec![
                to_px((px, frame.top)),
                to_px((px, frame.bottom())),
            ];
            root.draw(&PathElement::new(line, stroke(*c, *width)))
                .map_err(render_error)?;
        }
        ArtistKind::Text {
            text,
            at,
            size,
            bold,
            anchor,
        } => {
            root.draw(&Text::new(
                text.as_str(),
                frame.px(*at),
                text_style(*size, *bold, *anchor),
            ))
            .map_err(render_error)?;
        }
    }
    Ok(())
}

fn draw_polyline<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    pixels: &[(f64, f64)],
    c: Rgba,
    width: f64,
    style: LineStyle,
) -> Result<()> {
    let pieces = match style.dash_pattern() {
        Some(pattern) => {
            let scaled: Vec<f64> = pattern.iter().map(|len| len * width.max(1.0)).collect();
            dash(pixels, &scaled)
        }
        None => vec![pixels.to_vec()],
    };
    for piece in pieces {
        let piece: Vec<(i32, i32)> = piece.into_iter().map(to_px).collect();
        root.draw(&PathElement::new(piece, stroke(c, width)))
            .map_err(render_error)?;
    }
    Ok(())
}

const INSET_PASSES: usize = 8;

/// Move `p` so that a disc of radius `r` around it stays inside the pixel
/// triangle `tri`. Points already far enough from every edge are unchanged.
fn inset(p: (f64, f64), tri: &[(f64, f64); 3], r: f64) -> (f64, f64) {
    let g = (
        (tri[0].0 + tri[1].0 + tri[2].0) / 3.0,
        (tri[0].1 + tri[1].1 + tri[2].1) / 3.0,
    );
    let area = ((tri[1].0 - tri[0].0) * (tri[2].1 - tri[0].1)
        - (tri[2].0 - tri[0].0) * (tri[1].1 - tri[0].1))
        .abs()
        / 2.0;
    let perimeter: f64 = (0..3)
        .map(|k| {
            let (u, v) = (tri[k], tri[(k + 1) % 3]);
            (v.0 - u.0).hypot(v.1 - u.1)
        })
        .sum();
    // No room for the disc anywhere but the middle.
    if perimeter == 0.0 || 2.0 * area / perimeter <= r {
        return g;
    }

    let mut q = p;
    // Alternating projections onto the three inset half-planes.
    for _ in 0..INSET_PASSES {
        for k in 0..3 {
            let (u, v) = (tri[k], tri[(k + 1) % 3]);
            let len = (v.0 - u.0).hypot(v.1 - u.1);
            let mut n = (-(v.1 - u.1) / len, (v.0 - u.0) / len);
            if (g.0 - u.0) * n.0 + (g.1 - u.1) * n.1 < 0.0 {
                n = (-n.0, -n.1);
            }
            let d = (q.0 - u.0) * n.0 + (q.1 - u.1) * n.1;
            if d < r {
                q = (q.0 + n.0 * (r - d), q.1 + n.1 * (r - d));
            }
        }
    }
    q
}

/// Split a pixel polyline into the "on" pieces of an on/off pattern.
fn dash(points: &[(f64, f64)], pattern: &[f64]) -> Vec<Vec<(f64, f64)>> {
    if points.len() < 2 || pattern.is_empty() || pattern.iter().any(|l| *l <= 0.0) {
        return vec![points.to_vec()];
    }

    let mut pieces = Vec::new();
    let mut current = vec![points[0]];
    let mut on = true;
    let mut idx = 0;
    let mut remaining = pattern[0];

    for w in points.windows(2) {
        let (a, b) = (w[0], w[1]);
        let length = ((b.0 - a.0).powi(2) + (b.1 - a.1).powi(2)).sqrt();
        let mut pos = 0.0;
        while length - pos > remaining {
            pos += remaining;
            let t = pos / length;
            let p = (a.0 + (b.0 - a.0) * t, a.1 + (b.1 - a.1) * t);
            if on {
                current.push(p);
                pieces.push(std::mem::take(&mut current));
            } else {
                current = vec![p];
            }
            on = !on;
            idx = (idx + 1) % pattern.len();
            remaining = pattern[idx];
        }
        remaining -= length - pos;
        if on {
            current.push(b);
        }
    }
    if on && current.len() >= 2 {
        pieces.push(current);
    }
    pieces
}

fn draw_frame<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    frame: &Frame,
    axes: &Axes,
) -> Result<()> {
    let black = Rgba::BLACK;
    let (l, r, t, b) = (frame.left, frame.right(), frame.top, frame.bottom());
    let mut edges = Vec::new();
    if axes.spines.left {
        edges.push(((l, t), (l, b)));
    }
    if axes.spines.right {
        edges.push(((r, t), (r, b)));
    }
    if axes.spines.top {
        edges.push(((l, t), (r, t)));
    }
    if axes.spines.bottom {
        edges.push(((l, b), (r, b)));
    }
    for (from, to) in edges {
        root.draw(&PathElement::new(vec![to_px(from), to_px(to)], stroke(black, 1.0)))
            .map_err(render_error)?;
    }

    // Ticks straddle the left spine.
    for tick in &axes.y_ticks {
        let (_, y) = frame.map([frame.x.0, tick.value]);
        let mark = vec![
            to_px((l - TICK_LENGTH / 2.0, y)),
            to_px((l + TICK_LENGTH / 2.0, y)),
        ];
        root.draw(&PathElement::new(mark, stroke(black, 1.0)))
            .map_err(render_error)?;
        let at = (l.round() as i32 - TICK_LABEL_GAP, y.round() as i32);
        root.draw(&Text::new(
            tick.label.as_str(),
            at,
            text_style(axes.tick_label_size, false, Anchor::CenterRight),
        ))
        .map_err(render_error)?;
    }
    Ok(())
}

fn draw_legend<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    frame: &Frame,
    axes: &Axes,
) -> Result<()> {
    let size = axes.legend_size;
    let row = (size * 1.4).round() as i32;
    // Width estimate; the SVG backend does not measure text.
    let longest = axes
        .legend
        .iter()
        .map(|e| e.label.chars().count())
        .max()
        .unwrap_or(0);
    let box_w = LEGEND_SAMPLE + 3 * LEGEND_PAD + (longest as f64 * size * 0.55).round() as i32;
    let box_h = row * axes.legend.len() as i32 + LEGEND_PAD;
    let x1 = frame.right().round() as i32 - LEGEND_PAD;
    let y0 = frame.top.round() as i32 + LEGEND_PAD;
    let x0 = x1 - box_w;

    root.draw(&Rectangle::new(
        [(x0, y0), (x1, y0 + box_h)],
        color(Rgba::WHITE).filled(),
    ))
    .map_err(render_error)?;
    root.draw(&Rectangle::new(
        [(x0, y0), (x1, y0 + box_h)],
        stroke(Rgba::BLACK, 1.0),
    ))
    .map_err(render_error)?;

    for (i, entry) in axes.legend.iter().enumerate() {
        let cy = (y0 + LEGEND_PAD / 2 + row * i as i32 + row / 2) as f64;
        let sx = (x0 + LEGEND_PAD) as f64;
        let sample = [(sx, cy), (sx + LEGEND_SAMPLE as f64, cy)];
        draw_polyline(root, &sample, entry.color, 2.0, entry.style)?;
        root.draw(&Text::new(
            entry.label.as_str(),
            (x0 + 2 * LEGEND_PAD + LEGEND_SAMPLE, cy.round() as i32),
            text_style(size, false, Anchor::CenterLeft),
        ))
        .map_err(render_error)?;
    }
    Ok(())
}
