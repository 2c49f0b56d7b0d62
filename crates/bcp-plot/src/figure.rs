//! Retained figure model.
//!
//! A [`Figure`] owns one [`Axes`], which holds the data limits, decorations
//! and an ordered list of [`Artist`]s. Nothing is rasterised until the
//! figure is rendered; artists are drawn by ascending z-order, ties in
//! insertion order.

use crate::color::Rgba;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stroke pattern for lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    /// `-`
    #[default]
    Solid,
    /// `--`
    Dashed,
    /// `:`
    Dotted,
    /// `-.`
    DashDot,
}

impl LineStyle {
    /// All styles, in the order they are cycled on overlays.
    pub const CYCLE: [LineStyle; 4] = [
        LineStyle::Solid,
        LineStyle::Dashed,
        LineStyle::Dotted,
        LineStyle::DashDot,
    ];

    /// On/off lengths in multiples of the line width; `None` for solid.
    pub fn dash_pattern(&self) -> Option<&'static [f64]> {
        match self {
            LineStyle::Solid => None,
            LineStyle::Dashed => Some(&[3.7, 1.6]),
            LineStyle::Dotted => Some(&[1.0, 1.65]),
            LineStyle::DashDot => Some(&[6.4, 1.6, 1.0, 1.6]),
        }
    }

    /// Short token (`-`, `--`, `:`, `-.`).
    pub fn token(&self) -> &'static str {
        match self {
            LineStyle::Solid => "-",
            LineStyle::Dashed => "--",
            LineStyle::Dotted => ":",
            LineStyle::DashDot => "-.",
        }
    }
}

impl FromStr for LineStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "-" | "solid" => Ok(LineStyle::Solid),
            "--" | "dashed" => Ok(LineStyle::Dashed),
            ":" | "dotted" => Ok(LineStyle::Dotted),
            "-." | "dashdot" => Ok(LineStyle::DashDot),
            _ => Err(format!("unknown line style: {}", s)),
        }
    }
}

impl fmt::Display for LineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Where a text box sits relative to its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Horizontally centred, anchor on the top edge.
    TopCenter,
    /// Horizontally centred, anchor on the bottom edge.
    BottomCenter,
    /// Vertically centred, anchor on the right edge.
    CenterRight,
    /// Vertically centred, anchor on the left edge.
    CenterLeft,
}

/// One drawable element.
#[derive(Debug, Clone, PartialEq)]
pub enum ArtistKind {
    /// Polyline in data coordinates.
    Line {
        points: Vec<[f64; 2]>,
        color: Rgba,
        width: f64,
        style: LineStyle,
    },
    /// Polygon; closed when drawn with an edge.
    Polygon {
        points: Vec<[f64; 2]>,
        edge: Option<(Rgba, f64)>,
        fill: Option<Rgba>,
    },
    /// Filled circles of a fixed pixel radius, one colour per point.
    Scatter {
        points: Vec<[f64; 2]>,
        colors: Vec<Rgba>,
        radius: f64,
        /// Keep whole markers inside this triangle (data coordinates).
        clip: Option<[[f64; 2]; 3]>,
    },
    /// Vertical line spanning the full y-range.
    VLine { x: f64, color: Rgba, width: f64 },
    /// Text at a data position.
    Text {
        text: String,
        at: [f64; 2],
        size: f64,
        bold: bool,
        anchor: Anchor,
    },
}

/// Artist with its layering order.
#[derive(Debug, Clone, PartialEq)]
pub struct Artist {
    pub zorder: i32,
    pub kind: ArtistKind,
}

/// Labelled y-axis tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub value: f64,
    pub label: String,
}

/// Which axis frame lines are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spines {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl Spines {
    pub const NONE: Spines = Spines {
        left: false,
        right: false,
        top: false,
        bottom: false,
    };

    pub const LEFT_ONLY: Spines = Spines {
        left: true,
        right: false,
        top: false,
        bottom: false,
    };
}

/// Pixel padding between the canvas edge and the plot area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl Margins {
    pub const fn uniform(px: u32) -> Self {
        Self {
            left: px,
            right: px,
            top: px,
            bottom: px,
        }
    }
}

/// Legend row.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: Rgba,
    pub style: LineStyle,
}

/// A plot region with its own coordinate system.
#[derive(Debug, Clone, PartialEq)]
pub struct Axes {
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    /// One data unit spans the same number of pixels on both axes.
    pub equal_aspect: bool,
    pub spines: Spines,
    pub margins: Margins,
    pub y_ticks: Vec<Tick>,
    pub tick_label_size: f64,
    pub legend: Vec<LegendEntry>,
    pub show_legend: bool,
    pub legend_size: f64,
    artists: Vec<Artist>,
}

impl Default for Axes {
    fn default() -> Self {
        Self {
            x_range: (0.0, 1.0),
            y_range: (0.0, 1.0),
            equal_aspect: false,
            spines: Spines::NONE,
            margins: Margins::uniform(20),
            y_ticks: Vec::new(),
            tick_label_size: 24.0,
            legend: Vec::new(),
            show_legend: false,
            legend_size: 20.0,
            artists: Vec::new(),
        }
    }
}

impl Axes {
    /// Append an artist.
    pub fn add(&mut self, zorder: i32, kind: ArtistKind) {
        self.artists.push(Artist { zorder, kind });
    }

    /// Artists in insertion order.
    pub fn artists(&self) -> &[Artist] {
        &self.artists
    }

    /// Artists in drawing order.
    pub fn draw_order(&self) -> Vec<&Artist> {
        let mut ordered: Vec<&Artist> = self.artists.iter().collect();
        ordered.sort_by_key(|a| a.zorder);
        ordered
    }

    /// Widen the x-range to cover `[lo, hi]`.
    pub fn include_x(&mut self, lo: f64, hi: f64, first: bool) {
        self.x_range = if first {
            (lo, hi)
        } else {
            (self.x_range.0.min(lo), self.x_range.1.max(hi))
        };
    }

    /// Every text string, in insertion order.
    pub fn texts(&self) -> Vec<&str> {
        self.artists
            .iter()
            .filter_map(|a| match &a.kind {
                ArtistKind::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Scatter layers, in insertion order.
    pub fn scatter_layers(&self) -> impl Iterator<Item = (&[[f64; 2]], &[Rgba])> {
        self.artists.iter().filter_map(|a| match &a.kind {
            ArtistKind::Scatter { points, colors, .. } => Some((points.as_slice(), colors.as_slice())),
            _ => None,
        })
    }
}

/// Owned drawing surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub width: u32,
    pub height: u32,
    /// Leave the background unpainted.
    pub transparent: bool,
    pub axes: Axes,
}

impl Figure {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            transparent: true,
            axes: Axes::default(),
        }
    }
}
