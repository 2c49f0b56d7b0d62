//! HTML comparison sheet.
//!
//! One page per run: a ternary plot for every snapshot, a density figure
//! overlaying all of them, and a table of the rounded probabilities. Figures
//! are inlined as SVG so the page is a single self-contained file.

use crate::color::palette;
use crate::config::PlotConfig;
use crate::density::DensityFigure;
use crate::error::{PlotError, Result};
use crate::figure::LineStyle;
use crate::source::{PosteriorSnapshot, ProbabilitySource};
use crate::ternary::{sanitize_label, tern};
use bcp_math::{format_units, saferound_units};
use chrono::{DateTime, Utc};
use std::fmt::Write as _;
use tracing::{debug, info};

const DEFAULT_TITLE: &str = "Bayesian comparison";

/// Builds the comparison sheet.
pub struct SheetGenerator {
    config: PlotConfig,
}

impl SheetGenerator {
    pub fn new(config: PlotConfig) -> Self {
        Self { config }
    }

    /// Generator with default configuration.
    pub fn default_config() -> Self {
        Self::new(PlotConfig::default())
    }

    pub fn config(&self) -> &PlotConfig {
        &self.config
    }

    /// Render the page for `snapshots`.
    pub fn generate(&self, snapshots: &[PosteriorSnapshot]) -> Result<String> {
        self.generate_at(snapshots, Utc::now())
    }

    /// Render the page with a fixed timestamp.
    pub fn generate_at(
        &self,
        snapshots: &[PosteriorSnapshot],
        generated_at: DateTime<Utc>,
    ) -> Result<String> {
        if snapshots.is_empty() {
            return Err(PlotError::MissingData(
                "comparison sheet needs at least one snapshot".to_string(),
            ));
        }
        self.config.validate()?;

        let names: Vec<String> = snapshots
            .iter()
            .enumerate()
            .map(|(i, s)| display_name(s, i))
            .collect();

        let mut density = DensityFigure::new(self.config.density.clone())?;
        for (i, (snapshot, name)) in snapshots.iter().zip(&names).enumerate() {
            let color = palette::CYCLE[i % palette::CYCLE.len()];
            let style = LineStyle::CYCLE[i % LineStyle::CYCLE.len()];
            density.add_posterior(snapshot, name, style, color)?;
        }
        let density_svg = density.figure().to_svg()?;

        let mut panels = String::new();
        for (snapshot, name) in snapshots.iter().zip(&names) {
            let svg = tern(snapshot, &self.config.ternary)?.to_svg()?;
            let _ = write!(
                panels,
                r#"<figure class="panel"><figcaption>{}</figcaption>{}</figure>"#,
                html_escape(name),
                svg
            );
        }

        let rows = self.probability_rows(snapshots, &names)?;
        let title = self
            .config
            .sheet
            .title
            .clone()
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());
        debug!(snapshots = snapshots.len(), "comparison sheet figures rendered");

        let html = format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{ font-family: sans-serif; margin: 2em; color: #222; }}
.panels {{ display: flex; flex-wrap: wrap; gap: 1em; }}
.panel {{ margin: 0; }}
figcaption {{ font-weight: bold; text-align: center; }}
table {{ border-collapse: collapse; margin: 1em 0; }}
th, td {{ border: 1px solid #ccc; padding: 0.3em 0.8em; text-align: right; }}
th:first-child, td:first-child {{ text-align: left; }}
footer {{ color: #777; font-size: 0.85em; }}
</style>
</head>
<body>
<h1>{title}</h1>
<table>
<thead><tr><th>comparison</th><th>{left}</th><th>ROPE</th><th>{right}</th></tr></thead>
<tbody>
{rows}
</tbody>
</table>
<section class="panels">{panels}</section>
<section class="density">{density_svg}</section>
<footer>Generated {generated} by bcp-plot {version}</footer>
</body>
</html>
"#,
            title = html_escape(&title),
            left = html_escape(&sanitize_label(&self.config.ternary.labels[0], "L")),
            right = html_escape(&sanitize_label(&self.config.ternary.labels[1], "R")),
            rows = rows,
            panels = panels,
            density_svg = density_svg,
            generated = generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            version = env!("CARGO_PKG_VERSION"),
        );

        let output = if self.config.sheet.no_minify || cfg!(debug_assertions) {
            html
        } else {
            let cfg = minify_html::Cfg {
                minify_css: true,
                ..Default::default()
            };
            String::from_utf8(minify_html::minify(html.as_bytes(), &cfg)).unwrap_or(html)
        };

        info!(
            bytes = output.len(),
            snapshots = snapshots.len(),
            title = %title,
            "Comparison sheet generated"
        );
        Ok(output)
    }

    fn probability_rows(&self, snapshots: &[PosteriorSnapshot], names: &[String]) -> Result<String> {
        let decimals = self.config.ternary.decimals;
        let mut rows = String::new();
        for (snapshot, name) in snapshots.iter().zip(names) {
            let (l, r, rr) = snapshot.probs();
            let units = saferound_units(&[l, r, rr], decimals)?;
            let _ = writeln!(
                rows,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                html_escape(name),
                format_units(units[0], decimals),
                format_units(units[1], decimals),
                format_units(units[2], decimals)
            );
        }
        Ok(rows)
    }
}

fn display_name(snapshot: &PosteriorSnapshot, index: usize) -> String {
    let fallback = format!("posterior {}", index + 1);
    match snapshot.name() {
        Some(name) => sanitize_label(name, &fallback),
        None => fallback,
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn snapshot(name: Option<&str>, probs: [f64; 3], mean: f64) -> PosteriorSnapshot {
        PosteriorSnapshot {
            name: name.map(String::from),
            probs,
            sample: vec![[0.6, 0.3, 0.1], [0.5, 0.3, 0.2], [0.7, 0.2, 0.1]],
            df: 9.0,
            mean,
            var: 0.0001,
            rope: 0.01,
        }
    }

    #[test]
    fn test_empty_input_is_missing_data() {
        let err = SheetGenerator::default_config().generate(&[]).unwrap_err();
        assert!(matches!(err, PlotError::MissingData(_)));
    }

    #[test]
    fn test_sheet_contains_table_and_figures() {
        let mut config = PlotConfig::default();
        config.sheet.no_minify = true;
        config.sheet.title = Some("J48 <vs> NB".to_string());
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let html = SheetGenerator::new(config)
            .generate_at(
                &[
                    snapshot(Some("first"), [0.7, 0.2, 0.1], 0.02),
                    snapshot(None, [1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0], -0.01),
                ],
                at,
            )
            .unwrap();

        assert!(html.contains("<title>J48 &lt;vs&gt; NB</title>"));
        assert!(html.contains("<td>first</td><td>0.7000</td><td>0.2000</td><td>0.1000</td>"));
        assert!(html.contains("<td>posterior 2</td><td>0.3334</td><td>0.3333</td><td>0.3333</td>"));
        assert!(html.contains("Generated 2024-05-01 12:00:00 UTC"));
        // Two ternary panels and one density figure.
        assert_eq!(html.matches("<svg").count(), 3);
    }

    #[test]
    fn test_names_are_sanitized_and_escaped() {
        let snap = snapshot(Some("  a\n<b>  "), [0.5, 0.25, 0.25], 0.0);
        assert_eq!(display_name(&snap, 0), "a <b>");
        assert_eq!(html_escape("a <b>"), "a &lt;b&gt;");
        assert_eq!(display_name(&snapshot(Some(" "), [1.0, 0.0, 0.0], 0.0), 2), "posterior 3");
    }
}
