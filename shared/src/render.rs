//! Figure construction and display.
//!
//! The figure is plotly's JSON shape (two `scatter3d` traces plus a layout) so it
//! can be dropped straight into `Plotly.newPlot`.

use std::path::{Path, PathBuf};
use std::process::Command;

use askama::Template;
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{info, warn};

use crate::i18n::Locale;
use crate::models::{AsteroidRecord, PlacedAsteroid, Position};
use crate::templates::AsteroidSceneTemplate;

pub const EARTH_MARKER_SIZE: f64 = 12.0;
pub const EARTH_COLOR: &str = "blue";
pub const HAZARDOUS_COLOR: &str = "red";
pub const SAFE_COLOR: &str = "orange";
pub const MIN_MARKER_SIZE: f64 = 3.0;
pub const MAX_MARKER_SIZE: f64 = 15.0;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to serialize figure: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to render template: {0}")]
    Template(#[from] askama::Error),
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Nothing to draw; the sink was not called.
    NoData,
    Rendered(PathBuf),
}

#[derive(Debug, Clone, Serialize)]
pub struct MarkerLine {
    pub width: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Marker {
    pub size: Vec<f64>,
    pub color: Vec<&'static str>,
    pub opacity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<MarkerLine>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Scatter3d {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub mode: &'static str,
    pub name: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
    pub marker: Marker,
    pub hovertext: Vec<String>,
    pub hoverinfo: &'static str,
}

impl Scatter3d {
    fn markers(name: &str, points: &[Position], marker: Marker, hovertext: Vec<String>) -> Self {
        Self {
            kind: "scatter3d",
            mode: "markers",
            name: name.to_string(),
            x: points.iter().map(|p| p.x).collect(),
            y: points.iter().map(|p| p.y).collect(),
            z: points.iter().map(|p| p.z).collect(),
            marker,
            hovertext,
            hoverinfo: "text",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Figure {
    #[serde(skip)]
    pub title: String,
    pub data: Vec<Scatter3d>,
    pub layout: Value,
}

impl Figure {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Where a finished figure goes.
pub trait FigureSink {
    fn show(&self, figure: &Figure) -> Result<PathBuf, RenderError>;
}

/// Marker size for a diameter in meters.
pub fn marker_size(diameter: f64) -> f64 {
    (diameter / 10.0).clamp(MIN_MARKER_SIZE, MAX_MARKER_SIZE)
}

pub fn marker_color(hazardous: bool) -> &'static str {
    if hazardous {
        HAZARDOUS_COLOR
    } else {
        SAFE_COLOR
    }
}

/// Round to `decimals` places and group the integer digits with commas.
pub fn format_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (formatted.as_str(), None),
    };

    let mut out = String::with_capacity(formatted.len() + int_part.len() / 3 + 1);
    let is_zero = formatted.chars().all(|c| c == '0' || c == '.');
    if value.is_sign_negative() && !is_zero {
        out.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

pub fn hover_text(record: &AsteroidRecord, locale: Locale) -> String {
    let l = locale.labels();
    format!(
        "{}: {}<br>{}: {} km<br>{}: {:.1} - {:.1} m<br>{}: {} km/h<br>{}: {}<br>{}: {}",
        l.name,
        record.name,
        l.distance,
        format_thousands(record.distance_km, 0),
        l.diameter,
        record.diameter_min,
        record.diameter_max,
        l.velocity,
        format_thousands(record.velocity, 0),
        l.date,
        record.date,
        l.hazardous,
        locale.yes_no(record.hazardous),
    )
}

pub fn figure_title(count: usize, locale: Locale) -> String {
    format!("Near-Earth Asteroids ({} {})", count, locale.labels().objects)
}

fn scene_axis() -> Value {
    json!({
        "backgroundcolor": "black",
        "gridcolor": "gray",
        "zerolinecolor": "gray",
        "color": "white"
    })
}

fn layout(title: &str) -> Value {
    let mut x = scene_axis();
    let mut y = scene_axis();
    let mut z = scene_axis();
    x["title"] = json!({ "text": "X (km)" });
    y["title"] = json!({ "text": "Y (km)" });
    z["title"] = json!({ "text": "Z (km)", "font": { "color": "white" } });

    json!({
        "title": { "text": title },
        "scene": {
            "xaxis": x,
            "yaxis": y,
            "zaxis": z,
            "camera": { "eye": { "x": 1.5, "y": 1.5, "z": 1.5 } }
        },
        "paper_bgcolor": "black",
        "plot_bgcolor": "black",
        "font": { "color": "white" },
        "showlegend": true
    })
}

/// Earth at the origin plus one marker per asteroid.
pub fn build_figure(placed: &[PlacedAsteroid], locale: Locale) -> Figure {
    let labels = locale.labels();

    let earth = Scatter3d::markers(
        labels.earth,
        &[Position::ORIGIN],
        Marker {
            size: vec![EARTH_MARKER_SIZE],
            color: vec![EARTH_COLOR],
            opacity: 0.8,
            line: None,
        },
        vec![labels.earth.to_string()],
    );

    let points: Vec<Position> = placed.iter().map(|p| p.position).collect();
    let asteroids = Scatter3d::markers(
        labels.asteroids,
        &points,
        Marker {
            size: placed.iter().map(|p| marker_size(p.record.diameter)).collect(),
            color: placed.iter().map(|p| marker_color(p.record.hazardous)).collect(),
            opacity: 0.7,
            line: Some(MarkerLine {
                width: 2.0,
                color: "darkgray",
            }),
        },
        placed.iter().map(|p| hover_text(&p.record, locale)).collect(),
    );

    let title = figure_title(placed.len(), locale);
    Figure {
        layout: layout(&title),
        title,
        data: vec![earth, asteroids],
    }
}

/// Build the figure and hand it to `sink`. Empty input short-circuits to `NoData`.
pub fn render<S: FigureSink + ?Sized>(
    placed: &[PlacedAsteroid],
    locale: Locale,
    sink: &S,
) -> Result<RenderOutcome, RenderError> {
    if placed.is_empty() {
        info!("No asteroid data to render");
        return Ok(RenderOutcome::NoData);
    }

    let figure = build_figure(placed, locale);
    let location = sink.show(&figure)?;
    info!("Rendered {} asteroids to {}", placed.len(), location.display());
    Ok(RenderOutcome::Rendered(location))
}

/// Writes the figure as a standalone HTML page and optionally opens it.
#[derive(Debug, Clone)]
pub struct HtmlFileSink {
    pub path: PathBuf,
    pub plotly_js_url: String,
    pub locale: Locale,
    pub open_browser: bool,
}

impl HtmlFileSink {
    pub fn new(path: PathBuf, plotly_js_url: String, locale: Locale, open_browser: bool) -> Self {
        Self {
            path,
            plotly_js_url,
            locale,
            open_browser,
        }
    }

    pub fn write(&self, figure: &Figure) -> Result<(), RenderError> {
        let html = AsteroidSceneTemplate::from_figure(figure, self.locale, &self.plotly_js_url)?
            .render()?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| RenderError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(&self.path, html).map_err(|source| RenderError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl FigureSink for HtmlFileSink {
    fn show(&self, figure: &Figure) -> Result<PathBuf, RenderError> {
        self.write(figure)?;
        if self.open_browser {
            // The page is already on disk, so a missing browser is not fatal
            if let Err(e) = open_in_browser(&self.path) {
                warn!("Could not open {} in a browser: {}", self.path.display(), e);
            }
        }
        Ok(self.path.clone())
    }
}

fn open_in_browser(path: &Path) -> std::io::Result<()> {
    let mut command = if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", ""]);
        c
    } else {
        Command::new("xdg-open")
    };
    command.arg(path).spawn().map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn record(name: &str, diameter_min: f64, diameter_max: f64, hazardous: bool) -> AsteroidRecord {
        AsteroidRecord {
            name: name.to_string(),
            distance_km: 1_234_567.8,
            diameter: (diameter_min + diameter_max) / 2.0,
            diameter_min,
            diameter_max,
            velocity: 45_678.2,
            date: "2025-10-01".to_string(),
            hazardous,
        }
    }

    fn placed(record: AsteroidRecord) -> PlacedAsteroid {
        PlacedAsteroid {
            position: Position { x: record.distance_km, y: 0.0, z: 0.0 },
            record,
        }
    }

    struct CountingSink {
        calls: Cell<usize>,
    }

    impl FigureSink for CountingSink {
        fn show(&self, _figure: &Figure) -> Result<PathBuf, RenderError> {
            self.calls.set(self.calls.get() + 1);
            Ok(PathBuf::from("memory"))
        }
    }

    #[test]
    fn test_marker_size_clamps() {
        assert_eq!(marker_size(0.0), 3.0);
        assert_eq!(marker_size(1000.0), 15.0);
        assert_eq!(marker_size(30.0), 3.0);
        assert_eq!(marker_size(75.0), 7.5);
        assert_eq!(marker_size(150.0), 15.0);
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0.0, 0), "0");
        assert_eq!(format_thousands(999.4, 0), "999");
        assert_eq!(format_thousands(1000.0, 0), "1,000");
        assert_eq!(format_thousands(1_234_567.8, 0), "1,234,568");
        assert_eq!(format_thousands(1_234_567.891, 2), "1,234,567.89");
        assert_eq!(format_thousands(-98_765.4, 1), "-98,765.4");
        assert_eq!(format_thousands(-0.2, 0), "0");
    }

    #[test]
    fn test_hover_text_layout() {
        let text = hover_text(&record("(2025 AB)", 12.34, 27.6, true), Locale::En);
        assert_eq!(
            text,
            "Name: (2025 AB)<br>Distance: 1,234,568 km<br>Diameter: 12.3 - 27.6 m<br>\
             Velocity: 45,678 km/h<br>Date: 2025-10-01<br>Hazardous: Yes"
        );
    }

    #[test]
    fn test_hover_text_german() {
        let text = hover_text(&record("X", 1.0, 2.0, false), Locale::De);
        assert!(text.starts_with("Name: X<br>Distanz: 1,234,568 km"));
        assert!(text.ends_with("Gefährlich: Nein"));
    }

    #[test]
    fn test_build_figure_series() {
        let items = vec![
            placed(record("a", 10.0, 20.0, true)),
            placed(record("b", 500.0, 700.0, false)),
        ];
        let figure = build_figure(&items, Locale::En);

        assert_eq!(figure.data.len(), 2);
        let earth = &figure.data[0];
        assert_eq!(earth.name, "Earth");
        assert_eq!((earth.x[0], earth.y[0], earth.z[0]), (0.0, 0.0, 0.0));
        assert_eq!(earth.x.len(), 1);

        let asteroids = &figure.data[1];
        assert_eq!(asteroids.x.len(), 2);
        assert_eq!(asteroids.marker.color, vec!["red", "orange"]);
        assert_eq!(asteroids.marker.size, vec![3.0, 15.0]);
        assert_eq!(asteroids.hovertext.len(), 2);
        assert_eq!(figure.title, "Near-Earth Asteroids (2 objects)");
    }

    #[test]
    fn test_figure_json_shape() {
        let figure = build_figure(&[placed(record("a", 1.0, 2.0, false))], Locale::De);
        let value: Value = serde_json::from_str(&figure.to_json().unwrap()).unwrap();

        assert_eq!(value["data"][0]["type"], "scatter3d");
        assert_eq!(value["data"][1]["mode"], "markers");
        assert_eq!(value["data"][1]["marker"]["line"]["color"], "darkgray");
        assert!(value["data"][0]["marker"].get("line").is_none());
        assert_eq!(value["layout"]["title"]["text"], "Near-Earth Asteroids (1 Objekte)");
        assert_eq!(value["layout"]["scene"]["camera"]["eye"]["x"], 1.5);
        assert!(value.get("title").is_none());
    }

    #[test]
    fn test_render_without_records_skips_sink() {
        let sink = CountingSink { calls: Cell::new(0) };
        let outcome = render(&[], Locale::En, &sink).unwrap();
        assert_eq!(outcome, RenderOutcome::NoData);
        assert_eq!(sink.calls.get(), 0);
    }

    #[test]
    fn test_render_calls_sink_once() {
        let sink = CountingSink { calls: Cell::new(0) };
        let outcome = render(&[placed(record("a", 1.0, 2.0, false))], Locale::En, &sink).unwrap();
        assert_eq!(outcome, RenderOutcome::Rendered(PathBuf::from("memory")));
        assert_eq!(sink.calls.get(), 1);
    }
}
