use surplus_core::models::{LinearDemand, Market, Point};

mod ceiling;
mod monopoly;
mod segmented;

pub use ceiling::{ceiling_panels, price_floor_panel};
pub use monopoly::monopoly_subsidy;
pub use segmented::segmented_pricing;

/// Rendering settings handed to the plotting collaborator.
///
/// These are carried inside every [`Figure`] rather than set as global
/// plotting state, so a chart document renders the same way wherever it goes.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ChartConfig {
    /// Number of evenly spaced samples per curve
    pub samples: usize,
    /// Preferred font families, in order; the first ones cover CJK labels
    pub font_families: Vec<String>,
    /// Whether to draw minus signs with the Unicode minus glyph
    pub unicode_minus: bool,
    /// Output resolution for raster renderers
    pub dpi: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            samples: 200,
            font_families: vec!["SimHei".to_owned(), "DejaVu Sans".to_owned()],
            unicode_minus: false,
            dpi: 300,
        }
    }
}

/// A titled collection of panels, rendered together.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Figure {
    /// Overall title
    pub title: String,
    /// How to render the panels
    pub config: ChartConfig,
    /// The panels, in reading order
    pub panels: Vec<Chart>,
}

/// A single price/quantity diagram.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Chart {
    /// Panel title
    pub title: String,
    /// Horizontal axis label
    pub x_label: String,
    /// Vertical axis label
    pub y_label: String,
    /// Horizontal axis extent
    pub x_range: (f64, f64),
    /// Vertical axis extent
    pub y_range: (f64, f64),
    /// Curves and reference lines
    pub series: Vec<Series>,
    /// Labelled points
    pub markers: Vec<Marker>,
    /// Shaded welfare areas
    pub areas: Vec<Area>,
    /// Free-form annotations
    pub notes: Vec<String>,
}

impl Chart {
    fn new(title: impl Into<String>, x_range: (f64, f64), y_range: (f64, f64)) -> Self {
        Self {
            title: title.into(),
            x_label: "Quantity".to_owned(),
            y_label: "Price".to_owned(),
            x_range,
            y_range,
            series: Vec::new(),
            markers: Vec::new(),
            areas: Vec::new(),
            notes: Vec::new(),
        }
    }

    fn line(mut self, label: impl Into<String>, style: LineStyle, points: Vec<Point>) -> Self {
        self.series.push(Series {
            label: label.into(),
            style,
            points,
        });
        self
    }

    fn marker(mut self, label: impl Into<String>, point: impl Into<Point>) -> Self {
        self.markers.push(Marker {
            label: label.into(),
            point: point.into(),
        });
        self
    }

    fn area(mut self, label: impl Into<String>, kind: AreaKind, vertices: Vec<Point>) -> Self {
        self.areas.push(Area {
            label: label.into(),
            kind,
            vertices,
        });
        self
    }

    fn note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Find a series by label
    pub fn find_series(&self, label: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.label == label)
    }

    /// Find an area by kind
    pub fn areas_of(&self, kind: AreaKind) -> impl Iterator<Item = &Area> {
        self.areas.iter().filter(move |a| a.kind == kind)
    }
}

/// How a series is stroked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum LineStyle {
    /// A curve of the model
    Solid,
    /// A derived curve or a reference level
    Dashed,
}

/// A polyline through sampled points.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Series {
    /// Legend entry
    pub label: String,
    /// Stroke
    pub style: LineStyle,
    /// The polyline, in order
    pub points: Vec<Point>,
}

/// A labelled point.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Marker {
    /// Annotation text
    pub label: String,
    /// Location
    pub point: Point,
}

/// What a shaded area represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum AreaKind {
    ConsumerSurplus,
    ProducerSurplus,
    DeadweightLoss,
    /// A side payment or subsidy bill
    Transfer,
}

/// A closed polygon; the last vertex joins back to the first.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Area {
    /// Legend entry
    pub label: String,
    /// What is shaded
    pub kind: AreaKind,
    /// Polygon vertices
    pub vertices: Vec<Point>,
}

impl Area {
    /// The enclosed area (shoelace formula)
    pub fn size(&self) -> f64 {
        let n = self.vertices.len();
        let twice = (0..n)
            .map(|i| {
                let a = self.vertices[i];
                let b = self.vertices[(i + 1) % n];
                a.quantity * b.price - b.quantity * a.price
            })
            .sum::<f64>();
        0.5 * twice.abs()
    }
}

/// Evaluate `f` at `samples` evenly spaced quantities spanning `domain`, endpoints included.
///
/// Fewer than two samples yields just the endpoints.
pub fn sample(f: impl Fn(f64) -> f64, domain: (f64, f64), samples: usize) -> Vec<Point> {
    linspace(domain, samples)
        .map(|q| Point::new(q, f(q)))
        .collect()
}

fn linspace((lo, hi): (f64, f64), samples: usize) -> impl Iterator<Item = f64> {
    let n = samples.max(2);
    let step = (hi - lo) / (n - 1) as f64;
    (0..n).map(move |i| if i == n - 1 { hi } else { lo + step * i as f64 })
}

/// The region between demand and supply over `[q0, q1]`, in either order.
///
/// Both curves are linear on the interval, so the four corners are exact.
pub fn gap_polygon(market: &Market, q0: f64, q1: f64) -> Vec<Point> {
    let (lo, hi) = if q0 <= q1 { (q0, q1) } else { (q1, q0) };
    vec![
        Point::new(lo, market.demand.price(lo)),
        Point::new(hi, market.demand.price(hi)),
        Point::new(hi, market.supply.price(hi)),
        Point::new(lo, market.supply.price(lo)),
    ]
}

/// The region under demand and above a flat price over `[0, q]`.
fn consumer_polygon(demand: &LinearDemand, price: f64, q: f64) -> Vec<Point> {
    vec![
        Point::new(0.0, price),
        Point::new(0.0, demand.intercept()),
        Point::new(q, demand.price(q)),
        Point::new(q, price),
    ]
}

/// The region above supply and below a flat price over `[0, q]`.
fn producer_polygon(market: &Market, price: f64, q: f64) -> Vec<Point> {
    vec![
        Point::new(0.0, market.supply.price(0.0)),
        Point::new(0.0, price),
        Point::new(q, price),
        Point::new(q, market.supply.price(q)),
    ]
}

/// A flat band between two prices over `[0, q]`.
fn band(lo: f64, hi: f64, q: f64) -> Vec<Point> {
    vec![
        Point::new(0.0, lo),
        Point::new(0.0, hi),
        Point::new(q, hi),
        Point::new(q, lo),
    ]
}

fn level(price: f64, x_range: (f64, f64)) -> Vec<Point> {
    vec![Point::new(x_range.0, price), Point::new(x_range.1, price)]
}

// Leave some headroom above the largest value on an axis
fn padded(max: f64) -> (f64, f64) {
    (0.0, 1.1 * max)
}
