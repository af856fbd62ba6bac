//! Chart construction for the dashboard.
//!
//! `build_figure` is a pure function of the loaded dataset, a region filter
//! and the chart options. The returned `Figure` is a plain description of the
//! chart (panels, traces, reference markers, layout); drawing it is left to
//! the terminal view or to a JSON consumer.

use chrono::NaiveDate;
use serde::Serialize;

use crate::dataset::ChartDataset;
use crate::error::{Result, SalesError};
use crate::fmt::capitalize;
use crate::settings::Settings;

pub const FIGURE_TITLE: &str = "Pink Morsel Sales Over Time by Region";

// ---------------------------------------------------------------------------
// Region filter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionFilter {
    All,
    Region(String),
}

impl RegionFilter {
    /// Selector value -> filter. `all` means every region in the dataset.
    pub fn from_value(value: &str) -> Self {
        if value == "all" {
            Self::All
        } else {
            Self::Region(value.to_string())
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Self::All => "all",
            Self::Region(r) => r,
        }
    }
}

impl std::str::FromStr for RegionFilter {
    type Err = SalesError;

    /// Parse user input against the fixed selector values.
    fn from_str(s: &str) -> Result<Self> {
        let value = s.trim().to_lowercase();
        match value.as_str() {
            "all" | "north" | "east" | "south" | "west" => Ok(Self::from_value(&value)),
            _ => Err(SalesError::UnknownRegion(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Options and theme
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Theme {
    pub template: &'static str,
    pub line_color: &'static str,
    pub line_width: u32,
    pub marker_size: u32,
    pub title_size: u32,
    pub title_color: &'static str,
    pub font_family: &'static str,
    pub reference_color: &'static str,
    pub reference_font_size: u32,
    /// top, left, right, bottom
    pub margin: [u32; 4],
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            template: "plotly_white",
            line_color: "#FF6600",
            line_width: 3,
            marker_size: 6,
            title_size: 24,
            title_color: "#FF6600",
            font_family: "Arial",
            reference_color: "red",
            reference_font_size: 12,
            margin: [80, 50, 50, 50],
        }
    }
}

/// A business event marked on every panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceEvent {
    pub date: NaiveDate,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub title: String,
    pub panel_height: u32,
    pub reference: Option<ReferenceEvent>,
    pub theme: Theme,
}

impl ChartOptions {
    /// Region panels with the reference-date overlay.
    pub fn enhanced(settings: &Settings) -> Self {
        Self {
            title: FIGURE_TITLE.to_string(),
            panel_height: settings.panel_height,
            reference: Some(ReferenceEvent {
                date: settings.reference_date,
                label: settings.reference_label.clone(),
            }),
            theme: Theme::default(),
        }
    }

    /// Same chart without the overlay; pair it with `RegionFilter::All`.
    pub fn minimal(settings: &Settings) -> Self {
        Self {
            reference: None,
            ..Self::enhanced(settings)
        }
    }
}

// ---------------------------------------------------------------------------
// Figure
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub date: NaiveDate,
    pub sales: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    pub name: String,
    pub mode: &'static str,
    pub points: Vec<Point>,
}

impl Trace {
    pub fn max_sales(&self) -> Option<f64> {
        self.points.iter().map(|p| p.sales).reduce(f64::max)
    }

    pub fn total_sales(&self) -> f64 {
        self.points.iter().map(|p| p.sales).sum()
    }
}

/// Vertical dashed line spanning the full height of a panel, with its label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceMarker {
    pub date: NaiveDate,
    pub label: String,
    /// Panel-relative vertical span.
    pub y0: f64,
    pub y1: f64,
    /// Label position in figure coordinates: the top of this panel.
    pub label_y: f64,
    pub dashed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    /// 1-based, top to bottom.
    pub row: usize,
    pub region: String,
    pub title: String,
    pub trace: Trace,
    pub reference: Option<ReferenceMarker>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub title: String,
    pub height: u32,
    pub shared_x: bool,
    pub show_legend: bool,
    pub theme: Theme,
    pub panels: Vec<Panel>,
}

impl Figure {
    /// Earliest and latest date across all panels and markers.
    pub fn x_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let dates = self.panels.iter().flat_map(|p| {
            p.trace
                .points
                .iter()
                .map(|pt| pt.date)
                .chain(p.reference.as_ref().map(|r| r.date))
        });
        let mut range: Option<(NaiveDate, NaiveDate)> = None;
        for d in dates {
            range = Some(match range {
                None => (d, d),
                Some((lo, hi)) => (lo.min(d), hi.max(d)),
            });
        }
        range
    }
}

pub fn build_figure(dataset: &ChartDataset, filter: &RegionFilter, options: &ChartOptions) -> Figure {
    let regions: Vec<String> = match filter {
        RegionFilter::All => dataset.regions().to_vec(),
        RegionFilter::Region(r) => vec![r.clone()],
    };
    let count = regions.len();

    let panels: Vec<Panel> = regions
        .into_iter()
        .enumerate()
        .map(|(i, region)| {
            let row = i + 1;
            let points = dataset
                .series(&region)
                .into_iter()
                .map(|(date, sales)| Point { date, sales })
                .collect();
            let reference = options.reference.as_ref().map(|ev| ReferenceMarker {
                date: ev.date,
                label: ev.label.clone(),
                y0: 0.0,
                y1: 1.0,
                label_y: 1.0 - (row - 1) as f64 / count as f64,
                dashed: true,
            });
            Panel {
                row,
                title: format!("Sales in {}", capitalize(&region)),
                trace: Trace {
                    name: capitalize(&region),
                    mode: "lines+markers",
                    points,
                },
                reference,
                region,
            }
        })
        .collect();

    tracing::debug!(filter = filter.value(), panels = panels.len(), "built figure");
    Figure {
        title: options.title.clone(),
        height: options.panel_height * count as u32,
        shared_x: true,
        show_legend: true,
        theme: options.theme.clone(),
        panels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NormalizedSalesRecord;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn rec(date: &str, region: &str, sales: f64) -> NormalizedSalesRecord {
        NormalizedSalesRecord { date: d(date), region: region.into(), sales }
    }

    fn dataset() -> ChartDataset {
        ChartDataset::from_records(vec![
            rec("2021-01-01", "north", 10.0),
            rec("2021-01-01", "south", 20.0),
            rec("2021-01-20", "north", 30.0),
            rec("2021-01-02", "east", 5.0),
            rec("2021-01-10", "north", 12.0),
            rec("2021-01-05", "west", 7.0),
        ])
    }

    fn options() -> ChartOptions {
        ChartOptions::enhanced(&Settings::default())
    }

    #[test]
    fn test_all_has_one_panel_per_region() {
        let fig = build_figure(&dataset(), &RegionFilter::All, &options());
        let regions: Vec<&str> = fig.panels.iter().map(|p| p.region.as_str()).collect();
        assert_eq!(regions, vec!["north", "south", "east", "west"]);
        assert_eq!(fig.panels[0].title, "Sales in North");
        assert_eq!(fig.panels[0].trace.name, "North");
        assert_eq!(fig.panels[3].row, 4);
        for panel in &fig.panels {
            let expected = dataset().series(&panel.region).len();
            assert_eq!(panel.trace.points.len(), expected);
        }
        assert_eq!(fig.title, FIGURE_TITLE);
        assert!(fig.shared_x);
    }

    #[test]
    fn test_single_region_scoping() {
        let fig = build_figure(&dataset(), &RegionFilter::Region("north".into()), &options());
        assert_eq!(fig.panels.len(), 1);
        assert_eq!(fig.panels[0].title, "Sales in North");
        let sales: Vec<f64> = fig.panels[0].trace.points.iter().map(|p| p.sales).collect();
        assert_eq!(sales, vec![10.0, 12.0, 30.0]);
    }

    #[test]
    fn test_points_sorted_by_date() {
        let fig = build_figure(&dataset(), &RegionFilter::All, &options());
        for panel in &fig.panels {
            let dates: Vec<NaiveDate> = panel.trace.points.iter().map(|p| p.date).collect();
            let mut sorted = dates.clone();
            sorted.sort();
            assert_eq!(dates, sorted);
        }
    }

    #[test]
    fn test_height_scales_with_panels() {
        let opts = options();
        let ds = dataset();
        for filter in ["all", "north", "east", "south", "west"] {
            let fig = build_figure(&ds, &RegionFilter::from_value(filter), &opts);
            assert_eq!(fig.height, opts.panel_height * fig.panels.len() as u32);
        }
    }

    #[test]
    fn test_reference_marker_on_every_panel() {
        let ds = dataset();
        let opts = options();
        for filter in ["all", "north", "west"] {
            let fig = build_figure(&ds, &RegionFilter::from_value(filter), &opts);
            for panel in &fig.panels {
                let marker = panel.reference.as_ref().unwrap();
                assert_eq!(marker.date, d("2021-01-15"));
                assert_eq!(marker.label, "Price Increase");
                assert_eq!((marker.y0, marker.y1), (0.0, 1.0));
                assert!(marker.dashed);
            }
        }
    }

    #[test]
    fn test_reference_label_at_top_of_each_panel() {
        let fig = build_figure(&dataset(), &RegionFilter::All, &options());
        let ys: Vec<f64> = fig
            .panels
            .iter()
            .map(|p| p.reference.as_ref().unwrap().label_y)
            .collect();
        assert_eq!(ys, vec![1.0, 0.75, 0.5, 0.25]);
    }

    #[test]
    fn test_minimal_variant_has_no_overlay() {
        let opts = ChartOptions::minimal(&Settings::default());
        let fig = build_figure(&dataset(), &RegionFilter::All, &opts);
        assert_eq!(fig.panels.len(), 4);
        assert!(fig.panels.iter().all(|p| p.reference.is_none()));
    }

    #[test]
    fn test_region_without_rows_gives_empty_panel() {
        let ds = ChartDataset::from_records(vec![rec("2021-01-01", "north", 1.0)]);
        let fig = build_figure(&ds, &RegionFilter::Region("west".into()), &options());
        assert_eq!(fig.panels.len(), 1);
        assert!(fig.panels[0].trace.points.is_empty());
        assert_eq!(fig.panels[0].trace.max_sales(), None);
    }

    #[test]
    fn test_empty_dataset_all_gives_no_panels() {
        let fig = build_figure(&ChartDataset::default(), &RegionFilter::All, &options());
        assert!(fig.panels.is_empty());
        assert_eq!(fig.height, 0);
        assert_eq!(fig.x_range(), None);
    }

    #[test]
    fn test_x_range_includes_reference_date() {
        let ds = ChartDataset::from_records(vec![rec("2021-02-01", "north", 1.0)]);
        let fig = build_figure(&ds, &RegionFilter::All, &options());
        assert_eq!(fig.x_range(), Some((d("2021-01-15"), d("2021-02-01"))));
    }

    #[test]
    fn test_parse_region_filter() {
        assert_eq!("all".parse::<RegionFilter>().unwrap(), RegionFilter::All);
        assert_eq!(
            "North".parse::<RegionFilter>().unwrap(),
            RegionFilter::Region("north".into())
        );
        assert!("central".parse::<RegionFilter>().is_err());
    }

    #[test]
    fn test_figure_serializes() {
        let fig = build_figure(&dataset(), &RegionFilter::Region("east".into()), &options());
        let json = serde_json::to_value(&fig).unwrap();
        assert_eq!(json["height"], 300);
        assert_eq!(json["panels"][0]["trace"]["points"][0]["date"], "2021-01-02");
        assert_eq!(json["panels"][0]["reference"]["date"], "2021-01-15");
    }
}
