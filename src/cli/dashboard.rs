use std::io::IsTerminal;

use chrono::{Datelike, NaiveDate};
use comfy_table::Table;
use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::control::{RegionSelector, REGION_OPTIONS, SELECTOR_ID};
use crate::dataset::ChartDataset;
use crate::error::Result;
use crate::figure::{build_figure, ChartOptions, Figure, Panel, RegionFilter};
use crate::fmt::{decimal, money};
use crate::settings::load_settings;
use crate::tui::{
    run_view, theme_color, View, ViewAction, FOOTER_STYLE, HEADER_STYLE, SELECTED_STYLE,
};

pub const PAGE_TITLE: &str = "Pink Morsel Sales Dashboard";

/// Dashes drawn per reference line.
const REFERENCE_DASHES: usize = 12;

pub fn run(region: &str, minimal: bool) -> Result<()> {
    let settings = load_settings();
    let filter = if minimal {
        RegionFilter::All
    } else {
        region.parse::<RegionFilter>()?
    };
    let dataset = ChartDataset::load(&settings.output_path())?;
    tracing::info!(rows = dataset.len(), regions = dataset.regions().len(), "dashboard dataset loaded");

    let options = if minimal {
        ChartOptions::minimal(&settings)
    } else {
        ChartOptions::enhanced(&settings)
    };

    if !std::io::stdout().is_terminal() {
        let figure = build_figure(&dataset, &filter, &options);
        println!("{}", figure_text(&figure));
        return Ok(());
    }

    let mut dashboard = Dashboard::new(&dataset, options, filter.value(), minimal)?;
    run_view(&mut dashboard)
}

// ---------------------------------------------------------------------------
// Dashboard view
// ---------------------------------------------------------------------------

pub struct Dashboard<'a> {
    selector: RegionSelector<'a>,
    figure: Figure,
    /// Minimal variant: all regions, selector disabled.
    locked: bool,
}

impl<'a> Dashboard<'a> {
    pub fn new(
        dataset: &'a ChartDataset,
        options: ChartOptions,
        initial: &str,
        locked: bool,
    ) -> Result<Self> {
        let selector = RegionSelector::register(SELECTOR_ID, REGION_OPTIONS, initial, move |filter| {
            build_figure(dataset, filter, &options)
        })?;
        tracing::debug!(control = selector.id(), value = selector.value(), locked, "dashboard ready");
        let figure = selector.render();
        Ok(Self {
            selector,
            figure,
            locked,
        })
    }

    fn apply(&mut self, figure: Option<Figure>) {
        if let Some(figure) = figure {
            self.figure = figure;
        }
    }

    fn draw_selector(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::styled(
            "Select Region: ",
            Style::default().add_modifier(Modifier::BOLD),
        )];
        for (i, option) in self.selector.options().iter().enumerate() {
            let selected = i == self.selector.selected_index();
            let mark = if selected { "(\u{2022})" } else { "( )" };
            let style = if self.locked {
                FOOTER_STYLE
            } else if selected {
                SELECTED_STYLE
            } else {
                Style::default()
            };
            spans.push(Span::raw("  "));
            spans.push(Span::styled(format!("{mark} {}", option.label), style));
        }
        frame.render_widget(
            Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
            area,
        );
    }

    fn draw_figure(&self, frame: &mut Frame, area: Rect) {
        let fig = &self.figure;
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme_color(fig.theme.line_color)))
            .title(Span::styled(
                format!(" {} ", fig.title),
                Style::default()
                    .fg(theme_color(fig.theme.title_color))
                    .add_modifier(Modifier::BOLD),
            ));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if fig.panels.is_empty() {
            frame.render_widget(
                Paragraph::new("No sales to show.")
                    .style(FOOTER_STYLE)
                    .alignment(Alignment::Center),
                inner,
            );
            return;
        }

        let Some((lo, hi)) = fig.x_range() else {
            return;
        };
        let x = x_bounds(lo, hi);
        let n = fig.panels.len() as u32;
        let rows = Layout::vertical(fig.panels.iter().map(|_| Constraint::Ratio(1, n))).split(inner);

        for (panel, row) in fig.panels.iter().zip(rows.iter()) {
            let last = panel.row == fig.panels.len();
            draw_panel(frame, *row, fig, panel, x, last, (lo, hi));
        }
    }
}

impl View for Dashboard<'_> {
    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let [header_area, sep1, selector_area, sep2, chart_area, hints_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);

        frame.render_widget(
            Paragraph::new(PAGE_TITLE)
                .style(HEADER_STYLE)
                .alignment(Alignment::Center),
            header_area,
        );

        let sep_line = "\u{2501}".repeat(area.width as usize);
        let sep_widget = Paragraph::new(sep_line.as_str()).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(sep_widget.clone(), sep1);
        frame.render_widget(sep_widget, sep2);

        self.draw_selector(frame, selector_area);
        self.draw_figure(frame, chart_area);

        let hints = if self.locked {
            " q=quit"
        } else {
            " Left/Right=change region  1-5 or n/e/s/w/a=select  q=quit"
        };
        frame.render_widget(Paragraph::new(hints).style(FOOTER_STYLE), hints_area);
    }

    fn handle_key(&mut self, code: KeyCode) -> ViewAction {
        if matches!(code, KeyCode::Char('q') | KeyCode::Esc) {
            return ViewAction::Close;
        }
        if self.locked {
            return ViewAction::Continue;
        }
        let figure = match code {
            KeyCode::Right | KeyCode::Tab | KeyCode::Char('l') => Some(self.selector.select_next()),
            KeyCode::Left | KeyCode::BackTab | KeyCode::Char('h') => Some(self.selector.select_prev()),
            KeyCode::Char(c @ '1'..='5') => self.selector.select(c as usize - '1' as usize),
            KeyCode::Char('n') => self.selector.select_value("north"),
            KeyCode::Char('e') => self.selector.select_value("east"),
            KeyCode::Char('s') => self.selector.select_value("south"),
            KeyCode::Char('w') => self.selector.select_value("west"),
            KeyCode::Char('a') => self.selector.select_value("all"),
            _ => None,
        };
        self.apply(figure);
        ViewAction::Continue
    }
}

// ---------------------------------------------------------------------------
// Panel drawing
// ---------------------------------------------------------------------------

fn day_number(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

fn x_bounds(lo: NaiveDate, hi: NaiveDate) -> [f64; 2] {
    let (a, b) = (day_number(lo), day_number(hi));
    if a == b {
        [a - 1.0, b + 1.0]
    } else {
        [a, b]
    }
}

fn y_bounds(panel: &Panel) -> [f64; 2] {
    match panel.trace.max_sales() {
        Some(max) if max > 0.0 => [0.0, max * 1.1],
        _ => [0.0, 1.0],
    }
}

fn short_amount(val: f64) -> String {
    if val >= 1000.0 {
        format!("{:.1}k", val / 1000.0)
    } else {
        format!("{val:.0}")
    }
}

fn draw_panel(
    frame: &mut Frame,
    area: Rect,
    fig: &Figure,
    panel: &Panel,
    x_bounds: [f64; 2],
    show_x_labels: bool,
    (lo, hi): (NaiveDate, NaiveDate),
) {
    let line_style = Style::default().fg(theme_color(fig.theme.line_color));
    let reference_style = Style::default().fg(theme_color(fig.theme.reference_color));
    let y = y_bounds(panel);

    let points: Vec<(f64, f64)> = panel
        .trace
        .points
        .iter()
        .map(|p| (day_number(p.date), p.sales))
        .collect();

    let reference_points: Vec<(f64, f64)> = match &panel.reference {
        Some(marker) => {
            let x = day_number(marker.date);
            let span = (y[1] - y[0]) * (marker.y1 - marker.y0);
            let bottom = y[0] + (y[1] - y[0]) * marker.y0;
            let steps = if marker.dashed { REFERENCE_DASHES } else { REFERENCE_DASHES * 4 };
            (0..=steps)
                .map(|i| (x, bottom + span * i as f64 / steps as f64))
                .collect()
        }
        None => Vec::new(),
    };

    let mut datasets = vec![
        Dataset::default()
            .name(panel.trace.name.clone())
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(line_style)
            .data(&points),
        Dataset::default()
            .marker(Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(line_style)
            .data(&points),
    ];
    if !reference_points.is_empty() {
        datasets.push(
            Dataset::default()
                .marker(Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(reference_style)
                .data(&reference_points),
        );
    }

    let mut block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(Color::DarkGray))
        .title_top(Line::from(Span::styled(
            format!(" {} ", panel.title),
            Style::default().add_modifier(Modifier::BOLD),
        )));
    if let Some(marker) = &panel.reference {
        block = block.title_top(
            Line::from(Span::styled(
                format!(" \u{2506} {} ({}) ", marker.label, marker.date.format("%b %d, %Y")),
                reference_style,
            ))
            .right_aligned(),
        );
    }

    let x_labels: Vec<String> = if show_x_labels {
        let mid = lo + (hi - lo) / 2;
        vec![
            lo.format("%b %d, %Y").to_string(),
            mid.format("%b %d, %Y").to_string(),
            hi.format("%b %d, %Y").to_string(),
        ]
    } else {
        Vec::new()
    };

    let mut chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .bounds(x_bounds)
                .labels(x_labels)
                .style(FOOTER_STYLE),
        )
        .y_axis(
            Axis::default()
                .bounds(y)
                .labels(vec!["0".to_string(), short_amount(y[1] / 2.0), short_amount(y[1])])
                .style(FOOTER_STYLE),
        );
    if !fig.show_legend {
        chart = chart.legend_position(None);
    }
    frame.render_widget(chart, area);
}

// ---------------------------------------------------------------------------
// Plain-text rendering (non-TTY)
// ---------------------------------------------------------------------------

pub fn figure_text(fig: &Figure) -> String {
    let mut out = format!("{} (height {})\n", fig.title, fig.height);
    if fig.panels.is_empty() {
        out.push_str("No sales to show.\n");
        return out;
    }

    let mut table = Table::new();
    table.set_header(vec!["Panel", "Points", "First", "Last", "Peak", "Total"]);
    for panel in &fig.panels {
        let pts = &panel.trace.points;
        let first = pts.first().map(|p| p.date.to_string()).unwrap_or_default();
        let last = pts.last().map(|p| p.date.to_string()).unwrap_or_default();
        let peak = panel.trace.max_sales().map(decimal).unwrap_or_default();
        table.add_row(vec![
            panel.title.clone(),
            pts.len().to_string(),
            first,
            last,
            peak,
            money(panel.trace.total_sales()),
        ]);
    }
    out.push_str(&table.to_string());
    out.push('\n');

    if let Some(marker) = fig.panels.first().and_then(|p| p.reference.as_ref()) {
        out.push_str(&format!("{} marked on every panel at {}\n", marker.label, marker.date));
    }
    out
}
