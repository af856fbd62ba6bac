//! The dashboard's single input control.
//!
//! A `RegionSelector` owns the handler registered against it. Every change of
//! selection calls the handler once, synchronously, and hands back the new
//! figure. Nothing else can trigger a redraw.

use crate::error::{Result, SalesError};
use crate::figure::{Figure, RegionFilter};

pub const SELECTOR_ID: &str = "region-selector";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorOption {
    pub label: &'static str,
    pub value: &'static str,
}

pub const REGION_OPTIONS: &[SelectorOption] = &[
    SelectorOption { label: "North", value: "north" },
    SelectorOption { label: "East", value: "east" },
    SelectorOption { label: "South", value: "south" },
    SelectorOption { label: "West", value: "west" },
    SelectorOption { label: "All", value: "all" },
];

pub type Handler<'a> = Box<dyn Fn(&RegionFilter) -> Figure + 'a>;

pub struct RegionSelector<'a> {
    id: &'static str,
    options: &'static [SelectorOption],
    selected: usize,
    handler: Handler<'a>,
}

impl<'a> RegionSelector<'a> {
    /// Register `handler` against the control `id`, starting at `default`.
    pub fn register(
        id: &'static str,
        options: &'static [SelectorOption],
        default: &str,
        handler: impl Fn(&RegionFilter) -> Figure + 'a,
    ) -> Result<Self> {
        let selected = options
            .iter()
            .position(|o| o.value == default)
            .ok_or_else(|| SalesError::UnknownRegion(default.to_string()))?;
        Ok(Self {
            id,
            options,
            selected,
            handler: Box::new(handler),
        })
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    pub fn options(&self) -> &'static [SelectorOption] {
        self.options
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn value(&self) -> &'static str {
        self.options[self.selected].value
    }

    pub fn filter(&self) -> RegionFilter {
        RegionFilter::from_value(self.value())
    }

    /// Figure for the current selection.
    pub fn render(&self) -> Figure {
        (self.handler)(&self.filter())
    }

    /// Change event. Returns `None` for an index outside the option list.
    pub fn select(&mut self, index: usize) -> Option<Figure> {
        if index >= self.options.len() {
            return None;
        }
        self.selected = index;
        tracing::debug!(control = self.id, value = self.value(), "selection changed");
        Some(self.render())
    }

    pub fn select_value(&mut self, value: &str) -> Option<Figure> {
        let index = self.options.iter().position(|o| o.value == value)?;
        self.select(index)
    }

    pub fn select_next(&mut self) -> Figure {
        let next = (self.selected + 1) % self.options.len();
        self.select(next).unwrap_or_else(|| self.render())
    }

    pub fn select_prev(&mut self) -> Figure {
        let prev = (self.selected + self.options.len() - 1) % self.options.len();
        self.select(prev).unwrap_or_else(|| self.render())
    }
}
