use serde::Serialize;

use super::catalog::{Location, PropertyType, POPULAR_LOCATIONS, POPULAR_TYPES};
use super::form::{SearchFilterForm, SearchHandler};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Group of location options; an empty label renders the options ungrouped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionGroup {
    pub label: &'static str,
    pub options: Vec<SelectOption>,
}

/// Quick-select button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuickChip {
    pub value: &'static str,
    pub label: String,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CurrentChipKind {
    Query,
    PropertyType,
    Location,
}

impl CurrentChipKind {
    pub fn css_class(self) -> &'static str {
        match self {
            CurrentChipKind::Query => "chip-query",
            CurrentChipKind::PropertyType => "chip-type",
            CurrentChipKind::Location => "chip-location",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentChip {
    pub kind: CurrentChipKind,
    pub text: String,
}

/// Everything a renderer needs to draw the search form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchFormView {
    pub compact: bool,
    pub query: String,
    pub query_label: &'static str,
    pub query_placeholder: &'static str,
    pub type_label: &'static str,
    pub type_options: Vec<SelectOption>,
    pub location_label: &'static str,
    pub all_locations_selected: bool,
    pub location_groups: Vec<OptionGroup>,
    pub popular_locations: Vec<QuickChip>,
    pub popular_types: Vec<QuickChip>,
    pub current_search: Vec<CurrentChip>,
    pub submit_label: &'static str,
}

impl SearchFormView {
    pub fn has_current_search(&self) -> bool {
        !self.current_search.is_empty()
    }
}

pub(super) fn compact<H: SearchHandler>(form: &SearchFilterForm<H>) -> SearchFormView {
    SearchFormView {
        compact: true,
        query: form.query().to_string(),
        query_label: "",
        query_placeholder: "Search properties, locations...",
        type_label: "",
        type_options: type_options(form.property_type(), "All Types", PropertyType::label),
        location_label: "",
        all_locations_selected: form.location().is_none(),
        location_groups: vec![OptionGroup {
            label: "",
            options: location_options(Location::all(), form.location()),
        }],
        popular_locations: Vec::new(),
        popular_types: Vec::new(),
        current_search: Vec::new(),
        submit_label: "Search",
    }
}

pub(super) fn full<H: SearchHandler>(form: &SearchFilterForm<H>) -> SearchFormView {
    SearchFormView {
        compact: false,
        query: form.query().to_string(),
        query_label: "What are you looking for?",
        query_placeholder: "Search by property name, location, or features...",
        type_label: "Property Type",
        type_options: type_options(
            form.property_type(),
            "All Property Types",
            PropertyType::long_label,
        ),
        location_label: "Location",
        all_locations_selected: form.location().is_none(),
        location_groups: vec![
            OptionGroup {
                label: "Major Cities",
                options: location_options(Location::major_cities(), form.location()),
            },
            OptionGroup {
                label: "Other Counties",
                options: location_options(Location::other_counties(), form.location()),
            },
        ],
        popular_locations: popular_locations(form.location()),
        popular_types: popular_types(form.property_type()),
        current_search: current_search(form),
        submit_label: "Search Properties",
    }
}

fn type_options(
    selected: Option<PropertyType>,
    all_label: &'static str,
    label: fn(PropertyType) -> &'static str,
) -> Vec<SelectOption> {
    let mut options = Vec::with_capacity(PropertyType::ALL.len() + 1);
    options.push(SelectOption {
        value: "",
        label: all_label,
        selected: selected.is_none(),
    });
    options.extend(PropertyType::ALL.into_iter().map(|kind| SelectOption {
        value: kind.value(),
        label: label(kind),
        selected: selected == Some(kind),
    }));
    options
}

fn location_options(
    locations: impl Iterator<Item = Location>,
    selected: Option<Location>,
) -> Vec<SelectOption> {
    locations
        .map(|location| SelectOption {
            value: location.value(),
            label: location.name(),
            selected: selected == Some(location),
        })
        .collect()
}

fn popular_locations(selected: Option<Location>) -> Vec<QuickChip> {
    POPULAR_LOCATIONS
        .into_iter()
        .map(|value| QuickChip {
            value,
            label: capitalize(value),
            active: selected.map(Location::value) == Some(value),
        })
        .collect()
}

fn popular_types(selected: Option<PropertyType>) -> Vec<QuickChip> {
    POPULAR_TYPES
        .into_iter()
        .map(|(kind, label)| QuickChip {
            value: kind.value(),
            label: label.to_string(),
            active: selected == Some(kind),
        })
        .collect()
}

fn current_search<H: SearchHandler>(form: &SearchFilterForm<H>) -> Vec<CurrentChip> {
    let initial = form.initial();
    let mut chips = Vec::new();
    if !initial.query.is_empty() {
        chips.push(CurrentChip {
            kind: CurrentChipKind::Query,
            text: format!("\"{}\"", initial.query),
        });
    }
    if let Some(kind) = initial.property_type {
        chips.push(CurrentChip {
            kind: CurrentChipKind::PropertyType,
            text: kind.value().to_string(),
        });
    }
    if let Some(location) = initial.location {
        chips.push(CurrentChip {
            kind: CurrentChipKind::Location,
            text: location.value().to_string(),
        });
    }
    chips
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
