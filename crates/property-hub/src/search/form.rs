use tracing::debug;

use super::catalog::{Location, PropertyType};
use super::criteria::SearchCriteria;
use super::view::{self, SearchFormView};

/// Receiver for composed search criteria.
pub trait SearchHandler {
    fn on_search(&mut self, criteria: SearchCriteria);
}

impl<F> SearchHandler for F
where
    F: FnMut(SearchCriteria),
{
    fn on_search(&mut self, criteria: SearchCriteria) {
        self(criteria)
    }
}

/// Layout variant; the compact bar omits quick-select chips and the current-search summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisplayMode {
    #[default]
    Full,
    Compact,
}

/// A single-field shortcut that emits criteria immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickSelect {
    Location(Location),
    PropertyType(PropertyType),
}

/// Search filter state holder: free-text query plus type and location selectors.
pub struct SearchFilterForm<H> {
    query: String,
    property_type: Option<PropertyType>,
    location: Option<Location>,
    initial: SearchCriteria,
    mode: DisplayMode,
    handler: H,
}

impl<H: SearchHandler> SearchFilterForm<H> {
    pub fn new(initial: SearchCriteria, mode: DisplayMode, handler: H) -> Self {
        Self {
            query: initial.query.clone(),
            property_type: initial.property_type,
            location: initial.location,
            initial,
            mode,
            handler,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn property_type(&self) -> Option<PropertyType> {
        self.property_type
    }

    pub fn location(&self) -> Option<Location> {
        self.location
    }

    pub fn initial(&self) -> &SearchCriteria {
        &self.initial
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn set_property_type(&mut self, property_type: Option<PropertyType>) {
        self.property_type = property_type;
    }

    pub fn set_location(&mut self, location: Option<Location>) {
        self.location = location;
    }

    /// Criteria reflecting the current field values, query trimmed.
    pub fn current(&self) -> SearchCriteria {
        SearchCriteria {
            query: self.query.trim().to_string(),
            property_type: self.property_type,
            location: self.location,
        }
    }

    pub fn submit(&mut self) {
        let criteria = self.current();
        debug!(?criteria, "search submitted");
        self.handler.on_search(criteria);
    }

    /// Apply one field and emit immediately, keeping the other two as they are.
    pub fn quick_select(&mut self, selection: QuickSelect) {
        match selection {
            QuickSelect::Location(location) => self.location = Some(location),
            QuickSelect::PropertyType(kind) => self.property_type = Some(kind),
        }
        let criteria = self.current();
        debug!(?selection, ?criteria, "quick search selected");
        self.handler.on_search(criteria);
    }

    pub fn view(&self) -> SearchFormView {
        match self.mode {
            DisplayMode::Compact => view::compact(self),
            DisplayMode::Full => view::full(self),
        }
    }

    pub fn into_handler(self) -> H {
        self.handler
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Collected(Vec<SearchCriteria>);

    impl SearchHandler for Collected {
        fn on_search(&mut self, criteria: SearchCriteria) {
            self.0.push(criteria);
        }
    }

    fn collecting_form(initial: SearchCriteria) -> SearchFilterForm<Collected> {
        SearchFilterForm::new(initial, DisplayMode::Full, Collected::default())
    }

    fn nairobi() -> Location {
        Location::parse("nairobi").expect("known county")
    }

    #[test]
    fn submit_emits_trimmed_query_once() {
        let mut form = collecting_form(SearchCriteria::default());
        form.set_query("  garden flat  ");
        form.set_property_type(Some(PropertyType::Apartment));
        form.set_location(Some(nairobi()));

        form.submit();

        let emitted = form.into_handler().0;
        assert_eq!(
            emitted,
            vec![SearchCriteria::new(
                "garden flat",
                Some(PropertyType::Apartment),
                Some(nairobi())
            )]
        );
    }

    #[test]
    fn setters_do_not_emit() {
        let mut form = collecting_form(SearchCriteria::default());
        form.set_query("x");
        form.set_location(Some(nairobi()));
        form.set_property_type(None);

        assert!(form.into_handler().0.is_empty());
    }

    #[test]
    fn quick_select_location_keeps_query_and_type() {
        let mut form = collecting_form(SearchCriteria::new(
            " villa ",
            Some(PropertyType::House),
            None,
        ));
        let mombasa = Location::parse("mombasa").expect("known county");

        form.quick_select(QuickSelect::Location(mombasa));

        assert_eq!(form.location(), Some(mombasa));
        assert_eq!(
            form.into_handler().0,
            vec![SearchCriteria::new(
                "villa",
                Some(PropertyType::House),
                Some(mombasa)
            )]
        );
    }

    #[test]
    fn quick_select_type_keeps_query_and_location() {
        let mut form = collecting_form(SearchCriteria::new("", None, Some(nairobi())));
        form.set_query("balcony");

        form.quick_select(QuickSelect::PropertyType(PropertyType::Studio));

        assert_eq!(form.property_type(), Some(PropertyType::Studio));
        assert_eq!(
            form.into_handler().0,
            vec![SearchCriteria::new(
                "balcony",
                Some(PropertyType::Studio),
                Some(nairobi())
            )]
        );
    }

    #[test]
    fn closures_act_as_handlers() {
        let mut seen = None;
        let mut form = SearchFilterForm::new(
            SearchCriteria::default(),
            DisplayMode::Compact,
            |criteria: SearchCriteria| seen = Some(criteria),
        );
        form.set_query("studio near CBD");
        form.submit();
        drop(form);

        assert_eq!(seen.map(|criteria| criteria.query), Some("studio near CBD".to_string()));
    }
}
