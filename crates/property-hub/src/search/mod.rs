//! Search filter form: query, property type, and location composed into criteria.

pub mod catalog;
pub mod criteria;
pub mod form;
pub mod view;

pub use catalog::{Location, PropertyType, COUNTIES, MAJOR_CITY_COUNT};
pub use criteria::{SearchCriteria, SearchParams};
pub use form::{DisplayMode, QuickSelect, SearchFilterForm, SearchHandler};
pub use view::{CurrentChip, CurrentChipKind, OptionGroup, QuickChip, SearchFormView, SelectOption};
