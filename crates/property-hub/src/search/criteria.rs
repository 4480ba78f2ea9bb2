use serde::{Deserialize, Serialize};

use super::catalog::{Location, PropertyType};

/// Search constraints handed to the search handler. `None` means unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchCriteria {
    pub query: String,
    #[serde(rename = "type")]
    pub property_type: Option<PropertyType>,
    pub location: Option<Location>,
}

/// Raw criteria as they arrive from a query string or form body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default, rename = "type")]
    pub property_type: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

impl SearchCriteria {
    pub fn new(
        query: impl Into<String>,
        property_type: Option<PropertyType>,
        location: Option<Location>,
    ) -> Self {
        Self {
            query: query.into(),
            property_type,
            location,
        }
    }

    /// Build criteria from raw strings; unknown selector values count as unconstrained.
    pub fn from_params(params: &SearchParams) -> Self {
        let property_type = params
            .property_type
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .and_then(|raw| {
                let parsed = PropertyType::parse(raw);
                if parsed.is_none() {
                    tracing::debug!(value = raw, "ignoring unknown property type");
                }
                parsed
            });
        let location = params
            .location
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .and_then(|raw| {
                let parsed = Location::parse(raw);
                if parsed.is_none() {
                    tracing::debug!(value = raw, "ignoring unknown location");
                }
                parsed
            });

        Self {
            query: params.query.clone().unwrap_or_default(),
            property_type,
            location,
        }
    }

    pub fn is_unconstrained(&self) -> bool {
        self.query.trim().is_empty() && self.property_type.is_none() && self.location.is_none()
    }

    /// Encode as `query=..&type=..&location=..`, omitting empty fields.
    pub fn to_query_string(&self) -> Result<String, serde_urlencoded::ser::Error> {
        let mut pairs: Vec<(&str, &str)> = Vec::with_capacity(3);
        let query = self.query.trim();
        if !query.is_empty() {
            pairs.push(("query", query));
        }
        if let Some(kind) = self.property_type {
            pairs.push(("type", kind.value()));
        }
        if let Some(location) = self.location {
            pairs.push(("location", location.value()));
        }
        serde_urlencoded::to_string(pairs)
    }
}
