use std::fmt;

use serde::{Serialize, Serializer};

/// Kind of property a seeker can filter by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    Apartment,
    House,
    Studio,
    Commercial,
}

impl PropertyType {
    pub const ALL: [PropertyType; 4] = [
        PropertyType::Apartment,
        PropertyType::House,
        PropertyType::Studio,
        PropertyType::Commercial,
    ];

    pub fn value(self) -> &'static str {
        match self {
            PropertyType::Apartment => "apartment",
            PropertyType::House => "house",
            PropertyType::Studio => "studio",
            PropertyType::Commercial => "commercial",
        }
    }

    /// Option label used by the selector.
    pub fn label(self) -> &'static str {
        match self {
            PropertyType::Apartment => "Apartment",
            PropertyType::House => "House",
            PropertyType::Studio => "Studio",
            PropertyType::Commercial => "Commercial",
        }
    }

    /// Longer label used by the full-size form.
    pub fn long_label(self) -> &'static str {
        match self {
            PropertyType::Commercial => "Commercial Space",
            other => other.label(),
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.value().eq_ignore_ascii_case(value.trim()))
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

#[derive(Debug, PartialEq, Eq, Hash)]
pub struct County {
    pub name: &'static str,
    pub value: &'static str,
}

/// Number of leading entries in [`COUNTIES`] presented as major cities.
pub const MAJOR_CITY_COUNT: usize = 5;

pub static COUNTIES: &[County] = &[
    County { name: "Nairobi", value: "nairobi" },
    County { name: "Mombasa", value: "mombasa" },
    County { name: "Kisumu", value: "kisumu" },
    County { name: "Nakuru", value: "nakuru" },
    County { name: "Uasin Gishu", value: "uasin gishu" },
    County { name: "Kiambu", value: "kiambu" },
    County { name: "Machakos", value: "machakos" },
    County { name: "Kajiado", value: "kajiado" },
    County { name: "Kilifi", value: "kilifi" },
    County { name: "Kwale", value: "kwale" },
    County { name: "Nyeri", value: "nyeri" },
    County { name: "Meru", value: "meru" },
    County { name: "Embu", value: "embu" },
    County { name: "Kakamega", value: "kakamega" },
    County { name: "Bungoma", value: "bungoma" },
    County { name: "Kericho", value: "kericho" },
    County { name: "Laikipia", value: "laikipia" },
    County { name: "Narok", value: "narok" },
];

/// A county from [`COUNTIES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location(&'static County);

impl Location {
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        COUNTIES
            .iter()
            .find(|county| county.value.eq_ignore_ascii_case(value))
            .map(Location)
    }

    pub fn value(self) -> &'static str {
        self.0.value
    }

    pub fn name(self) -> &'static str {
        self.0.name
    }

    pub fn all() -> impl Iterator<Item = Location> {
        COUNTIES.iter().map(Location)
    }

    pub fn major_cities() -> impl Iterator<Item = Location> {
        Self::all().take(MAJOR_CITY_COUNT)
    }

    pub fn other_counties() -> impl Iterator<Item = Location> {
        Self::all().skip(MAJOR_CITY_COUNT)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

impl Serialize for Location {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.value())
    }
}

pub const POPULAR_LOCATIONS: [&str; 4] = ["nairobi", "mombasa", "kisumu", "nakuru"];

pub const POPULAR_TYPES: [(PropertyType, &str); 3] = [
    (PropertyType::Apartment, "Apartments"),
    (PropertyType::House, "Houses"),
    (PropertyType::Studio, "Studios"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn popular_locations_are_known_counties() {
        for value in POPULAR_LOCATIONS {
            assert!(Location::parse(value).is_some(), "{value} missing");
        }
    }

    #[test]
    fn county_values_are_lowercased_names() {
        for county in COUNTIES {
            assert_eq!(county.value, county.name.to_lowercase());
        }
    }

    #[test]
    fn parse_is_case_insensitive_and_rejects_unknown() {
        assert_eq!(
            Location::parse(" Nairobi ").map(Location::value),
            Some("nairobi")
        );
        assert_eq!(PropertyType::parse("HOUSE"), Some(PropertyType::House));
        assert!(Location::parse("atlantis").is_none());
        assert!(PropertyType::parse("castle").is_none());
        assert!(PropertyType::parse("").is_none());
    }

    #[test]
    fn county_groups_split_at_major_city_count() {
        assert_eq!(Location::major_cities().count(), MAJOR_CITY_COUNT);
        assert_eq!(
            Location::other_counties().count(),
            COUNTIES.len() - MAJOR_CITY_COUNT
        );
        assert_eq!(PropertyType::Commercial.long_label(), "Commercial Space");
    }
}
