//! Filter types for list queries.

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use strum::{AsRefStr, Display, EnumString};

use super::Application;
use crate::error::{RevError, RevResult};

/// Application attributes a list query may filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum FilterField {
    Company,
    Source,
    License,
}

impl FilterField {
    /// Read this attribute from an application.
    pub fn value_of<'a>(&self, app: &'a Application) -> &'a str {
        match self {
            Self::Company => &app.company,
            Self::Source => &app.source,
            Self::License => &app.license,
        }
    }
}

/// Accepted values per attribute.
///
/// An application passes when, for every filtered attribute, its value is one
/// of the accepted values. Attributes without an entry impose no constraint,
/// so the empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    accepted: BTreeMap<FilterField, BTreeSet<String>>,
}

impl ListFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `value` for `field`, in addition to any value already accepted.
    pub fn with(mut self, field: FilterField, value: impl Into<String>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: FilterField, value: impl Into<String>) {
        self.accepted.entry(field).or_default().insert(value.into());
    }

    /// Build a filter from decoded query pairs. Repeated keys accumulate.
    ///
    /// Fails on the first key that is not a [`FilterField`].
    pub fn from_pairs<I, K, V>(pairs: I) -> RevResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut filter = Self::new();
        for (key, value) in pairs {
            let field = FilterField::from_str(key.as_ref())
                .map_err(|_| RevError::invalid_filter(key.as_ref()))?;
            filter.insert(field, value);
        }
        Ok(filter)
    }

    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }

    pub fn matches(&self, app: &Application) -> bool {
        self.accepted
            .iter()
            .all(|(field, values)| values.contains(field.value_of(app)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = ListFilter::new();
        assert!(filter.is_empty());
        assert!(filter.matches(&Application::new("a", "1")));
    }

    #[test]
    fn test_repeated_keys_accumulate() {
        let filter =
            ListFilter::from_pairs([("source", "acme"), ("source", "initech")]).unwrap();

        assert!(filter.matches(&Application::new("a", "1").with_source("acme")));
        assert!(filter.matches(&Application::new("b", "1").with_source("initech")));
        assert!(!filter.matches(&Application::new("c", "1").with_source("globex")));
    }

    #[test]
    fn test_all_fields_must_match() {
        let filter = ListFilter::new()
            .with(FilterField::Source, "acme")
            .with(FilterField::Company, "acme corp");

        let both = Application::new("a", "1")
            .with_source("acme")
            .with_company("acme corp");
        let one = Application::new("b", "1").with_source("acme");

        assert!(filter.matches(&both));
        assert!(!filter.matches(&one));
    }

    #[test]
    fn test_unsupported_key_rejected() {
        let err = ListFilter::from_pairs([("source", "acme"), ("owner", "bob")]).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("owner"));
    }

    #[test]
    fn test_field_names() {
        assert_eq!(FilterField::Company.to_string(), "company");
        assert_eq!(FilterField::from_str("license").unwrap(), FilterField::License);
        assert!(FilterField::from_str("Source").is_err());
    }
}
