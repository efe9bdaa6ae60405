//! Application record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A person responsible for an application.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Maintainer {
    pub name: String,
    pub email: String,
}

impl Maintainer {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// One revision of an application record.
///
/// `title` is the key. The trailing three fields are owned by the store:
/// whatever a client sends for them is overwritten on create and update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub title: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub maintainers: Vec<Maintainer>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub company: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub website: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub license: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    // store-managed metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time_stamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete_time_stamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub resource_version: String,
}

impl Application {
    /// Create an application with the two required fields.
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            version: version.into(),
            ..Default::default()
        }
    }

    pub fn with_maintainer(mut self, name: impl Into<String>, email: impl Into<String>) -> Self {
        self.maintainers.push(Maintainer::new(name, email));
        self
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = company.into();
        self
    }

    pub fn with_website(mut self, website: impl Into<String>) -> Self {
        self.website = website.into();
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_license(mut self, license: impl Into<String>) -> Self {
        self.license = license.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Whether this revision carries a deletion timestamp.
    pub fn is_deleted(&self) -> bool {
        self.delete_time_stamp.is_some()
    }

    /// Compare the client-controlled attributes of two revisions.
    ///
    /// Maintainers are compared as a multiset: order does not matter, duplicates
    /// do. Store-managed timestamps and the resource version are ignored.
    /// Neither side is mutated; sorting happens on copies.
    pub fn same_content(&self, other: &Application) -> bool {
        if self.title != other.title
            || self.version != other.version
            || self.company != other.company
            || self.website != other.website
            || self.source != other.source
            || self.license != other.license
            || self.description != other.description
        {
            return false;
        }
        if self.maintainers.len() != other.maintainers.len() {
            return false;
        }
        sorted_maintainers(&self.maintainers) == sorted_maintainers(&other.maintainers)
    }
}

// Ordered by (name, email) via the derived Ord.
fn sorted_maintainers(maintainers: &[Maintainer]) -> Vec<&Maintainer> {
    let mut sorted: Vec<&Maintainer> = maintainers.iter().collect();
    sorted.sort();
    sorted
}
