//! Multi-document YAML encoding of applications.
//!
//! Bulk requests carry a stream of `---`-separated documents. Decoding is lazy:
//! documents before a malformed one are yielded normally, the malformed one
//! yields an error, and nothing after it is read.

use serde::{Deserialize, Serialize};

use crate::error::{RevError, RevResult};
use crate::types::Application;

/// Lazily decodes applications from a YAML document stream.
pub struct ApplicationStream<'a> {
    documents: serde_yaml::Deserializer<'a>,
    failed: bool,
}

impl<'a> ApplicationStream<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            documents: serde_yaml::Deserializer::from_str(input),
            failed: false,
        }
    }
}

impl Iterator for ApplicationStream<'_> {
    type Item = RevResult<Application>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let document = self.documents.next()?;
        match Application::deserialize(document) {
            Ok(app) => Some(Ok(app)),
            Err(e) => {
                self.failed = true;
                Some(Err(RevError::from(e)))
            }
        }
    }
}

/// Per-record outcome of a bulk request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkReport {
    /// Titles applied successfully, in stream order.
    #[serde(default)]
    pub accepted: Vec<String>,
    /// One message per rejected or undecodable document, in stream order.
    #[serde(default)]
    pub errors: Vec<String>,
}

impl BulkReport {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Decode `input` and hand every application to `apply`.
///
/// A failure from `apply` is recorded and processing continues with the next
/// document. A decode failure is recorded and ends processing.
pub fn for_each_application<F>(input: &str, mut apply: F) -> BulkReport
where
    F: FnMut(&Application) -> RevResult<()>,
{
    let mut report = BulkReport::default();
    for decoded in ApplicationStream::new(input) {
        match decoded.and_then(|app| apply(&app).map(|_| app)) {
            Ok(app) => report.accepted.push(app.title),
            Err(e) => report.errors.push(e.to_string()),
        }
    }
    report
}

/// Encode a value as a single YAML document.
pub fn to_yaml<T: Serialize + ?Sized>(value: &T) -> RevResult<String> {
    Ok(serde_yaml::to_string(value)?)
}
