//! The `Slug` newtype.
//!
//! A `Slug` is a non-empty string over `[a-z0-9-]` with no leading, trailing,
//! or consecutive hyphens. Values are only produced by the normalizer, the
//! uniqueness resolver, or [`Slug::parse`], so holding one proves the grammar.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::validate::{ViolationReport, validate};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Check `s` against the slug grammar, returning the violations on failure.
    ///
    /// ```
    /// use storefront_catalog::Slug;
    ///
    /// assert_eq!(Slug::parse("clean-slug-1").unwrap().as_str(), "clean-slug-1");
    /// assert!(Slug::parse("Bad Slug").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, ViolationReport> {
        let report = validate(s);
        if report.is_valid() {
            Ok(Self(s.to_string()))
        } else {
            Err(report)
        }
    }

    /// Wrap a string the caller has already brought into slug form.
    pub(crate) fn from_clean(s: String) -> Self {
        debug_assert!(validate(&s).is_valid(), "not a clean slug: {s:?}");
        Self(s)
    }

    /// Append `-{suffix}`. The suffix must itself be clean slug text.
    pub(crate) fn suffixed(&self, suffix: impl fmt::Display) -> Self {
        Self::from_clean(format!("{}-{}", self.0, suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Slug {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Slug {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl FromStr for Slug {
    type Err = ViolationReport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Slug {
    type Error = ViolationReport;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        let report = validate(&s);
        if report.is_valid() {
            Ok(Self(s))
        } else {
            Err(report)
        }
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}
