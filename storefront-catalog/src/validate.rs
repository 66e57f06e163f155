//! Validation of stored slugs.

use std::collections::BTreeSet;
use std::fmt;

/// One rule a slug breaks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlugIssue {
    Empty,
    ForwardSlash,
    Backslash,
    Spaces,
    Uppercase,
    /// Distinct characters outside `[a-z0-9-]`, sorted.
    InvalidChars(Vec<char>),
    ConsecutiveHyphens,
    LeadingHyphen,
    TrailingHyphen,
}

impl fmt::Display for SlugIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Empty slug"),
            Self::ForwardSlash => write!(f, "Contains forward slash (/)"),
            Self::Backslash => write!(f, "Contains backslash (\\)"),
            Self::Spaces => write!(f, "Contains spaces"),
            Self::Uppercase => write!(f, "Contains uppercase letters"),
            Self::InvalidChars(chars) => {
                write!(f, "Contains invalid chars: ")?;
                for (i, c) in chars.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{c}")?;
                }
                Ok(())
            }
            Self::ConsecutiveHyphens => write!(f, "Contains consecutive hyphens (--)"),
            Self::LeadingHyphen => write!(f, "Starts with hyphen"),
            Self::TrailingHyphen => write!(f, "Ends with hyphen"),
        }
    }
}

/// The rules a slug breaks, in check order. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViolationReport {
    issues: Vec<SlugIssue>,
}

impl ViolationReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issues(&self) -> &[SlugIssue] {
        &self.issues
    }

    pub fn into_issues(self) -> Vec<SlugIssue> {
        self.issues
    }

    /// Issue messages as display strings.
    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }

    pub fn has(&self, issue: &SlugIssue) -> bool {
        self.issues.contains(issue)
    }
}

impl fmt::Display for ViolationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.issues.is_empty() {
            return write!(f, "valid slug");
        }
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ViolationReport {}

/// Check `slug` against every slug rule.
///
/// An empty slug reports only [`SlugIssue::Empty`]. Otherwise every rule is
/// checked and all violations are reported.
///
/// ```
/// use storefront_catalog::validate;
///
/// let report = validate("yc-milk-f/wash-100ml");
/// assert!(!report.is_valid());
/// assert!(report.messages().contains(&"Contains forward slash (/)".to_string()));
///
/// assert!(validate("clean-slug-1").is_valid());
/// ```
pub fn validate(slug: &str) -> ViolationReport {
    let mut issues = Vec::new();

    if slug.is_empty() {
        issues.push(SlugIssue::Empty);
        return ViolationReport { issues };
    }

    if slug.contains('/') {
        issues.push(SlugIssue::ForwardSlash);
    }
    if slug.contains('\\') {
        issues.push(SlugIssue::Backslash);
    }
    if slug.contains(' ') {
        issues.push(SlugIssue::Spaces);
    }
    if slug != slug.to_lowercase() {
        issues.push(SlugIssue::Uppercase);
    }

    let invalid: BTreeSet<char> = slug
        .chars()
        .filter(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
        .collect();
    if !invalid.is_empty() {
        issues.push(SlugIssue::InvalidChars(invalid.into_iter().collect()));
    }

    if slug.contains("--") {
        issues.push(SlugIssue::ConsecutiveHyphens);
    }
    if slug.starts_with('-') {
        issues.push(SlugIssue::LeadingHyphen);
    }
    if slug.ends_with('-') {
        issues.push(SlugIssue::TrailingHyphen);
    }

    ViolationReport { issues }
}
