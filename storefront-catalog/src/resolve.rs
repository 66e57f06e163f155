//! Slug uniqueness resolution.
//!
//! The store does not enforce unique slugs, so before a slug is assigned to a
//! record it is checked against a [`SlugLookup`]. On collision a numeric
//! suffix is probed (`name-1`, `name-2`, ...) up to [`MAX_SUFFIX_ATTEMPTS`],
//! after which the first characters of the owner's id are appended instead.

use std::collections::{BTreeSet, HashMap};
use std::convert::Infallible;
use std::marker::PhantomData;

use thiserror::Error;

use crate::normalize::clean;
use crate::slug::Slug;

/// Highest numeric suffix tried before falling back to the owner id.
pub const MAX_SUFFIX_ATTEMPTS: u32 = 999;

/// Number of owner id characters used by the fallback suffix.
pub const OWNER_FRAGMENT_LEN: usize = 8;

/// Something that can say which records currently hold a slug.
pub trait SlugLookup {
    type Error: std::error::Error + 'static;

    /// Ids of every record whose slug equals `slug`. Empty if unused.
    fn owners_of(&self, slug: &str) -> Result<BTreeSet<String>, Self::Error>;
}

impl<L: SlugLookup + ?Sized> SlugLookup for &L {
    type Error = L::Error;

    fn owners_of(&self, slug: &str) -> Result<BTreeSet<String>, Self::Error> {
        (**self).owners_of(slug)
    }
}

#[derive(Debug, Error)]
pub enum ResolveError<E: std::error::Error + 'static> {
    #[error("Slug lookup failed for '{slug}': {source}")]
    Lookup { slug: String, source: E },
}

/// Return a slug based on `candidate` that no record other than `owner_id`
/// holds according to `lookup`.
///
/// The candidate is returned unchanged when it is unused or used only by
/// `owner_id`. Lookup failures are returned as [`ResolveError::Lookup`]; the
/// resolver never assumes a slug is free when it could not check.
///
/// ```
/// use storefront_catalog::{SlugIndex, ensure_unique, normalize};
///
/// let mut index = SlugIndex::new();
/// index.assign("a1", "face-wash");
/// index.assign("b2", "face-wash-1");
///
/// let slug = ensure_unique(&normalize("Face Wash"), "c3", &index).unwrap();
/// assert_eq!(slug, "face-wash-2");
/// ```
pub fn ensure_unique<L: SlugLookup + ?Sized>(
    candidate: &Slug,
    owner_id: &str,
    lookup: &L,
) -> Result<Slug, ResolveError<L::Error>> {
    if is_free(lookup, candidate.as_str(), owner_id)? {
        return Ok(candidate.clone());
    }

    for n in 1..=MAX_SUFFIX_ATTEMPTS {
        let suffixed = candidate.suffixed(n);
        if is_free(lookup, suffixed.as_str(), owner_id)? {
            return Ok(suffixed);
        }
    }

    Ok(owner_fallback(candidate, owner_id))
}

fn is_free<L: SlugLookup + ?Sized>(
    lookup: &L,
    slug: &str,
    owner_id: &str,
) -> Result<bool, ResolveError<L::Error>> {
    let owners = lookup
        .owners_of(slug)
        .map_err(|source| ResolveError::Lookup {
            slug: slug.to_string(),
            source,
        })?;
    Ok(owners.is_empty() || (owners.len() == 1 && owners.contains(owner_id)))
}

/// `candidate-<first 8 chars of owner_id>`, not checked for collisions.
///
/// Owner ids are normally lowercase UUIDs and are used as-is; anything else is
/// cleaned to slug characters. When the leading characters clean to nothing
/// the fragment is taken from the whole cleaned id, and an id with nothing
/// usable at all gets the first suffix past the probed range.
fn owner_fallback(candidate: &Slug, owner_id: &str) -> Slug {
    let head: String = owner_id.chars().take(OWNER_FRAGMENT_LEN).collect();
    let mut fragment = clean(&head.to_lowercase());
    if fragment.is_empty() {
        fragment = clean(&owner_id.to_lowercase())
            .chars()
            .take(OWNER_FRAGMENT_LEN)
            .collect::<String>()
            .trim_end_matches('-')
            .to_string();
    }
    if fragment.is_empty() {
        candidate.suffixed(MAX_SUFFIX_ATTEMPTS + 1)
    } else {
        candidate.suffixed(fragment)
    }
}

/// In-memory slug → owners index.
///
/// A batch that assigns many slugs keeps one of these as its single view of
/// which slugs are taken, updating it after every assignment so that later
/// resolutions see earlier ones.
#[derive(Debug, Clone, Default)]
pub struct SlugIndex {
    by_slug: HashMap<String, BTreeSet<String>>,
    by_owner: HashMap<String, String>,
}

impl SlugIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from `(owner_id, slug)` pairs.
    pub fn from_assignments<I, O, S>(assignments: I) -> Self
    where
        I: IntoIterator<Item = (O, S)>,
        O: AsRef<str>,
        S: AsRef<str>,
    {
        let mut index = Self::new();
        for (owner, slug) in assignments {
            index.assign(owner.as_ref(), slug.as_ref());
        }
        index
    }

    /// Record that `owner_id` now holds `slug`, releasing its previous slug.
    pub fn assign(&mut self, owner_id: &str, slug: &str) {
        if let Some(previous) = self
            .by_owner
            .insert(owner_id.to_string(), slug.to_string())
        {
            if let Some(owners) = self.by_slug.get_mut(&previous) {
                owners.remove(owner_id);
                if owners.is_empty() {
                    self.by_slug.remove(&previous);
                }
            }
        }
        self.by_slug
            .entry(slug.to_string())
            .or_default()
            .insert(owner_id.to_string());
    }

    pub fn slug_of(&self, owner_id: &str) -> Option<&str> {
        self.by_owner.get(owner_id).map(String::as_str)
    }

    /// Slugs held by more than one owner, sorted by slug.
    pub fn duplicates(&self) -> Vec<(&str, Vec<&str>)> {
        let mut dups: Vec<_> = self
            .by_slug
            .iter()
            .filter(|(_, owners)| owners.len() > 1)
            .map(|(slug, owners)| {
                (
                    slug.as_str(),
                    owners.iter().map(String::as_str).collect::<Vec<_>>(),
                )
            })
            .collect();
        dups.sort_by(|a, b| a.0.cmp(b.0));
        dups
    }

    /// Number of owners in the index.
    pub fn len(&self) -> usize {
        self.by_owner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_owner.is_empty()
    }
}

impl SlugLookup for SlugIndex {
    type Error = Infallible;

    fn owners_of(&self, slug: &str) -> Result<BTreeSet<String>, Self::Error> {
        Ok(self.by_slug.get(slug).cloned().unwrap_or_default())
    }
}

/// A [`SlugLookup`] backed by a closure.
pub struct FnLookup<F, E> {
    f: F,
    _error: PhantomData<fn() -> E>,
}

/// Wrap a closure as a [`SlugLookup`].
pub fn lookup_fn<F, E>(f: F) -> FnLookup<F, E>
where
    F: Fn(&str) -> Result<BTreeSet<String>, E>,
    E: std::error::Error + 'static,
{
    FnLookup {
        f,
        _error: PhantomData,
    }
}

impl<F, E> SlugLookup for FnLookup<F, E>
where
    F: Fn(&str) -> Result<BTreeSet<String>, E>,
    E: std::error::Error + 'static,
{
    type Error = E;

    fn owners_of(&self, slug: &str) -> Result<BTreeSet<String>, Self::Error> {
        (self.f)(slug)
    }
}
