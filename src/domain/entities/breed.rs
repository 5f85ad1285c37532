//! Breed entity and identity.

/// Unique identifier of a cat breed as assigned by the upstream catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BreedId(pub String);

impl BreedId {
    /// Creates a new `BreedId` from any string-like input.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the inner string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BreedId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for BreedId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for BreedId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Descriptive information about a breed.
///
/// Two versions of the same breed may circulate: the sparse one embedded in
/// list-search results and the fuller one returned by a single-photo fetch.
/// [`Breed::merged_with`] combines them, keeping the most complete value for
/// each field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breed {
    /// Catalog identifier, stable across fetches.
    pub id: BreedId,
    /// Display name.
    pub name: String,
    /// Country of origin, when known.
    pub origin: Option<String>,
    /// Comma-separated temperament traits, when known.
    pub temperament: Option<String>,
    /// Long-form description, when known.
    pub description: Option<String>,
}

impl Breed {
    /// Creates a breed with only an id and name; descriptive fields empty.
    #[must_use]
    pub fn new(id: impl Into<BreedId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            origin: None,
            temperament: None,
            description: None,
        }
    }

    /// Sets the origin.
    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Sets the temperament.
    #[must_use]
    pub fn with_temperament(mut self, temperament: impl Into<String>) -> Self {
        self.temperament = Some(temperament.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns true when every descriptive field is present and non-empty.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty()
            && is_filled(self.origin.as_deref())
            && is_filled(self.temperament.as_deref())
            && is_filled(self.description.as_deref())
    }

    /// Merges two versions of the same breed, field by field, preferring
    /// whichever side actually carries a value. `other` wins ties, so an
    /// enrichment fetch can upgrade a sparse list-search record without a
    /// half-empty response erasing fields already known.
    #[must_use]
    pub fn merged_with(&self, other: &Breed) -> Breed {
        Breed {
            id: self.id.clone(),
            name: if other.name.is_empty() {
                self.name.clone()
            } else {
                other.name.clone()
            },
            origin: pick(other.origin.as_deref(), self.origin.as_deref()),
            temperament: pick(other.temperament.as_deref(), self.temperament.as_deref()),
            description: pick(other.description.as_deref(), self.description.as_deref()),
        }
    }
}

fn is_filled(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}

fn pick(preferred: Option<&str>, fallback: Option<&str>) -> Option<String> {
    if is_filled(preferred) {
        preferred.map(String::from)
    } else {
        fallback.filter(|v| !v.is_empty()).map(String::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completeness() {
        let sparse = Breed::new("abys", "Abyssinian");
        assert!(!sparse.is_complete());

        let full = Breed::new("abys", "Abyssinian")
            .with_origin("Egypt")
            .with_temperament("Active, Energetic")
            .with_description("A lively breed.");
        assert!(full.is_complete());
    }

    #[test]
    fn test_empty_name_is_incomplete() {
        let breed = Breed::new("abys", "")
            .with_origin("Egypt")
            .with_temperament("Active")
            .with_description("Text");
        assert!(!breed.is_complete());
    }

    #[test]
    fn test_merge_prefers_filled_fields() {
        let sparse = Breed::new("abys", "Abyssinian").with_origin("Egypt");
        let enriched = Breed::new("abys", "Abyssinian")
            .with_temperament("Active")
            .with_description("A lively breed.");

        let merged = sparse.merged_with(&enriched);
        assert_eq!(merged.origin.as_deref(), Some("Egypt"));
        assert_eq!(merged.temperament.as_deref(), Some("Active"));
        assert_eq!(merged.description.as_deref(), Some("A lively breed."));
    }

    #[test]
    fn test_merge_ignores_empty_strings() {
        let known = Breed::new("abys", "Abyssinian").with_origin("Egypt");
        let blank = Breed::new("abys", "Abyssinian").with_origin("");

        let merged = known.merged_with(&blank);
        assert_eq!(merged.origin.as_deref(), Some("Egypt"));
    }
}
