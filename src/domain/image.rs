//! Image reference parsing

use std::fmt;

use crate::domain::DomainError;

/// Tag used when a reference names neither a tag nor a digest.
pub const DEFAULT_TAG: &str = "latest";

/// A parsed `[registry[:port]/]repository[:tag][@digest]` reference.
///
/// The engine pulls every tag of a repository when the tag is left empty,
/// so parsing always settles on exactly one tag or digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    /// Repository including any registry prefix, e.g. `localhost:5000/app`
    pub repository: String,
    /// Tag, or the digest (`sha256:...`) when the reference is pinned
    pub tag: String,
    raw: String,
}

impl ImageReference {
    pub fn parse(reference: &str) -> Result<Self, DomainError> {
        let raw = reference.trim();
        let invalid = |reason: &str| DomainError::InvalidImageReference {
            reference: reference.to_string(),
            reason: reason.to_string(),
        };

        if raw.is_empty() {
            return Err(invalid("empty reference"));
        }
        if raw.chars().any(char::is_whitespace) {
            return Err(invalid("contains whitespace"));
        }

        if let Some((repository, digest)) = raw.split_once('@') {
            if repository.is_empty() || digest.is_empty() {
                return Err(invalid("incomplete digest reference"));
            }
            // a tag before the digest is ignored by the engine
            let repository = strip_tag(repository).0;
            return Ok(Self {
                repository: repository.to_string(),
                tag: digest.to_string(),
                raw: raw.to_string(),
            });
        }

        let (repository, tag) = strip_tag(raw);
        if repository.is_empty() {
            return Err(invalid("missing repository"));
        }
        let tag = match tag {
            Some("") => return Err(invalid("empty tag")),
            Some(tag) => tag,
            None => DEFAULT_TAG,
        };

        Ok(Self {
            repository: repository.to_string(),
            tag: tag.to_string(),
            raw: raw.to_string(),
        })
    }

    /// The reference as the user typed it (trimmed).
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Split `repo:tag`, only looking for `:` after the last `/` so registry ports survive.
fn strip_tag(reference: &str) -> (&str, Option<&str>) {
    let name_start = reference.rfind('/').map_or(0, |i| i + 1);
    match reference[name_start..].rfind(':') {
        Some(i) => {
            let split = name_start + i;
            (&reference[..split], Some(&reference[split + 1..]))
        }
        None => (reference, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("alpine", "alpine", "latest")]
    #[case("alpine:3.19", "alpine", "3.19")]
    #[case("library/ubuntu:22.04", "library/ubuntu", "22.04")]
    #[case("localhost:5000/app", "localhost:5000/app", "latest")]
    #[case("localhost:5000/app:v2", "localhost:5000/app", "v2")]
    #[case("ghcr.io/org/tool@sha256:abc123", "ghcr.io/org/tool", "sha256:abc123")]
    #[case("alpine:3.19@sha256:abc123", "alpine", "sha256:abc123")]
    fn test_parse_valid(#[case] input: &str, #[case] repository: &str, #[case] tag: &str) {
        let parsed = ImageReference::parse(input).unwrap();
        assert_eq!(parsed.repository, repository);
        assert_eq!(parsed.tag, tag);
        assert_eq!(parsed.as_str(), input);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("alpine:")]
    #[case(":3.19")]
    #[case("alpine@")]
    #[case("my image")]
    fn test_parse_invalid(#[case] input: &str) {
        let err = ImageReference::parse(input).unwrap_err();
        assert!(matches!(err, DomainError::InvalidImageReference { .. }));
    }
}
