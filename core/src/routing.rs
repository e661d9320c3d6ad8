//! Id routing: pick the identifier used in a request path.
//!
//! Anything that can report an internal id and/or an external id is
//! `Routable`. The service accepts either in the path, so routing only
//! decides which one to use and guards against ids that would produce a
//! malformed URL.

use crate::error::ValidationError;

/// An object that can identify a remote entity.
pub trait Routable {
    /// Internal id assigned by the service.
    fn id(&self) -> Option<&str>;

    /// Caller-assigned external id.
    fn external_id(&self) -> Option<&str>;
}

/// A bare id string is routed as-is; the service resolves either kind.
impl Routable for str {
    fn id(&self) -> Option<&str> {
        Some(self)
    }

    fn external_id(&self) -> Option<&str> {
        None
    }
}

impl Routable for String {
    fn id(&self) -> Option<&str> {
        Some(self)
    }

    fn external_id(&self) -> Option<&str> {
        None
    }
}

/// Minimal routable reference for callers without a full entity at hand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdRef {
    pub id: Option<String>,
    pub external_id: Option<String>,
}

impl IdRef {
    pub fn internal(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            external_id: None,
        }
    }

    pub fn external(external_id: impl Into<String>) -> Self {
        Self {
            id: None,
            external_id: Some(external_id.into()),
        }
    }
}

impl Routable for IdRef {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn external_id(&self) -> Option<&str> {
        self.external_id.as_deref()
    }
}

/// Which identifier wins when both are present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdPreference {
    #[default]
    Internal,
    External,
}

/// Resolve the path id of `target`, preferring the internal id.
pub fn resolve_id<R: Routable + ?Sized>(target: &R) -> Result<&str, ValidationError> {
    resolve_id_with(target, IdPreference::Internal)
}

/// Resolve the path id of `target`.
///
/// The preferred id is used when present and well formed, otherwise the
/// other one. Fails with `MalformedId` when ids exist but none is usable and
/// with `NoIdAvailable` when neither is set.
pub fn resolve_id_with<R: Routable + ?Sized>(
    target: &R,
    preference: IdPreference,
) -> Result<&str, ValidationError> {
    let (first, second) = match preference {
        IdPreference::Internal => (target.id(), target.external_id()),
        IdPreference::External => (target.external_id(), target.id()),
    };

    let mut first_error = None;
    for candidate in [first, second].into_iter().flatten() {
        match assert_correct_id(candidate) {
            Ok(()) => return Ok(candidate),
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }
    Err(first_error.unwrap_or(ValidationError::NoIdAvailable))
}

/// Check that `id` can be used as a single URL path segment.
pub fn assert_correct_id(id: &str) -> Result<(), ValidationError> {
    let unsafe_char = |c: char| {
        c.is_whitespace() || c.is_control() || matches!(c, '/' | '\\' | '?' | '#' | '%')
    };
    if id.is_empty() || id == "." || id == ".." || id.chars().any(unsafe_char) {
        return Err(ValidationError::MalformedId(id.to_string()));
    }
    Ok(())
}
