use std::{
    borrow::{Borrow, Cow},
    fmt,
};

use serde::{Serialize, Serializer};

use crate::error::{AuthzError, AuthzResult};

pub const WILDCARD: &str = "*";

/// Opaque permission token such as `"hr.skills.view"` or `"read employees"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    /// Validate a name arriving from configuration or a session payload.
    /// The name is kept verbatim; only blank names are rejected.
    pub fn parse(name: impl AsRef<str>) -> AuthzResult<Self> {
        let name = name.as_ref();
        if name == WILDCARD {
            return Err(AuthzError::ReservedWildcard);
        }
        if name.trim().is_empty() {
            return Err(AuthzError::InvalidPermission(name.to_string()));
        }
        Ok(Self(Cow::Owned(name.to_string())))
    }

    pub(crate) const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Permission {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry of an aggregated permission set.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Grant {
    /// Every permission, including ones never enumerated anywhere.
    All,
    Named(Permission),
}

impl Grant {
    pub fn as_str(&self) -> &str {
        match self {
            Grant::All => WILDCARD,
            Grant::Named(permission) => permission.as_str(),
        }
    }

    pub fn covers(&self, permission: &str) -> bool {
        match self {
            Grant::All => true,
            Grant::Named(granted) => granted.as_str() == permission,
        }
    }
}

impl fmt::Display for Grant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Grant {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl From<Permission> for Grant {
    fn from(value: Permission) -> Self {
        Grant::Named(value)
    }
}

/// One name or a list of alternatives, as accepted by the evaluator.
pub trait AnyOf {
    fn any_of(&self, pred: impl FnMut(&str) -> bool) -> bool;

    /// True iff the list is non-empty and every entry satisfies `pred`.
    fn all_of(&self, pred: impl FnMut(&str) -> bool) -> bool;
}

impl AnyOf for str {
    fn any_of(&self, mut pred: impl FnMut(&str) -> bool) -> bool {
        pred(self)
    }

    fn all_of(&self, mut pred: impl FnMut(&str) -> bool) -> bool {
        pred(self)
    }
}

impl AnyOf for String {
    fn any_of(&self, pred: impl FnMut(&str) -> bool) -> bool {
        self.as_str().any_of(pred)
    }

    fn all_of(&self, pred: impl FnMut(&str) -> bool) -> bool {
        self.as_str().all_of(pred)
    }
}

impl<S: AsRef<str>> AnyOf for [S] {
    fn any_of(&self, mut pred: impl FnMut(&str) -> bool) -> bool {
        self.iter().any(|name| pred(name.as_ref()))
    }

    fn all_of(&self, mut pred: impl FnMut(&str) -> bool) -> bool {
        !self.is_empty() && self.iter().all(|name| pred(name.as_ref()))
    }
}

impl<S: AsRef<str>> AnyOf for Vec<S> {
    fn any_of(&self, pred: impl FnMut(&str) -> bool) -> bool {
        self.as_slice().any_of(pred)
    }

    fn all_of(&self, pred: impl FnMut(&str) -> bool) -> bool {
        self.as_slice().all_of(pred)
    }
}

impl<S: AsRef<str>, const N: usize> AnyOf for [S; N] {
    fn any_of(&self, pred: impl FnMut(&str) -> bool) -> bool {
        self.as_slice().any_of(pred)
    }

    fn all_of(&self, pred: impl FnMut(&str) -> bool) -> bool {
        self.as_slice().all_of(pred)
    }
}
