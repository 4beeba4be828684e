//! Access records and desired-change types
//!
//! - `Access`: the five independent booleans an actor holds on a resource
//! - `AccessMode`: tri-state for one mode of a desired change - leaving a
//!   mode unchanged is a first-class case, not an absent boolean
//! - `AccessChange`: a desired partial update across all five modes
//! - `ModeSet` / `ModeChange`: the read/append/write projection a single
//!   Policy carries; ACR-scope policies reuse the same projection with
//!   read/write standing for the control modes

use serde::{Deserialize, Serialize};

/// Explicit access granted to one actor
///
/// `control_read`/`control_write` govern who may read and write the ACR
/// itself; the other three govern the resource.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Access {
    pub read: bool,
    pub append: bool,
    pub write: bool,
    pub control_read: bool,
    pub control_write: bool,
}

impl Access {
    /// The all-false record every aggregation starts from
    pub fn none() -> Self {
        Self::default()
    }

    /// True if no mode is granted
    pub fn is_none(&self) -> bool {
        *self == Self::default()
    }
}

/// One mode of a desired change
///
/// `Unspecified` means "leave this mode as it is".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessMode {
    /// Leave the mode unchanged
    #[default]
    Unspecified,
    /// The actor must end up with the mode
    Allow,
    /// The actor must end up without the mode
    Deny,
}

impl AccessMode {
    /// True unless `Unspecified`
    pub fn is_specified(&self) -> bool {
        !matches!(self, AccessMode::Unspecified)
    }

    /// The boolean this mode resolves to, falling back when unspecified
    pub fn resolve(&self, fallback: bool) -> bool {
        match self {
            AccessMode::Unspecified => fallback,
            AccessMode::Allow => true,
            AccessMode::Deny => false,
        }
    }
}

impl From<Option<bool>> for AccessMode {
    fn from(value: Option<bool>) -> Self {
        match value {
            None => AccessMode::Unspecified,
            Some(true) => AccessMode::Allow,
            Some(false) => AccessMode::Deny,
        }
    }
}

/// A desired partial access update for one actor
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessChange {
    pub read: AccessMode,
    pub append: AccessMode,
    pub write: AccessMode,
    pub control_read: AccessMode,
    pub control_write: AccessMode,
}

impl AccessChange {
    /// A change that specifies nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the desired `read` outcome
    pub fn with_read(mut self, allowed: bool) -> Self {
        self.read = AccessMode::from(Some(allowed));
        self
    }

    /// Set the desired `append` outcome
    pub fn with_append(mut self, allowed: bool) -> Self {
        self.append = AccessMode::from(Some(allowed));
        self
    }

    /// Set the desired `write` outcome
    pub fn with_write(mut self, allowed: bool) -> Self {
        self.write = AccessMode::from(Some(allowed));
        self
    }

    /// Set the desired `control_read` outcome
    pub fn with_control_read(mut self, allowed: bool) -> Self {
        self.control_read = AccessMode::from(Some(allowed));
        self
    }

    /// Set the desired `control_write` outcome
    pub fn with_control_write(mut self, allowed: bool) -> Self {
        self.control_write = AccessMode::from(Some(allowed));
        self
    }

    /// True if no mode is specified
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Projection onto resource-scope modes (read/append/write)
    pub fn resource_modes(&self) -> ModeChange {
        ModeChange {
            read: self.read,
            append: self.append,
            write: self.write,
        }
    }

    /// Projection onto ACR-scope modes
    ///
    /// ACR policies carry read/write modes standing for `control_read`/
    /// `control_write`; append does not exist at this scope.
    pub fn acr_modes(&self) -> ModeChange {
        ModeChange {
            read: self.control_read,
            append: AccessMode::Unspecified,
            write: self.control_write,
        }
    }

    /// The access this change resolves to over a fallback record
    pub fn resolve_over(&self, fallback: &Access) -> Access {
        Access {
            read: self.read.resolve(fallback.read),
            append: self.append.resolve(fallback.append),
            write: self.write.resolve(fallback.write),
            control_read: self.control_read.resolve(fallback.control_read),
            control_write: self.control_write.resolve(fallback.control_write),
        }
    }
}

/// The read/append/write modes a single Policy allows or denies
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeSet {
    pub read: bool,
    pub append: bool,
    pub write: bool,
}

impl ModeSet {
    /// The empty mode set
    pub fn none() -> Self {
        Self::default()
    }

    /// True if no mode is present
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A desired change projected into a single policy's mode space
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ModeChange {
    pub read: AccessMode,
    pub append: AccessMode,
    pub write: AccessMode,
}

impl ModeChange {
    /// True if no mode is specified
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Iterate (desired, allowed, denied) per mode against a policy's sets
    pub fn against<'a>(
        &'a self,
        allow: &'a ModeSet,
        deny: &'a ModeSet,
    ) -> impl Iterator<Item = (AccessMode, bool, bool)> + 'a {
        [
            (self.read, allow.read, deny.read),
            (self.append, allow.append, deny.append),
            (self.write, allow.write, deny.write),
        ]
        .into_iter()
    }
}
