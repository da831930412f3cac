//! Shared value types used across the resource endpoints.
//!
//! This is the small vocabulary of the service: the system-assigned
//! [`Urn`] identifier, the [`ViewType`] response-shaping mode, the
//! [`EntityReferenceType`] naming what kind of entity a file hangs off,
//! and the [`RoleType`] carried by user records.

use heapless::String;
use serde::{Deserialize, Serialize};

/// Maximum length of a URN identifier.
pub const MAX_URN_LEN: usize = 128;

/// Maximum length of the `message` field carried by service responses.
pub const MAX_MESSAGE_LEN: usize = 256;

/// Prefix every well-formed URN starts with.
const URN_PREFIX: &str = "urn:";

/// An opaque, system-assigned string identifier for a resource instance.
///
/// The service mints URNs such as `urn:uuid:5a0b8c9d-…` when a resource is
/// created and expects them verbatim in later path segments. The SDK never
/// interprets the content beyond the [`is_valid`](Urn::is_valid) format
/// predicate; every identifier-taking operation checks it up front and
/// fails without touching the network when it does not hold.
///
/// # Examples
///
/// ```rust
/// use smartcosmos::types::Urn;
///
/// let urn = Urn::new("urn:uuid:0a9ff8b6-2943-4d08-bd33-92ab45a9d269");
/// assert!(urn.is_valid());
///
/// let bogus = Urn::new("not-a-urn");
/// assert!(!bogus.is_valid());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Urn {
    value: String<MAX_URN_LEN>,
}

impl Urn {
    /// Wrap a raw identifier without validating it.
    ///
    /// Values longer than [`MAX_URN_LEN`] are stored as empty and are
    /// therefore never valid.
    pub fn new(value: &str) -> Self {
        Self {
            value: String::try_from(value).unwrap_or_default(),
        }
    }

    /// The raw identifier.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Whether the identifier looks like something the service could have
    /// issued: a `urn:` prefix, a non-empty remainder and visible ASCII
    /// throughout.
    pub fn is_valid(&self) -> bool {
        self.value.len() > URN_PREFIX.len()
            && self.value.starts_with(URN_PREFIX)
            && self.value.bytes().all(|b| (0x21..=0x7e).contains(&b))
    }
}

impl core::fmt::Display for Urn {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.value)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Urn {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=str}", self.as_str())
    }
}

/// A named server-side response-shaping mode, selected with the `view`
/// query parameter on read operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewType {
    /// The default field selection.
    #[default]
    Standard,
    /// Every field the server knows about.
    Full,
    /// The minimal field selection.
    Minimum,
}

impl ViewType {
    /// The case-sensitive name the server expects in the query string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewType::Standard => "Standard",
            ViewType::Full => "Full",
            ViewType::Minimum => "Minimum",
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ViewType {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=str}", self.as_str())
    }
}

/// The kind of entity a file definition is attached to.
///
/// Appears as a path segment when listing the files related to an entity
/// and as the `entityReferenceType` field of a file definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EntityReferenceType {
    /// The account itself.
    Account,
    /// A registered device.
    Device,
    /// Another file.
    File,
    /// An object record.
    #[default]
    Object,
    /// An address attached to an object.
    ObjectAddress,
    /// A user of the account.
    User,
}

impl EntityReferenceType {
    /// The case-sensitive name used in paths and payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityReferenceType::Account => "Account",
            EntityReferenceType::Device => "Device",
            EntityReferenceType::File => "File",
            EntityReferenceType::Object => "Object",
            EntityReferenceType::ObjectAddress => "ObjectAddress",
            EntityReferenceType::User => "User",
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for EntityReferenceType {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=str}", self.as_str())
    }
}

/// The role a user holds within an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoleType {
    /// Full administrative access.
    Administrator,
    /// Regular interactive user.
    User,
    /// Read-mostly guest access.
    #[default]
    Guest,
}

impl RoleType {
    /// The case-sensitive name used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleType::Administrator => "Administrator",
            RoleType::User => "User",
            RoleType::Guest => "Guest",
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for RoleType {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=str}", self.as_str())
    }
}
