//! # Coded Enumerations
//!
//! Every coded domain concept (business reasons, roles, metering point types,
//! ...) is a closed set of immutable instances, each carrying a `name` and the
//! short `code` used on the wire.
//!
//! The set of instances is an explicit static table generated by
//! [`coded_enumeration!`]; lookups walk that table.
//!
//! ## Invariants
//!
//! | Invariant | Enforcement |
//! |-----------|-------------|
//! | `name` unique within a type | `tests::names_and_codes_are_unique` per type |
//! | `code` unique within a type | `tests::names_and_codes_are_unique` per type |
//! | Lookup is case-insensitive | `find_by` uses `eq_ignore_ascii_case` |
//! | Equality needs same type, name and code | derived `PartialEq` on distinct types |
//!
//! ## Open sets
//!
//! Closed sets fail on an unrecognised code. Two capabilities open a set up:
//!
//! - [`WithUnknown`]: an unrecognised code becomes a sentinel flagged
//!   `is_unknown()`, with `name == code == <incoming code>`.
//! - [`WithUnused`]: the same, flagged `is_unused()`, for codes kept only for
//!   schema completeness.

use crate::errors::CodeError;

/// Marks whether an instance belongs to the closed set or is a sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CodeKind {
    /// Member of the closed set.
    #[default]
    Known,
    /// Sentinel created by [`WithUnknown::unknown`].
    Unknown,
    /// Sentinel created by [`WithUnused::unused`].
    Unused,
}

/// A closed set of named, coded instances.
pub trait CodedEnumeration: Sized + Clone + 'static {
    /// Human-readable type name used in error messages.
    const TYPE_NAME: &'static str;

    /// All members of the closed set, in declaration order.
    fn all() -> &'static [Self];

    /// The instance name.
    fn name(&self) -> &str;

    /// The wire code.
    fn code(&self) -> &str;

    /// Whether this is a member of the set or a sentinel.
    fn kind(&self) -> CodeKind;

    /// Looks up an instance by code, ignoring ASCII case.
    fn try_from_code(code: &str) -> Option<Self> {
        find_by(Self::all(), |candidate| candidate.code(), code)
    }

    /// Looks up an instance by name, ignoring ASCII case.
    fn try_from_name(name: &str) -> Option<Self> {
        find_by(Self::all(), |candidate| candidate.name(), name)
    }

    /// Looks up an instance by code.
    ///
    /// # Errors
    /// `CodeError::InvalidCode` when no member has this code.
    fn from_code(code: &str) -> Result<Self, CodeError> {
        Self::try_from_code(code).ok_or_else(|| CodeError::InvalidCode {
            type_name: Self::TYPE_NAME,
            value: code.to_string(),
        })
    }

    /// Looks up an instance by name.
    ///
    /// # Errors
    /// `CodeError::InvalidName` when no member has this name.
    fn from_name(name: &str) -> Result<Self, CodeError> {
        Self::try_from_name(name).ok_or_else(|| CodeError::InvalidName {
            type_name: Self::TYPE_NAME,
            value: name.to_string(),
        })
    }
}

/// Open set: unrecognised codes map to an "unknown" sentinel.
pub trait WithUnknown: CodedEnumeration {
    /// Builds the sentinel for `code`.
    fn unknown(code: &str) -> Self;

    /// True for sentinels built by [`WithUnknown::unknown`].
    fn is_unknown(&self) -> bool {
        self.kind() == CodeKind::Unknown
    }

    /// Never fails.
    fn from_code_or_unknown(code: &str) -> Self {
        Self::try_from_code(code).unwrap_or_else(|| Self::unknown(code))
    }
}

/// Open set: unrecognised codes map to an "unused" sentinel.
pub trait WithUnused: CodedEnumeration {
    /// Builds the sentinel for `code`.
    fn unused(code: &str) -> Self;

    /// True for sentinels built by [`WithUnused::unused`].
    fn is_unused(&self) -> bool {
        self.kind() == CodeKind::Unused
    }

    /// Never fails.
    fn from_code_or_unused(code: &str) -> Self {
        Self::try_from_code(code).unwrap_or_else(|| Self::unused(code))
    }
}

fn find_by<T: Clone>(all: &[T], key: impl Fn(&T) -> &str, wanted: &str) -> Option<T> {
    all.iter()
        .find(|candidate| key(candidate).eq_ignore_ascii_case(wanted))
        .cloned()
}

/// Declares a coded enumeration type and its static instance table.
///
/// ```rust,ignore
/// coded_enumeration! {
///     /// Purpose of a transaction.
///     pub struct BusinessReason {
///         BALANCE_FIXING = ("BalanceFixing", "D04"),
///     }
/// }
///
/// // Open set with an "unknown" sentinel:
/// coded_enumeration! {
///     pub struct Resolution: unknown {
///         HOURLY = ("Hourly", "PT1H"),
///     }
/// }
/// ```
macro_rules! coded_enumeration {
    (@decode ; $name:ident ; $code:ident) => {
        <$name as $crate::coded::CodedEnumeration>::from_code(&$code)
            .map_err(::serde::de::Error::custom)
    };
    (@decode unknown ; $name:ident ; $code:ident) => {
        Ok(<$name as $crate::coded::WithUnknown>::from_code_or_unknown(&$code))
    };
    (@decode unused ; $name:ident ; $code:ident) => {
        Ok(<$name as $crate::coded::WithUnused>::from_code_or_unused(&$code))
    };
    (@open unknown ; $name:ident) => {
        impl $crate::coded::WithUnknown for $name {
            fn unknown(code: &str) -> Self {
                Self::sentinel(code, $crate::coded::CodeKind::Unknown)
            }
        }
    };
    (@open unused ; $name:ident) => {
        impl $crate::coded::WithUnused for $name {
            fn unused(code: &str) -> Self {
                Self::sentinel(code, $crate::coded::CodeKind::Unused)
            }
        }
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident $(: $open:ident)? {
            $(
                $(#[$vmeta:meta])*
                $konst:ident = ($vname:literal, $vcode:literal)
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        $vis struct $name {
            name: ::std::borrow::Cow<'static, str>,
            code: ::std::borrow::Cow<'static, str>,
            kind: $crate::coded::CodeKind,
        }

        impl $name {
            $(
                $(#[$vmeta])*
                pub const $konst: Self = Self {
                    name: ::std::borrow::Cow::Borrowed($vname),
                    code: ::std::borrow::Cow::Borrowed($vcode),
                    kind: $crate::coded::CodeKind::Known,
                };
            )+

            const ALL: &'static [Self] = &[$(Self::$konst),+];

            #[allow(dead_code)]
            fn sentinel(code: &str, kind: $crate::coded::CodeKind) -> Self {
                Self {
                    name: ::std::borrow::Cow::Owned(code.to_string()),
                    code: ::std::borrow::Cow::Owned(code.to_string()),
                    kind,
                }
            }
        }

        impl $crate::coded::CodedEnumeration for $name {
            const TYPE_NAME: &'static str = stringify!($name);

            fn all() -> &'static [Self] {
                Self::ALL
            }

            fn name(&self) -> &str {
                &self.name
            }

            fn code(&self) -> &str {
                &self.code
            }

            fn kind(&self) -> $crate::coded::CodeKind {
                self.kind
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(&self.name)
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.code)
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let code = <String as ::serde::Deserialize>::deserialize(deserializer)?;
                coded_enumeration!(@decode $($open)? ; $name ; code)
            }
        }

        $( coded_enumeration!(@open $open ; $name); )?
    };
}
