//! Enum types for COMPASS entities
//!
//! Every enum travels over the wire in upper snake case (`ON_LEAVE`).
//! Parsing is lenient about case and accepts `-` or spaces in place of `_`,
//! because records arrive from hand-maintained spreadsheets as often as
//! from the API.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Normalize a raw enum string to its wire form.
fn normalize_wire(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            other => other.to_ascii_uppercase(),
        })
        .collect()
}

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident / $err:ident ($label:literal) {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $wire)] $variant, )+
        }

        impl $name {
            /// All variants in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Wire representation.
            pub fn as_wire_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }

            /// Parse from wire representation (lenient about case and separators).
            pub fn from_wire_str(s: &str) -> Result<Self, $err> {
                let normalized = normalize_wire(s);
                $(
                    if normalized == $wire {
                        return Ok($name::$variant);
                    }
                )+
                Err($err(s.to_string()))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_wire_str())
            }
        }

        impl FromStr for $name {
            type Err = $err;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_wire_str(s)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                Self::from_wire_str(&raw).map_err(serde::de::Error::custom)
            }
        }

        #[doc = concat!("Error when parsing an invalid ", $label, " string.")]
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $err(pub String);

        impl fmt::Display for $err {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "Invalid {}: {}", $label, self.0)
            }
        }

        impl std::error::Error for $err {}
    };
}

wire_enum! {
    /// Employment status of an employee. Employees are never hard-deleted;
    /// leaving the company moves them to `Terminated`.
    pub enum EmploymentStatus / EmploymentStatusParseError ("employment status") {
        Active => "ACTIVE",
        Inactive => "INACTIVE",
        Terminated => "TERMINATED",
        OnLeave => "ON_LEAVE",
        Suspended => "SUSPENDED",
    }
}

impl EmploymentStatus {
    /// Still on the payroll (possibly away).
    pub fn is_employed(&self) -> bool {
        !matches!(self, EmploymentStatus::Terminated | EmploymentStatus::Inactive)
    }
}

impl Default for EmploymentStatus {
    fn default() -> Self {
        EmploymentStatus::Active
    }
}

wire_enum! {
    /// Category of a competency in the dictionary.
    pub enum CompetencyType / CompetencyTypeParseError ("competency type") {
        Technical => "TECHNICAL",
        NonTechnical => "NON_TECHNICAL",
        Behavioral => "BEHAVIORAL",
        Leadership => "LEADERSHIP",
        Functional => "FUNCTIONAL",
    }
}

wire_enum! {
    /// Proficiency level. Ordered: `Basic < Intermediate < Advanced < Mastery`.
    pub enum ProficiencyLevel / ProficiencyLevelParseError ("proficiency level") {
        Basic => "BASIC",
        Intermediate => "INTERMEDIATE",
        Advanced => "ADVANCED",
        Mastery => "MASTERY",
    }
}

impl ProficiencyLevel {
    /// 1-based rank, as printed on assessment forms.
    pub fn rank(&self) -> u8 {
        match self {
            ProficiencyLevel::Basic => 1,
            ProficiencyLevel::Intermediate => 2,
            ProficiencyLevel::Advanced => 3,
            ProficiencyLevel::Mastery => 4,
        }
    }
}

wire_enum! {
    /// Lifecycle of an individual development plan.
    pub enum IdpStatus / IdpStatusParseError ("development plan status") {
        Planned => "PLANNED",
        InProgress => "IN_PROGRESS",
        Completed => "COMPLETED",
    }
}

wire_enum! {
    /// Priority of an individual development plan.
    pub enum IdpPriority / IdpPriorityParseError ("development plan priority") {
        Low => "LOW",
        Medium => "MEDIUM",
        High => "HIGH",
        Critical => "CRITICAL",
    }
}

// =============================================================================
// TESTS
// =============================================================================
