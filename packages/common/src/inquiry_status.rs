#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status of a visitor inquiry during staff triage.
///
/// When the `sea-orm` feature is enabled, this enum can be used directly in SeaORM entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "PascalCase")]
pub enum InquiryStatus {
    /// Freshly submitted through the contact form; nobody has picked it up.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "Pending"))]
    Pending,
    /// A staff member has taken ownership and is working on it.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "InProgress"))]
    InProgress,
    /// Answered (or closed). Re-openable by an explicit staff transition.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "Resolved"))]
    Resolved,
}

impl InquiryStatus {
    /// Returns true if the inquiry has been answered or closed.
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved)
    }

    /// All possible status values.
    pub const ALL: &'static [InquiryStatus] = &[Self::Pending, Self::InProgress, Self::Resolved];

    /// Returns the string representation (PascalCase).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "InProgress",
            Self::Resolved => "Resolved",
        }
    }
}

impl fmt::Display for InquiryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for InquiryStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// Error when parsing an invalid status string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStatusError {
    invalid: String,
}

impl fmt::Display for ParseStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid status '{}'. Valid values: {}",
            self.invalid,
            InquiryStatus::ALL
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

impl std::error::Error for ParseStatusError {}

impl FromStr for InquiryStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "InProgress" => Ok(Self::InProgress),
            "Resolved" => Ok(Self::Resolved),
            _ => Err(ParseStatusError {
                invalid: s.to_string(),
            }),
        }
    }
}
