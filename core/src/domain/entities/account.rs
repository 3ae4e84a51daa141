//! Account entity representing a registered user of the platform.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::phone::CanonicalPhone;

/// Role attached to an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    /// Standard marketplace user
    Regular,
    /// Elevated user with moderation capabilities
    Privileged,
    /// Storefront owner
    Merchant,
}

impl AccountRole {
    /// Stable string form, matching the serialized representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Privileged => "privileged",
            Self::Merchant => "merchant",
        }
    }
}

impl std::str::FromStr for AccountRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "regular" => Ok(Self::Regular),
            "privileged" => Ok(Self::Privileged),
            "merchant" => Ok(Self::Merchant),
            other => Err(format!("unknown account role: {}", other)),
        }
    }
}

/// Account entity
///
/// Accounts are created exclusively by first-login provisioning after a
/// successful phone verification; the phone number is unique per account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier for the account
    pub id: Uuid,

    /// Canonical phone number (unique)
    pub phone: CanonicalPhone,

    /// Optional display name, absent until the profile is filled in
    pub display_name: Option<String>,

    /// Role attached to the account
    pub role: AccountRole,

    /// Whether the account may be issued session tokens
    pub is_active: bool,

    /// Whether the profile has been completed after first login
    pub profile_completed: bool,

    /// Timestamp when the account was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the account was last updated
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Creates a minimal account for a newly verified phone number
    pub fn new(phone: CanonicalPhone) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            phone,
            display_name: None,
            role: AccountRole::Regular,
            is_active: true,
            profile_completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the display name
    pub fn set_display_name(&mut self, name: impl Into<String>) {
        self.display_name = Some(name.into());
        self.updated_at = Utc::now();
    }

    /// Marks the profile as completed
    pub fn complete_profile(&mut self) {
        self.profile_completed = true;
        self.updated_at = Utc::now();
    }

    /// Deactivates the account, blocking token issuance
    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.updated_at = Utc::now();
    }

    /// Reactivates a previously deactivated account
    pub fn reactivate(&mut self) {
        self.is_active = true;
        self.updated_at = Utc::now();
    }
}
