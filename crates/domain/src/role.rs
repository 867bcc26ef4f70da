use std::fmt::{Display, Formatter};
use std::str::FromStr;

use mentorhub_core::AppError;
use serde::{Deserialize, Serialize};

/// Integer privilege rank attached to a role.
///
/// Levels are compared, never added. The standard roles leave gaps between
/// levels so that new tiers can be slotted in without renumbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HierarchyLevel(u16);

impl HierarchyLevel {
    /// Level that grants nothing; used as the ceiling of roles that cannot assign roles.
    pub const NONE: Self = Self(0);

    /// Creates a level from its raw value.
    #[must_use]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// Returns the raw level value.
    #[must_use]
    pub const fn value(self) -> u16 {
        self.0
    }
}

impl Display for HierarchyLevel {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Closed set of privilege tiers a platform user can hold.
///
/// Adding a role is a code change: the registry, the storage values and the
/// hierarchy all derive from this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Unauthenticated or unresolved user. Least privilege.
    Guest,
    /// Registered student without a residency classification.
    Student,
    /// Student studying in their home country.
    DomesticStudent,
    /// Student studying abroad.
    InternationalStudent,
    /// Working professional.
    Professional,
    /// Graduate of a partner institution.
    Alumni,
    /// Approved mentor offering sessions.
    Mentor,
    /// Community moderator.
    Moderator,
    /// Platform administrator.
    Admin,
    /// Platform owner.
    SuperAdmin,
}

impl Role {
    /// Returns every role ordered by hierarchy level, lowest first.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Role] = &[
            Role::Guest,
            Role::Student,
            Role::DomesticStudent,
            Role::InternationalStudent,
            Role::Professional,
            Role::Alumni,
            Role::Mentor,
            Role::Moderator,
            Role::Admin,
            Role::SuperAdmin,
        ];

        ALL
    }

    /// Returns the hierarchy level of this role.
    #[must_use]
    pub const fn level(self) -> HierarchyLevel {
        let value = match self {
            Self::Guest => 10,
            Self::Student => 20,
            Self::DomesticStudent => 22,
            Self::InternationalStudent => 25,
            Self::Professional => 30,
            Self::Alumni => 35,
            Self::Mentor => 40,
            Self::Moderator => 60,
            Self::Admin => 80,
            Self::SuperAdmin => 100,
        };

        HierarchyLevel::new(value)
    }

    /// Returns a stable storage value for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Guest => "guest",
            Self::Student => "student",
            Self::DomesticStudent => "domestic_student",
            Self::InternationalStudent => "international_student",
            Self::Professional => "professional",
            Self::Alumni => "alumni",
            Self::Mentor => "mentor",
            Self::Moderator => "moderator",
            Self::Admin => "admin",
            Self::SuperAdmin => "super_admin",
        }
    }

    /// Returns the label shown in the admin console.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Guest => "Guest",
            Self::Student => "Student",
            Self::DomesticStudent => "Domestic Student",
            Self::InternationalStudent => "International Student",
            Self::Professional => "Professional",
            Self::Alumni => "Alumni",
            Self::Mentor => "Mentor",
            Self::Moderator => "Moderator",
            Self::Admin => "Administrator",
            Self::SuperAdmin => "Super Administrator",
        }
    }

    /// Parses a stored role value, treating absent or unknown values as [`Role::Guest`].
    ///
    /// Stored documents may carry legacy or malformed values; none of them may
    /// resolve to anything above least privilege.
    #[must_use]
    pub fn parse_or_guest(value: Option<&str>) -> Self {
        value
            .and_then(|value| Self::from_str(value).ok())
            .unwrap_or(Self::Guest)
    }
}

impl Display for Role {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "guest" => Ok(Self::Guest),
            "student" => Ok(Self::Student),
            "domestic_student" => Ok(Self::DomesticStudent),
            "international_student" => Ok(Self::InternationalStudent),
            "professional" => Ok(Self::Professional),
            "alumni" => Ok(Self::Alumni),
            "mentor" => Ok(Self::Mentor),
            "moderator" => Ok(Self::Moderator),
            "admin" => Ok(Self::Admin),
            "super_admin" => Ok(Self::SuperAdmin),
            _ => Err(AppError::Validation(format!("unknown role value '{value}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{HierarchyLevel, Role};

    #[test]
    fn role_roundtrip_storage_value() {
        for role in Role::all() {
            let restored = Role::from_str(role.as_str());
            assert_eq!(restored.ok(), Some(*role));
        }
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!(Role::from_str("owner").is_err());
        assert!(Role::from_str("Admin").is_err());
    }

    #[test]
    fn levels_match_published_hierarchy() {
        let levels: Vec<u16> = Role::all().iter().map(|role| role.level().value()).collect();
        assert_eq!(levels, vec![10, 20, 22, 25, 30, 35, 40, 60, 80, 100]);
    }

    #[test]
    fn levels_are_strictly_increasing() {
        for pair in Role::all().windows(2) {
            assert!(pair[0].level() < pair[1].level());
        }
    }

    #[test]
    fn parse_or_guest_falls_back_for_unknown_and_missing_values() {
        assert_eq!(Role::parse_or_guest(Some("not_a_real_role")), Role::Guest);
        assert_eq!(Role::parse_or_guest(Some("")), Role::Guest);
        assert_eq!(Role::parse_or_guest(None), Role::Guest);
        assert_eq!(Role::parse_or_guest(Some("mentor")), Role::Mentor);
    }

    #[test]
    fn none_level_sits_below_every_role() {
        assert!(
            Role::all()
                .iter()
                .all(|role| role.level() > HierarchyLevel::NONE)
        );
    }

    #[test]
    fn serde_uses_storage_values() {
        let encoded = serde_json::to_string(&Role::InternationalStudent).ok();
        assert_eq!(encoded.as_deref(), Some("\"international_student\""));
    }
}
