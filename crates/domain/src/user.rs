//! User directory records as read from the external profile store.

use mentorhub_core::{AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::Role;

/// One user profile as stored, with the role field left unparsed.
///
/// The store holds the role as a free-form string. It is kept verbatim here
/// so that legacy values survive a read; callers resolve it through
/// [`DirectoryUser::role`], which degrades unknown values to guest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryUser {
    subject: NonEmptyString,
    display_name: String,
    email: Option<String>,
    role_value: Option<String>,
    suspended: bool,
}

impl DirectoryUser {
    /// Creates a directory record.
    pub fn new(
        subject: impl Into<String>,
        display_name: impl Into<String>,
        email: Option<String>,
        role_value: Option<String>,
        suspended: bool,
    ) -> AppResult<Self> {
        Ok(Self {
            subject: NonEmptyString::new(subject)?,
            display_name: display_name.into(),
            email,
            role_value,
            suspended,
        })
    }

    /// Returns the stable subject identifier.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }

    /// Returns the display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the email, if stored.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns the raw stored role value.
    #[must_use]
    pub fn role_value(&self) -> Option<&str> {
        self.role_value.as_deref()
    }

    /// Returns the parsed role, guest for absent or unknown values.
    #[must_use]
    pub fn role(&self) -> Role {
        Role::parse_or_guest(self.role_value())
    }

    /// Returns whether the account is suspended.
    #[must_use]
    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Returns a copy carrying a new role.
    #[must_use]
    pub fn with_role(mut self, role: Role) -> Self {
        self.role_value = Some(role.as_str().to_owned());
        self
    }

    /// Returns a copy with the suspension flag set.
    #[must_use]
    pub fn with_suspended(mut self, suspended: bool) -> Self {
        self.suspended = suspended;
        self
    }
}
