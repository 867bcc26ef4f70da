use mentorhub_domain::{PermissionResolver, Role, SessionRole};

/// Handle for one in-flight role fetch.
///
/// Only the ticket issued by the latest [`SessionRoleTracker::begin`] call
/// may settle the tracker.
#[derive(Debug, PartialEq, Eq)]
pub struct RoleFetchTicket {
    generation: u64,
    subject: String,
}

impl RoleFetchTicket {
    /// Returns the subject this fetch is for.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }
}

/// Per-consumer role state that restarts whenever the subject changes.
///
/// With no subject the tracker settles on guest without fetching. Consumers
/// that run fetches concurrently call `begin` and `complete` directly; only
/// then can a late fetch be superseded.
#[derive(Debug, Clone)]
pub struct SessionRoleTracker {
    resolver: PermissionResolver,
    subject: Option<String>,
    generation: u64,
    snapshot: SessionRole,
}

impl SessionRoleTracker {
    /// Creates a tracker with no subject.
    #[must_use]
    pub fn new(resolver: PermissionResolver) -> Self {
        let snapshot = SessionRole::ready(Role::Guest, &resolver);
        Self {
            resolver,
            subject: None,
            generation: 0,
            snapshot,
        }
    }

    /// Returns the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> SessionRole {
        self.snapshot
    }

    /// Returns the subject the tracker currently follows.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// Returns whether `subject` differs from the followed subject.
    #[must_use]
    pub fn needs_fetch(&self, subject: Option<&str>) -> bool {
        self.subject.as_deref() != subject
    }

    /// Switches to `subject` and invalidates any pending fetch.
    ///
    /// Returns a ticket when a fetch is needed, `None` when the subject was
    /// cleared.
    pub fn begin(&mut self, subject: Option<&str>) -> Option<RoleFetchTicket> {
        self.generation += 1;
        self.subject = subject.map(ToOwned::to_owned);

        match subject {
            Some(subject) => {
                self.snapshot = SessionRole::loading(&self.resolver);
                Some(RoleFetchTicket {
                    generation: self.generation,
                    subject: subject.to_owned(),
                })
            }
            None => {
                self.snapshot = SessionRole::ready(Role::Guest, &self.resolver);
                None
            }
        }
    }

    /// Applies a fetched snapshot if `ticket` is still current.
    ///
    /// Returns `false` and leaves the state untouched for superseded tickets.
    pub fn complete(&mut self, ticket: RoleFetchTicket, snapshot: SessionRole) -> bool {
        if ticket.generation != self.generation {
            return false;
        }

        self.snapshot = snapshot;
        true
    }
}
