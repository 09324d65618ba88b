//! User directory seam.
//!
//! Identities, names, email addresses and group memberships live in an
//! external directory. [`StaticDirectory`] serves them from `config.toml`.

use crate::errors::Result;
use async_trait::async_trait;
use serde::Deserialize;

const fn default_true() -> bool {
    true
}

/// A person as known to the directory.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct DirectoryUser {
    /// Unique login name; also the key of the employee account
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Address notifications are sent to
    pub email: String,
    /// Inactive users cannot authenticate and are hidden from account lists
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Administrators manage deposits, products and accounts
    #[serde(default)]
    pub is_superuser: bool,
    /// Group memberships (e.g. `prof`, `wimi`, `stud`)
    #[serde(default)]
    pub groups: Vec<String>,
    /// Discord user id this person signs in with
    #[serde(default)]
    pub discord_id: Option<String>,
}

impl DirectoryUser {
    /// "First Last", used in greetings.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// "Last, First", used in lists.
    #[must_use]
    pub fn sort_name(&self) -> String {
        format!("{}, {}", self.last_name, self.first_name)
    }

    /// Whether the user belongs to at least one of `groups`.
    #[must_use]
    pub fn in_any_group(&self, groups: &[String]) -> bool {
        self.groups.iter().any(|g| groups.contains(g))
    }
}

/// Directory service.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Looks a user up by username.
    async fn find_user(&self, username: &str) -> Result<Option<DirectoryUser>>;

    /// Resolves an external identity to an active user; `None` means the
    /// visitor is not authenticated.
    async fn authenticate(&self, external_id: &str) -> Result<Option<DirectoryUser>>;

    /// Every user the directory knows.
    async fn list_users(&self) -> Result<Vec<DirectoryUser>>;
}

/// Directory backed by a fixed list of users.
#[derive(Clone, Debug, Default)]
pub struct StaticDirectory {
    users: Vec<DirectoryUser>,
}

impl StaticDirectory {
    /// Creates a directory serving `users`.
    #[must_use]
    pub const fn new(users: Vec<DirectoryUser>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl Directory for StaticDirectory {
    async fn find_user(&self, username: &str) -> Result<Option<DirectoryUser>> {
        Ok(self.users.iter().find(|u| u.username == username).cloned())
    }

    async fn authenticate(&self, external_id: &str) -> Result<Option<DirectoryUser>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.is_active && u.discord_id.as_deref() == Some(external_id))
            .cloned())
    }

    async fn list_users(&self) -> Result<Vec<DirectoryUser>> {
        Ok(self.users.clone())
    }
}
