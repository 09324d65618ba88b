//! External collaborators the core talks to: the mail service, the user
//! directory, and the per-visitor session store.

/// User directory (identity, names, groups)
pub mod directory;
/// Outgoing email
pub mod mail;
/// Per-visitor shopping cart storage
pub mod session;

pub use directory::{Directory, DirectoryUser, StaticDirectory};
pub use mail::{LogMailer, Mailer, OutgoingMail};
pub use session::SessionStore;
