//! sea-orm entities for the account service.

pub mod access_tokens;
pub mod organizations;
pub mod outbox_events;
pub mod refresh_tokens;
pub mod user_auths;
pub mod users;
pub mod verification_codes;
