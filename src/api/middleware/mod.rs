mod auth;

pub use auth::{ADMIN_ID_HEADER, AdminIdentity, AdminToken, admin_auth};
