// handlers/public - no authentication required

pub mod auth;
pub mod root;
