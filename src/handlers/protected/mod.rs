// handlers/protected - JWT authentication required
//
// Every handler here takes the caller's `Identity`, attached by
// `jwt_auth_middleware`.

pub mod auth;
pub mod labels;
pub mod task_lists;
pub mod tasks;
pub mod users;
