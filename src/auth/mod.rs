pub mod identity;
pub mod jwt;
pub mod password;

pub use identity::{Identity, Role};
pub use jwt::{Claims, JwtError, JwtKeys};
