// handlers/mod.rs - two handler tiers
//
// Public (no auth): service info, health, register, login
// Protected (JWT auth): everything under /api except register and login

pub mod protected;
pub mod public;
pub mod utils;
