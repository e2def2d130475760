// handlers/protected/mod.rs - Handlers that require an authenticated principal
//
// Every handler here takes a `Principal` as its first extractor after state,
// so a missing or invalid token is rejected with 401 before the path is
// parsed. Handlers then parse ids, check ownership, and only afterwards read
// the body.

pub mod auth;
pub mod badges;
pub mod collections;
pub mod follows;
pub mod journals;
pub mod reads;
pub mod recommendations;
pub mod user_reads;
pub mod users;
