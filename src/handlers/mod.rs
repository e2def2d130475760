// handlers/mod.rs - Two-tier handler layout
//
// Public (no token) → Protected (token required via the `Principal` extractor)
pub mod public; // /api/auth/register, /api/auth/login, /health
pub mod protected; // everything else under /api/*
