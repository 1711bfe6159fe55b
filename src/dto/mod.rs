pub mod auth;
pub mod health;
pub mod leaderboard;
pub mod scores;
pub mod sse;
pub mod validation;
