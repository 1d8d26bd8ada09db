pub mod effects;
pub mod health;
pub mod search;
