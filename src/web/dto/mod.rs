pub mod auth;
pub mod chat;
pub mod health;
pub mod modules;
pub mod progress;
pub mod quiz;
pub mod recommendations;
