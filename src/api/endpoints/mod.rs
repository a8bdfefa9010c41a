pub mod health;
pub mod hospitals;
pub mod webhook;
