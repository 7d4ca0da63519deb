pub mod controller;
pub mod game;
pub mod health;
pub mod proctor;
pub mod sse;
pub mod validation;
