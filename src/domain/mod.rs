pub mod error;
pub mod hospital;
pub mod repository;
pub mod user;
