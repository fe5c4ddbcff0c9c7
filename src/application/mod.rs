pub mod auth_service;
pub mod bootstrap;
pub mod doctor_service;
pub mod news_service;
