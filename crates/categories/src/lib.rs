pub mod budget_repository;
pub mod models;
pub mod repository;
pub mod service;
