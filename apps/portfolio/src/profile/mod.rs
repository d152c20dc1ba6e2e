// Portfolio document: data model, repository over the store, JSON API handlers.

pub mod handlers;
pub mod models;
pub mod repository;
