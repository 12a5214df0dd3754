pub mod error;
pub mod model;
pub mod query;
pub mod repository;
pub mod similarity;
