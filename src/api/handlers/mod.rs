pub mod favicon;
pub mod health;
pub mod metadata;
pub mod page;
