pub mod builder;
pub mod controller;
pub mod graphml;
pub mod search;
pub mod summary;
pub mod theme;
