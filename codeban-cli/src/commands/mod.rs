pub mod context;
pub mod project;
pub mod scan;
pub mod todo;
pub mod types;
