pub mod project;

pub use project::Config;
