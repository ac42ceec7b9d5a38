pub mod args;
pub mod date;
pub mod error;
pub mod filename;
pub mod metadata;
pub mod processor;
pub mod scan;
