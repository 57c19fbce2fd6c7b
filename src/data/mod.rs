pub mod builder;
pub mod comparison;
pub mod histogram;
pub mod loader;
pub mod query;
pub mod stats;

#[cfg(test)]
mod tests;

pub use builder::build_dataset;
pub use loader::load_dataset_async;
pub use stats::derive_stats;
