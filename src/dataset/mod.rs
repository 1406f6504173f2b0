pub mod loader;
pub mod model;
pub mod temporal;

pub use loader::load_dataset;
pub use model::{CustomerId, Dataset, Transaction};
