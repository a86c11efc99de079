//! Data module - CSV loading, cleaning and filtering
//!
//! ```text
//!  review CSV ──▶ loader ──▶ schema ──▶ processor/derive ──▶ CoffeeDataset (cached)
//!                                                                  │
//!                                          FilterSpec ──▶ filter ──▶ FilteredView
//! ```

mod derive;
mod filter;
mod loader;
mod model;
mod processor;
mod schema;

pub use filter::{AltitudeRange, FilterSpec, FilteredView, DOMINANT_FARM};
pub use loader::DataLoader;
pub use model::{CoffeeDataset, CoffeeRecord};
