//! Domain models for the care-flow system.

mod clinical;
mod department;
mod inventory;
mod invoice;
mod patient;
mod service;

pub use clinical::*;
pub use department::*;
pub use inventory::*;
pub use invoice::*;
pub use patient::*;
pub use service::*;
