//! Repository layer — entity-scoped database operations.
//!
//! Free functions over `&Connection`, one sub-module per entity. All
//! public functions are re-exported here.

mod appointment;
mod doctor;
mod inventory;
mod invoice;
mod medication;
mod patient;
mod prescription;
mod room;
mod service;
mod specialty;
mod user;

pub use appointment::*;
pub use doctor::*;
pub use inventory::*;
pub use invoice::*;
pub use medication::*;
pub use patient::*;
pub use prescription::*;
pub use room::*;
pub use service::*;
pub use specialty::*;
pub use user::*;
