//! Catalog records implementing the [`Resource`](crate::framework::Resource) trait, each
//! with its static wire schema.

pub mod currency;
pub mod delivery_date;
pub mod inventory;
pub mod specification_attribute;
pub mod warehouse;

pub use currency::*;
pub use delivery_date::*;
pub use inventory::*;
pub use specification_attribute::*;
pub use warehouse::*;
