//! Response shapes assembled by the service layer.

pub mod categories;
pub mod views;
