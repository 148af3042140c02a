//! Data models for SafeWatch

mod alert;
mod reading;
mod status;

pub use alert::*;
pub use reading::*;
pub use status::*;
