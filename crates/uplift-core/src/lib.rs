pub mod error;
pub mod frame;
pub mod types;

pub use error::*;
pub use frame::{Column, DataFrame};
pub use types::*;
