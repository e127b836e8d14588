//! # Car Model
//!
//! The persisted `Car` entity, the `CarDto` transfer record used at the
//! HTTP boundary, and the pure mapping between the two.

mod car;
mod dto;
mod mapper;

pub use car::{Car, CarId};
pub use dto::{CarDto, ValidationError};
pub use mapper::CarMapper;
