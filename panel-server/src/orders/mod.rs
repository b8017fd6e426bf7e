//! Order creation: number generation and aggregate assembly.

mod builder;
mod number;

pub use builder::OrderBuilder;
pub use number::OrderNumberGenerator;
