//! Raw bindings. Nothing outside this crate sees these types.

pub mod libvisual;
pub mod projectm;
