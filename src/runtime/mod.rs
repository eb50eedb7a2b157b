pub mod codegen;
pub mod error;
pub mod output;

pub use codegen::{lower, Executable};
