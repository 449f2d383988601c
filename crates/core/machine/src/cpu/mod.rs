pub mod columns;

pub use columns::*;
