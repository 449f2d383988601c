pub mod add_sub;

pub use add_sub::*;
