mod error;
mod interaction;
mod machine;

pub use error::*;
pub use interaction::*;
pub use machine::*;
