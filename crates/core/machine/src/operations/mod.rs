//! Column groups shared between chips.

mod add;
mod global_accumulation;
mod global_interaction;

pub use add::*;
pub use global_accumulation::*;
pub use global_interaction::*;
