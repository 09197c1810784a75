//! Collation: from a parsed index to the final document.
//!
//! [`Collator`] walks the index and builds the body, [`Assembler`] puts the
//! cover, the table of contents and the body together, and
//! [`PageAccumulator`] holds pages in order while this happens.

mod accumulator;
mod assembly;
mod collator;
pub mod normalize;

pub use accumulator::PageAccumulator;
pub use assembly::{Assembler, Assembly};
pub use collator::{Collation, Collator};
