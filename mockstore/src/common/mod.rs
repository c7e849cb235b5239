//! Shared building blocks: the [Value] model, synchronization helpers,
//! constants and document utilities.

mod constants;
mod sync;
mod util;
mod value;

pub use constants::*;
pub use sync::*;
pub(crate) use util::*;
pub use value::*;
