//! Backend trait and launch types for reduction execution

mod traits;
mod types;

pub use traits::Backend;
pub use types::{BlockDim, GridDim, GroupContext, LaunchConfig};
