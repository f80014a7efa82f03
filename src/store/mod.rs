//! The normalized resource store: state types and the pure reducer.

pub mod reducer;
pub mod state;

pub use reducer::reduce;
pub use state::{EntryState, ResourceId, ResourceTypeName, StoreState, TypeState};
