//! Testing utilities and mock implementations.
//!
//! Mocks for the external seams of the pipeline, so the whole state machine
//! can be exercised without real infrastructure.

mod mock_object_store;

pub use mock_object_store::*;
