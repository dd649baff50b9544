//! Core business logic module
//!
//! This module contains the registration engine components:
//! - `traits` - Store abstraction for interchangeable persistence
//! - `repository` - Indexed in-memory views over the collections
//! - `admission` - CONFIRMED / WAITLIST decisions
//! - `check_in` - Check-in state machine
//! - `report` - Attendance aggregation
//! - `codes` - Confirmation code and PIN generation
//! - `registry` - Operation orchestration and the transaction boundary
//! - `async` - Concurrent wrapper and batch admission

pub mod admission;
pub mod r#async;
pub mod check_in;
pub mod codes;
pub mod registry;
pub mod report;
pub mod repository;
pub mod traits;

pub use admission::AdmissionTicket;
pub use r#async::{BatchProcessor, SharedRegistry};
pub use registry::EventRegistry;
pub use repository::Repository;
pub use traits::RecordStore;
