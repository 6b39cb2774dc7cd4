//! Worker layer tests
//!
//! Requests through the coordinator and its worker threads.

mod test_coordinator;
