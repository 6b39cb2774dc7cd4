//! Search layer tests
//!
//! Queries against chunk indexes loaded back from their serialized
//! form.

mod test_queries;
