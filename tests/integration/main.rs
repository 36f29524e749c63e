//! Integration tests for the harvester
//!
//! These tests use wiremock to create mock HTTP servers and drive the full
//! fetch-retry-extract cycle end-to-end.

mod harvest_tests;
mod retry_tests;
