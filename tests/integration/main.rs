//! Integration tests for Crawly
//!
//! These tests run the HTTP fetch layer and whole crawls against wiremock
//! servers.

mod crawl_tests;
mod fetcher_tests;
