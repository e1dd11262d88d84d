//! Integration tests

mod api_tests;
mod postgres_store;
