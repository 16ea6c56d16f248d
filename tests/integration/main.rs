//! Integration tests: the real HTTP client against an in-process stub API

mod api_tests;
mod stub;
