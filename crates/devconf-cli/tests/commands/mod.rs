//! Command-specific test modules.

mod edit_test;
mod gateway_test;
mod list_test;
mod show_test;
