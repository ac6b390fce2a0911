//! Integration tests exercising the full service stack end to end.

mod helpers;

mod file_test;
mod janitor_test;
mod tree_test;
