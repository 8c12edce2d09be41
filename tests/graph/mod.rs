mod builder_tests;
mod filter_tests;
