mod loader_tests;
mod sln_reader_tests;
