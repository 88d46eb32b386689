mod common;
mod encoding_test;
mod property_test;
