pub mod collector;
pub mod printer;
pub mod records;
