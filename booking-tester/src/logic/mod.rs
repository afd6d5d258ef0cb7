pub mod actions;
pub mod reports;
pub mod tester;

pub use tester::*;
