pub mod controller;

#[cfg(any(test, feature = "test-support"))]
pub mod fakes;
