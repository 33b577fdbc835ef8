pub mod clock;
pub mod controller;
pub mod gains;
pub mod model;
pub mod repository;
pub mod service;
pub mod tax;
pub mod withdrawal;

#[cfg(test)]
pub(crate) mod test_support;
