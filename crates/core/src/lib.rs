pub mod capture;
pub mod detection;
pub mod notification;
pub mod pipeline;
pub mod recognition;
pub mod shared;

#[cfg(test)]
mod test_support;
