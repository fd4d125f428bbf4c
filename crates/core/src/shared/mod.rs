pub mod cancellation;
pub mod constants;
pub mod frame;
pub mod region;
pub mod settings;
