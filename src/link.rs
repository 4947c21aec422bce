pub mod mirror;
pub mod mirror_options;
pub mod resolve;
