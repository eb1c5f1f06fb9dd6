pub mod info;
pub mod remove;
