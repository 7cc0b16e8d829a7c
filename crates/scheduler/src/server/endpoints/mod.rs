pub mod generate;
pub mod status;
