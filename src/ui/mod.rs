pub mod label;
pub mod legend;
