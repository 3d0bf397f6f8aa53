pub mod burn;
pub mod position;
