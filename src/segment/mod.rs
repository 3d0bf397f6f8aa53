pub mod generate;
pub mod segmenter;
pub mod strategy;
