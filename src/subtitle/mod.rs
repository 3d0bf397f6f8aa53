pub mod srt;
