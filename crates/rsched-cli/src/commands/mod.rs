pub mod score;
pub mod simulate;
pub mod snapshot;
