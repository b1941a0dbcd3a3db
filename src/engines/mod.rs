pub mod generation;
pub mod profiling;
pub mod sampling;
