pub mod applications;
pub mod jobs;
pub mod pool;
pub mod probes;
