pub mod applications;
pub mod jobs;
pub mod pool;
