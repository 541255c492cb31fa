pub mod pipeline;
pub mod spec;
pub mod validate;
