pub use crate::errors::AppError;

pub type Result<T> = core::result::Result<T, AppError>;
