//! Request Validation
//!
//! Field extraction and numeric coercion for loosely-typed JSON payloads.

mod error;
mod validator;

pub use error::ValidationError;
pub use validator::{coerce_f64, coerce_i64, RequestFields};
