pub mod callback;
pub mod validate;
