pub mod form;
pub mod types;

pub use form::{read_decimal, read_number, read_text, FormError, FormSnapshot, FormSource};
pub use types::{fields, EarningsInput, ForwardFactorInput, RedFlag};
