//! Response checking and translation of homework records into chat messages.

pub mod catalog;
pub mod translator;
pub mod validator;

pub use catalog::StatusCatalog;
pub use translator::{parse_record, translate, translate_value};
pub use validator::validate_response;
