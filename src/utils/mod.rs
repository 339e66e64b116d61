pub mod date_format;
pub mod decimal_format;
