pub mod gif_parser;
pub mod source;
