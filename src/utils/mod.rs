pub mod paths;
pub mod text_input;
