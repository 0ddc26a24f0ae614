pub mod concept;
pub mod lab_value;
pub mod script;
pub mod stop_words;
pub mod tokens;
