pub mod parser;

pub use parser::extract_points;
