pub mod contents;
pub mod matching;
pub mod structure;

pub use contents::validate_value_contents;
pub use matching::validate_matching_items;
pub use structure::validate_structure;
