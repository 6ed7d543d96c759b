pub mod todo;

pub use todo::validate_title;
