pub mod frequency;
pub mod note;
pub mod pulse;
