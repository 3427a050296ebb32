pub mod cards;
pub mod escape;
pub mod forms;
pub mod json;
pub mod layout;
pub mod profile;
pub mod tree;
