pub mod entity;
pub mod error;
pub mod identity;
pub mod labels;
