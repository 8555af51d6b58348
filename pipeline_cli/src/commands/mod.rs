pub mod clean;
pub mod import;
pub mod split;
pub mod validate;
