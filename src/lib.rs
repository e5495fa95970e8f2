pub mod mapping;
pub mod plan;
pub mod split;
pub mod writer;
