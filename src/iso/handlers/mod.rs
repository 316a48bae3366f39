pub mod binary;
pub mod create;
pub mod data;
pub mod lifecycle;
pub mod record;
pub mod select;
