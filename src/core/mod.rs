pub mod attribute_set;
pub mod attribute_value;
pub mod attributes;
pub mod entropy;
pub mod error;
pub mod items;
