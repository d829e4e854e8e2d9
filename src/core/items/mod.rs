mod item;
pub(crate) mod item_collection;
mod item_set;
mod weighted_item_set;

pub use item::Item;
pub use item_collection::ItemCollection;
pub use item_set::ItemSet;
pub use weighted_item_set::WeightedItemSet;
