use crate::core::attribute_set::AttributeSet;
use crate::core::error::Result;
use crate::core::items::{Item, WeightedItemSet};
use std::io::Error;
use std::sync::Arc;

/// A restartable source of items sharing one attribute set.
pub trait ItemStream {
    fn attribute_set(&self) -> &Arc<AttributeSet>;

    fn has_more_items(&self) -> bool;

    fn next_item(&mut self) -> Option<Item>;

    fn restart(&mut self) -> std::result::Result<(), Error>;

    /// Drains the stream into a set of unit-weight items.
    fn collect_item_set(&mut self) -> Result<WeightedItemSet> {
        let mut set = WeightedItemSet::new(Arc::clone(self.attribute_set()));
        while let Some(item) = self.next_item() {
            set.add_unit(item)?;
        }
        Ok(set)
    }
}
