//! Items

use rusty_money::{Money, iso::Currency};

use crate::ids::ItemId;

/// A single priced item that the buyer wants covered.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestedItem<'a> {
    id: ItemId,
    name: String,
    price: Money<'a, Currency>,
}

impl<'a> RequestedItem<'a> {
    /// Creates a new item named after its identifier.
    pub fn new(id: impl Into<ItemId>, price: Money<'a, Currency>) -> Self {
        let id = id.into();
        let name = id.to_string();

        Self { id, name, price }
    }

    /// Creates a new item with a display name.
    pub fn with_name(
        id: impl Into<ItemId>,
        name: impl Into<String>,
        price: Money<'a, Currency>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
        }
    }

    /// Returns the identifier of the item
    pub fn id(&self) -> &ItemId {
        &self.id
    }

    /// Returns the display name of the item
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the price of the item
    pub fn price(&self) -> &Money<'a, Currency> {
        &self.price
    }
}
