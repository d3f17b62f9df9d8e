//! Product records and the pure operations on them.
//!
//! A [`Product`] is the JSON object exactly as stored, keys in stored order.
//! Nothing about its fields is validated: `productId`, `title` and
//! `description` are read through accessors that answer `None` when the
//! value is missing or of another type, so such a record is still listed
//! and saved back untouched. It just never matches a lookup or a search.
//!
//! Bodies of create and update requests arrive as a [`ProductPatch`], which
//! can never carry a `productId` through: ids are assigned by [`next_id`] or
//! forced to the path id on update.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const ID: &str = "productId";
const TITLE: &str = "title";
const DESCRIPTION: &str = "description";

/// A stored product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Product(Map<String, Value>);

/// A create or update body. Must be a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct ProductPatch(Map<String, Value>);

impl Product {
    /// Builds a new record from a create body, `productId` first. A
    /// `productId` in the body is discarded.
    pub fn create(id: u64, patch: ProductPatch) -> Self {
        let mut fields = Map::with_capacity(patch.0.len() + 1);
        fields.insert(ID.to_owned(), Value::from(id));
        fields.extend(patch.0.into_iter().filter(|(key, _)| key != ID));
        Self(fields)
    }

    /// The stored id, if it is an unsigned integer.
    pub fn id(&self) -> Option<u64> {
        self.0.get(ID).and_then(Value::as_u64)
    }

    pub fn title(&self) -> Option<&str> {
        self.text(TITLE)
    }

    pub fn description(&self) -> Option<&str> {
        self.text(DESCRIPTION)
    }

    /// Every stored field, in stored order.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Shallow merge: every field in `patch` overwrites, `null` included;
    /// the rest stay. The id is pinned to `id` whatever the body says.
    pub fn apply(&mut self, id: u64, patch: ProductPatch) {
        for (key, value) in patch.0 {
            if key != ID {
                self.0.insert(key, value);
            }
        }
        self.0.insert(ID.to_owned(), Value::from(id));
    }

    /// Whether `title` or `description` contains `needle`, which the caller
    /// has already lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        [self.title(), self.description()]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(needle))
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
}

/// The id for the next created record: one past the largest id in use, or 1
/// when no record has a usable id. `None` once the id space is exhausted.
pub fn next_id(products: &[Product]) -> Option<u64> {
    match products.iter().filter_map(Product::id).max() {
        Some(max) => max.checked_add(1),
        None => Some(1),
    }
}

/// Parses a path id. Anything that is not an unsigned integer cannot match a
/// stored record, so it comes back as `None` rather than an error.
pub fn parse_id(raw: &str) -> Option<u64> {
    raw.parse().ok()
}
