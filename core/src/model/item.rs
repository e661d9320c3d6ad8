use serde::{Deserialize, Serialize};

use super::{Entity, Model};
use crate::error::ValidationError;
use crate::schema::{self, FieldKey, FieldMap, FieldSpec, ValueKind};

/// Fields of a debt line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ItemField {
    Name,
    Description,
    Quantity,
    Vat,
    Price,
}

impl FieldKey for ItemField {
    const ENTITY: &'static str = "Item";
    const ALL: &'static [Self] = &[
        ItemField::Name,
        ItemField::Description,
        ItemField::Quantity,
        ItemField::Vat,
        ItemField::Price,
    ];

    fn spec(self) -> FieldSpec {
        match self {
            ItemField::Name => FieldSpec::mandatory("name", ValueKind::NonEmptyString),
            ItemField::Description => FieldSpec::optional("description", ValueKind::String),
            ItemField::Quantity => FieldSpec::optional("quantity", ValueKind::NonNegativeNumber),
            ItemField::Vat => FieldSpec::optional("vat", ValueKind::NonNegativeNumber),
            ItemField::Price => FieldSpec::optional("price", ValueKind::NonNegativeNumber),
        }
    }
}

impl ItemField {
    pub fn assert_correctly_initialized(fields: &FieldMap<Self>) -> Result<(), ValidationError> {
        schema::assert_correctly_initialized(fields)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Item {
    model: Model<ItemField>,
}

impl Item {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> Option<&str> {
        self.model.get_str(ItemField::Name)
    }

    pub fn description(&self) -> Option<&str> {
        self.model.get_str(ItemField::Description)
    }

    pub fn quantity(&self) -> Option<f64> {
        self.model.get_f64(ItemField::Quantity)
    }

    pub fn vat(&self) -> Option<f64> {
        self.model.get_f64(ItemField::Vat)
    }

    pub fn price(&self) -> Option<f64> {
        self.model.get_f64(ItemField::Price)
    }

    pub fn set_name(&mut self, name: Option<&str>) {
        self.model.set(ItemField::Name, name);
    }

    pub fn set_description(&mut self, description: Option<&str>) {
        self.model.set(ItemField::Description, description);
    }

    pub fn set_quantity(&mut self, quantity: Option<f64>) {
        self.model.set(ItemField::Quantity, quantity);
    }

    pub fn set_vat(&mut self, vat: Option<f64>) {
        self.model.set(ItemField::Vat, vat);
    }

    pub fn set_price(&mut self, price: Option<f64>) {
        self.model.set(ItemField::Price, price);
    }

    pub fn to_field_map(&self) -> FieldMap<ItemField> {
        self.model.to_field_map()
    }

    pub fn model(&self) -> &Model<ItemField> {
        &self.model
    }
}

impl Entity for Item {
    type Key = ItemField;

    fn from_model(model: Model<ItemField>) -> Self {
        Self { model }
    }
}

impl From<Model<ItemField>> for Item {
    fn from(model: Model<ItemField>) -> Self {
        Self::from_model(model)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn accessors_follow_setters() {
        let mut item = Item::new();
        item.set_name(Some("Consulting"));
        item.set_price(Some(120.0));
        item.set_quantity(Some(3.0));
        assert_eq!(item.name(), Some("Consulting"));
        assert_eq!(item.price(), Some(120.0));
        assert_eq!(item.vat(), None);
    }

    #[test]
    fn negative_price_fails_validation() {
        let fields = FieldMap::from([(ItemField::Name, json!("Fee")), (ItemField::Price, json!(-1))]);
        assert!(matches!(
            ItemField::assert_correctly_initialized(&fields),
            Err(ValidationError::BadValueType { key: "price", .. })
        ));
    }

    #[test]
    fn object_derived_map_holds_only_set_fields() {
        let mut item = Item::new();
        item.set_name(Some("Fee"));
        item.set_vat(Some(23.0));
        let fields = item.to_field_map();
        assert_eq!(
            fields,
            FieldMap::from([(ItemField::Name, json!("Fee")), (ItemField::Vat, json!(23.0))])
        );
        assert_eq!(ItemField::assert_correctly_initialized(&fields), Ok(()));
    }
}
