use serde::{Deserialize, Serialize};

use super::{Entity, Model};
use crate::error::ValidationError;
use crate::routing::Routable;
use crate::schema::{self, FieldKey, FieldMap, FieldSpec, ValueKind};

/// Fields of a customer (debtor) record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CustomerField {
    Name,
    ExternalId,
    VatNumber,
    Address,
    ZipCode,
    City,
    Country,
    Email,
    Phone,
    Gid,
}

impl FieldKey for CustomerField {
    const ENTITY: &'static str = "Customer";
    const ALL: &'static [Self] = &[
        CustomerField::Name,
        CustomerField::ExternalId,
        CustomerField::VatNumber,
        CustomerField::Address,
        CustomerField::ZipCode,
        CustomerField::City,
        CustomerField::Country,
        CustomerField::Email,
        CustomerField::Phone,
        CustomerField::Gid,
    ];

    fn spec(self) -> FieldSpec {
        match self {
            CustomerField::Name => FieldSpec::mandatory("name", ValueKind::NonEmptyString),
            CustomerField::ExternalId => FieldSpec::optional("externalId", ValueKind::String),
            CustomerField::VatNumber => FieldSpec::optional("vatNumber", ValueKind::String),
            CustomerField::Address => FieldSpec::optional("address", ValueKind::String),
            CustomerField::ZipCode => FieldSpec::optional("zipCode", ValueKind::String),
            CustomerField::City => FieldSpec::optional("city", ValueKind::String),
            CustomerField::Country => FieldSpec::optional("country", ValueKind::String),
            CustomerField::Email => FieldSpec::optional("email", ValueKind::String),
            CustomerField::Phone => FieldSpec::optional("phone", ValueKind::String),
            CustomerField::Gid => FieldSpec::read_only("gid", ValueKind::String),
        }
    }

    /// The service identifies a new customer by its externalId or vatNumber.
    fn check_entity_rules(fields: &FieldMap<Self>) -> Result<(), ValidationError> {
        schema::require_one_of(fields, &[CustomerField::ExternalId, CustomerField::VatNumber])
    }
}

impl CustomerField {
    pub fn assert_correctly_initialized(fields: &FieldMap<Self>) -> Result<(), ValidationError> {
        schema::assert_correctly_initialized(fields)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Customer {
    model: Model<CustomerField>,
}

impl Customer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> Option<&str> {
        self.model.get_str(CustomerField::Name)
    }

    pub fn external_id(&self) -> Option<&str> {
        self.model.get_str(CustomerField::ExternalId)
    }

    pub fn vat_number(&self) -> Option<&str> {
        self.model.get_str(CustomerField::VatNumber)
    }

    pub fn address(&self) -> Option<&str> {
        self.model.get_str(CustomerField::Address)
    }

    pub fn zip_code(&self) -> Option<&str> {
        self.model.get_str(CustomerField::ZipCode)
    }

    pub fn city(&self) -> Option<&str> {
        self.model.get_str(CustomerField::City)
    }

    pub fn country(&self) -> Option<&str> {
        self.model.get_str(CustomerField::Country)
    }

    pub fn email(&self) -> Option<&str> {
        self.model.get_str(CustomerField::Email)
    }

    pub fn phone(&self) -> Option<&str> {
        self.model.get_str(CustomerField::Phone)
    }

    /// Internal id assigned by the service.
    pub fn gid(&self) -> Option<&str> {
        self.model.get_str(CustomerField::Gid)
    }

    pub fn set_name(&mut self, name: Option<&str>) {
        self.model.set(CustomerField::Name, name);
    }

    pub fn set_external_id(&mut self, external_id: Option<&str>) {
        self.model.set(CustomerField::ExternalId, external_id);
    }

    pub fn set_vat_number(&mut self, vat_number: Option<&str>) {
        self.model.set(CustomerField::VatNumber, vat_number);
    }

    pub fn set_address(&mut self, address: Option<&str>) {
        self.model.set(CustomerField::Address, address);
    }

    pub fn set_zip_code(&mut self, zip_code: Option<&str>) {
        self.model.set(CustomerField::ZipCode, zip_code);
    }

    pub fn set_city(&mut self, city: Option<&str>) {
        self.model.set(CustomerField::City, city);
    }

    pub fn set_country(&mut self, country: Option<&str>) {
        self.model.set(CustomerField::Country, country);
    }

    pub fn set_email(&mut self, email: Option<&str>) {
        self.model.set(CustomerField::Email, email);
    }

    pub fn set_phone(&mut self, phone: Option<&str>) {
        self.model.set(CustomerField::Phone, phone);
    }

    pub fn to_field_map(&self) -> FieldMap<CustomerField> {
        self.model.to_field_map()
    }

    pub fn model(&self) -> &Model<CustomerField> {
        &self.model
    }
}

impl Entity for Customer {
    type Key = CustomerField;

    fn from_model(model: Model<CustomerField>) -> Self {
        Self { model }
    }
}

impl From<Model<CustomerField>> for Customer {
    fn from(model: Model<CustomerField>) -> Self {
        Self::from_model(model)
    }
}

impl Routable for Customer {
    fn id(&self) -> Option<&str> {
        self.gid()
    }

    fn external_id(&self) -> Option<&str> {
        self.external_id()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    #[test]
    fn name_alone_is_not_enough() {
        let fields = FieldMap::from([(CustomerField::Name, json!("Acme"))]);
        assert!(matches!(
            CustomerField::assert_correctly_initialized(&fields),
            Err(ValidationError::MissingOneOf { entity: "Customer", .. })
        ));
    }

    #[test]
    fn null_identifiers_do_not_count() {
        let fields = FieldMap::from([
            (CustomerField::Name, json!("Acme")),
            (CustomerField::ExternalId, Value::Null),
            (CustomerField::VatNumber, Value::Null),
        ]);
        assert!(CustomerField::assert_correctly_initialized(&fields).is_err());
    }

    #[test]
    fn name_and_vat_number_pass() {
        let fields = FieldMap::from([
            (CustomerField::Name, json!("Acme")),
            (CustomerField::VatNumber, json!("PT123")),
            (CustomerField::Email, Value::Null),
        ]);
        assert_eq!(CustomerField::assert_correctly_initialized(&fields), Ok(()));
    }

    #[test]
    fn object_derived_map_never_contains_absent_fields() {
        let mut customer = Customer::new();
        customer.set_name(Some("Acme"));
        customer.set_email(Some("a@acme.test"));
        customer.set_email(None);
        let fields = customer.to_field_map();
        assert_eq!(fields, FieldMap::from([(CustomerField::Name, json!("Acme"))]));
    }

    #[test]
    fn routes_by_gid_and_external_id() {
        let customer: Customer =
            serde_json::from_value(json!({"gid": "g-1", "externalId": "EXT-1", "name": "Acme"}))
                .unwrap();
        assert_eq!(Routable::id(&customer), Some("g-1"));
        assert_eq!(Routable::external_id(&customer), Some("EXT-1"));
    }
}
