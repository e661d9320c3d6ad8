use serde::{Deserialize, Serialize};

use super::{Entity, Model};
use crate::error::ValidationError;
use crate::schema::{self, FieldKey, FieldMap, FieldSpec, ValueKind};

/// Fields of the account's own company record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CompanyField {
    Name,
    VatNumber,
    Address,
    ZipCode,
    City,
    Country,
    Gid,
    NotificationsEnabled,
}

impl FieldKey for CompanyField {
    const ENTITY: &'static str = "Company";
    const ALL: &'static [Self] = &[
        CompanyField::Name,
        CompanyField::VatNumber,
        CompanyField::Address,
        CompanyField::ZipCode,
        CompanyField::City,
        CompanyField::Country,
        CompanyField::Gid,
        CompanyField::NotificationsEnabled,
    ];

    fn spec(self) -> FieldSpec {
        match self {
            CompanyField::Name => FieldSpec::mandatory("name", ValueKind::NonEmptyString),
            CompanyField::VatNumber => FieldSpec::mandatory("vatNumber", ValueKind::NonEmptyString),
            CompanyField::Address => FieldSpec::optional("address", ValueKind::String),
            CompanyField::ZipCode => FieldSpec::optional("zipCode", ValueKind::String),
            CompanyField::City => FieldSpec::optional("city", ValueKind::String),
            CompanyField::Country => FieldSpec::optional("country", ValueKind::String),
            CompanyField::Gid => FieldSpec::read_only("gid", ValueKind::String),
            CompanyField::NotificationsEnabled => {
                FieldSpec::read_only("notificationsEnabled", ValueKind::Boolean)
            }
        }
    }
}

impl CompanyField {
    pub fn assert_correctly_initialized(fields: &FieldMap<Self>) -> Result<(), ValidationError> {
        schema::assert_correctly_initialized(fields)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Company {
    model: Model<CompanyField>,
}

impl Company {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> Option<&str> {
        self.model.get_str(CompanyField::Name)
    }

    pub fn vat_number(&self) -> Option<&str> {
        self.model.get_str(CompanyField::VatNumber)
    }

    pub fn address(&self) -> Option<&str> {
        self.model.get_str(CompanyField::Address)
    }

    pub fn zip_code(&self) -> Option<&str> {
        self.model.get_str(CompanyField::ZipCode)
    }

    pub fn city(&self) -> Option<&str> {
        self.model.get_str(CompanyField::City)
    }

    pub fn country(&self) -> Option<&str> {
        self.model.get_str(CompanyField::Country)
    }

    pub fn gid(&self) -> Option<&str> {
        self.model.get_str(CompanyField::Gid)
    }

    pub fn notifications_enabled(&self) -> Option<bool> {
        self.model.get_bool(CompanyField::NotificationsEnabled)
    }

    pub fn set_name(&mut self, name: Option<&str>) {
        self.model.set(CompanyField::Name, name);
    }

    pub fn set_vat_number(&mut self, vat_number: Option<&str>) {
        self.model.set(CompanyField::VatNumber, vat_number);
    }

    pub fn set_address(&mut self, address: Option<&str>) {
        self.model.set(CompanyField::Address, address);
    }

    pub fn set_zip_code(&mut self, zip_code: Option<&str>) {
        self.model.set(CompanyField::ZipCode, zip_code);
    }

    pub fn set_city(&mut self, city: Option<&str>) {
        self.model.set(CompanyField::City, city);
    }

    pub fn set_country(&mut self, country: Option<&str>) {
        self.model.set(CompanyField::Country, country);
    }

    pub fn to_field_map(&self) -> FieldMap<CompanyField> {
        self.model.to_field_map()
    }

    pub fn model(&self) -> &Model<CompanyField> {
        &self.model
    }
}

impl Entity for Company {
    type Key = CompanyField;

    fn from_model(model: Model<CompanyField>) -> Self {
        Self { model }
    }
}

impl From<Model<CompanyField>> for Company {
    fn from(model: Model<CompanyField>) -> Self {
        Self::from_model(model)
    }
}
