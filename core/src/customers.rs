//! `/customers` endpoint facade.

use std::collections::BTreeMap;

use crate::client::{dispatch, IcClient};
use crate::codec;
use crate::error::{Result, ValidationError};
use crate::http::{Dispatcher, HttpMethod, HttpRequest, HttpResponse};
use crate::model::{to_wire_map, Customer, CustomerField};
use crate::routing::{resolve_id_with, IdPreference, Routable};
use crate::schema::{self, FieldMap};
use crate::validators::ValidatorChain;

const CUSTOMERS_ENDPOINT: &str = "customers";
const ATTRIBUTES_PATH: &str = "attributes";

pub const CUSTOMER_CONFLICT_MESSAGE: &str =
    "Entity already exists with the same VAT number or externalId";

/// Operations on customers. Borrowed from an `IcClient`.
///
/// Every operation that names a customer accepts any `Routable`: a bare id
/// string, an `IdRef`, or a `Customer` returned by an earlier call. The
/// internal id wins when both are set, unless `prefer_ids` says otherwise.
#[derive(Debug, Clone, Copy)]
pub struct CustomerApi<'a> {
    client: &'a IcClient,
    preference: IdPreference,
}

impl<'a> CustomerApi<'a> {
    pub(crate) fn new(client: &'a IcClient) -> Self {
        Self {
            client,
            preference: IdPreference::default(),
        }
    }

    /// Route by `preference` when a target carries both ids.
    pub fn prefer_ids(self, preference: IdPreference) -> Self {
        Self { preference, ..self }
    }

    // -----------------------------------------------------------------------
    // Register
    // -----------------------------------------------------------------------

    /// `POST /customers` from a caller map. Nulls are sent as explicit nulls.
    pub fn build_register_new_customer(
        &self,
        fields: &FieldMap<CustomerField>,
    ) -> Result<HttpRequest> {
        CustomerField::assert_correctly_initialized(fields)?;
        let body = codec::encode(&to_wire_map(fields))?;
        Ok(self
            .client
            .request(HttpMethod::Post, CUSTOMERS_ENDPOINT, Some(body)))
    }

    /// Fails with `ApiError::Conflict` carrying the existing customer's id
    /// when the externalId or vatNumber is already taken.
    pub fn parse_register_new_customer(&self, response: HttpResponse) -> Result<Customer> {
        self.client.parse_entity(&self.register_chain(), response)
    }

    /// Register from a `Customer`; unset fields are not sent.
    pub fn register_new_customer<D: Dispatcher + ?Sized>(
        &self,
        dispatcher: &D,
        customer: &Customer,
    ) -> Result<Customer> {
        self.register_new_customer_fields(dispatcher, &customer.to_field_map())
    }

    pub fn register_new_customer_fields<D: Dispatcher + ?Sized>(
        &self,
        dispatcher: &D,
        fields: &FieldMap<CustomerField>,
    ) -> Result<Customer> {
        let request = self.build_register_new_customer(fields)?;
        self.parse_register_new_customer(dispatch(dispatcher, request)?)
    }

    fn register_chain(&self) -> ValidatorChain {
        self.client
            .validators()
            .add_bad_client_json_validator()
            .add_conflict_validator(CUSTOMER_CONFLICT_MESSAGE)
            .build()
    }

    // -----------------------------------------------------------------------
    // Info
    // -----------------------------------------------------------------------

    /// `GET /customers/{id}`.
    pub fn build_request_customer_info<R: Routable + ?Sized>(
        &self,
        customer: &R,
    ) -> Result<HttpRequest> {
        let endpoint = self.customer_endpoint(customer)?;
        Ok(self.client.request(HttpMethod::Get, &endpoint, None))
    }

    pub fn parse_request_customer_info(&self, response: HttpResponse) -> Result<Customer> {
        self.client
            .parse_entity(&self.client.validators().build(), response)
    }

    pub fn request_customer_info<D, R>(&self, dispatcher: &D, customer: &R) -> Result<Customer>
    where
        D: Dispatcher + ?Sized,
        R: Routable + ?Sized,
    {
        let request = self.build_request_customer_info(customer)?;
        self.parse_request_customer_info(dispatch(dispatcher, request)?)
    }

    // -----------------------------------------------------------------------
    // Update
    // -----------------------------------------------------------------------

    /// `PUT /customers/{id}` with a partial caller map. Absent keys are left
    /// untouched by the server; null keys are cleared.
    pub fn build_update_customer_info<R: Routable + ?Sized>(
        &self,
        customer: &R,
        fields: &FieldMap<CustomerField>,
    ) -> Result<HttpRequest> {
        let endpoint = self.customer_endpoint(customer)?;
        schema::assert_valid_update(fields)?;
        let body = codec::encode(&to_wire_map(fields))?;
        Ok(self.client.request(HttpMethod::Put, &endpoint, Some(body)))
    }

    pub fn parse_update_customer_info(&self, response: HttpResponse) -> Result<Customer> {
        let chain = self.client.validators().add_bad_client_json_validator().build();
        self.client.parse_entity(&chain, response)
    }

    /// Update from a `Customer`, routed by its own gid or externalId. Unset
    /// fields are not sent.
    pub fn update_customer_info<D: Dispatcher + ?Sized>(
        &self,
        dispatcher: &D,
        customer: &Customer,
    ) -> Result<Customer> {
        self.update_customer_info_fields(dispatcher, customer, &customer.to_field_map())
    }

    pub fn update_customer_info_fields<D, R>(
        &self,
        dispatcher: &D,
        customer: &R,
        fields: &FieldMap<CustomerField>,
    ) -> Result<Customer>
    where
        D: Dispatcher + ?Sized,
        R: Routable + ?Sized,
    {
        let request = self.build_update_customer_info(customer, fields)?;
        self.parse_update_customer_info(dispatch(dispatcher, request)?)
    }

    // -----------------------------------------------------------------------
    // Attributes
    // -----------------------------------------------------------------------

    /// `GET /customers/{id}/attributes`.
    pub fn build_get_customer_attributes<R: Routable + ?Sized>(
        &self,
        customer: &R,
    ) -> Result<HttpRequest> {
        let endpoint = self.attributes_endpoint(customer)?;
        Ok(self.client.request(HttpMethod::Get, &endpoint, None))
    }

    pub fn parse_get_customer_attributes(
        &self,
        response: HttpResponse,
    ) -> Result<BTreeMap<String, String>> {
        self.client.validators().build().validate(&response)?;
        codec::decode_string_map(&response.body)
    }

    pub fn get_customer_attributes<D, R>(
        &self,
        dispatcher: &D,
        customer: &R,
    ) -> Result<BTreeMap<String, String>>
    where
        D: Dispatcher + ?Sized,
        R: Routable + ?Sized,
    {
        let request = self.build_get_customer_attributes(customer)?;
        self.parse_get_customer_attributes(dispatch(dispatcher, request)?)
    }

    /// `POST /customers/{id}/attributes`. Existing keys are overwritten,
    /// keys not in `attributes` are kept.
    pub fn build_set_customer_attributes<R: Routable + ?Sized>(
        &self,
        customer: &R,
        attributes: &BTreeMap<String, String>,
    ) -> Result<HttpRequest> {
        let endpoint = self.attributes_endpoint(customer)?;
        if attributes.keys().any(String::is_empty) {
            return Err(ValidationError::EmptyAttributeKey.into());
        }
        let body = codec::encode_string_map(attributes)?;
        Ok(self.client.request(HttpMethod::Post, &endpoint, Some(body)))
    }

    /// Returns the full, up-to-date attribute map.
    pub fn parse_set_customer_attributes(
        &self,
        response: HttpResponse,
    ) -> Result<BTreeMap<String, String>> {
        self.client
            .validators()
            .add_bad_client_json_validator()
            .build()
            .validate(&response)?;
        codec::decode_string_map(&response.body)
    }

    pub fn set_customer_attributes<D, R>(
        &self,
        dispatcher: &D,
        customer: &R,
        attributes: &BTreeMap<String, String>,
    ) -> Result<BTreeMap<String, String>>
    where
        D: Dispatcher + ?Sized,
        R: Routable + ?Sized,
    {
        let request = self.build_set_customer_attributes(customer, attributes)?;
        self.parse_set_customer_attributes(dispatch(dispatcher, request)?)
    }

    fn customer_endpoint<R: Routable + ?Sized>(&self, customer: &R) -> Result<String> {
        let id = resolve_id_with(customer, self.preference)?;
        Ok(format!("{CUSTOMERS_ENDPOINT}/{id}"))
    }

    fn attributes_endpoint<R: Routable + ?Sized>(&self, customer: &R) -> Result<String> {
        let id = resolve_id_with(customer, self.preference)?;
        Ok(format!("{CUSTOMERS_ENDPOINT}/{id}/{ATTRIBUTES_PATH}"))
    }
}
