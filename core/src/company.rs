//! `/companies` endpoint facade: the account's own company record.

use crate::client::{dispatch, IcClient};
use crate::codec;
use crate::error::Result;
use crate::http::{Dispatcher, HttpMethod, HttpRequest, HttpResponse};
use crate::model::{to_wire_map, Company, CompanyField};
use crate::schema::FieldMap;

const COMPANIES_ENDPOINT: &str = "companies";
const ENABLE_NOTIFICATIONS_ENDPOINT: &str = "companies/enableNotifications";
const DISABLE_NOTIFICATIONS_ENDPOINT: &str = "companies/disableNotifications";

#[derive(Debug, Clone, Copy)]
pub struct CompanyApi<'a> {
    client: &'a IcClient,
}

impl<'a> CompanyApi<'a> {
    pub(crate) fn new(client: &'a IcClient) -> Self {
        Self { client }
    }

    pub fn build_request_company_info(&self) -> HttpRequest {
        self.client.request(HttpMethod::Get, COMPANIES_ENDPOINT, None)
    }

    /// Every company endpoint answers with the up-to-date company record.
    pub fn parse_company(&self, response: HttpResponse) -> Result<Company> {
        let chain = self.client.validators().add_bad_client_json_validator().build();
        self.client.parse_entity(&chain, response)
    }

    pub fn request_company_info<D: Dispatcher + ?Sized>(&self, dispatcher: &D) -> Result<Company> {
        self.parse_company(dispatch(dispatcher, self.build_request_company_info())?)
    }

    /// `PUT /companies`. The map must be a complete company record.
    pub fn build_update_company_info(&self, fields: &FieldMap<CompanyField>) -> Result<HttpRequest> {
        CompanyField::assert_correctly_initialized(fields)?;
        let body = codec::encode(&to_wire_map(fields))?;
        Ok(self
            .client
            .request(HttpMethod::Put, COMPANIES_ENDPOINT, Some(body)))
    }

    pub fn update_company_info<D: Dispatcher + ?Sized>(
        &self,
        dispatcher: &D,
        company: &Company,
    ) -> Result<Company> {
        self.update_company_info_fields(dispatcher, &company.to_field_map())
    }

    pub fn update_company_info_fields<D: Dispatcher + ?Sized>(
        &self,
        dispatcher: &D,
        fields: &FieldMap<CompanyField>,
    ) -> Result<Company> {
        let request = self.build_update_company_info(fields)?;
        self.parse_company(dispatch(dispatcher, request)?)
    }

    pub fn build_set_company_notifications(&self, enable: bool) -> HttpRequest {
        let endpoint = if enable {
            ENABLE_NOTIFICATIONS_ENDPOINT
        } else {
            DISABLE_NOTIFICATIONS_ENDPOINT
        };
        self.client.request(HttpMethod::Put, endpoint, None)
    }

    pub fn set_company_notifications<D: Dispatcher + ?Sized>(
        &self,
        dispatcher: &D,
        enable: bool,
    ) -> Result<Company> {
        self.parse_company(dispatch(dispatcher, self.build_set_company_notifications(enable))?)
    }
}
