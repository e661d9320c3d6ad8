//! Stateless client plumbing shared by the endpoint facades.
//!
//! # Design
//! `IcClient` holds only its configuration and the base validator builder.
//! Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`, so
//! the core stays free of I/O. The one-shot methods on the facades simply
//! pass the built request through a caller-supplied `Dispatcher`.

use tracing::debug;

use crate::codec;
use crate::company::CompanyApi;
use crate::config::ClientConfig;
use crate::customers::CustomerApi;
use crate::error::Result;
use crate::http::{Dispatcher, HttpMethod, HttpRequest, HttpResponse};
use crate::model::{Entity, Model};
use crate::validators::{ValidatorBuilder, ValidatorChain};

/// Thread-safe handle to the collections API. Cheap to clone.
#[derive(Debug, Clone)]
pub struct IcClient {
    config: ClientConfig,
    validators: ValidatorBuilder,
}

impl IcClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            validators: ValidatorBuilder::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn customers(&self) -> CustomerApi<'_> {
        CustomerApi::new(self)
    }

    pub fn company(&self) -> CompanyApi<'_> {
        CompanyApi::new(self)
    }

    /// A fresh copy of the base validator configuration, ready to extend.
    pub(crate) fn validators(&self) -> ValidatorBuilder {
        self.validators.clone()
    }

    pub(crate) fn request(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: Option<String>,
    ) -> HttpRequest {
        let mut headers = vec![
            (
                "authorization".to_string(),
                format!("Bearer {}", self.config.api_token),
            ),
            ("accept".to_string(), "application/json".to_string()),
        ];
        if body.is_some() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }
        let path = format!("{}/{endpoint}", self.config.base_url);
        debug!(method = method.as_str(), %path, "request built");
        HttpRequest {
            method,
            path,
            headers,
            body,
        }
    }

    /// Validate `response` and decode its body into an entity.
    pub(crate) fn parse_entity<T: Entity>(
        &self,
        chain: &ValidatorChain,
        response: HttpResponse,
    ) -> Result<T> {
        chain.validate(&response)?;
        let wire = codec::decode(&response.body)?;
        Ok(T::from_model(Model::from_wire_map(wire)))
    }
}

/// Execute `request` on `dispatcher`, surfacing transport failures unchanged.
pub(crate) fn dispatch<D: Dispatcher + ?Sized>(
    dispatcher: &D,
    request: HttpRequest,
) -> Result<HttpResponse> {
    let method = request.method;
    let response = dispatcher.send(request)?;
    debug!(method = method.as_str(), status = response.status, "response received");
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> IcClient {
        IcClient::new(ClientConfig::new("token-1", "http://localhost:3000/"))
    }

    #[test]
    fn request_without_body_has_no_content_type() {
        let req = client().request(HttpMethod::Get, "companies", None);
        assert_eq!(req.path, "http://localhost:3000/companies");
        assert_eq!(req.header("authorization"), Some("Bearer token-1"));
        assert_eq!(req.header("accept"), Some("application/json"));
        assert_eq!(req.header("content-type"), None);
    }

    #[test]
    fn request_with_body_is_json() {
        let req = client().request(HttpMethod::Post, "customers", Some("{}".to_string()));
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.body.as_deref(), Some("{}"));
    }

    #[test]
    fn base_validators_are_copied_per_call() {
        let client = client();
        let _extended = client.validators().add_bad_client_json_validator();
        assert_eq!(client.validators(), ValidatorBuilder::new());
    }
}
