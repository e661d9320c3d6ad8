//! Synchronous client core for the Invisible Collector collections API.
//!
//! # Overview
//! Builds `HttpRequest` values and classifies `HttpResponse` values without
//! touching the network (host-does-IO pattern). Callers either execute the
//! round-trip themselves between `build_*` and `parse_*`, or hand a
//! `Dispatcher` to the one-shot facade methods.
//!
//! # Design
//! - `schema` declares per-entity field keys with wire names and value rules;
//!   payloads are validated locally before any request is built.
//! - `model` holds sparse records that keep "absent" and "explicit null"
//!   apart, since the service clears null fields and ignores absent ones.
//! - `validators` composes per-endpoint response checks from an immutable
//!   base, including conflict detection with extraction of the existing
//!   entity's id.
//! - `routing` picks the internal id or external id for request paths.
//! - `IcClient` is stateless apart from its configuration and is safe to
//!   share between threads.

pub mod client;
pub mod codec;
pub mod company;
pub mod config;
pub mod customers;
pub mod error;
pub mod http;
pub mod model;
pub mod routing;
pub mod schema;
pub mod validators;

pub use client::IcClient;
pub use company::CompanyApi;
pub use config::ClientConfig;
pub use customers::CustomerApi;
pub use error::{ApiError, Result, ValidationError};
pub use http::{Dispatcher, HttpMethod, HttpRequest, HttpResponse, TransportError};
pub use model::{Company, CompanyField, Customer, CustomerField, Entity, Item, ItemField, Model};
pub use routing::{resolve_id, resolve_id_with, IdPreference, IdRef, Routable};
pub use schema::{FieldKey, FieldMap};
pub use validators::{Outcome, ValidatorBuilder, ValidatorChain};
