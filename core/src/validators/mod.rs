//! Response validation chain.
//!
//! # Design
//! A chain classifies `(status, body)` into exactly one `Outcome`. Add-on
//! validators run first, in registration order, and the first non-accepted
//! outcome wins; the transport-success check closes every chain and rejects
//! whatever is not 2xx. Each add-on only reacts to its own status code, so
//! for a given response at most one add-on fires and the outcome does not
//! depend on registration order.
//!
//! `ValidatorBuilder` is a plain value. Endpoints clone the client's base
//! builder and extend the copy, so the shared base is never altered.

mod conflict;

use tracing::{debug, warn};

use crate::error::ApiError;
use crate::http::HttpResponse;

pub use conflict::{extract_conflicting_id, CONFLICT_ID_KEYS};

/// Status the service returns for a syntactically or semantically invalid
/// request payload.
pub const BAD_CLIENT_JSON_STATUS: u16 = 422;

/// Status the service returns when the entity already exists.
pub const CONFLICT_STATUS: u16 = 409;

/// Classification of one response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Accepted,
    RejectedGeneric { message: String },
    RejectedConflict { id: String, message: String },
}

impl Outcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted)
    }

    /// Turn a rejection into the matching `ApiError`.
    pub fn into_result(self, status: u16, body: &str) -> Result<(), ApiError> {
        match self {
            Outcome::Accepted => Ok(()),
            Outcome::RejectedGeneric { message } => Err(ApiError::Request {
                status,
                message,
                body: body.to_string(),
            }),
            Outcome::RejectedConflict { id, message } => Err(ApiError::Conflict {
                status,
                message,
                body: body.to_string(),
                conflicting_id: id,
            }),
        }
    }
}

/// One stage of a chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validator {
    /// Accepts 2xx, rejects everything else with a diagnostic message.
    TransportSuccess,
    /// Rejects the bad-payload status as a client mistake.
    BadClientJson,
    /// Rejects the conflict status, carrying the conflicting id if the body
    /// yields one. `message` is diagnostic text only.
    Conflict { message: String },
}

impl Validator {
    pub fn check(&self, status: u16, body: &str) -> Outcome {
        match self {
            Validator::TransportSuccess => check_transport_success(status),
            Validator::BadClientJson if status == BAD_CLIENT_JSON_STATUS => {
                Outcome::RejectedGeneric {
                    message: "the request payload was rejected as invalid".to_string(),
                }
            }
            Validator::Conflict { message } if status == CONFLICT_STATUS => {
                match extract_conflicting_id(body) {
                    Some(id) => {
                        warn!(conflicting_id = %id, "request conflicts with an existing entity");
                        Outcome::RejectedConflict {
                            id,
                            message: message.clone(),
                        }
                    }
                    None => Outcome::RejectedGeneric {
                        message: message.clone(),
                    },
                }
            }
            Validator::BadClientJson | Validator::Conflict { .. } => Outcome::Accepted,
        }
    }

    fn same_kind(&self, other: &Validator) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

fn check_transport_success(status: u16) -> Outcome {
    if (200..300).contains(&status) {
        return Outcome::Accepted;
    }
    let message = match status {
        401 => "unauthorized",
        404 => "not found",
        500..=599 => "server error",
        _ => "unexpected status",
    };
    Outcome::RejectedGeneric {
        message: message.to_string(),
    }
}

/// Declarative description of which add-ons a chain carries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatorBuilder {
    add_ons: Vec<Validator>,
}

impl ValidatorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_bad_client_json_validator(self) -> Self {
        self.add(Validator::BadClientJson)
    }

    pub fn add_conflict_validator(self, message: impl Into<String>) -> Self {
        self.add(Validator::Conflict {
            message: message.into(),
        })
    }

    /// Adding a kind that is already present keeps the first registration.
    fn add(mut self, validator: Validator) -> Self {
        if !self.add_ons.iter().any(|v| v.same_kind(&validator)) {
            self.add_ons.push(validator);
        }
        self
    }

    pub fn build(self) -> ValidatorChain {
        let mut stages = self.add_ons;
        stages.push(Validator::TransportSuccess);
        ValidatorChain { stages }
    }
}

/// An immutable, ordered set of validators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorChain {
    stages: Vec<Validator>,
}

impl Default for ValidatorChain {
    fn default() -> Self {
        ValidatorBuilder::new().build()
    }
}

impl ValidatorChain {
    pub fn stages(&self) -> &[Validator] {
        &self.stages
    }

    pub fn outcome(&self, status: u16, body: &str) -> Outcome {
        self.stages
            .iter()
            .map(|stage| stage.check(status, body))
            .find(|outcome| !outcome.is_accepted())
            .unwrap_or(Outcome::Accepted)
    }

    /// Classify `response`, returning the matching error on rejection.
    pub fn validate(&self, response: &HttpResponse) -> Result<(), ApiError> {
        let outcome = self.outcome(response.status, &response.body);
        debug!(status = response.status, ?outcome, "response classified");
        outcome.into_result(response.status, &response.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = "Entity already exists";

    fn full_chain() -> ValidatorChain {
        ValidatorBuilder::new()
            .add_bad_client_json_validator()
            .add_conflict_validator(TEMPLATE)
            .build()
    }

    #[test]
    fn base_chain_accepts_2xx() {
        let chain = ValidatorChain::default();
        for status in [200, 201, 204, 299] {
            assert_eq!(chain.outcome(status, ""), Outcome::Accepted);
        }
    }

    #[test]
    fn base_chain_rejects_everything_else() {
        let chain = ValidatorChain::default();
        let cases = [
            (401, "unauthorized"),
            (404, "not found"),
            (409, "unexpected status"),
            (422, "unexpected status"),
            (503, "server error"),
            (302, "unexpected status"),
        ];
        for (status, message) in cases {
            assert_eq!(
                chain.outcome(status, "boom"),
                Outcome::RejectedGeneric {
                    message: message.to_string()
                },
                "status {status}"
            );
        }
    }

    #[test]
    fn conflict_with_id_is_structured() {
        assert_eq!(
            full_chain().outcome(409, r#"{"id":"abc123"}"#),
            Outcome::RejectedConflict {
                id: "abc123".to_string(),
                message: TEMPLATE.to_string()
            }
        );
    }

    #[test]
    fn conflict_without_id_uses_template() {
        for body in ["", "<html>", r#"{"message":"dup"}"#] {
            assert_eq!(
                full_chain().outcome(409, body),
                Outcome::RejectedGeneric {
                    message: TEMPLATE.to_string()
                }
            );
        }
    }

    #[test]
    fn bad_client_json_is_distinguished() {
        assert_eq!(
            full_chain().outcome(422, "{}"),
            Outcome::RejectedGeneric {
                message: "the request payload was rejected as invalid".to_string()
            }
        );
    }

    #[test]
    fn add_on_order_does_not_change_outcome() {
        let reversed = ValidatorBuilder::new()
            .add_conflict_validator(TEMPLATE)
            .add_bad_client_json_validator()
            .build();
        for (status, body) in [(409, r#"{"id":"x"}"#), (409, ""), (422, ""), (500, ""), (200, "")] {
            assert_eq!(
                full_chain().outcome(status, body),
                reversed.outcome(status, body),
                "status {status}"
            );
        }
    }

    #[test]
    fn adding_twice_is_idempotent() {
        let chain = ValidatorBuilder::new()
            .add_bad_client_json_validator()
            .add_bad_client_json_validator()
            .add_conflict_validator("first")
            .add_conflict_validator("second")
            .build();
        assert_eq!(
            chain.stages(),
            &[
                Validator::BadClientJson,
                Validator::Conflict {
                    message: "first".to_string()
                },
                Validator::TransportSuccess,
            ]
        );
    }

    #[test]
    fn extending_a_clone_leaves_the_base_untouched() {
        let base = ValidatorBuilder::new();
        let extended = base.clone().add_bad_client_json_validator();
        assert_eq!(base.build().stages(), &[Validator::TransportSuccess]);
        assert_eq!(extended.build().stages().len(), 2);
    }

    #[test]
    fn validate_maps_outcomes_to_errors() {
        let response = HttpResponse::new(409, r#"{"id":"abc123"}"#);
        let err = full_chain().validate(&response).unwrap_err();
        assert_eq!(err.conflicting_id(), Some("abc123"));
        assert_eq!(err.status(), Some(409));

        let response = HttpResponse::new(500, "internal error");
        let err = full_chain().validate(&response).unwrap_err();
        assert!(matches!(
            err,
            ApiError::Request { status: 500, ref body, .. } if body == "internal error"
        ));

        assert!(full_chain().validate(&HttpResponse::new(201, "{}")).is_ok());
    }
}
