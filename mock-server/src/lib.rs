use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use uuid::Uuid;

pub type Record = Map<String, Value>;

/// Error response: status plus `{"code": .., "message": .., ..}` body.
pub type Failure = (StatusCode, Json<Value>);

const CUSTOMER_FIELDS: &[&str] = &[
    "name",
    "externalId",
    "vatNumber",
    "address",
    "zipCode",
    "city",
    "country",
    "email",
    "phone",
];

const COMPANY_FIELDS: &[&str] = &["name", "vatNumber", "address", "zipCode", "city", "country"];

pub struct Store {
    pub company: Record,
    pub customers: HashMap<String, Record>,
    pub attributes: HashMap<String, BTreeMap<String, String>>,
}

impl Default for Store {
    fn default() -> Self {
        let company = json!({
            "gid": Uuid::new_v4().to_string(),
            "name": "Test Company",
            "vatNumber": "PT000000000",
            "address": null,
            "zipCode": null,
            "city": null,
            "country": "PT",
            "notificationsEnabled": true
        });
        Self {
            company: into_record(company),
            customers: HashMap::new(),
            attributes: HashMap::new(),
        }
    }
}

impl Store {
    /// Find a customer's gid by gid or externalId.
    fn resolve(&self, id: &str) -> Option<String> {
        if self.customers.contains_key(id) {
            return Some(id.to_string());
        }
        self.customers
            .iter()
            .find(|(_, c)| c.get("externalId").and_then(Value::as_str) == Some(id))
            .map(|(gid, _)| gid.clone())
    }

    /// Gid of another customer sharing a non-null externalId or vatNumber.
    fn conflicting(&self, candidate: &Record, except: Option<&str>) -> Option<String> {
        ["externalId", "vatNumber"].iter().find_map(|key| {
            let wanted = candidate.get(*key).and_then(Value::as_str)?;
            self.customers
                .iter()
                .filter(|(gid, _)| Some(gid.as_str()) != except)
                .find(|(_, c)| c.get(*key).and_then(Value::as_str) == Some(wanted))
                .map(|(gid, _)| gid.clone())
        })
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/companies", get(get_company).put(update_company))
        .route("/companies/enableNotifications", put(enable_notifications))
        .route("/companies/disableNotifications", put(disable_notifications))
        .route("/customers", post(register_customer))
        .route("/customers/{id}", get(get_customer).put(update_customer))
        .route(
            "/customers/{id}/attributes",
            get(get_attributes).post(set_attributes),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn failure(status: StatusCode, message: &str) -> Failure {
    (
        status,
        Json(json!({"code": status.as_u16(), "message": message})),
    )
}

fn into_record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        _ => Record::new(),
    }
}

/// Parse a request body as a flat JSON object, restricted to `allowed` keys.
/// Values must be strings or null.
fn parse_payload(body: &str, allowed: &[&str]) -> Result<Record, Failure> {
    let payload: Record = serde_json::from_str(body)
        .map_err(|_| failure(StatusCode::UNPROCESSABLE_ENTITY, "malformed JSON object"))?;
    for (key, value) in &payload {
        if !allowed.contains(&key.as_str()) {
            return Err(failure(
                StatusCode::UNPROCESSABLE_ENTITY,
                &format!("unknown or read-only field '{key}'"),
            ));
        }
        if !(value.is_string() || value.is_null()) {
            return Err(failure(
                StatusCode::UNPROCESSABLE_ENTITY,
                &format!("field '{key}' must be a string"),
            ));
        }
    }
    Ok(payload)
}

fn require_non_empty(record: &Record, key: &str) -> Result<(), Failure> {
    match record.get(key).and_then(Value::as_str) {
        Some(s) if !s.is_empty() => Ok(()),
        _ => Err(failure(
            StatusCode::UNPROCESSABLE_ENTITY,
            &format!("'{key}' is required"),
        )),
    }
}

/// Apply an update: present keys overwrite, nulls clear, absent keys stay.
fn merge(target: &mut Record, payload: Record) {
    for (key, value) in payload {
        target.insert(key, value);
    }
}

// --- company ---

async fn get_company(State(db): State<Db>) -> Json<Record> {
    Json(db.read().await.company.clone())
}

async fn update_company(State(db): State<Db>, body: String) -> Result<Json<Record>, Failure> {
    let payload = parse_payload(&body, COMPANY_FIELDS)?;
    require_non_empty(&payload, "name")?;
    require_non_empty(&payload, "vatNumber")?;
    let mut store = db.write().await;
    merge(&mut store.company, payload);
    Ok(Json(store.company.clone()))
}

async fn enable_notifications(State(db): State<Db>) -> Json<Record> {
    set_notifications(db, true).await
}

async fn disable_notifications(State(db): State<Db>) -> Json<Record> {
    set_notifications(db, false).await
}

async fn set_notifications(db: Db, enabled: bool) -> Json<Record> {
    let mut store = db.write().await;
    store
        .company
        .insert("notificationsEnabled".to_string(), Value::Bool(enabled));
    Json(store.company.clone())
}

// --- customers ---

async fn register_customer(
    State(db): State<Db>,
    body: String,
) -> Result<(StatusCode, Json<Record>), Failure> {
    let payload = parse_payload(&body, CUSTOMER_FIELDS)?;
    require_non_empty(&payload, "name")?;
    let identified = ["externalId", "vatNumber"]
        .iter()
        .any(|k| payload.get(*k).is_some_and(Value::is_string));
    if !identified {
        return Err(failure(
            StatusCode::UNPROCESSABLE_ENTITY,
            "'externalId' or 'vatNumber' is required",
        ));
    }

    let mut store = db.write().await;
    if let Some(existing) = store.conflicting(&payload, None) {
        let (status, Json(mut body)) = failure(StatusCode::CONFLICT, "customer already exists");
        body["gid"] = Value::String(existing);
        return Err((status, Json(body)));
    }

    let gid = Uuid::new_v4().to_string();
    let mut customer = payload;
    customer.insert("gid".to_string(), Value::String(gid.clone()));
    store.customers.insert(gid.clone(), customer.clone());
    info!(%gid, "customer registered");
    Ok((StatusCode::CREATED, Json(customer)))
}

async fn get_customer(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Record>, Failure> {
    let store = db.read().await;
    store
        .resolve(&id)
        .and_then(|gid| store.customers.get(&gid).cloned())
        .map(Json)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "customer not found"))
}

async fn update_customer(
    State(db): State<Db>,
    Path(id): Path<String>,
    body: String,
) -> Result<Json<Record>, Failure> {
    let payload = parse_payload(&body, CUSTOMER_FIELDS)?;
    if payload.contains_key("name") {
        require_non_empty(&payload, "name")?;
    }
    let mut store = db.write().await;
    let gid = store
        .resolve(&id)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "customer not found"))?;
    if let Some(existing) = store.conflicting(&payload, Some(&gid)) {
        let (status, Json(mut body)) = failure(StatusCode::CONFLICT, "customer already exists");
        body["gid"] = Value::String(existing);
        return Err((status, Json(body)));
    }
    let customer = store
        .customers
        .get_mut(&gid)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "customer not found"))?;
    merge(customer, payload);
    Ok(Json(customer.clone()))
}

async fn get_attributes(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<BTreeMap<String, String>>, Failure> {
    let store = db.read().await;
    let gid = store
        .resolve(&id)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "customer not found"))?;
    Ok(Json(store.attributes.get(&gid).cloned().unwrap_or_default()))
}

async fn set_attributes(
    State(db): State<Db>,
    Path(id): Path<String>,
    body: String,
) -> Result<Json<BTreeMap<String, String>>, Failure> {
    let incoming: BTreeMap<String, String> = serde_json::from_str(&body).map_err(|_| {
        failure(
            StatusCode::UNPROCESSABLE_ENTITY,
            "attributes must be a string map",
        )
    })?;
    let mut store = db.write().await;
    let gid = store
        .resolve(&id)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "customer not found"))?;
    let attributes = store.attributes.entry(gid).or_default();
    attributes.extend(incoming);
    Ok(Json(attributes.clone()))
}
