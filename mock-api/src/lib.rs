//! In-process stand-in for the hosted CRUD service.
//!
//! Replicates the parts of the vendor API the client depends on: record CRUD
//! under `/records`, `x-api-key` authentication (401 on a missing or wrong
//! key), and a per-instance usage-credit budget — every authorized call
//! consumes one credit, and once the budget is spent every further call
//! answers 402 until the instance is rebuilt.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub use axum::Router as ServiceRouter;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Record {
    pub id: Uuid,
    pub value: String,
}

#[derive(Deserialize)]
pub struct CreateRecord {
    pub value: String,
}

#[derive(Deserialize)]
pub struct UpdateRecord {
    pub value: String,
}

#[derive(Debug)]
struct ServiceState {
    api_key: String,
    /// Remaining credits; `None` means unmetered.
    credits: Option<u64>,
    /// Insertion-ordered, like the hosted service's listing.
    records: Vec<Record>,
}

type Shared = Arc<RwLock<ServiceState>>;
type Rejection = (StatusCode, String);

impl ServiceState {
    /// Check the key, then spend one credit. Runs before every operation.
    fn authorize(&mut self, headers: &HeaderMap) -> Result<(), Rejection> {
        let presented = headers
            .get("x-api-key")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if presented != self.api_key {
            return Err((StatusCode::UNAUTHORIZED, "invalid API key".to_string()));
        }
        if let Some(remaining) = self.credits.as_mut() {
            if *remaining == 0 {
                return Err((
                    StatusCode::PAYMENT_REQUIRED,
                    "usage credits exhausted".to_string(),
                ));
            }
            *remaining -= 1;
        }
        Ok(())
    }
}

/// Service accepting `api_key` with an unlimited credit budget.
pub fn app(api_key: &str) -> Router {
    app_inner(api_key, None)
}

/// Service accepting `api_key` with exactly `credits` authorized calls.
pub fn app_with_credits(api_key: &str, credits: u64) -> Router {
    app_inner(api_key, Some(credits))
}

fn app_inner(api_key: &str, credits: Option<u64>) -> Router {
    let state: Shared = Arc::new(RwLock::new(ServiceState {
        api_key: api_key.to_string(),
        credits,
        records: Vec::new(),
    }));
    Router::new()
        .route("/records", get(list_records).post(create_record))
        .route("/records/{id}", axum::routing::put(update_record).delete(delete_record))
        .with_state(state)
}

pub async fn serve(listener: TcpListener, router: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, router).await
}

async fn list_records(
    State(shared): State<Shared>,
    headers: HeaderMap,
) -> Result<Json<Vec<Record>>, Rejection> {
    let mut state = shared.write().await;
    state.authorize(&headers)?;
    Ok(Json(state.records.clone()))
}

async fn create_record(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Json(input): Json<CreateRecord>,
) -> Result<(StatusCode, Json<Record>), Rejection> {
    let mut state = shared.write().await;
    state.authorize(&headers)?;
    let record = Record {
        id: Uuid::new_v4(),
        value: input.value,
    };
    state.records.push(record.clone());
    Ok((StatusCode::CREATED, Json(record)))
}

async fn update_record(
    State(shared): State<Shared>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(input): Json<UpdateRecord>,
) -> Result<Json<Record>, Rejection> {
    let mut state = shared.write().await;
    state.authorize(&headers)?;
    let record = state
        .records
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or((StatusCode::NOT_FOUND, "no such record".to_string()))?;
    record.value = input.value;
    Ok(Json(record.clone()))
}

async fn delete_record(
    State(shared): State<Shared>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<StatusCode, Rejection> {
    let mut state = shared.write().await;
    state.authorize(&headers)?;
    let pos = state
        .records
        .iter()
        .position(|r| r.id == id)
        .ok_or((StatusCode::NOT_FOUND, "no such record".to_string()))?;
    state.records.remove(pos);
    Ok(StatusCode::NO_CONTENT)
}
