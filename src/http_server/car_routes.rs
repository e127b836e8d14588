//! Car HTTP Routes
//!
//! CRUD endpoints for car records, nested under `/api/cars`:
//!
//! - `POST   /`          create
//! - `GET    /`          list
//! - `GET    /:id`       get by id
//! - `GET    /vin/:vin`  get by VIN
//! - `PUT    /:id`       full update
//! - `DELETE /:id`       delete

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use super::errors::{ApiError, ApiResult};
use crate::model::{CarDto, CarId};
use crate::observability::{log_event_with_fields, Event};
use crate::service::{CarService, ServiceResult};
use crate::storage::SharedRepository;

/// Car state shared across handlers
pub struct CarState {
    pub service: CarService<SharedRepository>,
}

impl CarState {
    pub fn new(repository: SharedRepository) -> Self {
        Self {
            service: CarService::new(repository),
        }
    }
}

/// Create car routes
pub fn car_routes(state: Arc<CarState>) -> Router {
    Router::new()
        .route("/", get(list_cars_handler).post(create_car_handler))
        .route(
            "/:id",
            get(get_car_handler)
                .put(update_car_handler)
                .delete(delete_car_handler),
        )
        .route("/vin/:vin", get(get_car_by_vin_handler))
        .with_state(state)
}

fn log_request(method: &str, path: &str) {
    log_event_with_fields(Event::RequestReceived, &[("method", method), ("path", path)]);
}

/// Run a service call on the blocking pool. The file backend fsyncs on
/// every write, which must not stall the async workers.
async fn run_service<T, F>(state: &Arc<CarState>, op: F) -> ApiResult<T>
where
    F: FnOnce(&CarService<SharedRepository>) -> ServiceResult<T> + Send + 'static,
    T: Send + 'static,
{
    let state = Arc::clone(state);
    let outcome = tokio::task::spawn_blocking(move || op(&state.service))
        .await
        .map_err(|e| ApiError::Internal(format!("service task failed: {}", e)))?;
    Ok(outcome?)
}

async fn create_car_handler(
    State(state): State<Arc<CarState>>,
    Json(request): Json<CarDto>,
) -> ApiResult<(StatusCode, Json<CarDto>)> {
    log_request("POST", "/api/cars");
    request.validate()?;

    let created = run_service(&state, move |service| service.create(&request)).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_cars_handler(State(state): State<Arc<CarState>>) -> ApiResult<Json<Vec<CarDto>>> {
    log_request("GET", "/api/cars");
    let cars = run_service(&state, |service| service.list()).await?;
    Ok(Json(cars))
}

async fn get_car_handler(
    State(state): State<Arc<CarState>>,
    Path(id): Path<CarId>,
) -> ApiResult<Json<CarDto>> {
    log_request("GET", &format!("/api/cars/{}", id));
    run_service(&state, move |service| service.get_by_id(id))
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

async fn get_car_by_vin_handler(
    State(state): State<Arc<CarState>>,
    Path(vin): Path<String>,
) -> ApiResult<Json<CarDto>> {
    log_request("GET", &format!("/api/cars/vin/{}", vin));
    run_service(&state, move |service| service.get_by_vin(&vin))
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

async fn update_car_handler(
    State(state): State<Arc<CarState>>,
    Path(id): Path<CarId>,
    Json(request): Json<CarDto>,
) -> ApiResult<Json<CarDto>> {
    log_request("PUT", &format!("/api/cars/{}", id));
    request.validate()?;

    run_service(&state, move |service| service.update(id, &request))
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

async fn delete_car_handler(
    State(state): State<Arc<CarState>>,
    Path(id): Path<CarId>,
) -> ApiResult<StatusCode> {
    log_request("DELETE", &format!("/api/cars/{}", id));
    if run_service(&state, move |service| service.delete(id)).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}
