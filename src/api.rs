use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::{
    app_state::AppState,
    models::{GadgetRecord, RawBindingRow},
    normalizer,
    query::{has_gadgets_query, CatalogQuery, CatalogScope},
    sparql::OntologyError,
};

// --- Payloads y Respuestas de la API ---

#[derive(Deserialize)]
pub struct RecommendationsParams {
    /// "creator" limita el catálogo a los gadgets recomendados para
    /// creadores de contenido; cualquier otro valor devuelve el catálogo
    /// completo.
    scope: Option<String>,
}

/// Toda excepción del gateway se convierte en un 500 uniforme
/// `{ "error": ..., "details": ... }` con details no vacío.
type ApiError = (StatusCode, Json<serde_json::Value>);

fn internal_error(message: &str, details: String) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": message, "details": details })),
    )
}

// --- Router ---

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/recommendations", get(recommendations_handler))
        .route("/api/ontology-info", get(ontology_info_handler))
        .route("/api/shutdown", post(shutdown_handler))
        .with_state(app_state)
}

// --- Handlers ---

#[axum::debug_handler]
async fn recommendations_handler(
    State(state): State<AppState>,
    Query(params): Query<RecommendationsParams>,
) -> Result<Json<Vec<GadgetRecord>>, ApiError> {
    let scope = match params.scope.as_deref() {
        Some("creator") => CatalogScope::CreatorRecommended,
        _ => CatalogScope::Full,
    };
    let sparql = CatalogQuery::new(scope).build();

    // La evaluación relee y reparsea la ontología entera: fuera del executor.
    let gateway = state.gateway.clone();
    let rows = tokio::task::spawn_blocking(move || gateway.run_query(&sparql))
        .await
        .map_err(|e| {
            internal_error("La tarea de consulta terminó de forma anómala", e.to_string())
        })?
        .map_err(|e| {
            error!("Error ejecutando la consulta de catálogo: {e}");
            internal_error("No se pudo ejecutar la consulta SPARQL", e.to_string())
        })?;

    let mut raw_rows = Vec::with_capacity(rows.len());
    for bindings in rows {
        let row = RawBindingRow::from_bindings(bindings).map_err(|e| {
            error!("Proyección fuera de contrato: {e}");
            internal_error("La consulta proyectó variables fuera de contrato", e.to_string())
        })?;
        raw_rows.push(row);
    }

    Ok(Json(normalizer::normalize(raw_rows)))
}

#[axum::debug_handler]
async fn ontology_info_handler(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let gateway = state.gateway.clone();
    let (triples, has_gadgets) = tokio::task::spawn_blocking(move || {
        let triples = gateway.triple_count()?;
        let rows = gateway.run_query(&has_gadgets_query())?;
        let has_gadgets = rows
            .first()
            .and_then(|row| row.get("result"))
            .is_some_and(|value| value == "true");
        Ok::<_, OntologyError>((triples, has_gadgets))
    })
    .await
    .map_err(|e| internal_error("La tarea de consulta terminó de forma anómala", e.to_string()))?
    .map_err(|e| {
        error!("Error en el health check de la ontología: {e}");
        internal_error("No se pudo cargar la ontología", e.to_string())
    })?;

    Ok(Json(json!({
        "status": "ok",
        "path": state.config.ontology_path.display().to_string(),
        "triples": triples,
        "hasGadgets": has_gadgets,
    })))
}

#[axum::debug_handler]
async fn shutdown_handler(State(state): State<AppState>) -> impl IntoResponse {
    info!("Petición de apagado recibida.");
    if let Some(sender) = state.shutdown_sender.lock().unwrap().take() {
        let _ = sender.send(());
    }
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::AppConfig, sparql::OntologyGateway};
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    fn state_with_path(path: PathBuf) -> AppState {
        AppState {
            config: AppConfig {
                ontology_path: path.clone(),
                server_addr: "127.0.0.1:0".to_string(),
            },
            gateway: Arc::new(OntologyGateway::new(path)),
            shutdown_sender: Arc::new(Mutex::new(None)),
        }
    }

    #[tokio::test]
    async fn test_missing_ontology_yields_500_with_details() {
        let state = state_with_path(PathBuf::from("/no/existe/kelas.owl"));

        let result = recommendations_handler(
            State(state),
            Query(RecommendationsParams { scope: None }),
        )
        .await;

        let (status, Json(body)) = result.err().expect("debería fallar");
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body["error"].as_str().unwrap().is_empty());
        assert!(!body["details"].as_str().unwrap().is_empty());
    }
}
