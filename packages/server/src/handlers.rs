//! HTTP handler functions for the canvass map API.

use actix_web::{HttpResponse, web};
use canvass_map_server_models::{ApiAreasGraph, ApiError, ApiHealth};

use crate::AppState;
use crate::service::{self, GraphError};

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/orgs/{org_id}/areaassignments/{assignment_id}/areasgraph`
///
/// Returns the per-area progress cards of an assignment. Responds `404`
/// with an empty body when the assignment does not exist.
pub async fn areas_graph(
    state: web::Data<AppState>,
    path: web::Path<(i64, String)>,
) -> HttpResponse {
    let (org_id, assignment_id) = path.into_inner();

    match service::load_areas_graph(
        state.store.as_ref(),
        state.people.as_ref(),
        &state.aggregator,
        org_id,
        &assignment_id,
        chrono::Utc::now(),
    )
    .await
    {
        Ok(graph) => HttpResponse::Ok().json(ApiAreasGraph {
            data: graph.into_cards(),
        }),
        Err(GraphError::NotFound(_)) => HttpResponse::NotFound().finish(),
        Err(e) => {
            log::error!("Failed to build areas graph for assignment {assignment_id}: {e}");
            HttpResponse::InternalServerError().json(ApiError::new("Failed to build areas graph"))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, http::StatusCode, test};
    use async_trait::async_trait;
    use canvass_map_canvass_models::{Area, Assignment, Location};
    use canvass_map_database::memory::MemoryStore;
    use canvass_map_database::{CanvassStore, StoreError};
    use canvass_map_graph::AreaVisitAggregator;
    use canvass_map_graph_models::NO_AREA_ID;

    use super::*;
    use crate::service::tests::{ASSIGNMENT_ID, ORG_ID, people, snapshot};

    fn state(store: Arc<dyn CanvassStore>) -> web::Data<AppState> {
        web::Data::new(AppState {
            store,
            people: Arc::new(people()),
            aggregator: AreaVisitAggregator::default(),
        })
    }

    struct FailingStore;

    #[async_trait]
    impl CanvassStore for FailingStore {
        async fn get_assignment(&self, _id: &str) -> Result<Option<Assignment>, StoreError> {
            Err(StoreError::Connection("store offline".to_string()))
        }

        async fn get_area(&self, _id: &str) -> Result<Option<Area>, StoreError> {
            Ok(None)
        }

        async fn list_locations(&self, _org_id: i64) -> Result<Vec<Location>, StoreError> {
            Ok(Vec::new())
        }
    }

    #[actix_web::test]
    async fn health_reports_version() {
        let app = test::init_service(App::new().configure(crate::configure)).await;
        let req = test::TestRequest::get().uri("/api/health").to_request();

        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["healthy"], true);
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[actix_web::test]
    async fn areas_graph_returns_cards() {
        let app = test::init_service(
            App::new()
                .app_data(state(Arc::new(MemoryStore::new(snapshot()))))
                .configure(crate::configure),
        )
        .await;
        let req = test::TestRequest::get()
            .uri(&format!(
                "/api/orgs/{ORG_ID}/areaassignments/{ASSIGNMENT_ID}/areasgraph"
            ))
            .to_request();

        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let cards = body["data"].as_array().unwrap();
        let ids: Vec<&str> = cards
            .iter()
            .map(|c| c["area"]["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["x", "y", NO_AREA_ID]);
        assert_eq!(cards[0]["area"]["title"], "X");
        assert_eq!(cards[0]["data"][0]["householdsVisited"], 1);
        assert_eq!(cards[0]["data"][0]["successfulVisits"], 1);
    }

    #[actix_web::test]
    async fn unknown_assignment_is_404_without_body() {
        let app = test::init_service(
            App::new()
                .app_data(state(Arc::new(MemoryStore::new(snapshot()))))
                .configure(crate::configure),
        )
        .await;
        let req = test::TestRequest::get()
            .uri(&format!("/api/orgs/{ORG_ID}/areaassignments/missing/areasgraph"))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body = test::read_body(resp).await;
        assert!(body.is_empty());
    }

    #[actix_web::test]
    async fn store_failure_is_500() {
        let app = test::init_service(
            App::new()
                .app_data(state(Arc::new(FailingStore)))
                .configure(crate::configure),
        )
        .await;
        let req = test::TestRequest::get()
            .uri(&format!(
                "/api/orgs/{ORG_ID}/areaassignments/{ASSIGNMENT_ID}/areasgraph"
            ))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Failed to build areas graph");
    }
}
