//! Error record handlers.

use actix_web::{HttpMessage, HttpRequest, HttpResponse, web};
use serde_json::{Map, Value};

use nce_core::DomainError;
use nce_core::domain::{NewErrorRecord, PageRequest};
use nce_shared::dto::{CreatedResponse, ListResponse, MessageResponse};

use crate::config::ListingConfig;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// Raw pagination parameters; unparsable values fall back to defaults.
#[derive(Debug, Default)]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ListQuery {
    /// Take the first `page` and `limit` from a raw query string.
    ///
    /// Repeated keys and undecodable input never fail the request.
    fn from_query_string(query: &str) -> Self {
        let pairs = web::Query::<Vec<(String, String)>>::from_query(query)
            .map(web::Query::into_inner)
            .unwrap_or_default();
        let first = |key: &str| {
            pairs
                .iter()
                .find(|(name, _)| name == key)
                .map(|(_, value)| value.clone())
        };

        Self {
            page: first("page"),
            limit: first("limit"),
        }
    }

    fn to_page_request(&self, listing: &ListingConfig) -> PageRequest {
        let page = parse_positive(self.page.as_deref()).unwrap_or(1);
        let limit = parse_positive(self.limit.as_deref())
            .unwrap_or(listing.default_limit)
            .min(listing.max_limit);
        PageRequest::new(page, limit)
    }
}

/// Parse an integer query value, raising anything below 1 to 1.
fn parse_positive(raw: Option<&str>) -> Option<u64> {
    let value: i64 = raw?.trim().parse().ok()?;
    Some(value.max(1) as u64)
}

/// Interpret a JSON request body as an object; anything else is empty.
///
/// Bodies not declared as JSON (`application/json` or a `+json` type) are
/// not parsed at all.
fn payload_object(req: &HttpRequest, body: &[u8]) -> Map<String, Value> {
    if !is_json_content(req.content_type()) {
        return Map::new();
    }
    match serde_json::from_slice(body) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

fn is_json_content(mime: &str) -> bool {
    let mime = mime.trim().to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

/// GET /api/errors
pub async fn list_errors(state: web::Data<AppState>, req: HttpRequest) -> AppResult<HttpResponse> {
    let request =
        ListQuery::from_query_string(req.query_string()).to_page_request(&state.listing);
    let page = state.errors.list_page(request).await?;

    Ok(HttpResponse::Ok().json(ListResponse {
        items: page.items,
        total: page.total,
        page: request.page,
        limit: request.limit,
    }))
}

/// GET /api/errors/{id}
pub async fn get_error(state: web::Data<AppState>, path: web::Path<i32>) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let record = state
        .errors
        .find_by_id(id)
        .await?
        .ok_or(DomainError::NotFound { id })?;

    Ok(HttpResponse::Ok().json(record))
}

/// POST /api/errors
pub async fn create_error(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let record = NewErrorRecord::from_payload(&payload_object(&req, &body))?;
    let error_id = state.errors.create(record).await?;

    Ok(HttpResponse::Created().json(CreatedResponse {
        message: "Created".to_string(),
        error_id,
    }))
}

/// PUT /api/errors/{id}
pub async fn update_error(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    req: HttpRequest,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let record = NewErrorRecord::from_payload(&payload_object(&req, &body))?;

    if state.errors.replace(id, record).await? == 0 {
        return Err(DomainError::NotFound { id }.into());
    }

    Ok(HttpResponse::Ok().json(MessageResponse::new("Updated")))
}

/// DELETE /api/errors/{id}
pub async fn delete_error(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    if state.errors.delete(id).await? == 0 {
        return Err(DomainError::NotFound { id }.into());
    }

    Ok(HttpResponse::Ok().json(MessageResponse::new("Deleted")))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, http::StatusCode, test, web};
    use async_trait::async_trait;
    use serde_json::{Value, json};

    use nce_core::domain::{ErrorRecord, NewErrorRecord, Page, PageRequest};
    use nce_core::error::RepoError;
    use nce_core::ports::ErrorRecordRepository;
    use nce_infra::database::InMemoryErrorRecordRepository;

    use super::*;
    use crate::handlers::configure_routes;

    fn memory_state() -> AppState {
        AppState::with_repository(
            Arc::new(InMemoryErrorRecordRepository::new()),
            ListingConfig::default(),
        )
    }

    fn valid_body() -> Value {
        json!({
            "error_description": "disk full",
            "category": "infra",
            "customer_overview_type": "internal",
            "error_date": "01-02-2024",
            "error_count": "3"
        })
    }

    /// Repository whose every call fails like an unreachable database.
    struct UnavailableRepository;

    #[async_trait]
    impl ErrorRecordRepository for UnavailableRepository {
        async fn list_page(&self, _: PageRequest) -> Result<Page<ErrorRecord>, RepoError> {
            Err(RepoError::Connection("connection refused".into()))
        }
        async fn find_by_id(&self, _: i32) -> Result<Option<ErrorRecord>, RepoError> {
            Err(RepoError::Connection("connection refused".into()))
        }
        async fn create(&self, _: NewErrorRecord) -> Result<i32, RepoError> {
            Err(RepoError::Query("value too long for type character varying(255)".into()))
        }
        async fn replace(&self, _: i32, _: NewErrorRecord) -> Result<u64, RepoError> {
            Err(RepoError::Connection("connection refused".into()))
        }
        async fn delete(&self, _: i32) -> Result<u64, RepoError> {
            Err(RepoError::Connection("connection refused".into()))
        }
        async fn insert_batch(&self, _: Vec<NewErrorRecord>) -> Result<u64, RepoError> {
            Err(RepoError::Connection("connection refused".into()))
        }
    }

    #[actix_web::test]
    async fn page_parameters_fall_back_and_clamp() {
        let listing = ListingConfig::default();
        let parse = |page: Option<&str>, limit: Option<&str>| {
            ListQuery {
                page: page.map(String::from),
                limit: limit.map(String::from),
            }
            .to_page_request(&listing)
        };

        assert_eq!(parse(None, None), PageRequest::new(1, 20));
        assert_eq!(parse(Some("3"), Some("5")), PageRequest::new(3, 5));
        assert_eq!(parse(Some("abc"), Some("")), PageRequest::new(1, 20));
        assert_eq!(parse(Some("0"), Some("-4")), PageRequest::new(1, 1));
        assert_eq!(parse(Some("2"), Some("5000")), PageRequest::new(2, 100));
    }

    #[actix_web::test]
    async fn query_string_takes_first_value_of_each_key() {
        let query = ListQuery::from_query_string("page=3&page=9&limit=5&limit=7&sort=x");
        assert_eq!(query.page.as_deref(), Some("3"));
        assert_eq!(query.limit.as_deref(), Some("5"));

        let query = ListQuery::from_query_string("page=%FF&limit=");
        assert_eq!(
            query.to_page_request(&ListingConfig::default()),
            PageRequest::new(1, 20)
        );
    }

    #[actix_web::test]
    async fn repeated_or_odd_paging_keys_still_list() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(memory_state()))
                .configure(configure_routes),
        )
        .await;

        for uri in [
            "/api/errors?page=1&page=2",
            "/api/errors?limit=5&limit=abc",
            "/api/errors?page=&limit=1e3",
            "/api/errors?page=%FF",
        ] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK, "{uri}");
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["page"], 1, "{uri}");
            assert_eq!(body["total"], 0, "{uri}");
        }

        let req = test::TestRequest::get()
            .uri("/api/errors?limit=5&limit=abc")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["limit"], 5);
    }

    #[actix_web::test]
    async fn bodies_not_declared_as_json_are_treated_as_empty() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(memory_state()))
                .configure(configure_routes),
        )
        .await;

        for content_type in [None, Some("text/plain")] {
            let mut req = test::TestRequest::post()
                .uri("/api/errors")
                .set_payload(valid_body().to_string());
            if let Some(content_type) = content_type {
                req = req.insert_header(("content-type", content_type));
            }
            let resp = test::call_service(&app, req.to_request()).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{content_type:?}");
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["field"], "error_description");
        }

        let req = test::TestRequest::post()
            .uri("/api/errors")
            .insert_header(("content-type", "application/merge-patch+json; charset=utf-8"))
            .set_payload(valid_body().to_string())
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

        let req = test::TestRequest::get().uri("/api/errors").to_request();
        let listed: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(listed["total"], 1);
    }

    #[actix_web::test]
    async fn health_reports_service() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(memory_state()))
                .configure(configure_routes),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "ok": true, "service": "NCE Error Management API" }));
    }

    #[actix_web::test]
    async fn record_lifecycle_end_to_end() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(memory_state()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/errors")
            .set_json(valid_body())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: Value = test::read_body_json(resp).await;
        assert_eq!(created["message"], "Created");
        let id = created["error_id"].as_i64().unwrap();

        let req = test::TestRequest::get()
            .uri(&format!("/api/errors/{id}"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let record: Value = test::read_body_json(resp).await;
        assert_eq!(record["error_id"], id);
        assert_eq!(record["error_description"], "disk full");
        assert_eq!(record["error_date"], "2024-02-01");
        assert_eq!(record["error_count"], 3);

        let mut bad_count = valid_body();
        bad_count["error_count"] = json!("not-a-number");
        let req = test::TestRequest::put()
            .uri(&format!("/api/errors/{id}"))
            .set_json(bad_count)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "error_count must be an integer");

        let req = test::TestRequest::delete()
            .uri(&format!("/api/errors/{id}"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "message": "Deleted" }));

        let req = test::TestRequest::get()
            .uri(&format!("/api/errors/{id}"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": "Not found" }));
    }

    #[actix_web::test]
    async fn update_replaces_all_fields() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(memory_state()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/errors")
            .set_json(valid_body())
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let id = created["error_id"].as_i64().unwrap();

        let req = test::TestRequest::put()
            .uri(&format!("/api/errors/{id}"))
            .set_json(json!({
                "error_description": " quota exceeded ",
                "category": "billing",
                "customer_overview_type": "external",
                "error_date": "15/06/2024",
                "error_count": 9
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "message": "Updated" }));

        let req = test::TestRequest::get()
            .uri(&format!("/api/errors/{id}"))
            .to_request();
        let record: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            record,
            json!({
                "error_id": id,
                "error_description": "quota exceeded",
                "category": "billing",
                "customer_overview_type": "external",
                "error_date": "2024-06-15",
                "error_count": 9
            })
        );
    }

    #[actix_web::test]
    async fn missing_any_field_is_rejected_on_create_and_update() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(memory_state()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/errors")
            .set_json(valid_body())
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let id = created["error_id"].as_i64().unwrap();

        for field in nce_core::domain::REQUIRED_FIELDS {
            let mut body = valid_body();
            body.as_object_mut().unwrap().remove(field);

            for req in [
                test::TestRequest::post().uri("/api/errors"),
                test::TestRequest::put().uri(&format!("/api/errors/{id}")),
            ] {
                let resp = test::call_service(&app, req.set_json(&body).to_request()).await;
                assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "field {field}");
                let err: Value = test::read_body_json(resp).await;
                assert_eq!(err["error"], "Missing required fields");
                assert_eq!(err["field"], field);
            }
        }
    }

    #[actix_web::test]
    async fn malformed_bodies_and_dates_are_client_errors() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(memory_state()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/errors")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Missing required fields");

        let mut bad_date = valid_body();
        bad_date["error_date"] = json!("2024/02/01");
        let req = test::TestRequest::post()
            .uri("/api/errors")
            .set_json(bad_date)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(
            body["error"],
            "error_date must be one of: YYYY-MM-DD, DD-MM-YYYY, DD/MM/YYYY"
        );
    }

    #[actix_web::test]
    async fn unknown_ids_are_not_found() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(memory_state()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::put()
            .uri("/api/errors/999")
            .set_json(valid_body())
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        for _ in 0..2 {
            let req = test::TestRequest::delete().uri("/api/errors/999").to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
        }

        let req = test::TestRequest::get().uri("/api/errors/abc").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": "Not found" }));
    }

    #[actix_web::test]
    async fn listing_shows_newest_first_with_totals() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(memory_state()))
                .configure(configure_routes),
        )
        .await;

        let mut ids = Vec::new();
        for i in 0..3 {
            let mut body = valid_body();
            body["error_description"] = json!(format!("error {i}"));
            let req = test::TestRequest::post()
                .uri("/api/errors")
                .set_json(body)
                .to_request();
            let created: Value = test::call_and_read_body_json(&app, req).await;
            ids.push(created["error_id"].as_i64().unwrap());
        }

        let req = test::TestRequest::get()
            .uri("/api/errors?page=1&limit=2")
            .to_request();
        let first: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(first["total"], 3);
        assert_eq!(first["page"], 1);
        assert_eq!(first["limit"], 2);
        assert_eq!(first["items"][0]["error_id"], ids[2]);
        assert_eq!(first["items"][1]["error_id"], ids[1]);
        assert_eq!(first["items"][0]["error_date"], "2024-02-01");

        let req = test::TestRequest::get()
            .uri("/api/errors?page=2&limit=2")
            .to_request();
        let second: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(second["items"].as_array().unwrap().len(), 1);
        assert_eq!(second["items"][0]["error_id"], ids[0]);

        let req = test::TestRequest::get().uri("/api/errors").to_request();
        let defaults: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(defaults["page"], 1);
        assert_eq!(defaults["limit"], 20);
    }

    #[actix_web::test]
    async fn storage_failures_are_server_errors() {
        let state = AppState::with_repository(Arc::new(UnavailableRepository), ListingConfig::default());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/errors")
            .set_json(valid_body())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(
            body["error"],
            "database error: value too long for type character varying(255)"
        );

        let req = test::TestRequest::get().uri("/api/errors").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn invalid_input_never_reaches_storage() {
        let state = AppState::with_repository(Arc::new(UnavailableRepository), ListingConfig::default());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure_routes),
        )
        .await;

        let mut body = valid_body();
        body["error_count"] = json!("3.5");
        let req = test::TestRequest::put()
            .uri("/api/errors/1")
            .set_json(body)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }
}
