//! Tests for the API client, its hooks and the endpoint helpers

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;
use crate::auth::{MemoryTokenStore, Session, TokenStore};
use crate::config::BaseUrl;
use crate::models::{
    AttractionQuery, Credentials, ItineraryPlanRequest, LocationInfo, NewItinerary,
    RecommendationRequest, Registration, UserPreferences,
};
use crate::navigation::{Location, Route};

struct Fixture {
    server: MockServer,
    store: Arc<MemoryTokenStore>,
    location: Arc<Location>,
    client: ApiClient,
}

async fn fixture() -> Fixture {
    let server = MockServer::start().await;
    let store = Arc::new(MemoryTokenStore::new());
    let location = Arc::new(Location::new(Route::Dashboard.path()));
    let client = ApiClient::builder()
        .base_url(BaseUrl::new(&server.uri()))
        .token_store(store.clone())
        .navigator(location.clone())
        .build()
        .unwrap();
    Fixture {
        server,
        store,
        location,
        client,
    }
}

fn ok_json() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({}))
}

// ===== Request interception =====

#[tokio::test]
async fn test_attaches_authorization_when_token_exists() {
    let f = fixture().await;
    f.store.set("abc123").unwrap();

    Mock::given(method("GET"))
        .and(path("/ping"))
        .and(header("authorization", "Bearer abc123"))
        .respond_with(ok_json())
        .expect(1)
        .mount(&f.server)
        .await;

    f.client.send(RequestDescriptor::get("/ping")).await.unwrap();
}

#[tokio::test]
async fn test_no_authorization_when_token_missing() {
    let f = fixture().await;

    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ok_json())
        .expect(1)
        .mount(&f.server)
        .await;

    f.client.send(RequestDescriptor::get("/ping")).await.unwrap();

    let requests = f.server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_each_request_reads_token_at_send_time() {
    let f = fixture().await;

    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ok_json())
        .expect(3)
        .mount(&f.server)
        .await;

    f.store.set("first").unwrap();
    f.client.send(RequestDescriptor::get("/ping")).await.unwrap();
    f.store.set("second").unwrap();
    f.client.send(RequestDescriptor::get("/ping")).await.unwrap();
    f.store.remove();
    f.client.send(RequestDescriptor::get("/ping")).await.unwrap();

    let requests = f.server.received_requests().await.unwrap();
    let auth: Vec<Option<String>> = requests
        .iter()
        .map(|r| {
            r.headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        })
        .collect();
    assert_eq!(
        auth,
        vec![
            Some("Bearer first".to_string()),
            Some("Bearer second".to_string()),
            None
        ]
    );
}

#[tokio::test]
async fn test_extra_request_hooks_run_after_bearer() {
    struct Tag;

    impl RequestInterceptor for Tag {
        fn on_request(&self, request: &mut RequestDescriptor) {
            // Sees the bearer header that ran first
            let seen = request.headers().contains_key(reqwest::header::AUTHORIZATION);
            request.headers_mut().insert(
                "x-saw-auth",
                reqwest::header::HeaderValue::from_static(if seen { "yes" } else { "no" }),
            );
        }
    }

    let server = MockServer::start().await;
    let client = ApiClient::builder()
        .base_url(BaseUrl::new(&server.uri()))
        .token_store(Arc::new(MemoryTokenStore::with_token("t")))
        .request_interceptor(Arc::new(Tag))
        .build()
        .unwrap();

    Mock::given(method("GET"))
        .and(path("/ping"))
        .and(header("x-saw-auth", "yes"))
        .respond_with(ok_json())
        .expect(1)
        .mount(&server)
        .await;

    client.send(RequestDescriptor::get("/ping")).await.unwrap();
}

// ===== Response interception =====

#[tokio::test]
async fn test_401_clears_token_and_redirects_to_login() {
    let f = fixture().await;
    f.store.set("to-be-cleared").unwrap();
    let mut events = f.client.subscribe();

    Mock::given(method("GET"))
        .and(path("/api/itineraries/me"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Invalid token"})),
        )
        .mount(&f.server)
        .await;

    let err = f.client.itineraries().get_mine().await.unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized));
    assert_eq!(err.class(), ErrorClass::Unauthenticated);
    assert_eq!(f.store.get(), None);
    assert_eq!(f.location.current(), "/login");
    assert_eq!(events.try_recv().unwrap(), AuthEvent::SessionCleared);
}

#[tokio::test]
async fn test_500_leaves_session_alone() {
    let f = fixture().await;
    f.store.set("still-valid").unwrap();
    let mut events = f.client.subscribe();

    Mock::given(method("POST"))
        .and(path("/api/itineraries/plan"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!({"detail": "Failed to generate itinerary"})),
        )
        .mount(&f.server)
        .await;

    let payload = ItineraryPlanRequest::new("u1", UserPreferences::default());
    let err = f.client.itineraries().plan(&payload).await.unwrap_err();

    match err {
        ApiError::ServerError {
            status,
            ref message,
        } => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(message, "Failed to generate itinerary")
        }
        ref other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.class(), ErrorClass::TransportOrServer);
    assert_eq!(f.store.get().as_deref(), Some("still-valid"));
    assert_eq!(f.location.current(), "/dashboard");
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_403_is_not_treated_as_expiry() {
    let f = fixture().await;
    f.store.set("still-valid").unwrap();

    Mock::given(method("GET"))
        .and(path("/api/itineraries/user/someone-else"))
        .respond_with(ResponseTemplate::new(403).set_body_json(
            json!({"detail": "Not authorised to access these itineraries"}),
        ))
        .mount(&f.server)
        .await;

    let err = f
        .client
        .itineraries()
        .get_by_user("someone-else")
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::AccessDenied(_)));
    assert_eq!(f.store.get().as_deref(), Some("still-valid"));
    assert_eq!(f.location.current(), "/dashboard");
}

#[tokio::test]
async fn test_network_error_leaves_session_alone() {
    // Nothing listens on port 9 (discard) on a test host
    let store = Arc::new(MemoryTokenStore::with_token("still-valid"));
    let location = Arc::new(Location::new(Route::Planner.path()));
    let client = ApiClient::builder()
        .base_url(BaseUrl::new("http://127.0.0.1:9"))
        .token_store(store.clone())
        .navigator(location.clone())
        .build()
        .unwrap();

    let err = client.health().await.unwrap_err();

    assert!(matches!(err, ApiError::NetworkError(_)));
    assert_eq!(err.class(), ErrorClass::TransportOrServer);
    assert_eq!(store.get().as_deref(), Some("still-valid"));
    assert_eq!(location.current(), "/planner");
}

#[tokio::test]
async fn test_extra_response_hooks_see_every_failure() {
    use std::sync::Mutex;

    #[derive(Default)]
    struct Record(Mutex<Vec<Option<u16>>>);

    impl ResponseInterceptor for Record {
        fn on_error(&self, error: &ApiError) {
            self.0
                .lock()
                .unwrap()
                .push(error.status().map(|s| s.as_u16()));
        }
    }

    let server = MockServer::start().await;
    let record = Arc::new(Record::default());
    let client = ApiClient::builder()
        .base_url(BaseUrl::new(&server.uri()))
        .response_interceptor(record.clone())
        .build()
        .unwrap();

    Mock::given(path("/ok"))
        .respond_with(ok_json())
        .mount(&server)
        .await;
    Mock::given(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(path("/expired"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(path("/bad-gateway"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;
    Mock::given(path("/teapot"))
        .respond_with(ResponseTemplate::new(418))
        .mount(&server)
        .await;

    client.send(RequestDescriptor::get("/ok")).await.unwrap();
    for failing in ["/missing", "/expired", "/bad-gateway", "/teapot"] {
        client.send(RequestDescriptor::get(failing)).await.unwrap_err();
    }

    assert_eq!(
        *record.0.lock().unwrap(),
        vec![Some(404), Some(401), Some(502), Some(418)]
    );
}

#[tokio::test]
async fn test_invalid_json_is_invalid_response() {
    let f = fixture().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&f.server)
        .await;

    let err = f.client.health().await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidResponse(_)));
}

// ===== Endpoint helpers =====

#[tokio::test]
async fn test_login_posts_credentials() {
    let f = fixture().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"email": "a@b.c", "password": "p"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "jwt",
            "token_type": "bearer",
            "user": {"id": "u1", "email": "a@b.c", "name": null}
        })))
        .expect(1)
        .mount(&f.server)
        .await;

    let resp = f
        .client
        .auth()
        .login(&Credentials::new("a@b.c", "p"))
        .await
        .unwrap();
    assert_eq!(resp.access_token, "jwt");

    // The helper itself never touches storage
    assert_eq!(f.store.get(), None);
}

#[tokio::test]
async fn test_register_posts_registration() {
    let f = fixture().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .and(body_json(json!({"email": "a@b.c", "password": "p", "name": "Ana"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": "u1", "email": "a@b.c", "name": "Ana"})),
        )
        .expect(1)
        .mount(&f.server)
        .await;

    let user = f
        .client
        .auth()
        .register(&Registration {
            email: "a@b.c".into(),
            password: "p".into(),
            name: Some("Ana".into()),
        })
        .await
        .unwrap();
    assert_eq!(user.id, "u1");
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let f = fixture().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"detail": "email exists"})))
        .mount(&f.server)
        .await;

    let err = f
        .client
        .auth()
        .register(&Registration {
            email: "a@b.c".into(),
            password: "p".into(),
            name: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::BadRequest(ref m) if m == "email exists"));
}

#[tokio::test]
async fn test_get_all_attractions_with_params() {
    let f = fixture().await;

    Mock::given(method("GET"))
        .and(path("/api/attractions"))
        .and(query_param("city", "Queenstown"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "ZQN_GONDOLA", "name": "Skyline Gondola", "city": "Queenstown"}
        ])))
        .expect(1)
        .mount(&f.server)
        .await;

    let items = f
        .client
        .attractions()
        .get_all(&AttractionQuery::city("Queenstown"))
        .await
        .unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "Skyline Gondola");

    let requests = f.server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), Some("city=Queenstown"));
}

#[tokio::test]
async fn test_get_all_attractions_without_params() {
    let f = fixture().await;

    Mock::given(method("GET"))
        .and(path("/api/attractions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&f.server)
        .await;

    let items = f
        .client
        .attractions()
        .get_all(&AttractionQuery::default())
        .await
        .unwrap();
    assert!(items.is_empty());

    let requests = f.server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn test_get_attraction_by_id() {
    let f = fixture().await;

    Mock::given(method("GET"))
        .and(path("/api/attractions/AKL_SKY_TOWER"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": "AKL_SKY_TOWER", "name": "Sky Tower"})),
        )
        .expect(1)
        .mount(&f.server)
        .await;

    let a = f
        .client
        .attractions()
        .get_by_id("AKL_SKY_TOWER")
        .await
        .unwrap();
    assert_eq!(a.name, "Sky Tower");
}

#[tokio::test]
async fn test_create_itinerary() {
    let f = fixture().await;
    f.store.set("abc123").unwrap();

    Mock::given(method("POST"))
        .and(path("/api/itineraries"))
        .and(header("authorization", "Bearer abc123"))
        .and(body_json(json!({"title": "Weekend", "items": [{"id": "AKL_SKY_TOWER"}]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"id": "it-1", "s3_key": "itineraries/u1/it-1.json"}),
        ))
        .expect(1)
        .mount(&f.server)
        .await;

    let created = f
        .client
        .itineraries()
        .create(&NewItinerary {
            title: "Weekend".into(),
            items: vec![json!({"id": "AKL_SKY_TOWER"})],
            metadata: None,
        })
        .await
        .unwrap();
    assert_eq!(created.id, "it-1");
}

#[tokio::test]
async fn test_list_itineraries() {
    let f = fixture().await;

    Mock::given(method("GET"))
        .and(path("/api/itineraries/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "it-1", "owner": "u1", "title": "Weekend", "items": []}
        ])))
        .expect(1)
        .mount(&f.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/itineraries/user/u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&f.server)
        .await;

    let mine = f.client.itineraries().get_mine().await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].display_title(), "Weekend");

    let theirs = f.client.itineraries().get_by_user("u1").await.unwrap();
    assert!(theirs.is_empty());
}

#[tokio::test]
async fn test_delete_itineraries() {
    let f = fixture().await;

    Mock::given(method("DELETE"))
        .and(path("/api/itineraries/it-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "deleted", "itinerary_id": "it-1"})),
        )
        .expect(1)
        .mount(&f.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/itineraries"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "deleted", "count": 3})),
        )
        .expect(1)
        .mount(&f.server)
        .await;

    let removed = f.client.itineraries().remove("it-1").await.unwrap();
    assert_eq!(removed.itinerary_id, "it-1");

    let cleared = f.client.itineraries().clear().await.unwrap();
    assert_eq!(cleared.count, 3);
}

#[tokio::test]
async fn test_plan_posts_payload() {
    let f = fixture().await;

    Mock::given(method("POST"))
        .and(path("/api/itineraries/plan"))
        .and(body_json(json!({"user_id": "u1", "preferences": {"duration": 2}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "itinerary_id": "it-9",
            "days": [],
            "summary": {"total_attractions": 0},
            "weather": null,
            "recommendations": []
        })))
        .expect(1)
        .mount(&f.server)
        .await;

    let payload = ItineraryPlanRequest::new(
        "u1",
        UserPreferences {
            duration: Some(2),
            ..UserPreferences::default()
        },
    );
    let plan = f.client.itineraries().plan(&payload).await.unwrap();
    assert_eq!(plan.itinerary_id, "it-9");
}

#[tokio::test]
async fn test_recommendations_post_preferences() {
    let f = fixture().await;
    f.store.set("abc123").unwrap();

    Mock::given(method("POST"))
        .and(path("/api/recommendations/"))
        .and(header("authorization", "Bearer abc123"))
        .and(body_json(json!({
            "user_id": "u1",
            "preferences": {"activity_types": ["scenic"], "max_travel_distance": 300.0},
            "current_location": {"lat": -41.3, "lng": 174.8},
            "top_k": 2
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "recommendations": [
                {"attraction_id": "001", "name": "Zealandia", "score": 0.9},
                {"attraction_id": "002", "name": "Te Papa", "score": 0.7}
            ],
            "total_count": 2,
            "algorithm_used": "hybrid",
            "context": {}
        })))
        .expect(1)
        .mount(&f.server)
        .await;

    let mut request = RecommendationRequest::new(
        "u1",
        UserPreferences {
            activity_types: Some(vec!["scenic".into()]),
            max_travel_distance: Some(300.0),
            ..UserPreferences::default()
        },
    );
    request.current_location = Some(LocationInfo {
        lat: -41.3,
        lng: 174.8,
        address: None,
    });
    request.top_k = Some(2);

    let response = f.client.recommendations().get(&request).await.unwrap();
    assert_eq!(response.total_count, 2);
    assert_eq!(response.names().collect::<Vec<_>>(), vec!["Zealandia", "Te Papa"]);
}

#[tokio::test]
async fn test_recommendations_failure_keeps_status() {
    let f = fixture().await;

    Mock::given(method("POST"))
        .and(path("/api/recommendations/"))
        .respond_with(ResponseTemplate::new(500).set_body_json(
            json!({"detail": "Failed to initialize recommendation service"}),
        ))
        .mount(&f.server)
        .await;

    let request = RecommendationRequest::new("u1", UserPreferences::default());
    let err = f.client.recommendations().get(&request).await.unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(500));
    assert!(err.to_string().contains("Failed to initialize recommendation service"));
}

#[tokio::test]
async fn test_health() {
    let f = fixture().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "healthy"})))
        .expect(1)
        .mount(&f.server)
        .await;

    assert!(f.client.health().await.unwrap().is_healthy());
}

#[tokio::test]
async fn test_path_segments_are_encoded() {
    let f = fixture().await;

    Mock::given(method("DELETE"))
        .and(path("/api/itineraries/a%2Fb"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "deleted", "itinerary_id": "a/b"})),
        )
        .expect(1)
        .mount(&f.server)
        .await;

    f.client.itineraries().remove("a/b").await.unwrap();
}

// ===== Session =====

#[tokio::test]
async fn test_session_login_persists_token_for_later_calls() {
    let f = fixture().await;
    let mut events = f.client.subscribe();

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "jwt-from-login",
            "token_type": "bearer",
            "user": {"id": "u1", "email": "a@b.c"}
        })))
        .mount(&f.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/itineraries/me"))
        .and(header("authorization", "Bearer jwt-from-login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&f.server)
        .await;

    let mut session = Session::new(f.client.clone());
    assert!(!session.is_authenticated());

    session
        .login(&Credentials::new("a@b.c", "p"))
        .await
        .unwrap();
    assert!(session.is_authenticated());
    assert_eq!(session.user().map(|u| u.id.as_str()), Some("u1"));
    assert_eq!(f.store.get().as_deref(), Some("jwt-from-login"));
    assert_eq!(events.try_recv().unwrap(), AuthEvent::SignedIn);

    session.client().itineraries().get_mine().await.unwrap();

    session.logout();
    assert!(!session.is_authenticated());
    assert!(session.user().is_none());
    assert_eq!(events.try_recv().unwrap(), AuthEvent::SignedOut);
}

#[tokio::test]
async fn test_session_login_rejected() {
    let f = fixture().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "invalid credentials"})),
        )
        .mount(&f.server)
        .await;

    let mut session = Session::new(f.client.clone());
    let err = session
        .login(&Credentials::new("a@b.c", "wrong"))
        .await
        .unwrap_err();

    let api_err = err.downcast_ref::<ApiError>().unwrap();
    assert!(api_err.is_unauthenticated());
    assert!(!session.is_authenticated());
    assert_eq!(f.location.current(), Route::Login.path());
}
