#![allow(dead_code)]

use std::sync::{Arc, Once};

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use trainings::api::{create_routes, AppState};
use trainings::auth::AuthClient;
use trainings::models::{CreateTraining, GlobalTraining, GlobalTrainingExercise};
use trainings::repository::InMemoryTrainingRepository;

static INIT: Once = Once::new();

/// Initialize test logging
pub fn init_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("trainings=debug")
            .with_test_writer()
            .try_init();
    });
}

pub fn planned_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 10, 5, 15, 0, 0).unwrap()
}

pub fn create_cmd(title: &str) -> CreateTraining {
    CreateTraining {
        title: title.to_string(),
        planned_date: Some(planned_at()),
        total_duration: None,
        total_rest_time: None,
        total_exercise_time: None,
    }
}

/// Template with id 3 and three exercises.
pub fn full_body_template() -> GlobalTraining {
    GlobalTraining {
        id: 3,
        title: "Full body".to_string(),
        description: Some("Three station circuit".to_string()),
        level: "beginner".to_string(),
        exercises: vec![
            GlobalTrainingExercise { exercise_id: 21, position: 0 },
            GlobalTrainingExercise { exercise_id: 22, position: 1 },
            GlobalTrainingExercise { exercise_id: 23, position: 2 },
        ],
    }
}

pub fn memory_repository() -> Arc<InMemoryTrainingRepository> {
    Arc::new(InMemoryTrainingRepository::new().with_global_training(full_body_template()))
}

/// Router backed by the in-memory store, with the auth service replaced by a mock server.
pub struct TestApp {
    pub router: Router,
    pub auth_server: MockServer,
}

impl TestApp {
    pub async fn spawn() -> Self {
        init_test_logging();

        let auth_server = MockServer::start().await;
        let auth_client = AuthClient::new(auth_server.uri()).expect("auth client");
        let state = AppState::new(memory_repository(), auth_client);

        Self {
            router: create_routes(state),
            auth_server,
        }
    }

    /// Registers `token` with the mock auth service and returns the user it resolves to.
    pub async fn login(&self, token: &str) -> Uuid {
        let user_id = Uuid::new_v4();
        Mock::given(method("GET"))
            .and(path("/auth/v1/validate"))
            .and(header("authorization", format!("Bearer {token}").as_str()))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "user_id": user_id.to_string() })),
            )
            .mount(&self.auth_server)
            .await;
        user_id
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json");
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }

        let request = match body {
            Some(body) => builder.body(Body::from(body.to_string())).unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, json)
    }
}
