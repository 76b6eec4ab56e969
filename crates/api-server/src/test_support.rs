//! Shared fixtures for route tests

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, Response};
use chrono::{TimeZone, Utc};
use serde_json::Value;
use stay_core::booking::FileBookingStore;
use stay_core::notify::{Email, Mailer, Notifier};
use stay_core::payment::{IntentStatus, PaymentGateway, PaymentIntent};
use stay_core::room::{FileRoomStore, HostSnapshot, Room, RoomDetails};
use stay_core::user::{FileUserStore, Role, UserProfile, UserUpdate};
use stay_core::{Error, Result};
use tempfile::TempDir;
use tokio::sync::Mutex;

use crate::auth::{issue_access_token, TOKEN_COOKIE};
use crate::config::Config;
use crate::state::AppState;

/// Payment gateway keeping intents in memory
#[derive(Default)]
pub struct FakeGateway {
    intents: Mutex<HashMap<String, PaymentIntent>>,
}

impl FakeGateway {
    /// Mark an intent as confirmed by the customer
    pub async fn settle(&self, id: &str) {
        if let Some(intent) = self.intents.lock().await.get_mut(id) {
            intent.status = IntentStatus::Succeeded;
        }
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_intent(&self, amount: i64, currency: &str) -> Result<PaymentIntent> {
        let mut intents = self.intents.lock().await;
        let id = format!("pi_{}", intents.len() + 1);
        let intent = PaymentIntent {
            id: id.clone(),
            client_secret: Some(format!("{id}_secret_test")),
            amount,
            currency: currency.to_string(),
            status: IntentStatus::RequiresPaymentMethod,
        };
        intents.insert(id, intent.clone());
        Ok(intent)
    }

    async fn retrieve_intent(&self, id: &str) -> Result<PaymentIntent> {
        self.intents
            .lock()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("No such payment_intent: {id}")))
    }
}

/// Mailer remembering every email it was asked to send
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<Email>>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &Email) -> Result<()> {
        self.sent.lock().await.push(email.clone());
        Ok(())
    }
}

pub struct TestHarness {
    pub state: AppState,
    pub payments: Arc<FakeGateway>,
    pub mailer: Arc<RecordingMailer>,
    _temp_dir: TempDir,
}

pub async fn build_harness() -> TestHarness {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().to_path_buf();

    let users = Arc::new(FileUserStore::new(data_dir.join("users.json")).await.unwrap());
    let rooms = Arc::new(FileRoomStore::new(data_dir.join("rooms.json")).await.unwrap());
    let bookings = Arc::new(
        FileBookingStore::new(data_dir.join("bookings.json"))
            .await
            .unwrap(),
    );
    let payments = Arc::new(FakeGateway::default());
    let mailer = Arc::new(RecordingMailer::default());

    let config = Config {
        data_dir,
        token_secret: "test-secret".to_string(),
        ..Config::default()
    };

    let state = AppState::with_services(
        config,
        users,
        rooms,
        bookings,
        payments.clone(),
        Notifier::new(mailer.clone()),
    );

    TestHarness {
        state,
        payments,
        mailer,
        _temp_dir: temp_dir,
    }
}

pub async fn build_state() -> (AppState, TempDir) {
    let harness = build_harness().await;
    (harness.state, harness._temp_dir)
}

/// `Cookie` header value carrying a fresh token for `email`
pub fn session_cookie(state: &AppState, email: &str) -> String {
    let (token, _) = issue_access_token(&state.config().token_secret, email).unwrap();
    format!("{}={}", TOKEN_COOKIE, token)
}

pub async fn seed_user(state: &AppState, email: &str, role: Role) {
    state
        .users()
        .upsert(UserProfile {
            email: email.to_string(),
            name: Some(email.split('@').next().unwrap_or(email).to_string()),
            image: None,
            status: None,
        })
        .await
        .unwrap();
    state
        .users()
        .update(
            email,
            UserUpdate {
                role: Some(role),
                ..UserUpdate::default()
            },
        )
        .await
        .unwrap();
}

pub fn room_details(category: &str, price: f64) -> RoomDetails {
    RoomDetails {
        title: format!("{category} retreat"),
        category: category.to_string(),
        location: "Lofoten".to_string(),
        price,
        guests: 2,
        bedrooms: 1,
        bathrooms: 1,
        description: "Sea view".to_string(),
        image: None,
        from: Utc.with_ymd_and_hms(2026, 7, 1, 0, 0, 0).unwrap(),
        to: Utc.with_ymd_and_hms(2026, 7, 14, 0, 0, 0).unwrap(),
    }
}

pub async fn seed_room(state: &AppState, host_email: &str, category: &str, price: f64) -> Room {
    let room = Room::new(
        room_details(category, price),
        HostSnapshot {
            name: None,
            email: host_email.to_string(),
            image: None,
        },
    );
    state.rooms().insert(room.clone()).await.unwrap();
    room
}

pub fn json_request(method: &str, uri: &str, cookie: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header("Cookie", cookie);
    }
    match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn read_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
