//! `HttpBackend` against a small in-process server honouring the backend
//! contract. Records are served the way a document store would: `_id` keys
//! and full timestamps as dates.

use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use engine::{
    Amount, Backend, HttpBackend, Store, TransactionDraft, TransactionId, TransactionKind,
    TransactionPayload, TransportError,
};
use serde_json::{Value, json};

#[derive(Clone, Default)]
struct ServerState {
    records: Arc<Mutex<Vec<(String, TransactionPayload)>>>,
    next_id: Arc<Mutex<u64>>,
}

fn render(id: &str, payload: &TransactionPayload) -> Value {
    json!({
        "_id": id,
        "type": payload.kind,
        "amount": payload.amount,
        "category": payload.category,
        "description": payload.description,
        "date": format!("{}T00:00:00.000Z", payload.date),
        "__v": 0
    })
}

async fn list(State(state): State<ServerState>) -> Json<Vec<Value>> {
    let records = state.records.lock().unwrap();
    Json(records.iter().map(|(id, p)| render(id, p)).collect())
}

async fn stats(State(state): State<ServerState>) -> Json<Value> {
    let records = state.records.lock().unwrap();
    let sum = |kind: TransactionKind| -> Amount {
        records
            .iter()
            .filter(|(_, p)| p.kind == kind)
            .map(|(_, p)| p.amount)
            .sum()
    };
    let income = sum(TransactionKind::Income);
    let expenses = sum(TransactionKind::Expense);
    Json(json!({
        "totalIncome": income,
        "totalExpenses": expenses,
        "balance": income - expenses
    }))
}

async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<TransactionPayload>,
) -> (StatusCode, Json<Value>) {
    let id = {
        let mut next = state.next_id.lock().unwrap();
        *next += 1;
        format!("{:024x}", *next)
    };
    let body = render(&id, &payload);
    state.records.lock().unwrap().push((id, payload));
    (StatusCode::CREATED, Json(body))
}

async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<TransactionPayload>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let mut records = state.records.lock().unwrap();
    match records.iter_mut().find(|(rid, _)| *rid == id) {
        Some(slot) => {
            slot.1 = payload;
            Ok(Json(render(&slot.0, &slot.1)))
        }
        None => Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Transaction not found" })),
        )),
    }
}

async fn delete(State(state): State<ServerState>, Path(id): Path<String>) -> StatusCode {
    let mut records = state.records.lock().unwrap();
    let before = records.len();
    records.retain(|(rid, _)| *rid != id);
    if records.len() == before {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    }
}

async fn spawn(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

async fn backend_server() -> HttpBackend {
    let api = Router::new()
        .route("/transactions", get(list).post(create))
        .route("/transactions/{id}", put(update).delete(delete))
        .route("/stats", get(stats))
        .with_state(ServerState::default());
    let addr = spawn(Router::new().nest("/api", api)).await;

    HttpBackend::builder()
        .base_url(&format!("http://{addr}/api"))
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

fn lunch() -> TransactionDraft {
    TransactionDraft {
        kind: TransactionKind::Expense,
        amount: "100".to_string(),
        category: "Food".to_string(),
        description: "Lunch".to_string(),
        date: chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
    }
}

#[tokio::test]
async fn crud_round_trip_through_store() {
    let store = Store::new(backend_server().await);
    store.load().await.unwrap();
    assert!(store.snapshot().await.transactions.is_empty());

    store.create(&lunch()).await.unwrap();
    let snapshot = store.snapshot().await;
    assert_eq!(snapshot.transactions.len(), 1);
    let tx = &snapshot.transactions[0];
    assert_eq!(tx.id.as_str().len(), 24);
    assert_eq!(tx.date, lunch().date);
    assert_eq!(snapshot.stats.total_expenses, Amount::units(100));
    assert_eq!(snapshot.stats.balance, Amount::units(-100));

    let mut draft = TransactionDraft::from(tx);
    draft.amount = "80.25".to_string();
    store.update(&tx.id, &draft).await.unwrap();
    let snapshot = store.snapshot().await;
    assert_eq!(snapshot.transactions[0].amount, Amount::new(8025));
    assert_eq!(snapshot.stats.total_expenses, Amount::new(8025));

    let id = snapshot.transactions[0].id.clone();
    store.remove(&id, &|_: &str| true).await.unwrap();
    let snapshot = store.snapshot().await;
    assert!(snapshot.transactions.is_empty());
    assert_eq!(snapshot.stats.total_expenses, Amount::ZERO);
}

#[tokio::test]
async fn not_found_carries_status_and_message() {
    let backend = backend_server().await;
    let payload = lunch().validate().unwrap();

    let err = backend
        .update_transaction(&TransactionId::new("nope"), &payload)
        .await
        .unwrap_err();
    match err {
        TransportError::Status { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Transaction not found");
        }
        other => panic!("unexpected error: {other}"),
    }

    let err = backend
        .delete_transaction(&TransactionId::new("nope"))
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Status { status: 404, .. }));
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let router = Router::new()
        .route("/transactions", get(|| async { Json(json!({ "oops": true })) }))
        .route(
            "/stats",
            get(|| async { Json(json!({ "totalIncome": 0, "totalExpenses": 0, "balance": 0 })) }),
        );
    let addr = spawn(router).await;
    let backend = HttpBackend::builder()
        .base_url(&format!("http://{addr}"))
        .build()
        .unwrap();

    let err = backend.list_transactions().await.unwrap_err();
    assert!(matches!(err, TransportError::Decode(_)), "got {err}");
    assert!(backend.stats().await.is_ok());
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let backend = HttpBackend::builder()
        .base_url(&format!("http://{addr}/api"))
        .timeout(Duration::from_secs(2))
        .build()
        .unwrap();
    let err = backend.stats().await.unwrap_err();
    assert!(matches!(err, TransportError::Network(_)), "got {err}");
}
