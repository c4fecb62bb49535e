//! Stand-ins for the Comments and Reactions services.

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{Json, Router, extract::Query, http::StatusCode, routing::get};
use engagement::Client;
use serde_json::{Value, json};
use tokio::{net::TcpListener, sync::Barrier};

/// A fake upstream answering a single count endpoint with a canned response.
#[derive(Clone)]
pub struct Stub {
    path: &'static str,
    status: StatusCode,
    body: Value,
    delay: Duration,
    barrier: Option<Arc<Barrier>>,
}

/// A running [`Stub`].
pub struct Running {
    pub url: String,
    seen: Arc<Mutex<Vec<Option<String>>>>,
}

impl Running {
    /// `postId` query of every request received so far.
    pub fn seen(&self) -> Vec<Option<String>> {
        self.seen.lock().unwrap().clone()
    }

    pub fn hits(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

impl Stub {
    pub fn comments(body: Value) -> Self {
        Self::new("/comments/count", body)
    }

    pub fn reactions(body: Value) -> Self {
        Self::new("/reactions/count", body)
    }

    fn new(path: &'static str, body: Value) -> Self {
        Self {
            path,
            status: StatusCode::OK,
            body,
            delay: Duration::ZERO,
            barrier: None,
        }
    }

    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Holds the response until every party of `barrier` has a request in flight.
    pub fn barrier(mut self, barrier: Arc<Barrier>) -> Self {
        self.barrier = Some(barrier);
        self
    }

    pub async fn spawn(self) -> Running {
        let seen = Arc::new(Mutex::new(Vec::new()));

        let Self {
            path,
            status,
            body,
            delay,
            barrier,
        } = self;

        let handler = {
            let seen = Arc::clone(&seen);
            move |Query(query): Query<HashMap<String, String>>| {
                let seen = Arc::clone(&seen);
                let body = body.clone();
                let barrier = barrier.clone();
                async move {
                    seen.lock().unwrap().push(query.get("postId").cloned());
                    if let Some(barrier) = barrier {
                        barrier.wait().await;
                    }
                    tokio::time::sleep(delay).await;
                    (status, Json(body))
                }
            }
        };

        let addr = spawn_router(Router::new().route(path, get(handler))).await;

        Running {
            url: format!("http://{addr}"),
            seen,
        }
    }
}

pub async fn spawn_router(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
    addr
}

/// Base URL of a port nobody listens on.
pub async fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub fn client(comments: &str, reactions: &str) -> Client {
    Client::builder()
        .comments_url(comments)
        .reactions_url(reactions)
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

pub fn comment_count(post: u64, count: u64) -> Value {
    json!({ "postId": post, "count": count })
}

pub fn reaction_summary(post: u64, like: u64, love: u64) -> Value {
    json!({
        "postId": post,
        "total": like + love,
        "breakdown": { "like": like, "love": love, "laugh": 0, "wow": 0, "sad": 0, "angry": 0 }
    })
}
