// Shared test helpers

#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use f1term::meetings_api::{FetchError, MeetingsSource};
use std::sync::Mutex;

pub const PRESENT: &str = r#"[{"id": 1, "name": "Test Meeting"}]"#;
pub const EMPTY: &str = "[]";
pub const INVALID: &str = "{invalid json";

/// What the fake source does for one year.
#[derive(Debug, Clone, Copy)]
pub enum Reply {
    Body(&'static str),
    Transport,
    BodyRead,
    /// Never completes.
    Hang,
}

/// Fake API: answers each year from a closure and records every year requested.
pub struct ScriptedSource {
    script: Box<dyn Fn(i32) -> Reply + Send + Sync>,
    requested: Mutex<Vec<i32>>,
}

impl ScriptedSource {
    pub fn new<F>(script: F) -> Self
    where
        F: Fn(i32) -> Reply + Send + Sync + 'static,
    {
        Self {
            script: Box::new(script),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn always(body: &'static str) -> Self {
        Self::new(move |_| Reply::Body(body))
    }

    pub fn requested(&self) -> Vec<i32> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl MeetingsSource for ScriptedSource {
    async fn fetch_year(&self, year: i32) -> Result<Bytes, FetchError> {
        self.requested.lock().unwrap().push(year);
        match (self.script)(year) {
            Reply::Body(body) => Ok(Bytes::from_static(body.as_bytes())),
            Reply::Transport => Err(FetchError::Transport("network error simulated".into())),
            Reply::BodyRead => Err(FetchError::BodyRead("stream reset".into())),
            Reply::Hang => std::future::pending().await,
        }
    }
}

/// Descending years from `start` to `end`, both inclusive.
pub fn years_desc(start: i32, end: i32) -> Vec<i32> {
    (end..=start).rev().collect()
}
