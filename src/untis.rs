//! WebUntis JSON-RPC client.
//!
//! [`UntisClient::authenticate`] opens an [`UntisSession`]. The session is an
//! explicit value handed to the coverage builder through the [`Timetable`]
//! trait; there is no process wide registry of logged-in users.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::CollaboratorError;
use crate::timetable::{Lesson, Subject, TimeWindow, Timetable};

pub const DEFAULT_CLIENT_NAME: &str = "Refundable";

/// Element types of `getTimetable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    Class = 1,
    Teacher = 2,
}

#[derive(Debug, Serialize)]
struct RpcRequest<'a, P> {
    id: String,
    method: &'a str,
    params: P,
    jsonrpc: &'static str,
}

#[derive(Debug, Deserialize)]
struct RpcResponse<R> {
    #[serde(default)]
    id: Value,
    result: Option<R>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthResult {
    session_id: String,
}

/// Class, teacher or room as listed by the master data calls.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub long_name: String,
}

#[derive(Debug, Deserialize)]
struct ElementRef {
    id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Period {
    date: u32,
    start_time: u32,
    end_time: u32,
    #[serde(default)]
    kl: Vec<ElementRef>,
    #[serde(default)]
    te: Vec<ElementRef>,
    #[serde(default)]
    ro: Vec<ElementRef>,
}

fn response_id(id: &Value) -> String {
    match id {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Unwraps a JSON-RPC response after checking it answers request `expected`.
fn check_response<R: DeserializeOwned>(
    method: &str,
    expected: &str,
    response: RpcResponse<R>,
) -> Result<R, CollaboratorError> {
    let got = response_id(&response.id);
    if got != expected {
        return Err(CollaboratorError::IdMismatch {
            expected: expected.to_string(),
            got,
        });
    }
    if let Some(error) = response.error {
        return Err(CollaboratorError::timetable(
            method,
            format!("{} (code {})", error.message, error.code),
        ));
    }
    match response.result {
        Some(result) => Ok(result),
        // `logout` answers with a null result.
        None => serde_json::from_value(Value::Null)
            .map_err(|_| CollaboratorError::timetable(method, "response carries no result")),
    }
}

async fn rpc<P, R>(
    http: &reqwest::Client,
    url: &str,
    session_id: Option<&str>,
    method: &str,
    params: P,
) -> Result<R, CollaboratorError>
where
    P: Serialize,
    R: DeserializeOwned,
{
    let request = RpcRequest {
        id: Uuid::new_v4().to_string(),
        method,
        params,
        jsonrpc: "2.0",
    };

    let mut builder = http.post(url).json(&request);
    if let Some(session_id) = session_id {
        builder = builder.header(reqwest::header::COOKIE, format!("JSESSIONID={session_id}"));
    }

    let response = builder
        .send()
        .await
        .map_err(|e| CollaboratorError::timetable(method, e))?;
    if !response.status().is_success() {
        return Err(CollaboratorError::timetable(
            method,
            format!("HTTP {}", response.status()),
        ));
    }
    let body: RpcResponse<R> = response
        .json()
        .await
        .map_err(|e| CollaboratorError::timetable(method, e))?;

    check_response(method, &request.id, body)
}

/// `20240304` -> 2024-03-04
pub fn parse_untis_date(value: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt((value / 10_000) as i32, value / 100 % 100, value % 100)
}

/// `745` -> 07:45, `1350` -> 13:50
pub fn parse_untis_time(value: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(value / 100, value % 100, 0)
}

fn untis_date(value: NaiveDate) -> u32 {
    value.year_ce().1 * 10_000 + value.month() * 100 + value.day()
}

pub struct UntisClient {
    http: reqwest::Client,
    url: String,
    client_name: String,
}

impl UntisClient {
    pub fn new(url: impl Into<String>, client_name: impl Into<String>) -> Result<Self, CollaboratorError> {
        let http = reqwest::Client::builder()
            .pool_idle_timeout(Duration::from_secs(900))
            .timeout(Duration::from_secs(30))
            .user_agent("expense-forms/0.3")
            .build()
            .map_err(|e| CollaboratorError::timetable("connect", e))?;

        Ok(Self {
            http,
            url: url.into(),
            client_name: client_name.into(),
        })
    }

    pub async fn authenticate(&self, user: &str, password: &str) -> Result<UntisSession, CollaboratorError> {
        let params = json!({
            "user": user,
            "password": password,
            "client": self.client_name,
        });
        let result: AuthResult = rpc(&self.http, &self.url, None, "authenticate", params).await?;

        log::info!("Opened timetable session for {}", user);
        Ok(UntisSession {
            http: self.http.clone(),
            url: self.url.clone(),
            session_id: result.session_id,
        })
    }
}

/// An authenticated timetable session.
pub struct UntisSession {
    http: reqwest::Client,
    url: String,
    session_id: String,
}

impl UntisSession {
    async fn call<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &str,
        params: P,
    ) -> Result<R, CollaboratorError> {
        if self.session_id.is_empty() {
            return Err(CollaboratorError::NotAuthenticated);
        }
        rpc(&self.http, &self.url, Some(&self.session_id), method, params).await
    }

    pub async fn classes(&self) -> Result<Vec<Element>, CollaboratorError> {
        self.call("getKlassen", json!({})).await
    }

    pub async fn teachers(&self) -> Result<Vec<Element>, CollaboratorError> {
        self.call("getTeachers", json!({})).await
    }

    pub async fn rooms(&self) -> Result<Vec<Element>, CollaboratorError> {
        self.call("getRooms", json!({})).await
    }

    /// Lessons of one element, names resolved and ordered by start time.
    pub async fn timetable(
        &self,
        element_type: ElementType,
        element_id: i64,
        window: &TimeWindow,
    ) -> Result<Vec<Lesson>, CollaboratorError> {
        let params = json!({
            "id": element_id,
            "type": element_type as i64,
            "startDate": untis_date(window.start.date()),
            "endDate": untis_date(window.end.date()),
        });
        let periods: Vec<Period> = self.call("getTimetable", params).await?;

        let classes = names_by_id(self.classes().await?);
        let teachers = names_by_id(self.teachers().await?);
        let rooms = names_by_id(self.rooms().await?);

        let mut lessons = Vec::with_capacity(periods.len());
        for period in periods {
            let (start, end) = period_window(&period)?;
            if end <= window.start || start >= window.end {
                continue;
            }
            let ids = |refs: &[ElementRef]| refs.iter().map(|r| r.id).collect::<Vec<_>>();
            let class_ids = ids(&period.kl);
            let teacher_ids = ids(&period.te);
            let room_ids = ids(&period.ro);
            lessons.push(Lesson {
                start,
                end,
                classes: resolve(&classes, &class_ids),
                teachers: resolve(&teachers, &teacher_ids),
                rooms: resolve(&rooms, &room_ids),
                class_ids,
                teacher_ids,
                room_ids,
            });
        }
        lessons.sort_by_key(|lesson| lesson.start);
        Ok(lessons)
    }

    async fn element_id(&self, subject: &Subject) -> Result<(ElementType, i64), CollaboratorError> {
        let (element_type, elements) = match subject {
            Subject::Class(_) => (ElementType::Class, self.classes().await?),
            Subject::Teacher(_) => (ElementType::Teacher, self.teachers().await?),
        };
        elements
            .iter()
            .find(|element| element.name.eq_ignore_ascii_case(subject.name()))
            .map(|element| (element_type, element.id))
            .ok_or_else(|| CollaboratorError::UnknownSubject(subject.name().to_string()))
    }

    pub async fn logout(self) -> Result<(), CollaboratorError> {
        let _: Value = self.call("logout", json!({})).await?;
        log::info!("Closed timetable session");
        Ok(())
    }
}

#[async_trait]
impl Timetable for UntisSession {
    async fn lessons_for(
        &self,
        subject: &Subject,
        window: &TimeWindow,
    ) -> Result<Vec<Lesson>, CollaboratorError> {
        let (element_type, element_id) = self.element_id(subject).await?;
        self.timetable(element_type, element_id, window).await
    }
}

fn period_window(period: &Period) -> Result<(NaiveDateTime, NaiveDateTime), CollaboratorError> {
    let invalid = || {
        CollaboratorError::timetable(
            "getTimetable",
            format!(
                "invalid lesson time {} {}-{}",
                period.date, period.start_time, period.end_time
            ),
        )
    };
    let date = parse_untis_date(period.date).ok_or_else(invalid)?;
    let start = parse_untis_time(period.start_time).ok_or_else(invalid)?;
    let end = parse_untis_time(period.end_time).ok_or_else(invalid)?;
    Ok((date.and_time(start), date.and_time(end)))
}

fn names_by_id(elements: Vec<Element>) -> HashMap<i64, String> {
    elements
        .into_iter()
        .map(|element| (element.id, element.name))
        .collect()
}

fn resolve(names: &HashMap<i64, String>, ids: &[i64]) -> Vec<String> {
    ids.iter().filter_map(|id| names.get(id).cloned()).collect()
}
