use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::future::Future;
use thiserror::Error;

/// Server-assigned identifier of a student record.
///
/// JSON backends hand out either numbers or strings, so both are accepted and
/// kept as text. Immutable once assigned.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StudentId(String);

impl StudentId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for StudentId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for StudentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Integer(i64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Integer(n) => Self(n.to_string()),
            Raw::Text(s) => Self(s),
        })
    }
}

/// Marks arrive as a JSON number, or as a numeric string when the record was
/// written by a browser form. `null` and blank read as 0, same as a missing
/// field.
fn deserialize_marks<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(0.0),
        Some(Raw::Number(n)) => Ok(n),
        Some(Raw::Text(s)) if s.trim().is_empty() => Ok(0.0),
        Some(Raw::Text(s)) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("marks is not a number: {s:?}"))),
    }
}

/// A student record as stored by the repository.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Student {
    pub id: StudentId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub section: String,
    #[serde(default, deserialize_with = "deserialize_marks")]
    pub marks: f64,
    #[serde(default)]
    pub grade: String,
}

/// Student fields without the identifier: the body of create and update calls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentDraft {
    pub name: String,
    pub section: String,
    pub marks: f64,
    pub grade: String,
}

/// Failure of a single repository call.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("server error: HTTP {status} - {message}")]
    Server { status: u16, message: String },

    #[error("student {0} not found")]
    NotFound(StudentId),
}

impl ApiError {
    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(e) => format!("Could not reach the server ({})", e),
            ApiError::Server { status, message } if message.is_empty() => {
                format!("Server responded with HTTP {}", status)
            }
            ApiError::Server { status, message } => {
                format!("Server responded with HTTP {}: {}", status, message)
            }
            ApiError::NotFound(id) => format!("Student {} no longer exists on the server", id),
        }
    }
}

/// The four operations the client needs from the student collection.
///
/// Each call is one request/response round trip: no retries, no caching.
pub trait StudentRepository {
    fn list_all(&self) -> impl Future<Output = Result<Vec<Student>, ApiError>> + Send;

    fn create(
        &self,
        draft: &StudentDraft,
    ) -> impl Future<Output = Result<Student, ApiError>> + Send;

    fn update(
        &self,
        id: &StudentId,
        draft: &StudentDraft,
    ) -> impl Future<Output = Result<Student, ApiError>> + Send;

    fn delete_by_id(&self, id: &StudentId) -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// Longest server error body carried into a user-facing message.
const MAX_ERROR_BODY: usize = 200;

/// HTTP implementation of [`StudentRepository`] against a `/students`
/// collection resource.
#[derive(Debug, Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: Url,
}

impl RestClient {
    pub fn new(base_url: Url) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("student-results/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/students` or `{base}/students/{id}`.
    fn endpoint(&self, id: Option<&StudentId>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("students");
            if let Some(id) = id {
                segments.push(id.as_str());
            }
        }
        url
    }

    /// Turn a non-success status into an [`ApiError`]. A 404 on a member URL
    /// means the record is gone.
    async fn check(
        response: reqwest::Response,
        id: Option<&StudentId>,
    ) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if let (StatusCode::NOT_FOUND, Some(id)) = (status, id) {
            return Err(ApiError::NotFound(id.clone()));
        }

        let body = response.text().await.unwrap_or_default();
        let mut message: String = body.trim().chars().take(MAX_ERROR_BODY).collect();
        if message.is_empty() {
            message = status.canonical_reason().unwrap_or_default().to_string();
        }
        Err(ApiError::Server {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status().as_u16();
        response.json::<T>().await.map_err(|e| {
            if e.is_decode() {
                ApiError::Server {
                    status,
                    message: format!("malformed response body ({})", e),
                }
            } else {
                ApiError::Network(e)
            }
        })
    }
}

impl StudentRepository for RestClient {
    async fn list_all(&self) -> Result<Vec<Student>, ApiError> {
        let url = self.endpoint(None);
        tracing::debug!(%url, "listing students");
        let response = self.http.get(url).send().await.map_err(ApiError::Network)?;
        let students: Vec<Student> = Self::decode(Self::check(response, None).await?).await?;
        tracing::info!(count = students.len(), "students listed");
        Ok(students)
    }

    async fn create(&self, draft: &StudentDraft) -> Result<Student, ApiError> {
        let url = self.endpoint(None);
        tracing::debug!(%url, name = %draft.name, "creating student");
        let response = self
            .http
            .post(url)
            .json(draft)
            .send()
            .await
            .map_err(ApiError::Network)?;
        let student: Student = Self::decode(Self::check(response, None).await?).await?;
        tracing::info!(id = %student.id, "student created");
        Ok(student)
    }

    async fn update(&self, id: &StudentId, draft: &StudentDraft) -> Result<Student, ApiError> {
        let url = self.endpoint(Some(id));
        tracing::debug!(%url, "updating student");
        let response = self
            .http
            .put(url)
            .json(draft)
            .send()
            .await
            .map_err(ApiError::Network)?;
        let student: Student = Self::decode(Self::check(response, Some(id)).await?).await?;
        tracing::info!(id = %student.id, "student updated");
        Ok(student)
    }

    async fn delete_by_id(&self, id: &StudentId) -> Result<(), ApiError> {
        let url = self.endpoint(Some(id));
        tracing::debug!(%url, "deleting student");
        let response = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(ApiError::Network)?;
        Self::check(response, Some(id)).await?;
        tracing::info!(%id, "student deleted");
        Ok(())
    }
}
