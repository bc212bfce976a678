//! Test doubles shared by the unit tests.

use crate::api::{ApiError, Student, StudentDraft, StudentId, StudentRepository};
use std::sync::Mutex;

pub fn student(id: i64, name: &str, section: &str, marks: f64, grade: &str) -> Student {
    Student {
        id: StudentId::from(id),
        name: name.to_string(),
        section: section.to_string(),
        marks,
        grade: grade.to_string(),
    }
}

fn with_id(draft: &StudentDraft, id: StudentId) -> Student {
    Student {
        id,
        name: draft.name.clone(),
        section: draft.section.clone(),
        marks: draft.marks,
        grade: draft.grade.clone(),
    }
}

/// Repository kept in memory, with an optional injected failure for the next
/// call.
#[derive(Default)]
pub struct InMemoryRepository {
    students: Mutex<Vec<Student>>,
    failure: Mutex<Option<ApiError>>,
}

impl InMemoryRepository {
    pub fn with_students(students: Vec<Student>) -> Self {
        Self {
            students: Mutex::new(students),
            failure: Mutex::new(None),
        }
    }

    /// Make the next call fail with `error`.
    pub fn fail_next(&self, error: ApiError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    pub fn snapshot(&self) -> Vec<Student> {
        self.students.lock().unwrap().clone()
    }

    fn take_failure(&self) -> Result<(), ApiError> {
        match self.failure.lock().unwrap().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl StudentRepository for InMemoryRepository {
    async fn list_all(&self) -> Result<Vec<Student>, ApiError> {
        self.take_failure()?;
        Ok(self.snapshot())
    }

    async fn create(&self, draft: &StudentDraft) -> Result<Student, ApiError> {
        self.take_failure()?;
        let mut students = self.students.lock().unwrap();
        let next = students
            .iter()
            .filter_map(|s| s.id.as_str().parse::<i64>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        let created = with_id(draft, StudentId::from(next));
        students.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: &StudentId, draft: &StudentDraft) -> Result<Student, ApiError> {
        self.take_failure()?;
        let mut students = self.students.lock().unwrap();
        let slot = students
            .iter_mut()
            .find(|s| &s.id == id)
            .ok_or_else(|| ApiError::NotFound(id.clone()))?;
        *slot = with_id(draft, id.clone());
        Ok(slot.clone())
    }

    async fn delete_by_id(&self, id: &StudentId) -> Result<(), ApiError> {
        self.take_failure()?;
        let mut students = self.students.lock().unwrap();
        let before = students.len();
        students.retain(|s| &s.id != id);
        if students.len() == before {
            return Err(ApiError::NotFound(id.clone()));
        }
        Ok(())
    }
}

/// App pointed at a local port nobody listens on, so any request fails fast
/// with a network error.
pub fn test_app() -> crate::app::App {
    let url = reqwest::Url::parse("http://127.0.0.1:1").unwrap();
    crate::app::App::new(crate::api::RestClient::new(url).unwrap())
}
