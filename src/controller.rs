//! Application state and the screen transition table.
//!
//! The controller never talks to the network itself. Transitions that need
//! the repository return a [`Request`]; whoever runs it hands the matching
//! [`Outcome`] back through [`Controller::complete`].

use crate::api::{ApiError, Student, StudentDraft, StudentId, StudentRepository};
use std::collections::VecDeque;

/// Which kind of form is open.
#[derive(Debug, Clone, PartialEq)]
pub enum FormMode {
    Add,
    Edit(Student),
}

/// The active screen. Exactly one at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    List,
    Form(FormMode),
    Details(Student),
}

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// A blocking message that stays up until the user dismisses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

/// Repository work a transition asks for.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    ListAll,
    Create(StudentDraft),
    Update(StudentId, StudentDraft),
    Delete(StudentId),
}

/// Result of running a [`Request`].
#[derive(Debug)]
pub enum Outcome {
    Loaded(Result<Vec<Student>, ApiError>),
    Created(Result<Student, ApiError>),
    Updated(Result<Student, ApiError>),
    Deleted(Result<StudentId, ApiError>),
}

/// Run one request against a repository.
pub async fn perform<R: StudentRepository + Sync>(repo: &R, request: Request) -> Outcome {
    match request {
        Request::ListAll => Outcome::Loaded(repo.list_all().await),
        Request::Create(draft) => Outcome::Created(repo.create(&draft).await),
        Request::Update(id, draft) => Outcome::Updated(repo.update(&id, &draft).await),
        Request::Delete(id) => Outcome::Deleted(repo.delete_by_id(&id).await.map(|()| id)),
    }
}

const RELOAD_HINT: &str = "Press L to load students and refresh the list.";

/// Owns all mutable application state.
///
/// `students` is a snapshot: create, update and delete never touch it, only a
/// successful load replaces it.
#[derive(Debug)]
pub struct Controller {
    students: Vec<Student>,
    screen: Screen,
    confirmation: Option<Student>,
    notices: VecDeque<Notice>,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller {
    pub fn new() -> Self {
        Self {
            students: Vec::new(),
            screen: Screen::List,
            confirmation: None,
            notices: VecDeque::new(),
        }
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// The student being edited or viewed.
    pub fn selected_student(&self) -> Option<&Student> {
        match &self.screen {
            Screen::Form(FormMode::Edit(student)) | Screen::Details(student) => Some(student),
            _ => None,
        }
    }

    /// Student awaiting delete confirmation.
    pub fn confirmation(&self) -> Option<&Student> {
        self.confirmation.as_ref()
    }

    /// The notice currently shown, if any.
    pub fn notice(&self) -> Option<&Notice> {
        self.notices.front()
    }

    pub fn dismiss_notice(&mut self) {
        self.notices.pop_front();
    }

    fn at_list(&self, action: &str) -> bool {
        let ok = self.screen == Screen::List && self.confirmation.is_none();
        if !ok {
            tracing::debug!(action, screen = ?self.screen, "ignoring action outside the list screen");
        }
        ok
    }

    pub fn load(&mut self) -> Option<Request> {
        self.at_list("load").then_some(Request::ListAll)
    }

    pub fn add(&mut self) {
        if self.at_list("add") {
            self.screen = Screen::Form(FormMode::Add);
        }
    }

    pub fn edit(&mut self, student: Student) {
        if self.at_list("edit") {
            self.screen = Screen::Form(FormMode::Edit(student));
        }
    }

    pub fn view(&mut self, student: Student) {
        if self.at_list("view") {
            self.screen = Screen::Details(student);
        }
    }

    /// Ask for confirmation before deleting `student`.
    pub fn delete(&mut self, student: Student) {
        if self.at_list("delete") {
            self.confirmation = Some(student);
        }
    }

    /// Answer the pending confirmation. Declining changes nothing else.
    pub fn confirm_delete(&mut self, proceed: bool) -> Option<Request> {
        let student = self.confirmation.take()?;
        if proceed {
            tracing::info!(id = %student.id, "delete confirmed");
            Some(Request::Delete(student.id))
        } else {
            tracing::debug!(id = %student.id, "delete declined");
            None
        }
    }

    /// Leave the form without saving.
    pub fn cancel(&mut self) {
        if matches!(self.screen, Screen::Form(_)) {
            self.screen = Screen::List;
        }
    }

    /// Leave the details screen.
    pub fn back(&mut self) {
        if matches!(self.screen, Screen::Details(_)) {
            self.screen = Screen::List;
        }
    }

    /// Save the form. The screen stays on the form until the outcome arrives.
    pub fn submit(&mut self, draft: StudentDraft) -> Option<Request> {
        match &self.screen {
            Screen::Form(FormMode::Add) => Some(Request::Create(draft)),
            Screen::Form(FormMode::Edit(student)) => {
                Some(Request::Update(student.id.clone(), draft))
            }
            _ => {
                tracing::debug!(screen = ?self.screen, "ignoring submit outside the form");
                None
            }
        }
    }

    /// Apply the result of a request.
    ///
    /// Every outcome settles on the list screen and queues a notice. Only a
    /// successful load changes `students`.
    pub fn complete(&mut self, outcome: Outcome) {
        let notice = match outcome {
            Outcome::Loaded(Ok(students)) => {
                tracing::info!(count = students.len(), "students loaded");
                self.students = students;
                Notice::info("Students loaded.")
            }
            Outcome::Loaded(Err(e)) => {
                tracing::error!(error = %e, "loading students failed");
                Notice::error(format!("Error loading students: {}", e.user_message()))
            }
            Outcome::Created(Ok(student)) => {
                tracing::info!(id = %student.id, "student added");
                Notice::info(format!("Student added successfully. {}", RELOAD_HINT))
            }
            Outcome::Updated(Ok(student)) => {
                tracing::info!(id = %student.id, "student updated");
                Notice::info(format!("Student updated successfully. {}", RELOAD_HINT))
            }
            Outcome::Created(Err(e)) | Outcome::Updated(Err(e)) => {
                tracing::error!(error = %e, "saving student failed");
                Notice::error(format!("Save failed: {}", e.user_message()))
            }
            Outcome::Deleted(Ok(id)) => {
                tracing::info!(%id, "student deleted");
                Notice::info(format!("Student deleted. {}", RELOAD_HINT))
            }
            Outcome::Deleted(Err(e)) => {
                tracing::error!(error = %e, "deleting student failed");
                Notice::error(format!("Delete failed: {}", e.user_message()))
            }
        };
        self.screen = Screen::List;
        self.notices.push_back(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{InMemoryRepository, student};
    use proptest::prelude::*;

    fn draft(name: &str, section: &str, marks: f64, grade: &str) -> StudentDraft {
        StudentDraft {
            name: name.to_string(),
            section: section.to_string(),
            marks,
            grade: grade.to_string(),
        }
    }

    /// Run a transition's request (if any) to completion.
    async fn run(controller: &mut Controller, repo: &InMemoryRepository, request: Option<Request>) {
        if let Some(request) = request {
            let outcome = perform(repo, request).await;
            controller.complete(outcome);
        }
    }

    async fn load(controller: &mut Controller, repo: &InMemoryRepository) {
        let request = controller.load();
        run(controller, repo, request).await;
    }

    #[test]
    fn test_initial_state() {
        let controller = Controller::new();
        assert!(controller.students().is_empty());
        assert_eq!(controller.screen(), &Screen::List);
        assert!(controller.selected_student().is_none());
        assert!(controller.notice().is_none());
    }

    #[tokio::test]
    async fn test_load_replaces_students() {
        let repo = InMemoryRepository::with_students(vec![student(1, "Ann", "A", 90.0, "A")]);
        let mut controller = Controller::new();

        let request = controller.load();
        assert_eq!(request, Some(Request::ListAll));
        run(&mut controller, &repo, request).await;

        assert_eq!(controller.students(), &[student(1, "Ann", "A", 90.0, "A")]);
        assert_eq!(controller.screen(), &Screen::List);
        assert_eq!(controller.notice(), Some(&Notice::info("Students loaded.")));
    }

    #[tokio::test]
    async fn test_load_failure_keeps_previous_snapshot() {
        let repo = InMemoryRepository::with_students(vec![student(1, "Ann", "A", 90.0, "A")]);
        let mut controller = Controller::new();
        load(&mut controller, &repo).await;
        controller.dismiss_notice();

        repo.fail_next(ApiError::Server {
            status: 503,
            message: "unavailable".to_string(),
        });
        load(&mut controller, &repo).await;

        assert_eq!(controller.students().len(), 1);
        assert_eq!(controller.screen(), &Screen::List);
        let notice = controller.notice().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert!(notice.message.starts_with("Error loading students:"));
    }

    #[test]
    fn test_edit_then_cancel() {
        let mut controller = Controller::new();
        controller.edit(student(1, "Ann", "A", 90.0, "A"));

        assert!(matches!(controller.screen(), Screen::Form(FormMode::Edit(_))));
        assert_eq!(controller.selected_student().unwrap().id, StudentId::from(1));

        controller.cancel();
        assert_eq!(controller.screen(), &Screen::List);
        assert!(controller.selected_student().is_none());
    }

    #[test]
    fn test_add_has_no_selection() {
        let mut controller = Controller::new();
        controller.add();
        assert_eq!(controller.screen(), &Screen::Form(FormMode::Add));
        assert!(controller.selected_student().is_none());
    }

    #[test]
    fn test_view_then_back() {
        let mut controller = Controller::new();
        controller.view(student(2, "Bo", "B", 70.0, "B"));
        assert_eq!(controller.selected_student().unwrap().name, "Bo");

        controller.back();
        assert_eq!(controller.screen(), &Screen::List);
        assert!(controller.selected_student().is_none());
    }

    #[test]
    fn test_list_actions_ignored_elsewhere() {
        let mut controller = Controller::new();
        controller.view(student(2, "Bo", "B", 70.0, "B"));

        controller.add();
        controller.edit(student(1, "Ann", "A", 90.0, "A"));
        controller.delete(student(1, "Ann", "A", 90.0, "A"));
        assert!(controller.load().is_none());
        assert!(controller.submit(draft("x", "y", 1.0, "z")).is_none());

        assert_eq!(controller.selected_student().unwrap().name, "Bo");
        assert!(controller.confirmation().is_none());
    }

    #[tokio::test]
    async fn test_add_failure_returns_to_list() {
        let repo = InMemoryRepository::default();
        let mut controller = Controller::new();
        controller.add();

        repo.fail_next(ApiError::Server {
            status: 500,
            message: String::new(),
        });
        let request = controller.submit(draft("Bo", "B", 70.0, "B"));
        assert!(matches!(request, Some(Request::Create(_))));
        run(&mut controller, &repo, request).await;

        assert_eq!(controller.screen(), &Screen::List);
        assert!(controller.selected_student().is_none());
        assert!(controller.students().is_empty());
        assert_eq!(controller.notice().unwrap().kind, NoticeKind::Error);
        assert!(controller.notice().unwrap().message.starts_with("Save failed:"));
    }

    #[tokio::test]
    async fn test_add_success_does_not_refresh() {
        let repo = InMemoryRepository::default();
        let mut controller = Controller::new();
        controller.add();

        let request = controller.submit(draft("Bo", "B", 70.0, "B"));
        assert_eq!(controller.screen(), &Screen::Form(FormMode::Add));
        run(&mut controller, &repo, request).await;

        assert_eq!(controller.screen(), &Screen::List);
        assert!(controller.students().is_empty());
        assert_eq!(repo.snapshot().len(), 1);
        assert!(controller.notice().unwrap().message.contains("Press L"));
    }

    #[tokio::test]
    async fn test_edit_submit_targets_selected_id() {
        let ann = student(1, "Ann", "A", 90.0, "A");
        let repo = InMemoryRepository::with_students(vec![ann.clone()]);
        let mut controller = Controller::new();
        load(&mut controller, &repo).await;
        controller.dismiss_notice();

        controller.edit(ann.clone());
        let request = controller.submit(draft("Ann", "A", 95.0, "A+"));
        assert_eq!(
            request,
            Some(Request::Update(StudentId::from(1), draft("Ann", "A", 95.0, "A+")))
        );
        run(&mut controller, &repo, request).await;

        assert_eq!(controller.students(), &[ann]);
        assert_eq!(repo.snapshot()[0].marks, 95.0);
        assert_eq!(controller.screen(), &Screen::List);
    }

    #[tokio::test]
    async fn test_edit_of_vanished_record_reports_error() {
        let repo = InMemoryRepository::default();
        let mut controller = Controller::new();
        controller.edit(student(4, "Di", "D", 40.0, "D"));

        let request = controller.submit(draft("Di", "D", 45.0, "D"));
        run(&mut controller, &repo, request).await;

        assert_eq!(controller.screen(), &Screen::List);
        assert!(controller.notice().unwrap().message.contains("Student 4"));
    }

    #[tokio::test]
    async fn test_delete_confirmed_keeps_snapshot() {
        let five = student(5, "Eve", "E", 55.0, "C");
        let repo = InMemoryRepository::with_students(vec![five.clone()]);
        let mut controller = Controller::new();
        load(&mut controller, &repo).await;
        controller.dismiss_notice();

        controller.delete(five.clone());
        assert_eq!(controller.confirmation(), Some(&five));
        let request = controller.confirm_delete(true);
        assert_eq!(request, Some(Request::Delete(StudentId::from(5))));
        run(&mut controller, &repo, request).await;

        assert!(repo.snapshot().is_empty());
        assert_eq!(controller.students(), &[five]);
        assert!(controller.confirmation().is_none());
        assert_eq!(
            controller.notice().unwrap().message,
            format!("Student deleted. {}", RELOAD_HINT)
        );

        controller.dismiss_notice();
        load(&mut controller, &repo).await;
        assert!(controller.students().is_empty());
    }

    #[tokio::test]
    async fn test_delete_failure_reports_error() {
        let repo = InMemoryRepository::default();
        let mut controller = Controller::new();
        controller.delete(student(8, "Hal", "H", 10.0, "F"));

        let request = controller.confirm_delete(true);
        run(&mut controller, &repo, request).await;

        assert_eq!(controller.screen(), &Screen::List);
        assert!(controller.notice().unwrap().message.starts_with("Delete failed:"));
    }

    #[test]
    fn test_confirmation_blocks_other_list_actions() {
        let mut controller = Controller::new();
        controller.delete(student(5, "Eve", "E", 55.0, "C"));

        assert!(controller.load().is_none());
        controller.add();
        assert_eq!(controller.screen(), &Screen::List);
    }

    #[test]
    fn test_notices_queue_in_order() {
        let mut controller = Controller::new();
        controller.complete(Outcome::Deleted(Ok(StudentId::from(1))));
        controller.complete(Outcome::Loaded(Ok(Vec::new())));

        assert!(controller.notice().unwrap().message.starts_with("Student deleted."));
        controller.dismiss_notice();
        assert_eq!(controller.notice().unwrap().message, "Students loaded.");
        controller.dismiss_notice();
        assert!(controller.notice().is_none());
    }

    #[test]
    fn test_late_outcome_returns_to_list() {
        let mut controller = Controller::new();
        controller.view(student(2, "Bo", "B", 70.0, "B"));

        controller.complete(Outcome::Created(Ok(student(3, "Cy", "C", 60.0, "C"))));

        assert_eq!(controller.screen(), &Screen::List);
        assert!(controller.students().is_empty());
    }

    #[test]
    fn test_stale_load_arriving_last_wins() {
        let first = vec![student(1, "Ann", "A", 90.0, "A")];
        let second = vec![
            student(1, "Ann", "A", 90.0, "A"),
            student(2, "Bo", "B", 70.0, "B"),
        ];
        let mut controller = Controller::new();

        assert_eq!(controller.load(), Some(Request::ListAll));
        assert_eq!(controller.load(), Some(Request::ListAll));

        controller.complete(Outcome::Loaded(Ok(second)));
        controller.complete(Outcome::Loaded(Ok(first.clone())));

        assert_eq!(controller.students(), first.as_slice());
        assert_eq!(controller.screen(), &Screen::List);
        controller.dismiss_notice();
        assert_eq!(controller.notice(), Some(&Notice::info("Students loaded.")));
    }

    fn arb_student() -> impl Strategy<Value = Student> {
        (0i64..1000, "[A-Za-z]{1,8}", "[A-D]", 0.0f64..100.0, "[A-F]")
            .prop_map(|(id, name, section, marks, grade)| {
                student(id, &name, &section, marks, &grade)
            })
    }

    proptest! {
        #[test]
        fn prop_declined_delete_changes_nothing(
            students in prop::collection::vec(arb_student(), 0..8),
            target in arb_student(),
        ) {
            let mut controller = Controller::new();
            controller.complete(Outcome::Loaded(Ok(students.clone())));
            controller.dismiss_notice();

            controller.delete(target);
            let request = controller.confirm_delete(false);

            prop_assert!(request.is_none());
            prop_assert_eq!(controller.students(), students.as_slice());
            prop_assert_eq!(controller.screen(), &Screen::List);
            prop_assert!(controller.notice().is_none());
            prop_assert!(controller.confirmation().is_none());
        }

        #[test]
        fn prop_mutations_never_touch_snapshot(
            students in prop::collection::vec(arb_student(), 0..8),
            saved in arb_student(),
            succeed in any::<bool>(),
        ) {
            let mut controller = Controller::new();
            controller.complete(Outcome::Loaded(Ok(students.clone())));

            let result = |s: Student| if succeed {
                Ok(s)
            } else {
                Err(ApiError::Server { status: 500, message: String::new() })
            };

            controller.add();
            controller.complete(Outcome::Created(result(saved.clone())));
            prop_assert_eq!(controller.screen(), &Screen::List);
            prop_assert!(controller.selected_student().is_none());

            controller.edit(saved.clone());
            controller.complete(Outcome::Updated(result(saved.clone())));
            prop_assert!(controller.selected_student().is_none());

            controller.complete(Outcome::Deleted(result(saved.clone()).map(|s| s.id)));
            prop_assert_eq!(controller.students(), students.as_slice());
        }

        #[test]
        fn prop_each_load_mirrors_repository(
            collections in prop::collection::vec(prop::collection::vec(arb_student(), 0..6), 1..5),
        ) {
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let mut controller = Controller::new();
            for collection in collections {
                let repo = InMemoryRepository::with_students(collection.clone());
                runtime.block_on(load(&mut controller, &repo));
                controller.dismiss_notice();
                prop_assert_eq!(controller.students(), collection.as_slice());
            }
        }
    }
}
