use crate::api::{RestClient, Student};
use crate::controller::{Controller, Request, Screen};
use crate::dispatch::Dispatcher;
use crate::ui::form::{FormAction, StudentForm};
use crossterm::event::KeyEvent;

/// Runtime shell: the controller plus the state that belongs to the views
/// (list cursor, form draft, help toggle).
pub struct App {
    pub controller: Controller,
    pub dispatcher: Dispatcher,
    pub server: String,
    pub should_quit: bool,
    pub show_help: bool,

    // List view state
    pub list_selected: usize,

    // Form view state; present while the form screen is up
    pub form: Option<StudentForm>,
}

impl App {
    pub fn new(client: RestClient) -> Self {
        Self {
            controller: Controller::new(),
            server: client.base_url().to_string(),
            dispatcher: Dispatcher::new(client),
            should_quit: false,
            show_help: false,
            list_selected: 0,
            form: None,
        }
    }

    fn dispatch(&mut self, request: Option<Request>) {
        if let Some(request) = request {
            self.dispatcher.submit(request);
        }
    }

    /// Drop view state that no longer matches the controller.
    fn sync_view_state(&mut self) {
        if !matches!(self.controller.screen(), Screen::Form(_)) {
            self.form = None;
        }
        let len = self.controller.students().len();
        self.list_selected = self.list_selected.min(len.saturating_sub(1));
    }

    /// Apply every outcome that has arrived since the last call.
    pub fn poll_outcomes(&mut self) {
        while let Some(outcome) = self.dispatcher.poll_outcome() {
            self.controller.complete(outcome);
        }
        self.sync_view_state();
    }

    /// The student under the list cursor.
    pub fn selected_row(&self) -> Option<&Student> {
        self.controller.students().get(self.list_selected)
    }

    /// Move selection down in the list.
    pub fn list_next(&mut self) {
        if self.list_selected + 1 < self.controller.students().len() {
            self.list_selected += 1;
        }
    }

    /// Move selection up in the list.
    pub fn list_prev(&mut self) {
        self.list_selected = self.list_selected.saturating_sub(1);
    }

    pub fn list_first(&mut self) {
        self.list_selected = 0;
    }

    pub fn list_last(&mut self) {
        self.list_selected = self.controller.students().len().saturating_sub(1);
    }

    pub fn load(&mut self) {
        let request = self.controller.load();
        self.dispatch(request);
    }

    pub fn open_add(&mut self) {
        self.controller.add();
        if matches!(self.controller.screen(), Screen::Form(_)) {
            self.form = Some(StudentForm::empty());
        }
    }

    pub fn open_edit(&mut self, student: Student) {
        let form = StudentForm::from_student(&student);
        self.controller.edit(student);
        if matches!(self.controller.screen(), Screen::Form(_)) {
            self.form = Some(form);
        }
    }

    pub fn edit_selected(&mut self) {
        if let Some(student) = self.selected_row().cloned() {
            self.open_edit(student);
        }
    }

    pub fn view_selected(&mut self) {
        if let Some(student) = self.selected_row().cloned() {
            self.controller.view(student);
        }
    }

    pub fn delete_selected(&mut self) {
        if let Some(student) = self.selected_row().cloned() {
            self.controller.delete(student);
        }
    }

    pub fn answer_confirmation(&mut self, proceed: bool) {
        let request = self.controller.confirm_delete(proceed);
        self.dispatch(request);
    }

    /// Feed a key press to the form. The form stays open until the save
    /// outcome arrives.
    pub fn handle_form_key(&mut self, key: KeyEvent) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        match form.handle_key(key) {
            Some(FormAction::Submit(draft)) => {
                let request = self.controller.submit(draft);
                self.dispatch(request);
            }
            Some(FormAction::Cancel) => {
                self.controller.cancel();
                self.sync_view_state();
            }
            None => {}
        }
    }

    pub fn back(&mut self) {
        self.controller.back();
    }

    pub fn dismiss_notice(&mut self) {
        self.controller.dismiss_notice();
    }
}
