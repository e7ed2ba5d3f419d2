//! Create / edit / confirm-delete dialogs
//!
//! At most one dialog is visible at a time. Forms only hold raw input;
//! validation happens when they are turned into request payloads.

use issuedesk_core::{Issue, IssueStore, IssueUpdate, NewIssue, Priority, Status};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    Priority,
    Status,
}

const CREATE_FIELDS: &[FormField] = &[
    FormField::Title,
    FormField::Description,
    FormField::Priority,
];
const EDIT_FIELDS: &[FormField] = &[
    FormField::Title,
    FormField::Description,
    FormField::Priority,
    FormField::Status,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueForm {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: Status,
    pub focus: FormField,
    fields: &'static [FormField],
}

impl IssueForm {
    /// Blank create form, title focused
    pub fn create() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            priority: Priority::default(),
            status: Status::default(),
            focus: FormField::Title,
            fields: CREATE_FIELDS,
        }
    }

    /// Edit form pre-filled from an issue, title focused
    pub fn edit(issue: &Issue) -> Self {
        Self {
            title: issue.title.clone(),
            description: issue.description.clone(),
            priority: issue.priority,
            status: issue.status,
            focus: FormField::Title,
            fields: EDIT_FIELDS,
        }
    }

    pub fn fields(&self) -> &'static [FormField] {
        self.fields
    }

    pub fn focus_next(&mut self) {
        self.focus = self.step(1);
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.step(self.fields.len() - 1);
    }

    fn step(&self, by: usize) -> FormField {
        let index = self
            .fields
            .iter()
            .position(|f| *f == self.focus)
            .unwrap_or(0);
        self.fields[(index + by) % self.fields.len()]
    }

    pub fn input(&mut self, c: char) {
        match self.focus {
            FormField::Title => self.title.push(c),
            FormField::Description => self.description.push(c),
            _ => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.focus {
            FormField::Title => {
                self.title.pop();
            }
            FormField::Description => {
                self.description.pop();
            }
            _ => {}
        }
    }

    /// Step the focused choice field forwards or backwards
    pub fn cycle_choice(&mut self, forward: bool) {
        match self.focus {
            FormField::Priority => {
                self.priority = step_choice(&Priority::ALL, self.priority, forward)
            }
            FormField::Status => self.status = step_choice(&Status::ALL, self.status, forward),
            _ => {}
        }
    }

    pub fn to_new_issue(&self) -> issuedesk_core::Result<NewIssue> {
        NewIssue::from_input(&self.title, &self.description, self.priority)
    }

    pub fn to_update(&self) -> issuedesk_core::Result<IssueUpdate> {
        IssueUpdate::from_input(&self.title, &self.description, self.priority, self.status)
    }
}

fn step_choice<T: Copy + PartialEq>(values: &[T], current: T, forward: bool) -> T {
    let index = values.iter().position(|v| *v == current).unwrap_or(0);
    let len = values.len();
    let next = if forward {
        (index + 1) % len
    } else {
        (index + len - 1) % len
    };
    values[next]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    Create(IssueForm),
    Edit { id: String, form: IssueForm },
    ConfirmDelete { id: String, title: String },
}

#[derive(Debug, Default)]
pub struct ModalController {
    active: Option<Modal>,
}

impl ModalController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&Modal> {
        self.active.as_ref()
    }

    pub fn active_mut(&mut self) -> Option<&mut Modal> {
        self.active.as_mut()
    }

    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    /// Show the create dialog with a fresh form
    pub fn open_create(&mut self) {
        self.active = Some(Modal::Create(IssueForm::create()));
    }

    /// Show the edit dialog for `id`. Does nothing if the issue is unknown.
    pub fn open_edit(&mut self, store: &IssueStore, id: &str) -> bool {
        let Some(issue) = store.get(id) else {
            return false;
        };
        self.active = Some(Modal::Edit {
            id: issue.id.clone(),
            form: IssueForm::edit(issue),
        });
        true
    }

    /// Ask before deleting `id`. Does nothing if the issue is unknown.
    pub fn open_confirm_delete(&mut self, store: &IssueStore, id: &str) -> bool {
        let Some(issue) = store.get(id) else {
            return false;
        };
        self.active = Some(Modal::ConfirmDelete {
            id: issue.id.clone(),
            title: issue.title.clone(),
        });
        true
    }

    pub fn close(&mut self) {
        self.active = None;
    }

    /// Close the create dialog if it is the one showing
    pub fn close_create(&mut self) {
        if matches!(self.active, Some(Modal::Create(_))) {
            self.active = None;
        }
    }

    /// Close the edit dialog if it is showing `id`
    pub fn close_edit(&mut self, id: &str) {
        if matches!(&self.active, Some(Modal::Edit { id: open, .. }) if open == id) {
            self.active = None;
        }
    }
}
