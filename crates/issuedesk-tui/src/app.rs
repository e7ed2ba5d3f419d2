//! Application state
//!
//! `App` owns the store, the filter inputs and every piece of UI state. All
//! mutation happens here, on the UI thread: key presses and mouse clicks come
//! in through `handle_key` / `handle_click`, request outcomes through
//! `apply_outcome`.

use crate::alert::{AlertCenter, AlertId};
use crate::engine::{EngineHandle, Event, Outcome, Request};
use crate::keys::KeyAction;
use crate::loading::LoadingIndicator;
use crate::modal::{Modal, ModalController};
use crate::view::IssueListView;
use issuedesk_client::{ClientError, Operation};
use issuedesk_core::{Issue, IssueFilter, IssueStats, IssueStore};
use ratatui::layout::{Position, Rect};
use std::time::{Duration, Instant};

pub const BUSY_MESSAGE: &str = "Another request is still in progress";
pub const CANCELLED_MESSAGE: &str = "Request cancelled";
pub const ENGINE_STOPPED_MESSAGE: &str = "Request engine stopped; restart issuedesk";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Normal,
    Search,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Select,
    Edit,
    Delete,
}

/// A clickable part of an issue row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowHit {
    pub id: String,
    pub action: RowAction,
    pub area: Rect,
}

/// Screen areas recorded by the last draw, used to resolve mouse clicks.
/// Row buttons are listed before the row they sit on.
#[derive(Debug, Default)]
pub struct HitAreas {
    pub modal: Option<Rect>,
    pub alerts: Vec<(AlertId, Rect)>,
    pub rows: Vec<RowHit>,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    generation: u64,
    op: Operation,
}

pub struct App {
    store: IssueStore,
    pub(crate) filter: IssueFilter,
    pub(crate) modals: ModalController,
    pub(crate) alerts: AlertCenter,
    pub(crate) loading: LoadingIndicator,
    pub(crate) mode: AppMode,
    pub(crate) selected: usize,
    pub(crate) hit: HitAreas,
    engine: EngineHandle,
    in_flight: Option<Pending>,
    generation: u64,
}

impl App {
    pub fn new(engine: EngineHandle, alert_timeout: Duration) -> Self {
        Self {
            store: IssueStore::new(),
            filter: IssueFilter::new(),
            modals: ModalController::new(),
            alerts: AlertCenter::new(alert_timeout),
            loading: LoadingIndicator::default(),
            mode: AppMode::Normal,
            selected: 0,
            hit: HitAreas::default(),
            engine,
            in_flight: None,
            generation: 0,
        }
    }

    /// Kick off the initial load
    pub fn start(&mut self) {
        self.dispatch(Request::List);
    }

    /// Issues passing the current filter, recomputed from the store on every call
    pub fn visible(&self) -> Vec<&Issue> {
        self.filter.apply(self.store.issues())
    }

    pub fn list_view(&self) -> IssueListView {
        IssueListView::build(&self.visible())
    }

    /// Counts over the whole store, independent of the filter
    pub fn stats(&self) -> IssueStats {
        self.store.stats()
    }

    pub fn selected_issue(&self) -> Option<&Issue> {
        self.visible().get(self.selected).copied()
    }

    /// Send a request unless one is already in flight
    fn dispatch(&mut self, request: Request) -> bool {
        if self.in_flight.is_some() {
            self.alerts.info(BUSY_MESSAGE);
            return false;
        }

        let op = request.operation();
        self.generation += 1;
        self.loading.show(request.loading_message());
        if !self.engine.send(self.generation, request) {
            self.loading.hide();
            self.alerts.error(ENGINE_STOPPED_MESSAGE);
            return false;
        }
        self.in_flight = Some(Pending {
            generation: self.generation,
            op,
        });
        true
    }

    /// Give up on the pending request. Its response, if one still arrives,
    /// is ignored.
    pub fn abandon_request(&mut self) -> bool {
        let Some(pending) = self.in_flight.take() else {
            return false;
        };
        tracing::info!(
            generation = pending.generation,
            op = ?pending.op,
            "abandoning request"
        );
        self.engine.cancel();
        self.loading.hide();
        self.alerts.info(CANCELLED_MESSAGE);
        true
    }

    /// Apply an engine outcome if it answers the pending request
    pub fn apply_outcome(&mut self, outcome: Outcome) {
        match self.in_flight {
            Some(pending) if pending.generation == outcome.generation => {
                self.apply_event(outcome.event)
            }
            _ => tracing::warn!(
                generation = outcome.generation,
                "ignoring response to an abandoned request"
            ),
        }
    }

    /// The engine thread is gone; nothing in flight can complete
    pub fn engine_stopped(&mut self) {
        tracing::error!("request engine stopped");
        self.in_flight = None;
        self.loading.hide();
        self.alerts.error(ENGINE_STOPPED_MESSAGE);
    }

    pub(crate) fn apply_event(&mut self, event: Event) {
        self.in_flight = None;
        self.loading.hide();

        match event {
            Event::Listed(Ok(issues)) => {
                tracing::info!(count = issues.len(), "loaded issues");
                self.store.replace_all(issues);
            }
            Event::Listed(Err(err)) => self.report_failure(Operation::List, &err),
            Event::Created(Ok(issue)) => {
                tracing::info!(id = %issue.id, "created issue");
                self.store.append(issue);
                self.modals.close_create();
                self.alerts.success("Issue created");
            }
            Event::Created(Err(err)) => self.report_failure(Operation::Create, &err),
            Event::Updated {
                id,
                result: Ok(issue),
            } => {
                if self.store.replace(issue) {
                    tracing::info!(%id, "updated issue");
                } else {
                    tracing::warn!(%id, "updated issue is no longer in the store");
                }
                self.modals.close_edit(&id);
                self.alerts.success("Issue updated");
            }
            Event::Updated { result: Err(err), .. } => {
                self.report_failure(Operation::Update, &err)
            }
            Event::Deleted { id, result: Ok(()) } => {
                tracing::info!(%id, "deleted issue");
                self.store.remove(&id);
                self.alerts.success("Issue deleted");
            }
            Event::Deleted { result: Err(err), .. } => {
                self.report_failure(Operation::Delete, &err)
            }
        }

        self.clamp_selection();
    }

    fn report_failure(&mut self, op: Operation, err: &ClientError) {
        tracing::warn!(?op, error = %err, "request failed");
        self.alerts.error(format!("{}: {}", op.failure_prefix(), err));
    }

    fn clamp_selection(&mut self) {
        let len = self.visible().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    pub fn on_tick(&mut self, now: Instant) {
        self.alerts.expire(now);
    }

    /// Returns true when the app should exit
    pub fn handle_key(&mut self, action: KeyAction) -> bool {
        if action == KeyAction::Quit {
            return true;
        }
        if self.modals.is_open() {
            self.handle_modal_key(action);
            return false;
        }
        match self.mode {
            AppMode::Normal => self.handle_normal_key(action),
            AppMode::Search => {
                self.handle_search_key(action);
                false
            }
            AppMode::Help => {
                if matches!(action, KeyAction::Escape | KeyAction::Char('q' | '?')) {
                    self.mode = AppMode::Normal;
                }
                false
            }
        }
    }

    fn handle_normal_key(&mut self, action: KeyAction) -> bool {
        match action {
            KeyAction::Char('q') => return true,
            KeyAction::Up | KeyAction::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyAction::Down | KeyAction::Char('j') => {
                let len = self.visible().len();
                if self.selected + 1 < len {
                    self.selected += 1;
                }
            }
            KeyAction::Char('g') => self.selected = 0,
            KeyAction::Char('G') => {
                self.selected = self.visible().len().saturating_sub(1);
            }
            KeyAction::NewIssue | KeyAction::Char('a') => self.modals.open_create(),
            KeyAction::Enter | KeyAction::Char('e') => {
                if let Some(id) = self.selected_issue().map(|i| i.id.clone()) {
                    self.modals.open_edit(&self.store, &id);
                }
            }
            KeyAction::Char('d') => {
                if let Some(id) = self.selected_issue().map(|i| i.id.clone()) {
                    self.modals.open_confirm_delete(&self.store, &id);
                }
            }
            KeyAction::FocusSearch | KeyAction::Char('/') => self.mode = AppMode::Search,
            KeyAction::Char('s') => {
                self.filter.cycle_status();
                self.clamp_selection();
            }
            KeyAction::Char('p') => {
                self.filter.cycle_priority();
                self.clamp_selection();
            }
            KeyAction::Char('c') => {
                self.filter.clear();
                self.clamp_selection();
            }
            KeyAction::Char('r') => {
                self.abandon_request();
                self.dispatch(Request::List);
            }
            KeyAction::Escape => {
                self.abandon_request();
            }
            KeyAction::Char('x') => {
                self.alerts.dismiss_latest();
            }
            KeyAction::Char('?') => self.mode = AppMode::Help,
            _ => {}
        }
        false
    }

    fn handle_search_key(&mut self, action: KeyAction) {
        match action {
            KeyAction::Escape | KeyAction::Enter => self.mode = AppMode::Normal,
            KeyAction::Backspace => {
                self.filter.search.pop();
            }
            KeyAction::Char(c) => self.filter.search.push(c),
            _ => {}
        }
        self.clamp_selection();
    }

    fn handle_modal_key(&mut self, action: KeyAction) {
        if action == KeyAction::Escape {
            self.modals.close();
            return;
        }

        let Some(modal) = self.modals.active_mut() else {
            return;
        };

        match modal {
            Modal::Create(form) | Modal::Edit { form, .. } => match action {
                KeyAction::Enter => self.submit_form(),
                KeyAction::Tab => form.focus_next(),
                KeyAction::BackTab => form.focus_prev(),
                KeyAction::Up => form.cycle_choice(false),
                KeyAction::Down => form.cycle_choice(true),
                KeyAction::Backspace => form.backspace(),
                KeyAction::Char(c) => form.input(c),
                _ => {}
            },
            Modal::ConfirmDelete { id, .. } => match action {
                KeyAction::Char('y' | 'Y') | KeyAction::Enter => {
                    let id = id.clone();
                    self.modals.close();
                    self.dispatch(Request::Delete { id });
                }
                KeyAction::Char('n' | 'N') => self.modals.close(),
                _ => {}
            },
        }
    }

    /// Validate the open form and send it. Invalid input never reaches the
    /// server.
    fn submit_form(&mut self) {
        let request = match self.modals.active() {
            Some(Modal::Create(form)) => form.to_new_issue().map(Request::Create),
            Some(Modal::Edit { id, form }) => form.to_update().map(|payload| Request::Update {
                id: id.clone(),
                payload,
            }),
            _ => return,
        };

        match request {
            Ok(request) => {
                self.dispatch(request);
            }
            Err(err) => {
                self.alerts.error(err.to_string());
            }
        }
    }

    /// Left click: dismiss a clicked alert, close an open dialog when the
    /// click lands outside it, or act on an issue row.
    pub fn handle_click(&mut self, column: u16, row: u16) {
        let position = Position::new(column, row);

        let clicked_alert = self
            .hit
            .alerts
            .iter()
            .find(|(_, area)| area.contains(position))
            .map(|(id, _)| *id);
        if let Some(id) = clicked_alert {
            self.alerts.dismiss(id);
            return;
        }

        if self.modals.is_open() {
            if let Some(area) = self.hit.modal {
                if !area.contains(position) {
                    self.modals.close();
                }
            }
            return;
        }
        if self.mode == AppMode::Help {
            self.mode = AppMode::Normal;
            return;
        }

        let Some(hit) = self
            .hit
            .rows
            .iter()
            .find(|hit| hit.area.contains(position))
            .cloned()
        else {
            return;
        };
        if let Some(index) = self.visible().iter().position(|i| i.id == hit.id) {
            self.selected = index;
        }
        match hit.action {
            RowAction::Select => {}
            RowAction::Edit => {
                self.modals.open_edit(&self.store, &hit.id);
            }
            RowAction::Delete => {
                self.modals.open_confirm_delete(&self.store, &hit.id);
            }
        }
    }
}
