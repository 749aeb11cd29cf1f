//! The task controller, that turns user intents into task store mutations
//!
//! A controller holds at most one edit session at a time: the draft of a task being created or edited, along with the
//! validation errors of its last submission. Nothing reaches the store before a draft passes validation.
//!
//! Deleting a task is a two-step operation: [`TaskController::request_delete`] returns a [`DeleteRequest`] that the
//! caller must show to the user, then hand back to [`TaskController::resolve_delete`] with the user's answer.

use crate::draft::{Field, FieldValue, TaskDraft};
use crate::error::TaskError;
use crate::priority::{priority, Priority};
use crate::store::TaskStore;
use crate::task::Task;
use crate::traits::{KeyValueStore, SeedSource};
use crate::validation::ValidationErrors;

/// What an edit session is about
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditMode {
    /// A brand new task, that will be appended to the list
    Create,
    /// The task at this index
    Edit(usize),
}

/// The state of an open task form
#[derive(Clone, Debug, PartialEq)]
pub struct EditSession {
    mode: EditMode,
    draft: TaskDraft,
    errors: ValidationErrors,
}

impl EditSession {
    fn new(mode: EditMode, draft: TaskDraft) -> Self {
        Self { mode, draft, errors: ValidationErrors::new() }
    }

    pub fn mode(&self) -> EditMode              { self.mode    }
    pub fn draft(&self) -> &TaskDraft           { &self.draft  }
    /// The errors of the last submission, minus the ones of the fields that have been modified since then
    pub fn errors(&self) -> &ValidationErrors   { &self.errors }
}

/// The outcome of a successful submission
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Committed {
    /// A task has been appended at this index
    Created(usize),
    /// The task at this index has been updated
    Updated(usize),
}

/// A deletion waiting for the user to confirm it
#[derive(Clone, Debug, PartialEq)]
#[must_use = "a deletion only happens once the request is resolved"]
pub struct DeleteRequest {
    index: usize,
    task: Task,
}

impl DeleteRequest {
    pub fn index(&self) -> usize { self.index }
    /// The task, as it was when the deletion was requested
    pub fn task(&self) -> &Task  { &self.task  }

    /// A question to ask the user
    pub fn prompt(&self) -> String {
        format!("Are you sure you want to delete the task {:?}?", self.task.title())
    }
}


/// Mediates every user operation on a [`TaskStore`]
#[derive(Debug)]
pub struct TaskController<S: KeyValueStore> {
    store: TaskStore<S>,
    session: Option<EditSession>,
}

impl<S: KeyValueStore> TaskController<S> {
    pub fn new(store: TaskStore<S>) -> Self {
        Self { store, session: None }
    }

    pub fn store(&self) -> &TaskStore<S>  { &self.store }
    pub fn tasks(&self) -> &[Task]        { self.store.tasks() }

    /// Returns the open edit session, if any
    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    /// Open a form to create a new task, with an empty draft.
    ///
    /// Any other open session is discarded.
    pub fn open_create(&mut self) {
        self.open(EditSession::new(EditMode::Create, TaskDraft::new()));
    }

    /// Open a form to edit the task at `index`, with a draft that copies this task.
    ///
    /// Any other open session is discarded, unless `index` does not exist, in which case nothing changes.
    pub fn open_edit(&mut self, index: usize) -> Result<(), TaskError> {
        let draft = TaskDraft::from(self.store.get_checked(index)?);
        self.open(EditSession::new(EditMode::Edit(index), draft));
        Ok(())
    }

    fn open(&mut self, session: EditSession) {
        if let Some(previous) = self.session.replace(session) {
            log::debug!("Discarding the draft of a previous session ({:?})", previous.mode);
        }
    }

    /// Close the current session, without changing anything. Returns whether a session was open
    pub fn cancel(&mut self) -> bool {
        self.session.take().is_some()
    }

    /// Set a field of the current draft, and forget the last validation error about this field
    pub fn update_draft_field(&mut self, field: Field, value: FieldValue) -> Result<(), TaskError> {
        let session = self.session.as_mut().ok_or(TaskError::NoOpenSession)?;
        session.draft.set(field, value)?;
        session.errors.clear(field);
        Ok(())
    }

    /// Same as [`Self::update_draft_field`], for raw user input (see [`FieldValue::from_input`])
    pub fn update_draft_input(&mut self, field: Field, raw: &str) -> Result<(), TaskError> {
        self.update_draft_field(field, FieldValue::from_input(field, raw))
    }

    /// The priority the current draft would have
    pub fn draft_priority(&self) -> Option<Priority> {
        self.session.as_ref()
            .map(|session| priority(session.draft.importancy, session.draft.urgency))
    }

    /// Validate the current draft and commit it to the store.
    ///
    /// In case the draft is invalid, the errors are returned, kept in the session (that stays open), and the store is not modified.
    /// When editing a task that does not exist anymore, [`TaskError::IndexOutOfRange`] is returned and the session stays open as well.
    pub fn submit(&mut self) -> Result<Committed, TaskError> {
        let session = match self.session.as_mut() {
            None => return Err(TaskError::NoOpenSession),
            Some(session) => session,
        };

        let committed = match session.mode {
            EditMode::Create => {
                let task = match session.draft.to_task() {
                    Err(errors) => return Err(reject(session, errors)),
                    Ok(task) => task,
                };
                self.store.append(task)?;
                Committed::Created(self.store.len() - 1)
            },
            EditMode::Edit(index) => {
                let patch = match session.draft.to_patch() {
                    Err(errors) => return Err(reject(session, errors)),
                    Ok(patch) => patch,
                };
                self.store.replace_at(index, patch)?;
                Committed::Updated(index)
            },
        };

        self.session = None;
        Ok(committed)
    }

    /// Ask for the deletion of the task at `index`. Nothing is deleted before [`Self::resolve_delete`] is called
    pub fn request_delete(&self, index: usize) -> Result<DeleteRequest, TaskError> {
        let task = self.store.get_checked(index)?.clone();
        Ok(DeleteRequest { index, task })
    }

    /// Perform a deletion if the user confirmed it.
    ///
    /// Returns the removed task, or `None` if the user declined.
    /// In case the list changed in the meantime so that the request does not designate the same task anymore, nothing is deleted.
    pub fn resolve_delete(&mut self, request: DeleteRequest, confirmed: bool) -> Result<Option<Task>, TaskError> {
        if confirmed == false {
            log::debug!("Deletion of task #{} declined", request.index);
            return Ok(None);
        }

        let index = request.index;
        if self.store.get_checked(index)? != &request.task {
            return Err(TaskError::StaleConfirmation{ index });
        }
        let removed = self.store.remove_at(index)?;

        // Keep an edit session pointing at the same task
        let mut edited_task_deleted = false;
        if let Some(session) = &mut self.session {
            match session.mode {
                EditMode::Edit(i) if i == index => edited_task_deleted = true,
                EditMode::Edit(i) if i > index => session.mode = EditMode::Edit(i - 1),
                _ => {},
            }
        }
        if edited_task_deleted {
            log::warn!("The task being edited has been deleted. Closing its form");
            self.session = None;
        }

        Ok(Some(removed))
    }

    /// Replace the whole list with the tasks of an external source. See [`TaskStore::seed_from_external_source`]
    ///
    /// Indices do not designate the same tasks after a successful seeding: an open edit session is closed.
    /// A creation session is kept, since it does not depend on the list.
    pub async fn seed_from_external_source<T>(&mut self, source: &T) -> bool
    where
        T: SeedSource + ?Sized,
    {
        if self.store.seed_from_external_source(source).await == false {
            return false;
        }

        if let Some(EditMode::Edit(index)) = self.session.as_ref().map(|session| session.mode) {
            log::warn!("The list has been replaced while task #{} was being edited. Closing its form", index);
            self.session = None;
        }
        true
    }

    /// Returns the tasks that match `term`, with their index. See [`TaskStore::search`]
    pub fn search(&self, term: &str) -> Vec<(usize, &Task)> {
        self.store.search(term)
    }
}

fn reject(session: &mut EditSession, errors: ValidationErrors) -> TaskError {
    log::debug!("Draft rejected: {}", errors);
    session.errors = errors.clone();
    TaskError::Invalid(errors)
}
