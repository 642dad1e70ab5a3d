//! Form/Mutation Controller
//!
//! Drives a create/edit form and the two-step delete for one collection.
//! The snapshot in the `CollectionStore` is only touched after the client
//! confirms a mutation.
//!
//! ```text
//! Idle --open--> Editing --submit--> Submitting --ok--> Idle
//!                   ^                     |
//!                   +-------- err --------+
//! ```

use thiserror::Error;
use tracing::{error, info};

use crate::domain::{DomainError, Entity};
use crate::repository::{CollectionClient, TypedCollections};
use crate::store::{Change, CollectionStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    /// Editing the record with this id; the id may not change
    Edit { id: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormState<T> {
    Idle,
    Editing { mode: FormMode, draft: T },
    Submitting { mode: FormMode, draft: T },
}

/// Record picked by the first delete step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteTarget {
    pub id: String,
    pub label: String,
}

/// Message for the user after a mutation attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("another change is still being saved")]
    Busy,
    #[error("no form is open")]
    NotEditing,
    #[error("another form is open; save or cancel it first")]
    DraftOpen,
    #[error("nothing selected for deletion")]
    NoDeleteTarget,
    #[error(transparent)]
    Domain(#[from] DomainError),
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub struct MutationController<T> {
    state: FormState<T>,
    delete_target: Option<DeleteTarget>,
    deleting: bool,
    notice: Option<Notice>,
    id_source: fn() -> String,
}

impl<T: Entity> Default for MutationController<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> MutationController<T> {
    pub fn new() -> Self {
        Self::with_id_source(new_id)
    }

    /// Use `id_source` instead of random UUIDs for new records
    pub fn with_id_source(id_source: fn() -> String) -> Self {
        Self {
            state: FormState::Idle,
            delete_target: None,
            deleting: false,
            notice: None,
            id_source,
        }
    }

    pub fn state(&self) -> &FormState<T> {
        &self.state
    }

    pub fn is_busy(&self) -> bool {
        self.deleting || matches!(self.state, FormState::Submitting { .. })
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    pub fn delete_target(&self) -> Option<&DeleteTarget> {
        self.delete_target.as_ref()
    }

    pub fn draft(&self) -> Option<&T> {
        match &self.state {
            FormState::Editing { draft, .. } | FormState::Submitting { draft, .. } => Some(draft),
            FormState::Idle => None,
        }
    }

    /// Mutable access to the draft while editing
    pub fn draft_mut(&mut self) -> Option<&mut T> {
        match &mut self.state {
            FormState::Editing { draft, .. } => Some(draft),
            _ => None,
        }
    }

    /// Open an empty create form
    pub fn open_create(&mut self) -> Result<(), FormError>
    where
        T: Default,
    {
        self.open_create_with(T::default())
    }

    /// Open a create form prefilled with `draft`.
    ///
    /// A draft with a blank id gets one on its first submit and keeps it
    /// across retries.
    pub fn open_create_with(&mut self, draft: T) -> Result<(), FormError> {
        self.ensure_idle()?;
        self.notice = None;
        self.state = FormState::Editing {
            mode: FormMode::Create,
            draft,
        };
        Ok(())
    }

    /// Open an edit form on a copy of `item`
    pub fn open_edit(&mut self, item: &T) -> Result<(), FormError> {
        self.ensure_idle()?;
        self.notice = None;
        self.state = FormState::Editing {
            mode: FormMode::Edit {
                id: item.id().to_string(),
            },
            draft: item.clone(),
        };
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<(), FormError> {
        if matches!(self.state, FormState::Submitting { .. }) {
            return Err(FormError::Busy);
        }
        self.state = FormState::Idle;
        Ok(())
    }

    /// Validate and send the draft, then reconcile `store` with the result
    ///
    /// On failure the form returns to editing with the draft intact and the
    /// store is left as it was.
    pub async fn submit<C: CollectionClient + ?Sized>(
        &mut self,
        client: &C,
        store: &mut CollectionStore<T>,
    ) -> Result<T, FormError> {
        if self.is_busy() {
            return Err(FormError::Busy);
        }
        let (mode, mut draft) = match std::mem::replace(&mut self.state, FormState::Idle) {
            FormState::Editing { mode, draft } => (mode, draft),
            other => {
                self.state = other;
                return Err(FormError::NotEditing);
            }
        };

        let missing = draft.missing_fields();
        if !missing.is_empty() {
            return Err(self.fail(mode, draft, DomainError::missing(&missing)));
        }

        if matches!(&mode, FormMode::Edit { id } if draft.id() != id.as_str()) {
            let err = DomainError::Validation("The record id cannot be changed".to_string());
            return Err(self.fail(mode, draft, err));
        }
        if mode == FormMode::Create && draft.id().is_empty() {
            draft.set_id((self.id_source)());
        }
        let record = draft.clone();

        self.state = FormState::Submitting {
            mode: mode.clone(),
            draft: draft.clone(),
        };
        self.notice = None;

        let result = match mode {
            FormMode::Create => client.create_entity(&record).await,
            FormMode::Edit { .. } => client.update_entity(&record).await,
        };

        match result {
            Ok(saved) => {
                let (change, verb) = match mode {
                    FormMode::Create => (Change::Created(saved.clone()), "created"),
                    FormMode::Edit { .. } => (Change::Updated(saved.clone()), "updated"),
                };
                info!(collection = T::COLLECTION, id = %saved.id(), "{} {}", T::LABEL, verb);
                store.reconcile(client, change).await;
                self.state = FormState::Idle;
                self.notice = Some(Notice::Success(format!("{} {}", T::LABEL, verb)));
                Ok(saved)
            }
            Err(e) => {
                error!(collection = T::COLLECTION, error = %e, "failed to save {}", T::LABEL);
                if matches!(e, DomainError::NotFound { .. }) {
                    store.mark_stale();
                }
                Err(self.fail(mode, draft, e))
            }
        }
    }

    /// First delete step
    pub fn select_for_delete(&mut self, id: impl Into<String>, label: impl Into<String>) -> Result<(), FormError> {
        if self.is_busy() {
            return Err(FormError::Busy);
        }
        self.delete_target = Some(DeleteTarget {
            id: id.into(),
            label: label.into(),
        });
        Ok(())
    }

    pub fn cancel_delete(&mut self) -> Result<(), FormError> {
        if self.deleting {
            return Err(FormError::Busy);
        }
        self.delete_target = None;
        Ok(())
    }

    /// Second delete step. The target stays selected if the delete fails.
    pub async fn confirm_delete<C: CollectionClient + ?Sized>(
        &mut self,
        client: &C,
        store: &mut CollectionStore<T>,
    ) -> Result<(), FormError> {
        if self.is_busy() {
            return Err(FormError::Busy);
        }
        let target = self.delete_target.clone().ok_or(FormError::NoDeleteTarget)?;

        self.deleting = true;
        self.notice = None;
        let result = client.delete_entity::<T>(&target.id).await;
        self.deleting = false;

        match result {
            Ok(()) => {
                info!(collection = T::COLLECTION, id = %target.id, "{} deleted", T::LABEL);
                store.reconcile(client, Change::Deleted(target.id.clone())).await;
                self.delete_target = None;
                self.notice = Some(Notice::Success(format!("{} deleted", T::LABEL)));
                Ok(())
            }
            Err(e) => {
                error!(collection = T::COLLECTION, id = %target.id, error = %e, "failed to delete {}", T::LABEL);
                if matches!(e, DomainError::NotFound { .. }) {
                    store.mark_stale();
                }
                self.notice = Some(Notice::Error(e.user_message()));
                Err(e.into())
            }
        }
    }

    /// Drop any in-flight bookkeeping after a call that never returned
    pub fn reset(&mut self) {
        if let FormState::Submitting { mode, draft } = std::mem::replace(&mut self.state, FormState::Idle) {
            self.state = FormState::Editing { mode, draft };
        }
        self.deleting = false;
    }

    fn ensure_idle(&self) -> Result<(), FormError> {
        if self.is_busy() {
            Err(FormError::Busy)
        } else if matches!(self.state, FormState::Editing { .. }) {
            Err(FormError::DraftOpen)
        } else {
            Ok(())
        }
    }

    fn fail(&mut self, mode: FormMode, draft: T, err: DomainError) -> FormError {
        self.notice = Some(Notice::Error(err.user_message()));
        self.state = FormState::Editing { mode, draft };
        FormError::Domain(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Project;
    use crate::testing::{Call, ScriptedClient};
    use std::time::Duration;

    fn fixed_id() -> String {
        "u1".to_string()
    }

    fn project(id: &str, name: &str) -> Project {
        Project {
            id: id.to_string(),
            project_name: Some(name.to_string()),
            ..Default::default()
        }
    }

    async fn loaded(client: &ScriptedClient) -> CollectionStore<Project> {
        let mut store = CollectionStore::default();
        store.load(client).await;
        store
    }

    #[tokio::test]
    async fn test_create_into_empty_store() {
        let client = ScriptedClient::new();
        let mut store = loaded(&client).await;
        let mut form = MutationController::<Project>::with_id_source(fixed_id);

        form.open_create().unwrap();
        form.draft_mut().unwrap().project_name = Some("X".into());
        let saved = form.submit(&client, &mut store).await.unwrap();

        assert_eq!(store.items(), &[project("u1", "X")]);
        assert_eq!(saved, project("u1", "X"));
        assert_eq!(form.state(), &FormState::Idle);
        assert!(matches!(form.notice(), Some(Notice::Success(_))));
    }

    #[tokio::test]
    async fn test_create_assigns_fresh_uuid() {
        let client = ScriptedClient::new();
        let mut store = loaded(&client).await;
        let mut form = MutationController::<Project>::new();

        form.open_create_with(project("", "Alpha")).unwrap();
        let saved = form.submit(&client, &mut store).await.unwrap();

        assert!(uuid::Uuid::parse_str(&saved.id).is_ok());
        assert_eq!(store.items().iter().filter(|p| p.id == saved.id).count(), 1);
    }

    #[tokio::test]
    async fn test_failed_create_leaves_store_untouched() {
        let client = ScriptedClient::seeded(&[project("p1", "Alpha")]);
        let mut store = loaded(&client).await;
        let before = store.items().to_vec();
        client.fail(Call::Create, DomainError::write("projects", "boom"));
        let mut form = MutationController::<Project>::new();

        form.open_create_with(project("", "Beta")).unwrap();
        let err = form.submit(&client, &mut store).await.unwrap_err();

        assert!(matches!(err, FormError::Domain(DomainError::Write { .. })));
        assert_eq!(store.items(), before.as_slice());
        assert!(matches!(form.state(), FormState::Editing { mode: FormMode::Create, .. }));
        assert_eq!(
            form.notice(),
            Some(&Notice::Error("Failed to save changes. Please try again.".into()))
        );

        client.heal(Call::Create);
        form.submit(&client, &mut store).await.unwrap();
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_validation_happens_before_any_call() {
        let client = ScriptedClient::new();
        let mut store = loaded(&client).await;
        let mut form = MutationController::<Project>::new();

        form.open_create().unwrap();
        let err = form.submit(&client, &mut store).await.unwrap_err();

        assert_eq!(err, FormError::Domain(DomainError::missing(&["projectName"])));
        assert_eq!(client.calls(Call::Create), 0);
        assert!(matches!(form.state(), FormState::Editing { .. }));
    }

    #[tokio::test]
    async fn test_edit_replaces_in_place() {
        let client = ScriptedClient::seeded(&[project("p1", "Alpha"), project("p2", "Beta")]);
        let mut store = loaded(&client).await;
        let mut form = MutationController::<Project>::new();

        form.open_edit(&store.items()[0].clone()).unwrap();
        form.draft_mut().unwrap().project_name = Some("Alpha 2".into());
        form.submit(&client, &mut store).await.unwrap();

        let names: Vec<_> = store.items().iter().map(|p| p.project_name.clone().unwrap()).collect();
        assert_eq!(names, vec!["Alpha 2", "Beta"]);
    }

    #[tokio::test]
    async fn test_edit_cannot_change_id() {
        let client = ScriptedClient::seeded(&[project("p1", "Alpha")]);
        let mut store = loaded(&client).await;
        let mut form = MutationController::<Project>::new();

        form.open_edit(&project("p1", "Alpha")).unwrap();
        form.draft_mut().unwrap().id = "p9".into();
        let err = form.submit(&client, &mut store).await.unwrap_err();

        assert!(matches!(err, FormError::Domain(DomainError::Validation(_))));
        assert_eq!(client.calls(Call::Update), 0);
    }

    #[tokio::test]
    async fn test_edit_of_vanished_record_marks_stale() {
        let client = ScriptedClient::seeded(&[project("p1", "Alpha")]);
        let mut store = loaded(&client).await;
        client.inner().delete("projects", "p1").await.unwrap();
        let mut form = MutationController::<Project>::new();

        form.open_edit(&store.items()[0].clone()).unwrap();
        let err = form.submit(&client, &mut store).await.unwrap_err();

        assert_eq!(err, FormError::Domain(DomainError::not_found("projects", "p1")));
        assert!(store.is_stale());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_second_editor_of_created_record_conflicts() {
        let client = ScriptedClient::new();
        let mut creator_store = loaded(&client).await;
        let mut creator = MutationController::<Project>::new();
        creator.open_create_with(project("", "Alpha")).unwrap();
        let created = creator.submit(&client, &mut creator_store).await.unwrap();
        assert_eq!(created.revision, None);

        let mut store_a = loaded(&client).await;
        let mut store_b = loaded(&client).await;
        let mut form_a = MutationController::<Project>::new();
        let mut form_b = MutationController::<Project>::new();
        form_a.open_edit(&store_a.get(&created.id).unwrap().clone()).unwrap();
        form_b.open_edit(&store_b.get(&created.id).unwrap().clone()).unwrap();
        form_a.draft_mut().unwrap().project_name = Some("From A".into());
        form_b.draft_mut().unwrap().project_name = Some("From B".into());

        let saved = form_a.submit(&client, &mut store_a).await.unwrap();
        assert_eq!(saved.revision, Some(1));

        let err = form_b.submit(&client, &mut store_b).await.unwrap_err();
        assert_eq!(err, FormError::Domain(DomainError::conflict("projects", &created.id)));
        assert_eq!(store_b.items()[0].project_name.as_deref(), Some("Alpha"));
        assert!(matches!(form_b.state(), FormState::Editing { .. }));

        let remote: Vec<Project> = client.inner().fetch_all().await.unwrap();
        assert_eq!(remote[0].project_name.as_deref(), Some("From A"));
        assert_eq!(remote[0].revision, Some(1));
    }

    #[tokio::test]
    async fn test_create_retry_keeps_assigned_id() {
        let client = ScriptedClient::new();
        let mut store = loaded(&client).await;
        let mut form = MutationController::<Project>::new();
        form.open_create_with(project("", "Alpha")).unwrap();

        client.fail(Call::Create, DomainError::write("projects", "timed out"));
        form.submit(&client, &mut store).await.unwrap_err();
        let id = form.draft().unwrap().id.clone();
        assert!(!id.is_empty());

        // the write that timed out lands anyway
        client.inner().create_entity(form.draft().unwrap()).await.unwrap();
        client.heal(Call::Create);

        let err = form.submit(&client, &mut store).await.unwrap_err();
        assert!(matches!(err, FormError::Domain(DomainError::Write { .. })));
        assert_eq!(form.draft().unwrap().id, id);
        assert_eq!(client.inner().len("projects").await, 1);
    }

    #[test]
    fn test_open_refuses_to_replace_draft() {
        let mut form = MutationController::<Project>::new();
        form.open_create_with(project("", "Half typed")).unwrap();

        assert_eq!(form.open_edit(&project("p1", "Alpha")), Err(FormError::DraftOpen));
        assert_eq!(form.open_create(), Err(FormError::DraftOpen));
        assert_eq!(
            form.draft().and_then(|p| p.project_name.as_deref()),
            Some("Half typed")
        );

        form.cancel().unwrap();
        form.open_edit(&project("p1", "Alpha")).unwrap();
    }

    #[tokio::test]
    async fn test_delete_needs_two_steps() {
        let client = ScriptedClient::seeded(&[project("p1", "Alpha")]);
        let mut store = loaded(&client).await;
        let mut form = MutationController::<Project>::new();

        assert_eq!(
            form.confirm_delete(&client, &mut store).await,
            Err(FormError::NoDeleteTarget)
        );

        form.select_for_delete("p1", "Alpha").unwrap();
        form.confirm_delete(&client, &mut store).await.unwrap();

        assert!(store.get("p1").is_none());
        assert!(form.delete_target().is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_record_surfaces_not_found() {
        let client = ScriptedClient::seeded(&[project("p1", "Alpha")]);
        let mut store = loaded(&client).await;
        let before = store.items().to_vec();
        let mut form = MutationController::<Project>::new();

        form.select_for_delete("u1", "Ghost").unwrap();
        let err = form.confirm_delete(&client, &mut store).await.unwrap_err();

        assert_eq!(err, FormError::Domain(DomainError::not_found("projects", "u1")));
        assert_eq!(store.items(), before.as_slice());
        assert_eq!(form.delete_target().map(|t| t.id.as_str()), Some("u1"));
        assert!(matches!(form.notice(), Some(Notice::Error(_))));
        assert_eq!(form.state(), &FormState::Idle);
    }

    #[tokio::test]
    async fn test_hung_submit_blocks_until_reset() {
        let client = ScriptedClient::new();
        let mut store = loaded(&client).await;
        let mut form = MutationController::<Project>::new();
        form.open_create_with(project("", "Alpha")).unwrap();

        client.hang_writes(true);
        let attempt = tokio::time::timeout(Duration::from_millis(20), form.submit(&client, &mut store)).await;
        assert!(attempt.is_err());

        assert!(form.is_busy());
        assert_eq!(form.submit(&client, &mut store).await, Err(FormError::Busy));
        assert_eq!(form.open_create(), Err(FormError::Busy));
        assert!(store.is_empty());

        form.reset();
        client.hang_writes(false);
        form.submit(&client, &mut store).await.unwrap();
        assert_eq!(store.len(), 1);
    }
}
