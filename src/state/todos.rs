//! Todo-list state for the todos page.
//!
//! DESIGN
//! ======
//! The list is replaced wholesale on fetch and patched in place after each
//! successful mutation, so the page never refetches after create/update/
//! delete. Failures land in `error` with the server's wording when it sent
//! one; superseded (cancelled) calls leave the state untouched.

#[cfg(test)]
#[path = "todos_test.rs"]
mod todos_test;

use std::sync::Arc;

use super::observable::Observable;
use crate::net::api;
use crate::net::client::ApiClient;
use crate::net::error::ApiError;
use crate::net::types::{Todo, TodoCreate, TodoUpdate};

const FETCH_FAILED: &str = "Failed to load todos";
const CREATE_FAILED: &str = "Failed to create todo";
const UPDATE_FAILED: &str = "Failed to update todo";
const DELETE_FAILED: &str = "Failed to delete todo";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TodosState {
    pub items: Vec<Todo>,
    pub loading: bool,
    /// A create/update/delete is in flight.
    pub saving: bool,
    pub error: Option<String>,
}

impl TodosState {
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.items.iter().filter(|t| !t.completed).count()
    }

    fn find(&self, todo_id: i64) -> Option<&Todo> {
        self.items.iter().find(|t| t.id == todo_id)
    }
}

#[derive(Clone)]
pub struct TodoStore {
    client: Arc<ApiClient>,
    state: Arc<Observable<TodosState>>,
}

impl TodoStore {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client, state: Arc::new(Observable::default()) }
    }

    pub fn snapshot(&self) -> TodosState {
        self.state.get()
    }

    pub fn subscribe(&self, f: impl Fn(&TodosState) + Send + Sync + 'static) {
        self.state.subscribe(f);
    }

    /// Replace the list with the server's. Returns whether it succeeded.
    pub async fn fetch_todos(&self) -> bool {
        self.state.update(|s| {
            s.loading = true;
            s.error = None;
        });
        let outcome = api::list_todos(&self.client).await;
        match outcome {
            Ok(items) => {
                self.state.update(|s| {
                    s.items = items;
                    s.loading = false;
                });
                true
            }
            Err(err) => {
                self.fail(&err, FETCH_FAILED);
                false
            }
        }
    }

    pub async fn create_todo(&self, data: &TodoCreate) -> Option<Todo> {
        if data.title.trim().is_empty() {
            self.state.update(|s| s.error = Some("Enter a title.".to_owned()));
            return None;
        }
        self.begin_save();
        match api::create_todo(&self.client, data).await {
            Ok(todo) => {
                self.state.update(|s| {
                    s.items.push(todo.clone());
                    s.saving = false;
                });
                Some(todo)
            }
            Err(err) => {
                self.fail(&err, CREATE_FAILED);
                None
            }
        }
    }

    pub async fn update_todo(&self, todo_id: i64, data: &TodoUpdate) -> Option<Todo> {
        self.begin_save();
        match api::update_todo(&self.client, todo_id, data).await {
            Ok(todo) => {
                self.state.update(|s| {
                    if let Some(slot) = s.items.iter_mut().find(|t| t.id == todo_id) {
                        *slot = todo.clone();
                    }
                    s.saving = false;
                });
                Some(todo)
            }
            Err(err) => {
                self.fail(&err, UPDATE_FAILED);
                None
            }
        }
    }

    pub async fn delete_todo(&self, todo_id: i64) -> bool {
        self.begin_save();
        match api::delete_todo(&self.client, todo_id).await {
            Ok(()) => {
                self.state.update(|s| {
                    s.items.retain(|t| t.id != todo_id);
                    s.saving = false;
                });
                true
            }
            Err(err) => {
                self.fail(&err, DELETE_FAILED);
                false
            }
        }
    }

    /// Flip `completed` on a known item. Unknown ids are ignored.
    pub async fn toggle_completed(&self, todo_id: i64) -> Option<Todo> {
        let completed = self.state.with(|s| s.find(todo_id).map(|t| t.completed))?;
        let update = TodoUpdate { completed: Some(!completed), ..TodoUpdate::default() };
        self.update_todo(todo_id, &update).await
    }

    pub fn clear(&self) {
        self.state.update(|s| *s = TodosState::default());
    }

    fn begin_save(&self) {
        self.state.update(|s| {
            s.saving = true;
            s.error = None;
        });
    }

    fn fail(&self, err: &ApiError, fallback: &str) {
        // The superseding call owns the flags now.
        if err.is_cancelled() {
            log::debug!("todo request superseded");
            return;
        }
        let message = err.user_message(fallback);
        self.state.update(|s| {
            s.loading = false;
            s.saving = false;
            s.error = Some(message);
        });
    }
}
