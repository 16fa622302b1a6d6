use std::sync::{Arc, Mutex};

use crate::error::AppError;
use crate::models::{now, Todo};

/// The process-wide todo collection, kept in insertion order.
///
/// Clones share the same underlying list. Every operation takes the lock for its
/// whole read-modify-write, so concurrent requests are serialized.
#[derive(Debug, Clone, Default)]
pub struct TodoStore {
    todos: Arc<Mutex<Vec<Todo>>>,
}

impl TodoStore {
    /// The collection a fresh process starts with.
    pub fn seeded() -> Self {
        let created_at = now();
        let seed = [
            (1, "Learn Docker", false),
            (2, "Build React app", true),
            (3, "Deploy with Docker Compose", false),
        ]
        .into_iter()
        .map(|(id, text, completed)| Todo {
            id,
            text: text.to_string(),
            completed,
            created_at,
            updated_at: None,
        })
        .collect();

        TodoStore {
            todos: Arc::new(Mutex::new(seed)),
        }
    }

    pub fn list(&self) -> Result<Vec<Todo>, AppError> {
        Ok(self.todos.lock()?.clone())
    }

    pub fn get(&self, id: i64) -> Result<Option<Todo>, AppError> {
        let todos = self.todos.lock()?;
        Ok(todos.iter().find(|t| t.id == id).cloned())
    }

    /// Appends a todo. `text` is stored as given; callers validate and trim it.
    pub fn create(&self, text: &str) -> Result<Todo, AppError> {
        let mut todos = self.todos.lock()?;
        let todo = Todo {
            id: next_id(&todos),
            text: text.to_string(),
            completed: false,
            created_at: now(),
            updated_at: None,
        };
        todos.push(todo.clone());
        Ok(todo)
    }

    /// Applies a partial update. `updated_at` is stamped even when no field changes.
    pub fn update(
        &self,
        id: i64,
        text: Option<&str>,
        completed: Option<bool>,
    ) -> Result<Option<Todo>, AppError> {
        let mut todos = self.todos.lock()?;
        let Some(todo) = todos.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };

        if let Some(text) = text {
            todo.text = text.trim().to_string();
        }
        if let Some(completed) = completed {
            todo.completed = completed;
        }
        todo.updated_at = Some(now());

        Ok(Some(todo.clone()))
    }

    /// Removes the matching todo, keeping the rest in order.
    pub fn delete(&self, id: i64) -> Result<Option<Todo>, AppError> {
        let mut todos = self.todos.lock()?;
        let index = todos.iter().position(|t| t.id == id);
        Ok(index.map(|index| todos.remove(index)))
    }
}

#[cfg(test)]
impl TodoStore {
    fn len(&self) -> usize {
        self.todos.lock().unwrap().len()
    }

    fn next_id(&self) -> i64 {
        next_id(&self.todos.lock().unwrap())
    }
}

// Recomputed from the live records, so deleting the highest id frees it for reuse.
fn next_id(todos: &[Todo]) -> i64 {
    todos.iter().map(|t| t.id).max().map_or(1, |max| max + 1)
}
