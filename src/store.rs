use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use uuid::Uuid;

use crate::maze::Maze;
use crate::session::MazeSession;

/// In-memory keyed store for mazes. Mazes are immutable, so handing out
/// shared `Arc`s is all the per-key access control they need.
#[derive(Debug, Default)]
pub struct MazeStore {
    mazes: Mutex<HashMap<Uuid, Arc<Maze>>>,
}

impl MazeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save(&self, maze: Maze) -> Arc<Maze> {
        let maze = Arc::new(maze);
        self.mazes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(maze.id(), maze.clone());
        maze
    }

    pub fn get(&self, id: Uuid) -> Option<Arc<Maze>> {
        self.mazes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    pub fn get_all(&self) -> Vec<Arc<Maze>> {
        self.mazes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }
}

/// In-memory keyed store for sessions. Each session sits behind its own
/// mutex: `apply_move` is a read-then-write sequence, so concurrent callers
/// on the same session id must be serialized, while different sessions stay
/// independent. The outer map lock is held only for map operations.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<Uuid, Arc<Mutex<MazeSession>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save(&self, session: MazeSession) -> Arc<Mutex<MazeSession>> {
        let id = session.id();
        let session = Arc::new(Mutex::new(session));
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, session.clone());
        session
    }

    pub fn get(&self, id: Uuid) -> Option<Arc<Mutex<MazeSession>>> {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    pub fn get_all(&self) -> Vec<Arc<Mutex<MazeSession>>> {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }

    pub fn get_by_maze(&self, maze_id: Uuid) -> Vec<Arc<Mutex<MazeSession>>> {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|session| {
                session
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .maze_id()
                    == maze_id
            })
            .cloned()
            .collect()
    }
}
