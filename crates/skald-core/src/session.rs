//! Session identity: a stable thread plus a per-attempt run id.

use std::fmt;

use uuid::Uuid;

/// Stable identity of a logical conversation with the agent. Set once when
/// a session is created and unchanged by resumes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ThreadId(String);

impl ThreadId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of one execution attempt within a thread. Regenerated for every
/// run request, initial and resumed alike.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RunId(String);

impl RunId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of the current session. Created on `start`, carried across
/// `resume`, discarded on `reset`.
#[derive(Debug, Clone)]
pub struct RunSession {
    pub thread_id: ThreadId,
    pub run_id: RunId,
}

impl RunSession {
    pub fn new() -> Self {
        Self {
            thread_id: ThreadId::generate(),
            run_id: RunId::generate(),
        }
    }

    /// Allocate a fresh run id for a resume attempt. The thread id is the
    /// part that must stay stable so the remote checkpoint is found again.
    pub fn next_run(&mut self) -> &RunId {
        self.run_id = RunId::generate();
        &self.run_id
    }
}

impl Default for RunSession {
    fn default() -> Self {
        Self::new()
    }
}
