use crate::maze::MazeTag;
use crate::question::Question;
use serde::Serialize;
use std::sync::Arc;

/// One step of the sequence: the scene to load and, for practice and main
/// trials, the question it presents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trial {
    pub maze: MazeTag,
    pub question: Option<Arc<Question>>,
}

impl Trial {
    pub fn administrative(maze: MazeTag) -> Self {
        Self {
            maze,
            question: None,
        }
    }

    pub fn practice(question: Arc<Question>) -> Self {
        Self {
            maze: MazeTag::Practice,
            question: Some(question),
        }
    }

    pub fn main(question: Arc<Question>) -> Self {
        Self {
            maze: MazeTag::MainTrial,
            question: Some(question),
        }
    }

    pub fn rest_break() -> Self {
        Self::administrative(MazeTag::RestBreak)
    }

    pub fn question(&self) -> Option<&Question> {
        self.question.as_deref()
    }
}
