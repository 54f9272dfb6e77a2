pub mod maze;
pub mod question;
pub mod random;
pub mod trial;

pub use maze::MazeTag;
pub use question::{Answer, Question, QuestionError};
pub use random::{RandomSource, fisher_yates};
pub use trial::Trial;
