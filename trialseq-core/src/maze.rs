use serde::{Deserialize, Serialize};
use std::fmt;

/// Scene a trial is handed to by the presentation layer
#[derive(Copy, Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MazeTag {
    Persistent,
    InformationScreen,
    BeforeStartingScreen,
    ConsentScreen,
    StartScreen,
    InstructionsScreen,
    Practice,
    GetReady,
    MainTrial,
    RestBreak,
    Exit,
}

impl MazeTag {
    /// Setup screens in the order they open every sequence (slots 0..=5).
    pub const SETUP: [MazeTag; 6] = [
        MazeTag::Persistent,
        MazeTag::InformationScreen,
        MazeTag::BeforeStartingScreen,
        MazeTag::ConsentScreen,
        MazeTag::StartScreen,
        MazeTag::InstructionsScreen,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Persistent => "Persistent",
            Self::InformationScreen => "InformationScreen",
            Self::BeforeStartingScreen => "BeforeStartingScreen",
            Self::ConsentScreen => "ConsentScreen",
            Self::StartScreen => "StartScreen",
            Self::InstructionsScreen => "InstructionsScreen",
            Self::Practice => "Practice",
            Self::GetReady => "GetReady",
            Self::MainTrial => "MainTrial",
            Self::RestBreak => "RestBreak",
            Self::Exit => "Exit",
        }
    }

    /// Menu, consent and exit screens that never carry a question.
    pub fn is_administrative(&self) -> bool {
        matches!(
            self,
            Self::Persistent
                | Self::InformationScreen
                | Self::BeforeStartingScreen
                | Self::ConsentScreen
                | Self::StartScreen
                | Self::InstructionsScreen
                | Self::GetReady
                | Self::Exit
        )
    }

    pub fn is_practice(&self) -> bool {
        matches!(self, Self::Practice)
    }

    pub fn is_main(&self) -> bool {
        matches!(self, Self::MainTrial)
    }

    pub fn is_rest_break(&self) -> bool {
        matches!(self, Self::RestBreak)
    }

    pub fn carries_question(&self) -> bool {
        self.is_practice() || self.is_main()
    }
}

impl fmt::Display for MazeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_screens_are_administrative() {
        for tag in MazeTag::SETUP {
            assert!(tag.is_administrative());
            assert!(!tag.carries_question());
        }
        assert!(MazeTag::Exit.is_administrative());
        assert!(MazeTag::GetReady.is_administrative());
    }

    #[test]
    fn question_tags() {
        assert!(MazeTag::Practice.carries_question());
        assert!(MazeTag::MainTrial.carries_question());
        assert!(!MazeTag::RestBreak.carries_question());
        assert!(!MazeTag::RestBreak.is_administrative());
    }

    #[test]
    fn serializes_as_scene_name() {
        let json = serde_json::to_string(&MazeTag::BeforeStartingScreen).unwrap();
        assert_eq!(json, "\"BeforeStartingScreen\"");
        assert_eq!(MazeTag::RestBreak.to_string(), "RestBreak");
    }
}
