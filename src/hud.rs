//! Score and status labels

use serde::{Deserialize, Serialize};

/// The two text labels shown over the playfield
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hud {
    pub score: String,
    pub status: String,
}

impl Hud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_score(&mut self, text: String) {
        self.score = text;
    }

    pub fn set_status(&mut self, text: String) {
        if text != self.status {
            log::debug!("Status: {:?}", text);
        }
        self.status = text;
    }

    /// One-line summary for logs
    pub fn line(&self) -> String {
        if self.status.is_empty() {
            format!("[{}]", self.score)
        } else {
            format!("[{}] {}", self.score, self.status)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_formats() {
        let mut hud = Hud::new();
        hud.set_score("3".to_string());
        assert_eq!(hud.line(), "[3]");

        hud.set_status("Score: 3".to_string());
        assert_eq!(hud.line(), "[3] Score: 3");
    }
}
