use crate::errors::DomainError;

/// Collects every failing field rule so callers see all problems at once.
#[derive(Debug, Default)]
pub struct Violations {
    messages: Vec<String>,
}

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `message` when `failed` holds.
    pub fn check(&mut self, failed: bool, message: impl Into<String>) -> &mut Self {
        if failed {
            self.messages.push(message.into());
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn into_result(self) -> Result<(), DomainError> {
        if self.messages.is_empty() {
            Ok(())
        } else {
            Err(DomainError::ValidationError(self.messages.join("; ")))
        }
    }
}

/// Length in characters, not bytes.
pub fn char_len(value: &str) -> usize {
    value.chars().count()
}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
