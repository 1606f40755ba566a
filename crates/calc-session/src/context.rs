//! Explicit session context.

/// Identity of the calculator being edited.
///
/// Passed into each session instead of living in process-wide state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    /// Calculator id sent with route requests so the service can count usage.
    pub calculator_id: Option<String>,
    pub calculator_name: Option<String>,
}

impl SessionContext {
    pub fn new(calculator_id: impl Into<String>) -> Self {
        Self {
            calculator_id: Some(calculator_id.into()),
            calculator_name: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.calculator_name = Some(name.into());
        self
    }

    /// Short label for log fields.
    pub fn label(&self) -> &str {
        self.calculator_name
            .as_deref()
            .or(self.calculator_id.as_deref())
            .unwrap_or("preview")
    }
}
