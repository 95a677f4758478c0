use crate::ast::Value;

/// How bound values appear in generated CQL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParamMode {
    /// `?` placeholders with values collected in order.
    #[default]
    Placeholder,
    /// Values encoded inline as literals, for display and logging.
    Inline,
}

/// Context for parameterized statement building.
#[derive(Debug, Clone, Default)]
pub struct ParamContext {
    pub mode: ParamMode,
    /// Collected parameter values in placeholder order
    pub params: Vec<Value>,
}

impl ParamContext {
    pub fn new(mode: ParamMode) -> Self {
        Self {
            mode,
            params: Vec::new(),
        }
    }

    /// Add a value and return the text standing for it.
    pub fn add_param(&mut self, value: Value) -> String {
        match self.mode {
            ParamMode::Placeholder => {
                self.params.push(value);
                "?".to_string()
            }
            ParamMode::Inline => value.to_cql_literal(),
        }
    }

    /// Take over the values of a clause emitted after everything added so far.
    pub fn extend(&mut self, other: &ParamContext) {
        self.params.extend(other.params.iter().cloned());
    }

    pub fn into_params(self) -> Vec<Value> {
        self.params
    }
}

/// Clause text with the values its placeholders bind.
#[derive(Debug, Clone, Default)]
pub struct Clause {
    pub text: String,
    pub params: ParamContext,
}

impl Clause {
    pub fn new(mode: ParamMode) -> Self {
        Self {
            text: String::new(),
            params: ParamContext::new(mode),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn push_str(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub fn push_param(&mut self, value: Value) {
        let placeholder = self.params.add_param(value);
        self.text.push_str(&placeholder);
    }
}
