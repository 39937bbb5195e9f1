use std::collections::HashMap;

use crate::number::Number;

/// Call-local bindings, consulted before the global variables.
pub type Bindings = HashMap<String, Number>;

/// A single-parameter user function. The body is kept as source text (already
/// rewritten for implicit multiplication) and parsed again on every call.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub param: String,
    pub body: String,
}

/// Variables and functions defined during a session. Built once at startup
/// and handed down by reference; nothing is ever removed.
#[derive(Debug, Default, Clone)]
pub struct Environment {
    variables: HashMap<String, Number>,
    functions: HashMap<String, Function>,
}

impl Environment {
    pub fn new() -> Environment {
        Environment::default()
    }

    pub fn variable(&self, name: &str) -> Option<Number> {
        self.variables.get(name).copied()
    }

    pub fn set_variable(&mut self, name: &str, value: Number) {
        self.variables.insert(name.to_owned(), value);
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }

    pub fn define_function(&mut self, name: &str, param: &str, body: &str) {
        self.functions.insert(
            name.to_owned(),
            Function {
                param: param.to_owned(),
                body: body.to_owned(),
            },
        );
    }

    /// Looks `name` up in `locals` first, then in the globals.
    pub fn resolve(&self, name: &str, locals: Option<&Bindings>) -> Option<Number> {
        locals
            .and_then(|locals| locals.get(name).copied())
            .or_else(|| self.variable(name))
    }
}
