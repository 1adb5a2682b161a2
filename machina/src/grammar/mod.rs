//! # Context-free grammars
//! The grammar module includes the [Cfg] struct, a store of productions
//! over named variables and single-letter terminals, and the
//! [LL(1) predictive parser](crate::grammar::ll1::Ll1Parser) built from
//! it. Grammars are constructed through the builder operations, or parsed
//! from a text format with [crate::parser::grammar].
//!
//! ## Example
//! ```
//! use machina::grammar::Cfg;
//! use machina::grammar::ll1::Ll1Parser;
//!
//! let mut grammar = Cfg::new();
//! grammar.set_variables(["S"]).unwrap();
//! grammar.set_terminals(['a', 'b']).unwrap();
//! grammar.set_start("S").unwrap();
//! grammar.add_production("S", ["a", "S", "b"]).unwrap();
//! grammar.add_production("S", ["ε"]).unwrap();
//!
//! let parser = Ll1Parser::new(grammar).unwrap();
//! assert!(parser.parse("aabb"));
//! assert!(parser.parse("ab"));
//! assert!(!parser.parse("aab"));
//! ```

use std::fmt;
use std::rc::Rc;
use thiserror::Error;

pub mod ll1;
pub mod parse;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GrammarError {
    #[error("'{0}' is not a variable of this grammar")]
    UnknownVariable(String),
    #[error("'{0}' is neither a variable, a terminal nor ε")]
    UnknownSymbol(String),
    #[error("'{0}' is reserved and cannot be a grammar symbol")]
    ReservedSymbol(String),
    #[error("ε can only stand alone in a production body")]
    EpsilonInBody,
    #[error("a production body cannot be empty (use ε)")]
    EmptyProductionBody,
    #[error("no start variable has been set")]
    MissingStartVariable,
    #[error("conflicting entries at M[{variable},{lookahead}] when constructing the LL(1) analysis table:\n{first}\n{second}")]
    Ll1Conflict {
        variable: String,
        lookahead: String,
        first: String,
        second: String,
    },
}

/// A grammar symbol: a variable, a single-letter terminal, or the ε
/// sentinel (which only ever appears as the sole element of a production
/// body)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Symbol {
    Variable(Rc<str>),
    Terminal(char),
    Epsilon,
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Variable(name) => write!(f, "{name}"),
            Symbol::Terminal(c) => write!(f, "{c}"),
            Symbol::Epsilon => write!(f, "ε"),
        }
    }
}

/// A production `head -> body`, with an optional semantic action invoked
/// by the predictive parser whenever the production is expanded
#[derive(Clone)]
pub struct Production {
    pub(crate) head: Rc<str>,
    pub(crate) body: Vec<Symbol>,
    pub(crate) action: Option<Rc<dyn Fn()>>,
}

impl Production {
    /// Gets the head variable of this production
    pub fn head(&self) -> &str {
        &self.head
    }

    /// Gets the body of this production
    pub fn body(&self) -> &[Symbol] {
        &self.body
    }

    /// Checks if this is the ε-production of its head
    pub fn is_epsilon(&self) -> bool {
        self.body == [Symbol::Epsilon]
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> ", self.head)?;
        self.body.iter().try_for_each(|symbol| write!(f, "{symbol}"))
    }
}

impl fmt::Debug for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Production({self})")
    }
}

/// A context-free grammar: variables, single-letter terminals, a start
/// variable and a list of productions. The end-of-input marker `$` is
/// reserved and is neither a variable nor a terminal.
#[derive(Clone, Debug, Default)]
pub struct Cfg {
    pub(crate) variables: Vec<Rc<str>>,
    pub(crate) terminals: Vec<char>,
    pub(crate) productions: Vec<Production>,
    pub(crate) start: Option<Rc<str>>,
}

impl Cfg {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the variables. `$` and `ε` are reserved; duplicates are
    /// ignored.
    pub fn set_variables<'a>(
        &mut self,
        names: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), GrammarError> {
        let mut variables: Vec<Rc<str>> = Vec::new();
        for name in names {
            if name == "$" || name == "ε" {
                return Err(GrammarError::ReservedSymbol(name.to_string()));
            }
            if variables.iter().all(|v| v.as_ref() != name) {
                variables.push(Rc::from(name));
            }
        }
        self.variables = variables;
        Ok(())
    }

    /// Replaces the terminals. `$` and `ε` are reserved; duplicates are
    /// ignored.
    pub fn set_terminals(
        &mut self,
        letters: impl IntoIterator<Item = char>,
    ) -> Result<(), GrammarError> {
        let mut terminals = Vec::new();
        for letter in letters {
            if letter == '$' || letter == 'ε' {
                return Err(GrammarError::ReservedSymbol(letter.to_string()));
            }
            if !terminals.contains(&letter) {
                terminals.push(letter);
            }
        }
        self.terminals = terminals;
        Ok(())
    }

    /// Sets the start variable, which must be a variable
    pub fn set_start(&mut self, name: &str) -> Result<(), GrammarError> {
        match self.variable(name) {
            Some(variable) => {
                self.start = Some(variable);
                Ok(())
            }
            None => Err(GrammarError::UnknownVariable(name.to_string())),
        }
    }

    /// Adds a production. The head must be a variable; every body element
    /// must name a variable, a terminal, or be `"ε"` (resolved in that
    /// order), and ε is only allowed as the sole element of the body.
    pub fn add_production<'a>(
        &mut self,
        head: &str,
        body: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), GrammarError> {
        self.push_production(head, body, None)
    }

    /// Adds a production with a semantic action, which the predictive
    /// parser invokes each time it expands the production
    pub fn add_production_with_action<'a>(
        &mut self,
        head: &str,
        body: impl IntoIterator<Item = &'a str>,
        action: Rc<dyn Fn()>,
    ) -> Result<(), GrammarError> {
        self.push_production(head, body, Some(action))
    }

    fn push_production<'a>(
        &mut self,
        head: &str,
        body: impl IntoIterator<Item = &'a str>,
        action: Option<Rc<dyn Fn()>>,
    ) -> Result<(), GrammarError> {
        let head = self
            .variable(head)
            .ok_or_else(|| GrammarError::UnknownVariable(head.to_string()))?;
        let mut symbols = Vec::new();
        for elem in body {
            symbols.push(self.resolve(elem)?);
        }
        if symbols.is_empty() {
            return Err(GrammarError::EmptyProductionBody);
        }
        if symbols.len() > 1 && symbols.contains(&Symbol::Epsilon) {
            return Err(GrammarError::EpsilonInBody);
        }
        self.productions.push(Production {
            head,
            body: symbols,
            action,
        });
        Ok(())
    }

    fn resolve(&self, elem: &str) -> Result<Symbol, GrammarError> {
        if let Some(variable) = self.variable(elem) {
            return Ok(Symbol::Variable(variable));
        }
        let mut chars = elem.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if self.terminals.contains(&c) {
                return Ok(Symbol::Terminal(c));
            }
            if c == 'ε' {
                return Ok(Symbol::Epsilon);
            }
        }
        Err(GrammarError::UnknownSymbol(elem.to_string()))
    }

    fn variable(&self, name: &str) -> Option<Rc<str>> {
        self.variables
            .iter()
            .find(|v| v.as_ref() == name)
            .cloned()
    }

    /// Gets the variables of this grammar
    pub fn variables(&self) -> &[Rc<str>] {
        &self.variables
    }

    /// Gets the terminals of this grammar
    pub fn terminals(&self) -> &[char] {
        &self.terminals
    }

    /// Gets the productions of this grammar, in insertion order
    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    /// Gets the productions with the given head
    pub fn productions_of<'a>(&'a self, head: &'a str) -> impl Iterator<Item = &'a Production> {
        self.productions
            .iter()
            .filter(move |p| p.head.as_ref() == head)
    }

    /// Gets the start variable, if one has been set
    pub fn start(&self) -> Option<&str> {
        self.start.as_deref()
    }
}

impl fmt::Display for Cfg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for production in &self.productions {
            writeln!(f, "{production}")?;
        }
        Ok(())
    }
}
