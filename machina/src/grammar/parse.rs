//! Validation of a [ParsedGrammar](crate::parser::ParsedGrammar) into a
//! [Cfg]. The raw parse only checks the shape of the text; this step
//! resolves symbols and builds the production store.

use crate::grammar::{Cfg, Production, Symbol};
use crate::parser::ParsedGrammar;
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GrammarParseError<'a> {
    #[error("symbol '{0}' is neither a rule head, a single-letter terminal nor ε")]
    UnknownSymbol(&'a str),
    #[error("the end marker '$' cannot be used as a grammar symbol")]
    ReservedDollar,
    #[error("ε can only stand alone in an alternative")]
    EpsilonInBody,
}

impl<'a> TryFrom<ParsedGrammar<'a>> for Cfg {
    type Error = GrammarParseError<'a>;

    /// Builds a grammar from parsed rules. All rule heads become
    /// variables, the first head is the start variable, and every other
    /// single-character body token becomes a terminal. `ε` (or `eps`)
    /// stands for the empty body.
    fn try_from(value: ParsedGrammar<'a>) -> Result<Self, Self::Error> {
        let mut variables: Vec<Rc<str>> = Vec::new();
        for rule in &value.rules {
            if rule.head == "$" {
                return Err(GrammarParseError::ReservedDollar);
            }
            if variables.iter().all(|v| v.as_ref() != rule.head) {
                variables.push(Rc::from(rule.head));
            }
        }

        let is_epsilon = |token: &str| token == "ε" || token == "eps";
        let mut terminals: Vec<char> = Vec::new();
        let mut productions = Vec::new();
        for rule in &value.rules {
            let head: Rc<str> = variables
                .iter()
                .find(|v| v.as_ref() == rule.head)
                .expect("every head was collected")
                .clone();
            for alternative in &rule.alternatives {
                let mut body = Vec::new();
                for &token in alternative {
                    if let Some(variable) = variables.iter().find(|v| v.as_ref() == token) {
                        body.push(Symbol::Variable(variable.clone()));
                    } else if is_epsilon(token) {
                        if alternative.len() > 1 {
                            return Err(GrammarParseError::EpsilonInBody);
                        }
                        body.push(Symbol::Epsilon);
                    } else {
                        let mut chars = token.chars();
                        match (chars.next(), chars.next()) {
                            (Some('$'), None) => return Err(GrammarParseError::ReservedDollar),
                            (Some(c), None) => {
                                if !terminals.contains(&c) {
                                    terminals.push(c);
                                }
                                body.push(Symbol::Terminal(c));
                            }
                            _ => return Err(GrammarParseError::UnknownSymbol(token)),
                        }
                    }
                }
                productions.push(Production {
                    head: head.clone(),
                    body,
                    action: None,
                });
            }
        }

        let start = variables.first().cloned();
        Ok(Cfg {
            variables,
            terminals,
            productions,
            start,
        })
    }
}
