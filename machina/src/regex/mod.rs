//! # Regular expressions
//! An extended regular expression compiler: patterns are tokenised,
//! character classes expanded, the implicit concatenation operator
//! inserted, the stream translated to postfix by a shunting yard and the
//! postfix form folded into an NFA with the Thompson construction.
//!
//! ## Syntax
//! Operands are the ASCII alphanumerics; any other character can be made
//! an operand by escaping it with a backslash. The operators, in rising
//! precedence, are alternation `|`, (implicit) concatenation, and the
//! closures `*` and `+`. `(` `)` group, and `[` `]` enclose a character
//! class: inside it every character is literal, except that `-` between
//! two characters denotes the inclusive code-point range. The empty
//! pattern matches exactly the empty string.
//!
//! ## Example
//! ```
//! use machina::regex::Regex;
//!
//! let regex = Regex::new("(a|b)*abb").unwrap();
//! let dfa = regex.to_nfa().to_dfa().unwrap();
//! assert!(dfa.run("abb").unwrap());
//! assert!(dfa.run("babb").unwrap());
//! assert!(!dfa.run("ab").unwrap());
//!
//! let identifier = Regex::new("[a-zA-Z_]+[a-zA-Z0-9_]*").unwrap();
//! let dfa = identifier.to_nfa().to_dfa().unwrap();
//! assert!(dfa.run("_a7").unwrap());
//! assert!(!dfa.run("0123").unwrap());
//! ```

use crate::label::Label;
use crate::nfa::{Nfa, NfaState};
use compile::{insert_concat, validate, ShuntingYard, Token, Tokenizer};
use std::collections::BTreeSet;
use std::rc::Rc;
use thiserror::Error;

mod compile;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegexError {
    #[error("illegal character '{0}' (escape it to match it literally)")]
    IllegalCharacter(char),
    #[error("unbalanced character class bracket")]
    UnbalancedBracket,
    #[error("unbalanced parenthesis")]
    UnbalancedParenthesis,
    #[error("empty character class")]
    EmptyClass,
    #[error("invalid range '{0}-{1}' in character class")]
    InvalidRange(char, char),
    #[error("dangling escape at end of pattern")]
    DanglingEscape,
    #[error("malformed expression")]
    MalformedExpression,
}

/// A compiled regular expression, holding the validated postfix form of
/// the pattern. Constructing a [Regex] runs the whole front end, so a
/// successfully constructed value always yields an NFA.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Regex {
    pattern: String,
    postfix: Vec<Token>,
}

impl Regex {
    /// Compiles a pattern into its postfix form, reporting malformed
    /// patterns (illegal characters, unbalanced brackets or parentheses,
    /// reversed ranges, dangling escapes, missing operands) as errors
    pub fn new(pattern: &str) -> Result<Regex, RegexError> {
        let tokens = Tokenizer::tokenize(pattern)?;
        let tokens = insert_concat(tokens);
        let postfix = ShuntingYard::to_postfix(tokens)?;
        validate(&postfix)?;
        Ok(Regex {
            pattern: pattern.to_string(),
            postfix,
        })
    }

    /// Gets the source pattern of this regex
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Converts this regular expression to an NFA with the Thompson
    /// construction. The states of the result are named `s0`, `s1`, … in
    /// construction order, and its alphabet is exactly the set of letters
    /// occurring in the pattern.
    pub fn to_nfa(&self) -> Nfa {
        ThompsonBuilder::default().build(&self.postfix)
    }
}

/// One NFA fragment under construction, with a single entry and a single
/// exit state
#[derive(Debug, Clone, Copy)]
struct Fragment {
    start: usize,
    end: usize,
}

/// The mutable environment of the Thompson construction: the edge lists
/// of the states allocated so far, the stack of finished fragments, and
/// the buffer that collects class members until their `@` terminator.
#[derive(Debug, Default)]
struct ThompsonBuilder {
    edges: Vec<Vec<(Label, usize)>>,
    fragments: Vec<Fragment>,
    class_buffer: Vec<char>,
}

impl ThompsonBuilder {
    fn build(mut self, postfix: &[Token]) -> Nfa {
        for &token in postfix {
            match token {
                Token::Literal(c) => {
                    let fragment = self.leaf(|builder, start, end| {
                        builder.connect(start, Label::Symbol(c), end)
                    });
                    self.fragments.push(fragment);
                }
                Token::ClassMember(c) => self.class_buffer.push(c),
                Token::ClassEnd => {
                    let members = std::mem::take(&mut self.class_buffer);
                    let fragment = self.leaf(|builder, start, end| {
                        for member in members {
                            builder.connect(start, Label::Symbol(member), end);
                        }
                    });
                    self.fragments.push(fragment);
                }
                Token::Concat => {
                    let second = self.pop();
                    let first = self.pop();
                    self.connect(first.end, Label::Epsilon, second.start);
                    self.fragments.push(Fragment {
                        start: first.start,
                        end: second.end,
                    });
                }
                Token::Union => {
                    let second = self.pop();
                    let first = self.pop();
                    let fragment = self.leaf(|builder, start, end| {
                        builder.connect(start, Label::Epsilon, first.start);
                        builder.connect(start, Label::Epsilon, second.start);
                        builder.connect(first.end, Label::Epsilon, end);
                        builder.connect(second.end, Label::Epsilon, end);
                    });
                    self.fragments.push(fragment);
                }
                Token::Star | Token::Plus => {
                    let inner = self.pop();
                    let fragment = self.leaf(|builder, start, end| {
                        builder.connect(start, Label::Epsilon, inner.start);
                        builder.connect(inner.end, Label::Epsilon, inner.start);
                        builder.connect(inner.end, Label::Epsilon, end);
                        if token == Token::Star {
                            builder.connect(start, Label::Epsilon, end);
                        }
                    });
                    self.fragments.push(fragment);
                }
                Token::LParen | Token::RParen | Token::LBracket | Token::RBracket => {
                    unreachable!("grouping tokens do not reach the postfix stream")
                }
            }
        }

        let fragment = self.fragments.pop().unwrap_or_else(|| {
            // The empty pattern: a lone state accepting the empty string
            let state = self.new_state();
            Fragment {
                start: state,
                end: state,
            }
        });

        let alphabet: Vec<char> = self
            .edges
            .iter()
            .flatten()
            .filter_map(|(label, _)| label.symbol())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let states = self
            .edges
            .iter()
            .enumerate()
            .map(|(idx, edges)| {
                let mut transitions = vec![vec![]; alphabet.len()];
                let mut epsilon_transitions = vec![];
                for &(label, target) in edges {
                    match label {
                        Label::Epsilon => epsilon_transitions.push(target),
                        Label::Symbol(c) => {
                            let letter = alphabet
                                .iter()
                                .position(|&a| a == c)
                                .expect("alphabet was collected from these edges");
                            transitions[letter].push(target);
                        }
                    }
                }
                NfaState {
                    name: Rc::from(format!("s{idx}")),
                    accepting: idx == fragment.end,
                    epsilon_transitions,
                    transitions,
                }
            })
            .collect();

        Nfa {
            alphabet,
            states,
            initial: Some(fragment.start),
        }
    }

    /// Allocates a fresh start/end pair and lets `wire` add the edges of
    /// the new fragment
    fn leaf(&mut self, wire: impl FnOnce(&mut Self, usize, usize)) -> Fragment {
        let start = self.new_state();
        let end = self.new_state();
        wire(self, start, end);
        Fragment { start, end }
    }

    fn new_state(&mut self) -> usize {
        self.edges.push(Vec::new());
        self.edges.len() - 1
    }

    fn connect(&mut self, from: usize, label: Label, to: usize) {
        self.edges[from].push((label, to));
    }

    fn pop(&mut self) -> Fragment {
        self.fragments
            .pop()
            .expect("postfix stream was validated at construction")
    }
}
