//! # Lexer harness
//! A longest-match tokeniser driven by one DFA per token kind. Each
//! [TokenRule] is a (name, pattern, optional action) triple; at
//! construction every pattern is compiled regex → NFA → minimised DFA.
//! Scanning tries every rule at the read position and picks the longest
//! match, resolving ties in favour of the rule declared first, so
//! keywords win over identifiers simply by being declared earlier.
//!
//! Rule actions keep the scanner state honest: [TokenAction::Newline]
//! bumps the line counter, and the comment actions consume input past
//! the token itself (to the end of the line, or to the closing `*/`).
//!
//! ## Example
//! ```
//! use machina::lexer::{Lexer, TokenRule};
//!
//! let lexer = Lexer::new([
//!     TokenRule::new("TYPE", "int|float"),
//!     TokenRule::new("ID", "[a-z]+"),
//!     TokenRule::new("BLANK", "\\ "),
//! ]).unwrap();
//!
//! let tokens = lexer.scan("int foo").unwrap();
//! let kinds: Vec<&str> = tokens.iter().map(|t| t.kind.as_ref()).collect();
//! assert_eq!(kinds, ["TYPE", "BLANK", "ID"]);
//! ```

use crate::dfa::Dfa;
use crate::regex::{Regex, RegexError};
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LexerError {
    #[error("invalid pattern for token '{0}': {1}")]
    InvalidPattern(String, RegexError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScanError {
    #[error("syntax error at line {line}, offset {offset}")]
    NoMatch { line: usize, offset: usize },
    #[error("unterminated comment starting at line {line}")]
    UnterminatedComment { line: usize },
}

/// A side effect a token kind has on the scanner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenAction {
    /// Increment the line counter
    Newline,
    /// Consume the rest of the line (the newline itself is left for the
    /// newline rule to count)
    LineComment,
    /// Consume up to and including the closing `*/`, counting the lines
    /// swallowed on the way
    BlockComment,
}

/// One token kind: its name, the regex its lexemes match, and an
/// optional scanner action
#[derive(Debug, Clone)]
pub struct TokenRule {
    name: String,
    pattern: String,
    action: Option<TokenAction>,
}

impl TokenRule {
    pub fn new(name: &str, pattern: &str) -> Self {
        Self {
            name: name.to_string(),
            pattern: pattern.to_string(),
            action: None,
        }
    }

    pub fn with_action(name: &str, pattern: &str, action: TokenAction) -> Self {
        Self {
            action: Some(action),
            ..Self::new(name, pattern)
        }
    }
}

/// A scanned token: its kind, its lexeme, and the line it starts on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: Rc<str>,
    pub lexeme: String,
    pub line: usize,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[ id: {} lexeme: {:?} line: {} ]",
            self.kind, self.lexeme, self.line
        )
    }
}

#[derive(Debug, Clone)]
struct CompiledRule {
    name: Rc<str>,
    dfa: Dfa,
    action: Option<TokenAction>,
}

impl CompiledRule {
    /// Runs this rule's DFA greedily from `begin`, returning the end of
    /// the farthest non-empty accepted prefix
    fn longest_match(&self, chars: &[char], begin: usize) -> Option<usize> {
        let mut eval = self
            .dfa
            .evaluator()
            .expect("token DFAs have initial states");
        let mut last_accepting = None;
        let mut pos = begin;
        while pos < chars.len() {
            if eval.step(chars[pos]).is_none() {
                break;
            }
            pos += 1;
            if eval.is_accepting() {
                last_accepting = Some(pos);
            }
        }
        last_accepting
    }
}

/// A compiled scanner over a fixed list of token rules
#[derive(Debug, Clone)]
pub struct Lexer {
    rules: Vec<CompiledRule>,
}

impl Lexer {
    /// Compiles every rule's pattern to a minimised DFA. A malformed
    /// pattern fails construction, naming the offending rule.
    pub fn new(rules: impl IntoIterator<Item = TokenRule>) -> Result<Self, LexerError> {
        let mut compiled = Vec::new();
        for rule in rules {
            let regex = Regex::new(&rule.pattern)
                .map_err(|e| LexerError::InvalidPattern(rule.name.clone(), e))?;
            let mut dfa = regex
                .to_nfa()
                .to_dfa()
                .expect("compiled NFAs have initial states");
            dfa.minimize().expect("subset construction keeps the initial state");
            compiled.push(CompiledRule {
                name: Rc::from(rule.name.as_str()),
                dfa,
                action: rule.action,
            });
        }
        Ok(Self { rules: compiled })
    }

    /// Scans the whole input into tokens, left to right. Every rule match
    /// emits a token (whitespace and comment kinds included), then runs
    /// the rule's action. A position where no rule matches is a
    /// [ScanError].
    pub fn scan(&self, input: &str) -> Result<Vec<Token>, ScanError> {
        self.scan_counting_lines(input).map(|(tokens, _)| tokens)
    }

    /// Scans the input and also reports the final value of the line
    /// counter
    pub fn scan_counting_lines(&self, input: &str) -> Result<(Vec<Token>, usize), ScanError> {
        let chars: Vec<char> = input.chars().collect();
        let mut tokens = Vec::new();
        let mut line = 1usize;
        let mut pos = 0usize;
        while pos < chars.len() {
            let mut best: Option<(usize, usize)> = None;
            for (idx, rule) in self.rules.iter().enumerate() {
                if let Some(end) = rule.longest_match(&chars, pos) {
                    if best.map_or(true, |(_, best_end)| end > best_end) {
                        best = Some((idx, end));
                    }
                }
            }
            let Some((rule_idx, end)) = best else {
                return Err(ScanError::NoMatch { line, offset: pos });
            };
            let rule = &self.rules[rule_idx];
            tokens.push(Token {
                kind: rule.name.clone(),
                lexeme: chars[pos..end].iter().collect(),
                line,
            });
            pos = end;
            match rule.action {
                None => {}
                Some(TokenAction::Newline) => line += 1,
                Some(TokenAction::LineComment) => {
                    while pos < chars.len() && chars[pos] != '\n' {
                        pos += 1;
                    }
                }
                Some(TokenAction::BlockComment) => {
                    let opened_at = line;
                    let mut seen_star = false;
                    let mut closed = false;
                    while pos < chars.len() {
                        let c = chars[pos];
                        pos += 1;
                        if c == '\n' {
                            line += 1;
                        }
                        if seen_star && c == '/' {
                            closed = true;
                            break;
                        }
                        seen_star = c == '*';
                    }
                    if !closed {
                        return Err(ScanError::UnterminatedComment { line: opened_at });
                    }
                }
            }
        }
        Ok((tokens, line))
    }
}
