//! # LL(1) table construction and predictive parsing
//! FIRST and FOLLOW are computed as fixed points, the analysis table maps
//! `(variable, lookahead)` to at most one production (a second assignment
//! to a cell is an LL(1) conflict and aborts construction), and the
//! parser drives a symbol stack against the input, optionally tracing
//! every step.

use crate::grammar::{Cfg, GrammarError, Production, Symbol};
use crate::table::KeyedTable;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

/// A lookahead: a terminal of the grammar or the end-of-input marker `$`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lookahead {
    Terminal(char),
    End,
}

impl fmt::Display for Lookahead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookahead::Terminal(c) => write!(f, "{c}"),
            Lookahead::End => write!(f, "$"),
        }
    }
}

/// An LL(1) predictive parser: a grammar together with its conflict-free
/// analysis table. Construction fails on grammars that are not LL(1).
#[derive(Debug, Clone)]
pub struct Ll1Parser {
    grammar: Cfg,
    table: KeyedTable<(Rc<str>, Lookahead), usize>,
}

impl Ll1Parser {
    /// Builds the analysis table for the given grammar. For each
    /// production `A -> α`, the cell `M[A, a]` is assigned for every
    /// terminal `a` in FIRST(α), and, if ε ∈ FIRST(α), for every
    /// lookahead in FOLLOW(A). A second assignment to any cell aborts
    /// with [GrammarError::Ll1Conflict] naming both productions.
    pub fn new(grammar: Cfg) -> Result<Self, GrammarError> {
        let table = TableBuilder::new(&grammar).build()?;
        Ok(Self { grammar, table })
    }

    /// Gets the grammar this parser was built from
    pub fn grammar(&self) -> &Cfg {
        &self.grammar
    }

    /// Gets the analysis table, mapping `(variable, lookahead)` to
    /// indices into [Cfg::productions]
    pub fn table(&self) -> &KeyedTable<(Rc<str>, Lookahead), usize> {
        &self.table
    }

    /// Looks up the production predicted for a variable and a lookahead
    pub fn production_for(&self, variable: &str, lookahead: Lookahead) -> Option<&Production> {
        let key = (Rc::from(variable), lookahead);
        self.table
            .get(&key)
            .map(|&id| &self.grammar.productions()[id])
    }

    /// Parses the input with the predictive algorithm, returning whether
    /// it is a sentence of the grammar. Semantic actions of expanded
    /// productions are invoked as a side effect.
    pub fn parse(&self, input: &str) -> bool {
        self.parse_impl(input, None)
    }

    /// As [Ll1Parser::parse], but appends a four-line trace per step to
    /// `trace`: the matched prefix, the symbol stack (bottom to top), the
    /// unmatched remainder and the action taken (`match '<terminal>'`,
    /// `output <production>` or `error`), with a final
    /// `Accept input : '<input>'` line on success.
    pub fn parse_verbose(&self, input: &str, trace: &mut String) -> bool {
        self.parse_impl(input, Some(trace))
    }

    fn parse_impl(&self, input: &str, mut trace: Option<&mut String>) -> bool {
        let start = self
            .grammar
            .start
            .clone()
            .expect("table construction requires a start variable");
        let symbols: Vec<char> = input.chars().collect();
        let mut ptr = 0usize;
        let mut stack = vec![StackEntry::End, StackEntry::Variable(start)];
        let mut action = String::new();

        write_step(&mut trace, &symbols, ptr, &stack, &action);
        loop {
            let top = stack.last().expect("stack bottoms out at $").clone();
            if top == StackEntry::End {
                break;
            }
            let lookahead = symbols
                .get(ptr)
                .map(|&c| Lookahead::Terminal(c))
                .unwrap_or(Lookahead::End);
            match top {
                StackEntry::Terminal(t) if lookahead == Lookahead::Terminal(t) => {
                    stack.pop();
                    ptr += 1;
                    action = format!("match '{t}'");
                }
                StackEntry::Terminal(_) => action = "error".to_string(),
                StackEntry::Variable(variable) => {
                    match self.table.get(&(variable, lookahead)) {
                        None => action = "error".to_string(),
                        Some(&id) => {
                            let production = &self.grammar.productions()[id];
                            action = format!("output {production}");
                            stack.pop();
                            if !production.is_epsilon() {
                                for symbol in production.body().iter().rev() {
                                    match symbol {
                                        Symbol::Variable(name) => {
                                            stack.push(StackEntry::Variable(name.clone()))
                                        }
                                        Symbol::Terminal(c) => stack.push(StackEntry::Terminal(*c)),
                                        Symbol::Epsilon => {}
                                    }
                                }
                            }
                            if let Some(callback) = &production.action {
                                callback();
                            }
                        }
                    }
                }
                StackEntry::End => unreachable!("handled before the match"),
            }
            write_step(&mut trace, &symbols, ptr, &stack, &action);
            if action == "error" {
                return false;
            }
        }

        let accepted = ptr == symbols.len();
        if accepted {
            if let Some(out) = trace {
                out.push_str(&format!("Accept input : '{input}'\n"));
            }
        }
        accepted
    }
}

/// A symbol on the parser stack: the `$` bottom marker, a variable or a
/// terminal
#[derive(Debug, Clone, PartialEq, Eq)]
enum StackEntry {
    End,
    Variable(Rc<str>),
    Terminal(char),
}

impl fmt::Display for StackEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackEntry::End => write!(f, "$"),
            StackEntry::Variable(name) => write!(f, "{name}"),
            StackEntry::Terminal(c) => write!(f, "{c}"),
        }
    }
}

fn write_step(
    trace: &mut Option<&mut String>,
    symbols: &[char],
    ptr: usize,
    stack: &[StackEntry],
    action: &str,
) {
    let Some(out) = trace else { return };
    let matched: String = symbols[..ptr].iter().collect();
    let unmatched: String = symbols[ptr..].iter().collect::<String>() + "$";
    let stack_str = stack
        .iter()
        .map(|entry| entry.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    out.push_str(&format!(
        "Matched_Str   : {matched}\n\
         Symbol_Stack  : [{stack_str}]\n\
         Unmatched_Str : {unmatched}\n\
         Action        : {action}\n\n"
    ));
}

/// The mutable environment of the table construction: the FIRST sets
/// (keyed by symbol, holding terminals and ε) and the FOLLOW sets (keyed
/// by variable, holding lookaheads), both grown to a fixed point.
struct TableBuilder<'g> {
    grammar: &'g Cfg,
    first: HashMap<Symbol, HashSet<Symbol>>,
    follow: HashMap<Rc<str>, HashSet<Lookahead>>,
}

impl<'g> TableBuilder<'g> {
    fn new(grammar: &'g Cfg) -> Self {
        let mut first: HashMap<Symbol, HashSet<Symbol>> = HashMap::new();
        for &terminal in grammar.terminals() {
            first.insert(
                Symbol::Terminal(terminal),
                HashSet::from([Symbol::Terminal(terminal)]),
            );
        }
        let mut follow = HashMap::new();
        for variable in grammar.variables() {
            first.insert(Symbol::Variable(variable.clone()), HashSet::new());
            follow.insert(variable.clone(), HashSet::new());
        }
        Self {
            grammar,
            first,
            follow,
        }
    }

    fn build(mut self) -> Result<KeyedTable<(Rc<str>, Lookahead), usize>, GrammarError> {
        self.compute_first();
        self.compute_follow()?;

        let mut table = KeyedTable::new();
        for (id, production) in self.grammar.productions().iter().enumerate() {
            let body_first = self.first_of_string(production.body());
            for symbol in &body_first {
                if let Symbol::Terminal(c) = symbol {
                    self.add_entry(&mut table, production, Lookahead::Terminal(*c), id)?;
                }
            }
            if body_first.contains(&Symbol::Epsilon) {
                let follow = self.follow[&production.head].iter().copied().collect::<Vec<_>>();
                for lookahead in follow {
                    self.add_entry(&mut table, production, lookahead, id)?;
                }
            }
        }
        Ok(table)
    }

    fn add_entry(
        &self,
        table: &mut KeyedTable<(Rc<str>, Lookahead), usize>,
        production: &Production,
        lookahead: Lookahead,
        id: usize,
    ) -> Result<(), GrammarError> {
        let key = (production.head.clone(), lookahead);
        if let Some(&existing) = table.get(&key) {
            return Err(GrammarError::Ll1Conflict {
                variable: production.head.to_string(),
                lookahead: lookahead.to_string(),
                first: self.grammar.productions()[existing].to_string(),
                second: production.to_string(),
            });
        }
        table.insert(key, id);
        Ok(())
    }

    /// Grows the FIRST sets to a fixed point: for every production
    /// `X -> Y1…Yn`, FIRST(X) absorbs the FIRST of the body string
    fn compute_first(&mut self) {
        let mut updated = true;
        while updated {
            updated = false;
            for production in self.grammar.productions() {
                let additions = self.first_of_string(production.body());
                let set = self
                    .first
                    .get_mut(&Symbol::Variable(production.head.clone()))
                    .expect("every production head is a declared variable");
                for symbol in additions {
                    updated |= set.insert(symbol);
                }
            }
        }
    }

    /// The FIRST set of a symbol string: the union of FIRST(Yi)∖{ε} for
    /// the longest prefix of symbols admitting ε, plus ε iff every symbol
    /// does (in particular, the empty string yields {ε})
    fn first_of_string(&self, body: &[Symbol]) -> HashSet<Symbol> {
        let mut result = HashSet::new();
        for symbol in body {
            match symbol {
                Symbol::Epsilon => {
                    result.insert(Symbol::Epsilon);
                    return result;
                }
                Symbol::Terminal(c) => {
                    result.insert(Symbol::Terminal(*c));
                    return result;
                }
                Symbol::Variable(_) => {
                    let first = &self.first[symbol];
                    result.extend(first.iter().filter(|s| **s != Symbol::Epsilon).cloned());
                    if !first.contains(&Symbol::Epsilon) {
                        return result;
                    }
                }
            }
        }
        result.insert(Symbol::Epsilon);
        result
    }

    /// Grows the FOLLOW sets to a fixed point: FOLLOW(S) starts at {$},
    /// and for every production `A -> αBβ`, FOLLOW(B) absorbs
    /// FIRST(β)∖{ε}, plus FOLLOW(A) whenever β admits ε
    fn compute_follow(&mut self) -> Result<(), GrammarError> {
        let start = self
            .grammar
            .start
            .clone()
            .ok_or(GrammarError::MissingStartVariable)?;
        self.follow
            .get_mut(&start)
            .ok_or_else(|| GrammarError::UnknownVariable(start.to_string()))?
            .insert(Lookahead::End);

        let mut updated = true;
        while updated {
            updated = false;
            for production in self.grammar.productions() {
                let body = production.body();
                for (idx, symbol) in body.iter().enumerate() {
                    let Symbol::Variable(variable) = symbol else {
                        continue;
                    };
                    let suffix_first = self.first_of_string(&body[idx + 1..]);
                    let mut additions: HashSet<Lookahead> = suffix_first
                        .iter()
                        .filter_map(|s| match s {
                            Symbol::Terminal(c) => Some(Lookahead::Terminal(*c)),
                            _ => None,
                        })
                        .collect();
                    if suffix_first.contains(&Symbol::Epsilon) {
                        additions.extend(self.follow[&production.head].iter().copied());
                    }
                    let set = self
                        .follow
                        .get_mut(variable)
                        .expect("every body variable is declared");
                    for lookahead in additions {
                        updated |= set.insert(lookahead);
                    }
                }
            }
        }
        Ok(())
    }
}
