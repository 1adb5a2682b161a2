use crate::dfa::{Dfa, DfaError, DfaState};
use crate::grammar::ll1::{Ll1Parser, Lookahead};
use crate::grammar::{Cfg, GrammarError};
use crate::label::Label;
use crate::lexer::{Lexer, ScanError, TokenAction, TokenRule};
use crate::nfa::Nfa;
use crate::pda::{EmptyStackPda, FinalStatePda, Pda, PdaError};
use crate::regex::{Regex, RegexError};
use crate::*;
use ::regex::Regex as LibRegex;
use proptest::prelude::*;
use rand::prelude::*;
use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;

fn dfa_010() -> Dfa {
    let mut dfa = Dfa::new();
    dfa.set_alphabet(['0', '1']);
    dfa.add_states(["q0", "q1", "q2", "q3"]).unwrap();
    dfa.set_initial("q0").unwrap();
    dfa.set_accepting(["q3"]).unwrap();
    dfa.set_transitions([("q0", '0', "q1"), ("q1", '1', "q2"), ("q2", '0', "q3")])
        .unwrap();
    dfa
}

#[test]
fn dfa_simulation() {
    let dfa = dfa_010();
    assert!(!dfa.run("0").unwrap());
    assert!(!dfa.run("01").unwrap());
    assert!(dfa.run("010").unwrap());
    // Letters outside the alphabet reject without erroring
    assert!(!dfa.run("012").unwrap());
    // An undefined transition rejects
    assert!(!dfa.run("00").unwrap());
}

#[test]
fn dfa_verbose_trace() {
    let dfa = dfa_010();
    let mut trace = String::new();
    assert!(dfa.run_verbose("010", &mut trace).unwrap());
    assert!(trace.starts_with("Pre    : q0\nInput  : 010\nRead   : ^\n"));
    assert!(trace.contains("Read   :   ^\n"));
    assert!(trace.ends_with("Next   : q3\n\n"));
}

#[test]
fn dfa_builder_errors() {
    let mut dfa = dfa_010();
    assert_eq!(
        dfa.add_state("q0"),
        Err(DfaError::DuplicateState("q0".to_string()))
    );
    assert_eq!(
        dfa.add_transition("q0", '2', "q1"),
        Err(DfaError::NonexistentLetter('2'))
    );
    assert_eq!(
        dfa.add_transition("q0", '0', "nope"),
        Err(DfaError::NonexistentState("nope".to_string()))
    );
    // Re-adding the same transition is fine, redefining it is not
    assert_eq!(dfa.add_transition("q0", '0', "q1"), Ok(()));
    assert_eq!(
        dfa.add_transition("q0", '0', "q2"),
        Err(DfaError::ConflictingTransition("q0".to_string(), '0'))
    );

    let empty = Dfa::new();
    assert_eq!(empty.run("x"), Ok(false));
    let mut no_initial = Dfa::new();
    no_initial.set_alphabet(['a']);
    no_initial.add_state("s").unwrap();
    assert_eq!(no_initial.run("a"), Err(DfaError::MissingInitialState));
}

/// The classic 8-state minimisation fixture: 5 states remain and the
/// language is untouched
#[test]
fn dfa_minimize() {
    let mut dfa = Dfa::new();
    dfa.set_alphabet(['0', '1']);
    dfa.add_states(["A", "B", "C", "D", "E", "F", "G", "H"]).unwrap();
    dfa.set_initial("A").unwrap();
    dfa.set_accepting(["C"]).unwrap();
    dfa.set_transitions([
        ("A", '0', "B"),
        ("A", '1', "F"),
        ("B", '0', "G"),
        ("B", '1', "C"),
        ("C", '0', "A"),
        ("C", '1', "C"),
        ("D", '0', "C"),
        ("D", '1', "G"),
        ("E", '0', "H"),
        ("E", '1', "F"),
        ("F", '0', "C"),
        ("F", '1', "G"),
        ("G", '0', "G"),
        ("G", '1', "E"),
        ("H", '0', "G"),
        ("H", '1', "C"),
    ])
    .unwrap();

    let minimal = dfa.minimized().unwrap();
    assert_eq!(minimal.states().len(), 5);
    assert!(minimal.states().iter().any(|s| s.name() == "q4"));
    for input in ["01", "10", "010"] {
        assert_eq!(dfa.run(input).unwrap(), minimal.run(input).unwrap());
    }
    assert!(dfa.equivalent_to(&minimal).unwrap());
}

#[test]
fn minimize_merges_partial_with_partial_only() {
    // x and y differ exactly in y having a defined transition on 'b'
    let mut dfa = Dfa::new();
    dfa.set_alphabet(['a', 'b']);
    dfa.add_states(["s", "x", "y", "f"]).unwrap();
    dfa.set_initial("s").unwrap();
    dfa.set_accepting(["f"]).unwrap();
    dfa.set_transitions([
        ("s", 'a', "x"),
        ("s", 'b', "y"),
        ("x", 'a', "f"),
        ("y", 'a', "f"),
        ("y", 'b', "f"),
    ])
    .unwrap();
    let minimal = dfa.minimized().unwrap();
    assert_eq!(minimal.states().len(), 4);
    assert!(minimal.run("aa").unwrap());
    assert!(minimal.run("bb").unwrap());
    assert!(!minimal.run("ab").unwrap());
}

#[test]
fn dfa_equivalence() {
    let mut d1 = Dfa::new();
    d1.set_alphabet(['a']);
    d1.add_states(["q0", "q1"]).unwrap();
    d1.set_initial("q0").unwrap();
    d1.set_accepting(["q1"]).unwrap();
    d1.add_transition("q0", 'a', "q1").unwrap();

    let mut d2 = Dfa::new();
    d2.set_alphabet(['b']);
    d2.add_states(["q0", "q1"]).unwrap();
    d2.set_initial("q0").unwrap();
    d2.set_accepting(["q1"]).unwrap();
    d2.add_transition("q0", 'b', "q1").unwrap();

    assert!(!d1.equivalent_to(&d2).unwrap());
    assert!(d1.equivalent_to(&d1.clone()).unwrap());
}

/// Two automata with empty languages are equivalent no matter their
/// shape, including the one whose accepting state is unreachable
#[test]
fn empty_languages_are_equivalent() {
    let mut d1 = Dfa::new();
    d1.set_alphabet(['a']);
    d1.add_state("only").unwrap();
    d1.set_initial("only").unwrap();

    let mut d2 = Dfa::new();
    d2.set_alphabet(['a']);
    d2.add_states(["start", "lost"]).unwrap();
    d2.set_initial("start").unwrap();
    d2.set_accepting(["lost"]).unwrap();

    assert!(d1.is_empty().unwrap());
    assert!(d2.is_empty().unwrap());
    assert!(d1.equivalent_to(&d2).unwrap());
    assert!(d2.equivalent_to(&d1).unwrap());
}

#[test]
fn dfa_boolean_ops() {
    let mut accepts_a = Dfa::new();
    accepts_a.set_alphabet(['a']);
    accepts_a.add_states(["q0", "q1"]).unwrap();
    accepts_a.set_initial("q0").unwrap();
    accepts_a.set_accepting(["q1"]).unwrap();
    accepts_a.add_transition("q0", 'a', "q1").unwrap();

    let mut accepts_b = Dfa::new();
    accepts_b.set_alphabet(['b']);
    accepts_b.add_states(["q0", "q1"]).unwrap();
    accepts_b.set_initial("q0").unwrap();
    accepts_b.set_accepting(["q1"]).unwrap();
    accepts_b.add_transition("q0", 'b', "q1").unwrap();

    let union = accepts_b.union(&accepts_a).unwrap();
    assert!(union.run("a").unwrap());
    assert!(union.run("b").unwrap());
    assert!(!union.run("ab").unwrap());

    let intersection = accepts_a.intersection(&accepts_b).unwrap();
    assert!(intersection.is_empty().unwrap());
}

#[test]
fn dfa_complement() {
    let mut accepts_a = Dfa::new();
    accepts_a.set_alphabet(['a']);
    accepts_a.add_states(["q0", "q1"]).unwrap();
    accepts_a.set_initial("q0").unwrap();
    accepts_a.set_accepting(["q1"]).unwrap();
    accepts_a.add_transition("q0", 'a', "q1").unwrap();

    let complement = accepts_a.complement().unwrap();
    assert!(complement.run("").unwrap());
    assert!(!complement.run("a").unwrap());
    assert!(complement.run("aa").unwrap());
    assert!(complement.run("aaa").unwrap());

    // The complement of "every string" is the empty language
    let everything = Regex::new("(a|b)*").unwrap().to_nfa().to_dfa().unwrap();
    assert!(everything.complement().unwrap().is_empty().unwrap());
}

#[test]
fn dfa_difference_chain() {
    let all = {
        let mut dfa = Regex::new("(a|b)*").unwrap().to_nfa().to_dfa().unwrap();
        dfa.minimize().unwrap();
        dfa
    };
    let mut accepts_a = Dfa::new();
    accepts_a.set_alphabet(['a']);
    accepts_a.add_states(["q0", "q1"]).unwrap();
    accepts_a.set_initial("q0").unwrap();
    accepts_a.set_accepting(["q1"]).unwrap();
    accepts_a.add_transition("q0", 'a', "q1").unwrap();

    let mut accepts_b = Dfa::new();
    accepts_b.set_alphabet(['b']);
    accepts_b.add_states(["q0", "q1"]).unwrap();
    accepts_b.set_initial("q0").unwrap();
    accepts_b.set_accepting(["q1"]).unwrap();
    accepts_b.add_transition("q0", 'b', "q1").unwrap();

    let without_a = all.difference(&accepts_a).unwrap();
    assert!(!without_a.run("a").unwrap());
    let without_ab = without_a.difference(&accepts_b).unwrap();
    assert!(!without_ab.run("b").unwrap());
    assert!(without_ab.difference(&all).unwrap().is_empty().unwrap());
}

#[test]
fn dfa_to_regex() {
    // A single accepting state with no transitions
    let mut trivial = Dfa::new();
    trivial.set_alphabet(['a']);
    trivial.add_state("q0").unwrap();
    trivial.set_initial("q0").unwrap();
    trivial.set_accepting(["q0"]).unwrap();
    assert_eq!(trivial.to_regex().unwrap(), "ε+εε*ε");

    // Exactly the string "a"
    let mut just_a = Dfa::new();
    just_a.set_alphabet(['a']);
    just_a.add_states(["q0", "q1"]).unwrap();
    just_a.set_initial("q0").unwrap();
    just_a.set_accepting(["q1"]).unwrap();
    just_a.add_transition("q0", 'a', "q1").unwrap();
    assert_eq!(just_a.to_regex().unwrap(), "a+εε*a+(a+εε*a)ε*ε");

    // No accepting states at all
    let mut empty = Dfa::new();
    empty.set_alphabet(['a']);
    empty.add_state("q0").unwrap();
    empty.set_initial("q0").unwrap();
    assert_eq!(empty.to_regex().unwrap(), "");
}

#[test]
fn nfa_simulation() {
    let mut nfa = Nfa::new();
    nfa.set_alphabet(['0', '1']).unwrap();
    nfa.add_states(["q0", "q1", "q2"]).unwrap();
    nfa.set_initial("q0").unwrap();
    nfa.set_accepting(["q2"]).unwrap();
    nfa.add_transitions([
        ("q0", Label::Symbol('0'), ["q1", "q2"].as_slice()),
        ("q0", Label::Symbol('1'), ["q0"].as_slice()),
        ("q0", Label::Epsilon, ["q2"].as_slice()),
        ("q1", Label::Symbol('0'), ["q1"].as_slice()),
        ("q1", Label::Symbol('1'), ["q2"].as_slice()),
    ])
    .unwrap();

    assert!(nfa.run("").unwrap());
    assert!(nfa.run("11").unwrap());
    assert!(!nfa.run("100").unwrap());
    assert!(nfa.run("1001").unwrap());
}

/// The textbook ε-NFA for (a|b)*abb: the subset construction finds the
/// five classic DFA states
#[test]
fn subset_construction() {
    let mut nfa = Nfa::new();
    nfa.set_alphabet(['a', 'b']).unwrap();
    nfa.add_states(["0", "1", "2", "3", "4", "5", "6", "7", "8", "9", "10"])
        .unwrap();
    nfa.set_initial("0").unwrap();
    nfa.set_accepting(["10"]).unwrap();
    nfa.add_transitions([
        ("0", Label::Epsilon, ["1", "7"].as_slice()),
        ("1", Label::Epsilon, ["2", "4"].as_slice()),
        ("2", Label::Symbol('a'), ["3"].as_slice()),
        ("3", Label::Epsilon, ["6"].as_slice()),
        ("4", Label::Symbol('b'), ["5"].as_slice()),
        ("5", Label::Epsilon, ["6"].as_slice()),
        ("6", Label::Epsilon, ["1", "7"].as_slice()),
        ("7", Label::Symbol('a'), ["8"].as_slice()),
        ("8", Label::Symbol('b'), ["9"].as_slice()),
        ("9", Label::Symbol('b'), ["10"].as_slice()),
    ])
    .unwrap();

    let dfa = nfa.to_dfa().unwrap();
    assert_eq!(dfa.states().len(), 5);
    assert_eq!(dfa.initial_state().unwrap().name(), "s0");
    for accepted in ["abb", "aabb", "babb", "abbabb"] {
        assert!(nfa.run(accepted).unwrap());
        assert!(dfa.run(accepted).unwrap());
    }
    for rejected in ["a", "b", "ab"] {
        assert!(!nfa.run(rejected).unwrap());
        assert!(!dfa.run(rejected).unwrap());
    }
}

#[test]
fn regex_to_dfa() {
    let dfa = Regex::new("(a|b)*abb").unwrap().to_nfa().to_dfa().unwrap();
    for accepted in ["abb", "aabb", "babb", "abbabb"] {
        assert!(dfa.run(accepted).unwrap());
    }
    for rejected in ["a", "b", "ab"] {
        assert!(!dfa.run(rejected).unwrap());
    }
}

#[test]
fn regex_minimal_dfa() {
    let mut dfa = Regex::new("1*0(0|1)*").unwrap().to_nfa().to_dfa().unwrap();
    dfa.minimize().unwrap();
    assert_eq!(dfa.states().len(), 2);
    assert!(dfa.run("1110").unwrap());
    assert!(dfa.run("111100001").unwrap());
    assert!(!dfa.run("1").unwrap());
}

#[test]
fn empty_regex_matches_epsilon() {
    let nfa = Regex::new("").unwrap().to_nfa();
    assert!(nfa.run("").unwrap());
    assert!(!nfa.run("a").unwrap());
}

#[test]
fn regex_escapes_and_classes() {
    let paren = Regex::new("\\(").unwrap().to_nfa().to_dfa().unwrap();
    assert!(paren.run("(").unwrap());

    let letters = Regex::new("[a-z]+").unwrap().to_nfa().to_dfa().unwrap();
    for c in 'a'..='z' {
        assert!(letters.run(&c.to_string()).unwrap());
    }
    assert!(letters.run("abc").unwrap());
    assert!(!letters.run("").unwrap());

    // Inside a class every character is literal, and a trailing '-' is a
    // plain member
    let symbols = Regex::new("[.*+|-]").unwrap().to_nfa().to_dfa().unwrap();
    for s in [".", "*", "+", "|", "-"] {
        assert!(symbols.run(s).unwrap());
    }
    assert!(!symbols.run("a").unwrap());

    let identifier = Regex::new("[a-zA-Z_]+[a-zA-Z0-9_]*")
        .unwrap()
        .to_nfa()
        .to_dfa()
        .unwrap();
    assert!(identifier.run("_a7").unwrap());
    assert!(identifier.run("t0").unwrap());
    assert!(!identifier.run("0123").unwrap());

    let number = Regex::new("0|[1-9][0-9]*").unwrap().to_nfa().to_dfa().unwrap();
    assert!(number.run("0").unwrap());
    assert!(number.run("1").unwrap());
    assert!(number.run("123").unwrap());
    assert!(!number.run("0123").unwrap());
}

#[test]
fn regex_construction_errors() {
    assert_eq!(Regex::new("[a-"), Err(RegexError::UnbalancedBracket));
    assert_eq!(Regex::new("a]"), Err(RegexError::UnbalancedBracket));
    assert_eq!(Regex::new("(a"), Err(RegexError::UnbalancedParenthesis));
    assert_eq!(Regex::new("a)"), Err(RegexError::UnbalancedParenthesis));
    assert_eq!(Regex::new("[z-a]"), Err(RegexError::InvalidRange('z', 'a')));
    assert_eq!(Regex::new("[]"), Err(RegexError::EmptyClass));
    assert_eq!(Regex::new("a|"), Err(RegexError::MalformedExpression));
    assert_eq!(Regex::new("*"), Err(RegexError::MalformedExpression));
    assert_eq!(Regex::new(";"), Err(RegexError::IllegalCharacter(';')));
    assert_eq!(Regex::new("a\\"), Err(RegexError::DanglingEscape));
}

fn matching_pairs() -> Cfg {
    let mut grammar = Cfg::new();
    grammar.set_variables(["S"]).unwrap();
    grammar.set_terminals(['a', 'b']).unwrap();
    grammar.set_start("S").unwrap();
    grammar.add_production("S", ["a", "S", "b"]).unwrap();
    grammar.add_production("S", ["ε"]).unwrap();
    grammar
}

#[test]
fn ll1_table_and_parse() {
    let parser = Ll1Parser::new(matching_pairs()).unwrap();

    let expand = parser.production_for("S", Lookahead::Terminal('a')).unwrap();
    assert_eq!(expand.to_string(), "S -> aSb");
    let epsilon = parser.production_for("S", Lookahead::Terminal('b')).unwrap();
    assert!(epsilon.is_epsilon());
    let at_end = parser.production_for("S", Lookahead::End).unwrap();
    assert!(at_end.is_epsilon());
    assert_eq!(parser.table().len(), 3);

    assert!(parser.parse("aabb"));
    assert!(parser.parse("ab"));
    assert!(parser.parse(""));
    assert!(!parser.parse("aab"));
    assert!(!parser.parse("ba"));
    // Trailing input past a completed derivation is rejected
    assert!(!parser.parse("abb"));
}

#[test]
fn ll1_semantic_actions() {
    let mut grammar = Cfg::new();
    grammar.set_variables(["S"]).unwrap();
    grammar.set_terminals(['a', 'b']).unwrap();
    grammar.set_start("S").unwrap();
    let count = Rc::new(Cell::new(0));
    let counter = count.clone();
    grammar
        .add_production_with_action(
            "S",
            ["a", "S", "b"],
            Rc::new(move || counter.set(counter.get() + 1)),
        )
        .unwrap();
    grammar.add_production("S", ["ε"]).unwrap();

    let parser = Ll1Parser::new(grammar).unwrap();
    assert!(parser.parse("aabb"));
    assert_eq!(count.get(), 2);
}

#[test]
fn ll1_verbose_trace() {
    let parser = Ll1Parser::new(matching_pairs()).unwrap();
    let mut trace = String::new();
    assert!(parser.parse_verbose("ab", &mut trace));
    assert!(trace.contains("Matched_Str   : \n"));
    assert!(trace.contains("Symbol_Stack  : [$, S]"));
    assert!(trace.contains("Unmatched_Str : ab$"));
    assert!(trace.contains("Action        : match 'a'"));
    assert!(trace.contains("Action        : output S -> aSb"));
    assert!(trace.contains("Action        : output S -> ε"));
    assert!(trace.ends_with("Accept input : 'ab'\n"));

    let mut trace = String::new();
    assert!(!parser.parse_verbose("ba", &mut trace));
    assert!(trace.ends_with("Action        : error\n\n"));
}

#[test]
fn ll1_conflict_is_fatal() {
    let mut grammar = Cfg::new();
    grammar.set_variables(["S"]).unwrap();
    grammar.set_terminals(['a']).unwrap();
    grammar.set_start("S").unwrap();
    grammar.add_production("S", ["a", "S"]).unwrap();
    grammar.add_production("S", ["a"]).unwrap();

    match Ll1Parser::new(grammar) {
        Err(GrammarError::Ll1Conflict {
            variable,
            lookahead,
            first,
            second,
        }) => {
            assert_eq!(variable, "S");
            assert_eq!(lookahead, "a");
            assert_eq!(first, "S -> aS");
            assert_eq!(second, "S -> a");
        }
        other => panic!("expected a conflict, got {other:?}"),
    }
}

#[test]
fn grammar_from_text() {
    let cfg: Cfg = parser::grammar(
        "
        # a tiny expression grammar
        E -> T R
        R -> + T R | ε
        T -> a | b
        ",
    )
    .unwrap()
    .try_into()
    .unwrap();
    assert_eq!(cfg.start(), Some("E"));
    assert_eq!(cfg.variables().len(), 3);
    assert!(cfg.terminals().contains(&'+'));

    let parser = Ll1Parser::new(cfg).unwrap();
    assert!(parser.parse("a+b"));
    assert!(parser.parse("b"));
    assert!(!parser.parse("a+"));
}

#[test]
fn grammar_text_rejects_junk() {
    let parsed = parser::grammar("S -> foo").unwrap();
    let result: Result<Cfg, _> = parsed.try_into();
    assert!(result.is_err());

    let parsed = parser::grammar("S -> $").unwrap();
    let result: Result<Cfg, _> = parsed.try_into();
    assert!(result.is_err());
}

fn zeros_then_ones() -> Pda {
    let mut pda = Pda::new();
    pda.set_input_symbols(['0', '1']);
    pda.set_stack_symbols(['0', '1', 'Z']);
    pda.add_states(["q0", "q1"]).unwrap();
    pda.set_initial_state("q0").unwrap();
    pda.set_initial_symbol('Z').unwrap();
    pda.add_transition("q0", '0', 'Z', "q0", "Z0").unwrap();
    pda.add_transition("q0", '0', '0', "q0", "00").unwrap();
    pda.add_transition("q0", '1', '0', "q1", "").unwrap();
    pda.add_transition("q1", '1', '0', "q1", "").unwrap();
    pda.add_transition("q1", Label::Epsilon, 'Z', "q1", "").unwrap();
    pda
}

#[test]
fn pda_empty_stack_acceptance() {
    let pda = EmptyStackPda::new(zeros_then_ones());
    assert!(pda.run("01").unwrap());
    assert!(pda.run("0011").unwrap());
    assert!(!pda.run("001").unwrap());
    assert!(!pda.run("").unwrap());
    // The predicate alone decides: the stack empties after the matched
    // "01" prefix, with input still unread
    assert!(pda.run("011").unwrap());
}

#[test]
fn pda_final_state_acceptance() {
    let mut pda = Pda::new();
    pda.set_input_symbols(['0', '1']);
    pda.set_stack_symbols(['0', '1', 'Z']);
    pda.add_states(["q0", "q1", "q2"]).unwrap();
    pda.set_initial_state("q0").unwrap();
    pda.set_initial_symbol('Z').unwrap();
    pda.add_transition("q0", '0', 'Z', "q1", "Z0").unwrap();
    pda.add_transition("q1", '1', '0', "q2", "01").unwrap();

    let pda = FinalStatePda::new(pda, ["q2"]).unwrap();
    assert!(pda.run("01").unwrap());
    assert!(!pda.run("001").unwrap());
    assert!(!pda.run("").unwrap());
}

#[test]
fn pda_accepts_once_predicate_holds() {
    // The acceptance test runs on every configuration, the initial one
    // included, so an accepting initial state decides before any input
    // is read
    let mut pda = Pda::new();
    pda.set_input_symbols(['a']);
    pda.set_stack_symbols(['Z']);
    pda.add_states(["q0", "q1"]).unwrap();
    pda.set_initial_state("q0").unwrap();
    pda.set_initial_symbol('Z').unwrap();
    pda.add_transition("q0", 'a', 'Z', "q1", "Z").unwrap();

    let pda = FinalStatePda::new(pda, ["q0"]).unwrap();
    assert!(pda.run("").unwrap());
    assert!(pda.run("a").unwrap());
}

#[test]
fn pda_builder_errors() {
    let mut pda = Pda::new();
    pda.set_input_symbols(['0']);
    pda.set_stack_symbols(['Z']);
    pda.add_state("q0").unwrap();
    assert_eq!(
        pda.add_state("q0"),
        Err(PdaError::DuplicateState("q0".to_string()))
    );
    assert_eq!(
        pda.set_initial_symbol('X'),
        Err(PdaError::NonexistentStackSymbol('X'))
    );
    assert_eq!(
        pda.add_transition("q0", '1', 'Z', "q0", ""),
        Err(PdaError::NonexistentInputSymbol('1'))
    );
    assert_eq!(
        pda.add_transition("q0", '0', 'Z', "q0", "ZY"),
        Err(PdaError::NonexistentStackSymbol('Y'))
    );
}

#[test]
fn pda_epsilon_cycle_terminates() {
    // A spontaneous self-loop that leaves the stack unchanged: the
    // configuration repeats and the search must still terminate
    let mut pda = Pda::new();
    pda.set_input_symbols(['0']);
    pda.set_stack_symbols(['Z']);
    pda.add_state("q0").unwrap();
    pda.set_initial_state("q0").unwrap();
    pda.set_initial_symbol('Z').unwrap();
    pda.add_transition("q0", Label::Epsilon, 'Z', "q0", "Z").unwrap();

    let pda = EmptyStackPda::new(pda);
    assert_eq!(pda.run(""), Ok(false));
}

#[test]
fn pda_search_limit() {
    // A spontaneous loop that keeps growing the stack never repeats a
    // configuration, so the budget has to step in
    let mut pda = Pda::new();
    pda.set_input_symbols(['0']);
    pda.set_stack_symbols(['Z']);
    pda.add_state("q0").unwrap();
    pda.set_initial_state("q0").unwrap();
    pda.set_initial_symbol('Z').unwrap();
    pda.add_transition("q0", Label::Epsilon, 'Z', "q0", "ZZ").unwrap();

    let pda = EmptyStackPda::new(pda);
    assert_eq!(pda.run_bounded("", 100), Err(PdaError::SearchLimitExceeded));
}

fn c_like_rules() -> Vec<TokenRule> {
    vec![
        TokenRule::with_action("ENDLINE", "\\\r\\\n|\\\n", TokenAction::Newline),
        TokenRule::new("TAB", "\\\t"),
        TokenRule::new("BLANK", "\\ "),
        TokenRule::with_action("SINGLE_LINE_COMMENT", "\\/\\/", TokenAction::LineComment),
        TokenRule::with_action("MULTILINE_COMMENT", "\\/\\*", TokenAction::BlockComment),
        TokenRule::new("TYPE", "int|float"),
        TokenRule::new("INT", "0|[1-9][0-9]*"),
        TokenRule::new("SEMI", "\\;"),
        TokenRule::new("ASSIGNOP", "\\="),
        TokenRule::new("ID", "[a-zA-Z_]+[a-zA-Z0-9_]*"),
    ]
}

#[test]
fn lexer_scans_c_like_source() {
    let lexer = Lexer::new(c_like_rules()).unwrap();
    let source = "int a = 5; // trailing\n/* multi\nline */ float b;\n";
    let (tokens, lines) = lexer.scan_counting_lines(source).unwrap();

    let significant: Vec<(&str, &str, usize)> = tokens
        .iter()
        .filter(|t| !matches!(t.kind.as_ref(), "BLANK" | "TAB" | "ENDLINE"))
        .map(|t| (t.kind.as_ref(), t.lexeme.as_str(), t.line))
        .collect();
    assert_eq!(
        significant,
        vec![
            ("TYPE", "int", 1),
            ("ID", "a", 1),
            ("ASSIGNOP", "=", 1),
            ("INT", "5", 1),
            ("SEMI", ";", 1),
            ("SINGLE_LINE_COMMENT", "//", 1),
            ("MULTILINE_COMMENT", "/*", 2),
            ("TYPE", "float", 3),
            ("ID", "b", 3),
            ("SEMI", ";", 3),
        ]
    );
    assert_eq!(lines, 4);
}

#[test]
fn lexer_longest_match_prefers_first_declared() {
    let lexer = Lexer::new(c_like_rules()).unwrap();
    // "int" ties between TYPE and ID: TYPE is declared first
    let tokens = lexer.scan("int").unwrap();
    assert_eq!(tokens[0].kind.as_ref(), "TYPE");
    // "intx" is a longer ID match
    let tokens = lexer.scan("intx").unwrap();
    assert_eq!(tokens[0].kind.as_ref(), "ID");
    assert_eq!(tokens[0].lexeme, "intx");
}

#[test]
fn lexer_scan_errors() {
    let lexer = Lexer::new(c_like_rules()).unwrap();
    assert_eq!(
        lexer.scan("int @"),
        Err(ScanError::NoMatch { line: 1, offset: 4 })
    );
    assert_eq!(
        lexer.scan("/* open"),
        Err(ScanError::UnterminatedComment { line: 1 })
    );
}

proptest! {
    /// Minimisation preserves the language, and the minimal automaton is
    /// no larger than the input
    #[test]
    fn minimize_preserves_language(
        dfa in random_dfa(12),
        words in prop::collection::vec("[a-f]{0,8}", 25)
    ) {
        let minimal = dfa.minimized().unwrap();
        prop_assert!(minimal.states().len() <= dfa.states().len());
        for word in &words {
            prop_assert_eq!(minimal.run(word).unwrap(), dfa.run(word).unwrap());
        }
        prop_assert!(dfa.equivalent_to(&minimal).unwrap());
    }

    /// Language-equivalent total automata have minimal forms of the same
    /// size
    #[test]
    fn minimal_dfa_is_unique_in_size(dfa in random_dfa(10)) {
        let total = dfa.completed(dfa.alphabet().iter().copied());
        let minimal = total.minimized().unwrap();
        // The union of an automaton with itself is another (total)
        // automaton for the same language
        let same_language = dfa.union(&dfa).unwrap();
        prop_assert!(same_language.equivalent_to(&dfa).unwrap());
        prop_assert_eq!(same_language.states().len(), minimal.states().len());
    }

    /// The boolean operations agree with per-word evaluation
    #[test]
    fn boolean_laws(
        dfa1 in random_dfa(8),
        dfa2 in random_dfa(8),
        words in prop::collection::vec("[a-f]{0,8}", 25)
    ) {
        let union = dfa1.union(&dfa2).unwrap();
        let intersection = dfa1.intersection(&dfa2).unwrap();
        let difference = dfa1.difference(&dfa2).unwrap();
        let symmetric = dfa1.symmetric_difference(&dfa2).unwrap();
        for word in &words {
            let r1 = dfa1.run(word).unwrap();
            let r2 = dfa2.run(word).unwrap();
            prop_assert_eq!(union.run(word).unwrap(), r1 || r2);
            prop_assert_eq!(intersection.run(word).unwrap(), r1 && r2);
            prop_assert_eq!(difference.run(word).unwrap(), r1 && !r2);
            prop_assert_eq!(symmetric.run(word).unwrap(), r1 != r2);
        }
    }

    /// Complementing twice gives back the original language
    #[test]
    fn complement_involution(
        dfa in random_dfa(8),
        words in prop::collection::vec("[a-f]{0,8}", 25)
    ) {
        let complement = dfa.complement().unwrap();
        let double = complement.complement().unwrap();
        prop_assert!(double.equivalent_to(&dfa).unwrap());
        for word in &words {
            prop_assert_eq!(complement.run(word).unwrap(), !dfa.run(word).unwrap());
        }
    }

    /// The subset construction preserves the language of the NFA
    #[test]
    fn nfa_agrees_with_subset_dfa(
        nfa in small_nfa(8),
        words in prop::collection::vec("[a-c]{0,8}", 25)
    ) {
        let dfa = nfa.to_dfa().unwrap();
        for word in &words {
            prop_assert_eq!(nfa.run(word).unwrap(), dfa.run(word).unwrap());
        }
    }

    /// The regex pipeline agrees with an off-the-shelf regex engine
    #[test]
    fn regex_compiler_against_oracle(
        pattern in random_regex(),
        words in prop::collection::vec("[a-e]{0,10}", 20)
    ) {
        let mut dfa = Regex::new(&pattern).unwrap().to_nfa().to_dfa().unwrap();
        dfa.minimize().unwrap();
        let oracle = LibRegex::new(&format!("^({pattern})$")).unwrap();

        let pattern_chars: HashSet<char> = pattern.chars().collect();
        for word in &words {
            // The DFA alphabet only has the pattern's letters
            let word: String = word.chars().filter(|c| pattern_chars.contains(c)).collect();
            prop_assert_eq!(dfa.run(&word).unwrap(), oracle.is_match(&word));
        }
    }
}

prop_compose! {
    /// A DFA over {a..f} with total transitions and a shuffled alphabet
    /// ordering
    fn random_dfa(max_states: usize)
        (num_states in 1..max_states)
        (
            initial in 0..num_states,
            accepting in prop::collection::vec(any::<bool>(), num_states..=num_states),
            transitions in prop::collection::vec(
                prop::collection::vec(prop::option::of(0..num_states), 6..=6),
                num_states..=num_states
            )
        )
    -> Dfa {
        let states = accepting.into_iter()
            .zip(transitions)
            .enumerate()
            .map(|(idx, (accepting, transitions))| DfaState {
                name: Rc::from(format!("s{idx}")),
                accepting,
                transitions,
            })
            .collect();
        let mut alphabet: Vec<char> = ('a'..='f').collect();
        alphabet.shuffle(&mut thread_rng());
        Dfa {
            alphabet,
            states,
            initial: Some(initial),
        }
    }
}

prop_compose! {
    /// An ε-NFA over {a, b, c}
    fn small_nfa(max_states: usize)
        (num_states in 1..max_states)
        (
            initial in 0..num_states,
            accepting in prop::collection::vec(any::<bool>(), num_states..=num_states),
            epsilon in prop::collection::vec(
                prop::collection::vec(any::<bool>(), num_states..=num_states),
                num_states..=num_states
            ),
            transitions in prop::collection::vec(
                prop::collection::vec(
                    prop::collection::vec(any::<bool>(), num_states..=num_states),
                    3..=3
                ),
                num_states..=num_states
            )
        )
    -> Nfa {
        let indices = |row: Vec<bool>| -> Vec<usize> {
            row.into_iter().enumerate().filter_map(|(idx, b)| b.then_some(idx)).collect()
        };
        let states = accepting.into_iter()
            .zip(epsilon)
            .zip(transitions)
            .enumerate()
            .map(|(idx, ((accepting, epsilon), transitions))| crate::nfa::NfaState {
                name: Rc::from(format!("s{idx}")),
                accepting,
                epsilon_transitions: indices(epsilon),
                transitions: transitions.into_iter().map(indices).collect(),
            })
            .collect();
        Nfa {
            alphabet: vec!['a', 'b', 'c'],
            states,
            initial: Some(initial),
        }
    }
}

fn random_regex() -> impl Strategy<Value = String> {
    "[a-e]".prop_recursive(6, 64, 6, |inner| {
        prop_oneof![
            8 => prop::collection::vec(inner.clone(), 1..6)
                .prop_map(|vec| format!("({})", vec.join(""))),
            8 => prop::collection::vec(inner.clone(), 1..6).prop_map(|vec| vec.join("|")),
            3 => inner.clone().prop_map(|r| format!("({r})*")),
            3 => inner.clone().prop_map(|r| format!("({r})+")),
        ]
    })
}
