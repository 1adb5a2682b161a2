//! The token table of the C-like source language. Keywords are declared
//! before `ID`, so the longest-match tie goes to them; the comment and
//! newline rules carry the scanner actions that keep the line count and
//! the read pointer right.

use machina::lexer::{TokenAction, TokenRule};

pub fn token_rules() -> Vec<TokenRule> {
    vec![
        TokenRule::with_action("ENDLINE", "\\\r\\\n|\\\n", TokenAction::Newline),
        TokenRule::new("TAB", "\\\t"),
        TokenRule::new("BLANK", "\\ "),
        TokenRule::with_action("SINGLE_LINE_COMMENT", "\\/\\/", TokenAction::LineComment),
        TokenRule::with_action("MULTILINE_COMMENT", "\\/\\*", TokenAction::BlockComment),
        TokenRule::new("TYPE", "int|float"),
        TokenRule::new("INT", "0|[1-9][0-9]*"),
        TokenRule::new("SEMI", "\\;"),
        TokenRule::new("COMMA", "\\,"),
        TokenRule::new("ASSIGNOP", "\\="),
        TokenRule::new("RELOP", "\\>|\\<|\\>\\=|\\<\\=|\\=\\=|\\!\\="),
        TokenRule::new("PLUS", "\\+"),
        TokenRule::new("MINUS", "\\-"),
        TokenRule::new("STAR", "\\*"),
        TokenRule::new("DIV", "\\/"),
        TokenRule::new("AND", "\\&\\&"),
        TokenRule::new("OR", "\\|\\|"),
        TokenRule::new("DOT", "\\."),
        TokenRule::new("NOT", "\\!"),
        TokenRule::new("LP", "\\("),
        TokenRule::new("RP", "\\)"),
        TokenRule::new("LB", "\\["),
        TokenRule::new("RB", "\\]"),
        TokenRule::new("LC", "\\{"),
        TokenRule::new("RC", "\\}"),
        TokenRule::new("STRUCT", "struct"),
        TokenRule::new("RETURN", "return"),
        TokenRule::new("IF", "if"),
        TokenRule::new("ELSE", "else"),
        TokenRule::new("WHILE", "while"),
        TokenRule::new("ID", "[a-zA-Z_]+[a-zA-Z0-9_]*"),
    ]
}
