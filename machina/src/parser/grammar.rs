use crate::parser::{ParsedGrammar, ParsedRule};
use nom::branch::alt;
use nom::bytes::complete::{tag, take_till1};
use nom::character::complete::{char, line_ending, not_line_ending, space0, space1};
use nom::combinator::{eof, map, opt, recognize, value, verify};
use nom::multi::{many0, many1, separated_list1};
use nom::sequence::{delimited, pair, terminated};
use nom::IResult;

pub(crate) fn full_grammar(input: &str) -> IResult<&str, ParsedGrammar> {
    map(
        delimited(
            many0(space_comment_line),
            separated_list1(many1(space_comment_line), rule),
            many0(space_comment_line),
        ),
        |rules| ParsedGrammar { rules },
    )(input)
}

fn rule(input: &str) -> IResult<&str, ParsedRule> {
    map(
        delimited(
            space0,
            pair(
                terminated(symbol, delimited(space0, arrow, space0)),
                separated_list1(delimited(space0, char('|'), space0), alternative),
            ),
            space_comment,
        ),
        |(head, alternatives)| ParsedRule { head, alternatives },
    )(input)
}

fn alternative(input: &str) -> IResult<&str, Vec<&str>> {
    separated_list1(space1, symbol)(input)
}

fn symbol(input: &str) -> IResult<&str, &str> {
    verify(
        take_till1(|c: char| c.is_whitespace() || "#|".contains(c)),
        |elem| !["->", "→"].contains(&elem),
    )(input)
}

fn arrow(input: &str) -> IResult<&str, ()> {
    map(alt((tag("->"), tag("→"))), |_| ())(input)
}

fn space_comment_line(input: &str) -> IResult<&str, ()> {
    // A space-only or comment-only line may end with a line ending or
    // eof, but must consume *something*, otherwise many0 around this
    // parser would loop at eof
    value(
        (),
        verify(
            recognize(terminated(space_comment, alt((line_ending, eof)))),
            |consumed: &str| !consumed.is_empty(),
        ),
    )(input)
}

fn space_comment(input: &str) -> IResult<&str, ()> {
    value((), pair(space0, opt(comment)))(input)
}

fn comment(input: &str) -> IResult<&str, ()> {
    value((), pair(tag("#"), not_line_ending))(input)
}
