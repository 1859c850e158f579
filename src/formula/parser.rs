use super::Formula;
use crate::error::AggregationError;
use anyhow::Result;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TOKEN_PATTERN: Regex = Regex::new(r"^\s*(->|[~&|()]|[[:alnum:]]+)").unwrap();
    static ref BLANK_PATTERN: Regex = Regex::new(r"^\s*$").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Atom(String),
    Not,
    And,
    Or,
    Implies,
    LeftParen,
    RightParen,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Atom(a) => format!(r#"atom "{}""#, a),
            Token::Not => r#""~""#.to_string(),
            Token::And => r#""&""#.to_string(),
            Token::Or => r#""|""#.to_string(),
            Token::Implies => r#""->""#.to_string(),
            Token::LeftParen => r#""(""#.to_string(),
            Token::RightParen => r#"")""#.to_string(),
        }
    }
}

fn tokenize(text: &str) -> Result<Vec<(usize, Token)>> {
    let mut tokens = Vec::new();
    let mut position = 0;
    while !BLANK_PATTERN.is_match(&text[position..]) {
        let remaining = &text[position..];
        let captures = match TOKEN_PATTERN.captures(remaining) {
            Some(c) => c,
            None => {
                let offset = remaining.len() - remaining.trim_start().len();
                let unexpected = remaining.trim_start().chars().next().unwrap_or_default();
                return Err(AggregationError::syntax(
                    position + offset,
                    format!(r#"unexpected character "{}""#, unexpected),
                )
                .into());
            }
        };
        let token_match = captures.get(1).unwrap();
        let token = match token_match.as_str() {
            "->" => Token::Implies,
            "~" => Token::Not,
            "&" => Token::And,
            "|" => Token::Or,
            "(" => Token::LeftParen,
            ")" => Token::RightParen,
            atom => Token::Atom(atom.to_string()),
        };
        tokens.push((position + token_match.start(), token));
        position += captures.get(0).unwrap().end();
    }
    Ok(tokens)
}

/// A parser for propositional formulas.
///
/// Atoms are maximal runs of ASCII alphanumeric characters.
/// The operators are, from the tightest to the loosest: the negation `~` (prefix), the disjunction `|`, the conjunction `&` and the implication `->`.
/// The three binary operators are left-associative; parentheses override the precedence.
/// A chain of the same operator builds a single n-ary node, so `a & b & c` is a conjunction of three operands.
///
/// Note that the disjunction binds tighter than the conjunction: `a | b & c` reads `(a | b) & c`.
///
/// # Example
///
/// ```
/// # use jaggr::formula::{FormulaParser, Formula};
/// let parser = FormulaParser;
/// let f = parser.parse("~a | b & c").unwrap();
/// assert_eq!("((~a | b) & c)", f.to_string());
/// assert!(parser.parse("a b").is_err());
/// ```
#[derive(Default, Debug, Clone, Copy)]
pub struct FormulaParser;

impl FormulaParser {
    /// Parses a formula.
    ///
    /// In case the text is not a well-formed formula, an [`AggregationError::Syntax`] is returned.
    pub fn parse(&self, text: &str) -> Result<Formula> {
        let tokens = tokenize(text)?;
        if tokens.is_empty() {
            return Err(AggregationError::syntax(0, "empty formula").into());
        }
        let text_len = text.len();
        let mut groups = vec![Group::new(0)];
        let mut expect_operand = true;
        for (position, token) in tokens {
            if expect_operand {
                match token {
                    Token::Not => current_group(&mut groups).negations += 1,
                    Token::Atom(a) => {
                        current_group(&mut groups).push_operand(Formula::Atom(a));
                        expect_operand = false;
                    }
                    Token::LeftParen => groups.push(Group::new(position)),
                    t => {
                        return Err(AggregationError::syntax(
                            position,
                            format!("expected an operand, found {}", t.describe()),
                        )
                        .into())
                    }
                }
                continue;
            }
            expect_operand = true;
            match token {
                Token::Or => {}
                Token::And => current_group(&mut groups).close_disjunction(),
                Token::Implies => current_group(&mut groups).close_conjunction(),
                Token::RightParen if groups.len() > 1 => {
                    let inner = current_group(&mut groups).take_formula();
                    groups.pop();
                    current_group(&mut groups).push_operand(inner);
                    expect_operand = false;
                }
                Token::RightParen => {
                    return Err(
                        AggregationError::syntax(position, "unmatched closing parenthesis").into(),
                    )
                }
                t if groups.len() > 1 => {
                    return Err(AggregationError::syntax(
                        position,
                        format!("expected \")\", found {}", t.describe()),
                    )
                    .into())
                }
                t => {
                    return Err(AggregationError::syntax(
                        position,
                        format!("unexpected {} after a complete formula", t.describe()),
                    )
                    .into())
                }
            }
        }
        if expect_operand {
            return Err(AggregationError::syntax(text_len, "unexpected end of formula").into());
        }
        if groups.len() > 1 {
            let position = current_group(&mut groups).open_position;
            return Err(AggregationError::syntax(position, "missing closing parenthesis").into());
        }
        Ok(current_group(&mut groups).take_formula())
    }
}

/// Parses a formula with the default [`FormulaParser`].
pub fn parse(text: &str) -> Result<Formula> {
    FormulaParser.parse(text)
}

fn current_group(groups: &mut [Group]) -> &mut Group {
    let last = groups.len() - 1;
    &mut groups[last]
}

// the top level or a parenthesized subformula being parsed
struct Group {
    open_position: usize,
    negations: usize,
    disjuncts: Vec<Formula>,
    conjuncts: Vec<Formula>,
    premise: Option<Formula>,
}

impl Group {
    fn new(open_position: usize) -> Self {
        Self {
            open_position,
            negations: 0,
            disjuncts: vec![],
            conjuncts: vec![],
            premise: None,
        }
    }

    fn push_operand(&mut self, mut operand: Formula) {
        for _ in 0..self.negations {
            operand = Formula::not(operand);
        }
        self.negations = 0;
        self.disjuncts.push(operand);
    }

    fn close_disjunction(&mut self) {
        let disjuncts = std::mem::take(&mut self.disjuncts);
        self.conjuncts.push(n_ary(disjuncts, Formula::Or));
    }

    fn close_conjunction(&mut self) {
        let premise = self.take_formula();
        self.premise = Some(premise);
    }

    // the group must end with an operand
    fn take_formula(&mut self) -> Formula {
        self.close_disjunction();
        let conclusion = n_ary(std::mem::take(&mut self.conjuncts), Formula::And);
        match self.premise.take() {
            None => conclusion,
            Some(premise) => Formula::implies(premise, conclusion),
        }
    }
}

fn n_ary(mut operands: Vec<Formula>, builder: fn(Vec<Formula>) -> Formula) -> Formula {
    if operands.len() == 1 {
        operands.swap_remove(0)
    } else {
        builder(operands)
    }
}
