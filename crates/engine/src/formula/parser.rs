// Formula parser - converts formula text (without the leading '=') into an AST
// Supports: SUM(A1:B3), AVERAGE(A1:B3), TODAY(), and arithmetic over numbers
// with + - * / and parentheses. Nothing else is accepted.

use crate::col_label::parse_cell_address;

/// Deepest allowed chain of unary signs and parentheses.
const MAX_NESTING: usize = 256;

/// Longest arithmetic expression, in tokens. Bounds the depth of the
/// left-leaning tree a long `1+1+...` chain builds.
const MAX_TOKENS: usize = 4096;

/// Inclusive rectangular range, normalized so start <= end on both axes.
///
/// Formula-side twin of `opsgrid_core::selection::Range` (the selection
/// type); the engine does not depend on the core crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeRef {
    pub start_row: usize,
    pub start_col: usize,
    pub end_row: usize,
    pub end_col: usize,
}

impl RangeRef {
    pub fn new(r1: usize, c1: usize, r2: usize, c2: usize) -> Self {
        Self {
            start_row: r1.min(r2),
            start_col: c1.min(c2),
            end_row: r1.max(r2),
            end_col: c1.max(c2),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Formula {
    Sum(RangeRef),
    Average(RangeRef),
    Today,
    Arithmetic(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Neg(Box<Expr>),
    BinaryOp {
        op: Op,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
}

/// Parse formula source (the text after `=`).
pub fn parse(source: &str) -> Result<Formula, String> {
    let source = source.trim();
    if source.is_empty() {
        return Err("Empty formula".to_string());
    }

    if let Some((name, args)) = split_function_call(source) {
        return parse_function(&name, args);
    }

    let tokens = tokenize(source)?;
    parse_expr(&tokens).map(Formula::Arithmetic)
}

/// `NAME( ... )` -> (uppercased name, inner text). Only matches when the
/// source starts with letters followed by `(` and ends with `)`.
fn split_function_call(source: &str) -> Option<(String, &str)> {
    let name_end = source.find(|c: char| !c.is_ascii_alphabetic())?;
    if name_end == 0 {
        return None;
    }
    let rest = source[name_end..].trim_start();
    let inner = rest.strip_prefix('(')?.strip_suffix(')')?;
    Some((source[..name_end].to_ascii_uppercase(), inner))
}

fn parse_function(name: &str, args: &str) -> Result<Formula, String> {
    match name {
        "SUM" => parse_range(args).map(Formula::Sum),
        "AVERAGE" => parse_range(args).map(Formula::Average),
        "TODAY" => {
            if args.trim().is_empty() {
                Ok(Formula::Today)
            } else {
                Err("TODAY takes no arguments".to_string())
            }
        }
        _ => Err(format!("Unknown function: {}", name)),
    }
}

fn parse_range(text: &str) -> Result<RangeRef, String> {
    let (start, end) = text
        .split_once(':')
        .ok_or_else(|| format!("Invalid range: {}", text.trim()))?;
    let (r1, c1) = parse_cell_address(start)
        .ok_or_else(|| format!("Invalid cell reference: {}", start.trim()))?;
    let (r2, c2) = parse_cell_address(end)
        .ok_or_else(|| format!("Invalid cell reference: {}", end.trim()))?;
    Ok(RangeRef::new(r1, c1, r2, c2))
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' => { chars.next(); }
            '+' => { tokens.push(Token::Plus); chars.next(); }
            '-' => { tokens.push(Token::Minus); chars.next(); }
            '*' => { tokens.push(Token::Star); chars.next(); }
            '/' => { tokens.push(Token::Slash); chars.next(); }
            '(' => { tokens.push(Token::LParen); chars.next(); }
            ')' => { tokens.push(Token::RParen); chars.next(); }
            '0'..='9' | '.' => {
                let mut num_str = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        num_str.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let num: f64 = num_str.parse().map_err(|_| format!("Invalid number: {}", num_str))?;
                tokens.push(Token::Number(num));
            }
            _ => return Err(format!("Unexpected character: {}", c)),
        }
    }

    Ok(tokens)
}

fn parse_expr(tokens: &[Token]) -> Result<Expr, String> {
    if tokens.is_empty() {
        return Err("Empty expression".to_string());
    }
    if tokens.len() > MAX_TOKENS {
        return Err(format!("Formula too long ({} tokens, max {})", tokens.len(), MAX_TOKENS));
    }
    let (expr, pos) = parse_add_sub(tokens, 0, 0)?;
    if pos != tokens.len() {
        return Err(format!("Unexpected token at position {}", pos));
    }
    Ok(expr)
}

/// One level deeper for a sign or an open parenthesis. Checked before the
/// subtree exists, so an over-deep input never builds (or drops) a deep tree.
fn nest(depth: usize) -> Result<usize, String> {
    if depth >= MAX_NESTING {
        Err("Formula nested too deeply".to_string())
    } else {
        Ok(depth + 1)
    }
}

fn parse_add_sub(tokens: &[Token], pos: usize, depth: usize) -> Result<(Expr, usize), String> {
    let (mut left, mut pos) = parse_mul_div(tokens, pos, depth)?;

    while pos < tokens.len() {
        let op = match &tokens[pos] {
            Token::Plus => Op::Add,
            Token::Minus => Op::Sub,
            _ => break,
        };
        let (right, new_pos) = parse_mul_div(tokens, pos + 1, depth)?;
        left = Expr::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        };
        pos = new_pos;
    }

    Ok((left, pos))
}

fn parse_mul_div(tokens: &[Token], pos: usize, depth: usize) -> Result<(Expr, usize), String> {
    let (mut left, mut pos) = parse_unary(tokens, pos, depth)?;

    while pos < tokens.len() {
        let op = match &tokens[pos] {
            Token::Star => Op::Mul,
            Token::Slash => Op::Div,
            _ => break,
        };
        let (right, new_pos) = parse_unary(tokens, pos + 1, depth)?;
        left = Expr::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        };
        pos = new_pos;
    }

    Ok((left, pos))
}

fn parse_unary(tokens: &[Token], pos: usize, depth: usize) -> Result<(Expr, usize), String> {
    match tokens.get(pos) {
        Some(Token::Plus) => parse_unary(tokens, pos + 1, nest(depth)?),
        Some(Token::Minus) => {
            let (expr, pos) = parse_unary(tokens, pos + 1, nest(depth)?)?;
            Ok((Expr::Neg(Box::new(expr)), pos))
        }
        _ => parse_primary(tokens, pos, depth),
    }
}

fn parse_primary(tokens: &[Token], pos: usize, depth: usize) -> Result<(Expr, usize), String> {
    match tokens.get(pos) {
        None => Err("Unexpected end of expression".to_string()),
        Some(Token::Number(n)) => Ok((Expr::Number(*n), pos + 1)),
        Some(Token::LParen) => {
            let (expr, pos) = parse_add_sub(tokens, pos + 1, nest(depth)?)?;
            match tokens.get(pos) {
                Some(Token::RParen) => Ok((expr, pos + 1)),
                Some(_) => Err("Expected closing parenthesis".to_string()),
                None => Err("Missing closing parenthesis".to_string()),
            }
        }
        Some(_) => Err(format!("Unexpected token at position {}", pos)),
    }
}
