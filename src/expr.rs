//! Arithmetic expressions: text rewriting, tokenizing, parsing into a tree and
//! evaluating that tree against an [`Environment`].
//!
//! Parsing is a shunting-yard pass over the token list. Precedence, lowest
//! first: `+ -`, `* / % //`, prefix `- +`, `**`. Exponentiation is right
//! associative and a prefix sign to its right binds to the exponent, so
//! `-2**2` is -4 and `2**-1` is 0.5.

use std::fmt;

use tracing::debug;

use crate::env::{Bindings, Environment};
use crate::error::{CalcError, EvalResult};
use crate::number::Number;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Mod,
    FloorDiv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Plus,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(Number),
    Name(String),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Call(String, Vec<Expr>),
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{}", n),
            Expr::Name(name) => f.write_str(name),
            Expr::Unary(op, operand) => {
                let sign = match op {
                    UnaryOp::Neg => '-',
                    UnaryOp::Plus => '+',
                };
                write!(f, "({}{})", sign, operand)
            }
            Expr::Binary(op, lhs, rhs) => {
                let symbol = match op {
                    BinaryOp::Add => "+",
                    BinaryOp::Sub => "-",
                    BinaryOp::Mul => "*",
                    BinaryOp::Div => "/",
                    BinaryOp::Pow => "**",
                    BinaryOp::Mod => "%",
                    BinaryOp::FloorDiv => "//",
                };
                write!(f, "({} {} {})", lhs, symbol, rhs)
            }
            Expr::Call(name, args) => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str(")")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(Number),
    Ident(String),
    // '+' '-' '*' '/' '^' (power) '%' and 'f' (floor division)
    Operator(char),
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::Ident(name) => f.write_str(name),
            Token::Operator('^') => f.write_str("**"),
            Token::Operator('f') => f.write_str("//"),
            Token::Operator(op) => write!(f, "{}", op),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
        }
    }
}

#[derive(PartialEq, Eq, PartialOrd, Ord, Debug)]
enum Precedence {
    Lowest,
    Addition,
    Multiplication,
    UnarySign,
    Exponentiation,
}

fn get_precedence(op: char) -> Precedence {
    match op {
        '+' | '-' => Precedence::Addition,
        '*' | '/' | '%' | 'f' => Precedence::Multiplication,
        // prefix minus and prefix plus
        'n' | 'p' => Precedence::UnarySign,
        '^' => Precedence::Exponentiation,
        _ => Precedence::Lowest,
    }
}

/// Inserts `*` between a digit and a following letter or `(`, and between a
/// letter or `)` and a following digit. Only the two adjacent characters are
/// looked at, so `x2y` becomes `x*2*y` and `1e5` becomes `1*e*5`.
pub fn insert_implicit_multiplication(expr: &str) -> String {
    let mut out = String::with_capacity(expr.len() + 8);
    let mut prev: Option<char> = None;
    for c in expr.chars() {
        if let Some(p) = prev {
            let digit_then_letter = p.is_ascii_digit() && (c.is_ascii_alphabetic() || c == '(');
            let letter_then_digit = (p.is_ascii_alphabetic() || p == ')') && c.is_ascii_digit();
            if digit_then_letter || letter_then_digit {
                out.push('*');
            }
        }
        out.push(c);
        prev = Some(c);
    }
    out
}

/// `^` means power, then implicit multiplication is made explicit.
pub fn preprocess(expr: &str) -> String {
    insert_implicit_multiplication(&expr.replace('^', "**"))
}

fn syntax_error(msg: impl Into<String>) -> CalcError {
    CalcError::Syntax(msg.into())
}

fn tokenize(input: &str) -> Result<Vec<(Token, usize)>, CalcError> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut index = 0;

    while index < bytes.len() {
        let c = bytes[index];
        if c.is_ascii_whitespace() {
            index += 1;
            continue;
        }

        let start = index;
        match c {
            b'(' => {
                tokens.push((Token::LParen, start));
                index += 1;
            }
            b')' => {
                tokens.push((Token::RParen, start));
                index += 1;
            }
            b'*' if bytes.get(index + 1) == Some(&b'*') => {
                tokens.push((Token::Operator('^'), start));
                index += 2;
            }
            b'/' if bytes.get(index + 1) == Some(&b'/') => {
                tokens.push((Token::Operator('f'), start));
                index += 2;
            }
            b'+' | b'-' | b'*' | b'/' | b'%' => {
                tokens.push((Token::Operator(c as char), start));
                index += 1;
            }
            _ if c.is_ascii_digit() || c == b'.' => {
                let (number, end) = scan_number(input, index)?;
                tokens.push((Token::Number(number), start));
                index = end;
            }
            _ if c.is_ascii_alphabetic() || c == b'_' => {
                while index < bytes.len()
                    && (bytes[index].is_ascii_alphanumeric() || bytes[index] == b'_')
                {
                    index += 1;
                }
                tokens.push((Token::Ident(input[start..index].to_owned()), start));
            }
            _ => {
                let bad = input[start..].chars().next().unwrap_or('?');
                return Err(syntax_error(format!(
                    "invalid character '{}' at position {}",
                    bad, start
                )));
            }
        }
    }

    Ok(tokens)
}

fn scan_number(input: &str, mut index: usize) -> Result<(Number, usize), CalcError> {
    let bytes = input.as_bytes();
    let start = index;
    let mut integer = true;

    while index < bytes.len() {
        match bytes[index] {
            b'0'..=b'9' => index += 1,
            b'.' if integer => {
                integer = false;
                index += 1;
            }
            _ => break,
        }
    }

    let text = &input[start..index];
    if text == "." {
        return Err(syntax_error(format!("invalid syntax at position {}", start)));
    }
    if integer {
        if text.len() > 1 && text.starts_with('0') && text.bytes().any(|b| b != b'0') {
            return Err(syntax_error(
                "leading zeros in decimal integer literals are not permitted",
            ));
        }
        if let Ok(n) = text.parse::<i64>() {
            return Ok((Number::Int(n), index));
        }
    }
    text.parse::<f64>()
        .map(|x| (Number::Float(x), index))
        .map_err(|_| syntax_error(format!("invalid number '{}'", text)))
}

enum Pending {
    Op(char),
    Paren,
    Call(String),
}

fn apply_operator(output: &mut Vec<Expr>, op: char) -> Result<(), CalcError> {
    let missing = || syntax_error(format!("missing operand for '{}'", op));
    match op {
        'n' | 'p' => {
            let operand = output.pop().ok_or_else(missing)?;
            let unary = if op == 'n' { UnaryOp::Neg } else { UnaryOp::Plus };
            output.push(Expr::Unary(unary, Box::new(operand)));
        }
        _ => {
            let rhs = output.pop().ok_or_else(missing)?;
            let lhs = output.pop().ok_or_else(missing)?;
            let binary = match op {
                '+' => BinaryOp::Add,
                '-' => BinaryOp::Sub,
                '*' => BinaryOp::Mul,
                '/' => BinaryOp::Div,
                '^' => BinaryOp::Pow,
                '%' => BinaryOp::Mod,
                'f' => BinaryOp::FloorDiv,
                _ => return Err(syntax_error(format!("unknown operator '{}'", op))),
            };
            output.push(Expr::Binary(binary, Box::new(lhs), Box::new(rhs)));
        }
    }
    Ok(())
}

/// Parses already preprocessed text into an expression tree.
pub fn parse(input: &str) -> Result<Expr, CalcError> {
    let tokens = tokenize(input)?;
    debug!("tokens: {:?}", tokens);

    let mut output: Vec<Expr> = Vec::new();
    let mut stack: Vec<Pending> = Vec::new();
    let mut expect_operand = true;
    let mut tokens = tokens.into_iter().peekable();

    while let Some((token, pos)) = tokens.next() {
        let unexpected =
            || syntax_error(format!("invalid syntax near '{}' at position {}", token, pos));
        match &token {
            Token::Number(n) => {
                if !expect_operand {
                    return Err(unexpected());
                }
                output.push(Expr::Number(*n));
                expect_operand = false;
            }
            Token::Ident(name) => {
                if !expect_operand {
                    return Err(unexpected());
                }
                if matches!(tokens.peek(), Some((Token::LParen, _))) {
                    tokens.next();
                    if matches!(tokens.peek(), Some((Token::RParen, _))) {
                        tokens.next();
                        output.push(Expr::Call(name.clone(), Vec::new()));
                        expect_operand = false;
                    } else {
                        stack.push(Pending::Call(name.clone()));
                    }
                } else {
                    output.push(Expr::Name(name.clone()));
                    expect_operand = false;
                }
            }
            Token::LParen => {
                if !expect_operand {
                    return Err(unexpected());
                }
                stack.push(Pending::Paren);
            }
            Token::RParen => {
                if expect_operand {
                    return Err(unexpected());
                }
                loop {
                    match stack.pop() {
                        Some(Pending::Op(op)) => apply_operator(&mut output, op)?,
                        Some(Pending::Paren) => break,
                        Some(Pending::Call(name)) => {
                            let arg = output.pop().ok_or_else(unexpected)?;
                            output.push(Expr::Call(name, vec![arg]));
                            break;
                        }
                        None => return Err(syntax_error("unmatched ')'")),
                    }
                }
            }
            Token::Operator(op) => {
                let op = *op;
                if expect_operand {
                    match op {
                        '-' => stack.push(Pending::Op('n')),
                        '+' => stack.push(Pending::Op('p')),
                        _ => return Err(unexpected()),
                    }
                    continue;
                }
                while let Some(Pending::Op(top)) = stack.last() {
                    let top = *top;
                    if get_precedence(top) > get_precedence(op)
                        || (get_precedence(top) == get_precedence(op) && op != '^')
                    {
                        stack.pop();
                        apply_operator(&mut output, top)?;
                    } else {
                        break;
                    }
                }
                stack.push(Pending::Op(op));
                expect_operand = true;
            }
        }
    }

    if expect_operand {
        return Err(syntax_error("unexpected end of input"));
    }

    while let Some(pending) = stack.pop() {
        match pending {
            Pending::Op(op) => apply_operator(&mut output, op)?,
            Pending::Paren | Pending::Call(_) => return Err(syntax_error("'(' was never closed")),
        }
    }

    match (output.pop(), output.is_empty()) {
        (Some(tree), true) => Ok(tree),
        _ => Err(syntax_error("invalid syntax")),
    }
}

/// Evaluates `expr` with `locals` (if any) shadowing the global variables.
/// Every failure comes back as a [`CalcError`]; nothing here panics on bad
/// input.
pub fn evaluate(expr: &str, env: &Environment, locals: Option<&Bindings>) -> EvalResult {
    let text = preprocess(expr);
    let tree = parse(&text)?;
    debug!("parsed '{}' as {}", text, tree);
    eval_tree(&tree, env, locals)
}

pub fn eval_tree(tree: &Expr, env: &Environment, locals: Option<&Bindings>) -> EvalResult {
    match tree {
        Expr::Number(n) => Ok(*n),
        Expr::Name(name) => env
            .resolve(name, locals)
            .ok_or_else(|| CalcError::UnknownVariable(name.clone())),
        Expr::Unary(op, operand) => {
            let value = eval_tree(operand, env, locals)?;
            match op {
                UnaryOp::Neg => Ok(-value),
                UnaryOp::Plus => Err(CalcError::UnsupportedUnaryOperator),
            }
        }
        Expr::Binary(op, lhs, rhs) => {
            let a = eval_tree(lhs, env, locals)?;
            let b = eval_tree(rhs, env, locals)?;
            match op {
                BinaryOp::Add => Ok(a + b),
                BinaryOp::Sub => Ok(a - b),
                BinaryOp::Mul => Ok(a * b),
                BinaryOp::Div => a.try_div(b),
                BinaryOp::Pow => a.try_pow(b),
                BinaryOp::Mod | BinaryOp::FloorDiv => Err(CalcError::UnsupportedOperator),
            }
        }
        Expr::Call(..) => Err(CalcError::UnsupportedExpression),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(expr: &str) -> EvalResult {
        evaluate(expr, &Environment::new(), None)
    }

    #[test]
    fn implicit_multiplication() {
        let tests = vec![
            ("6x", "6*x"),
            ("6(x+1)", "6*(x+1)"),
            ("x6", "x*6"),
            ("(x+1)6", "(x+1)*6"),
            ("(1+1)2", "(1+1)*2"),
            ("2x3y", "2*x*3*y"),
            ("12ab", "12*ab"),
            ("1e5", "1*e*5"),
            ("f(x)", "f(x)"),
            (")(", ")("),
        ];
        for (input, expected) in tests {
            assert_eq!(insert_implicit_multiplication(input), expected, "input = {}", input);
        }
    }

    #[test]
    fn arithmetic() {
        let tests = vec![
            ("2+3*4", Number::Int(14)),
            ("2^3", Number::Int(8)),
            ("2**3**2", Number::Int(512)),
            ("(2+3)*4", Number::Int(20)),
            ("10-4-3", Number::Int(3)),
            ("-2^2", Number::Int(-4)),
            ("(-2)^2", Number::Int(4)),
            ("2^-1", Number::Float(0.5)),
            ("--3", Number::Int(3)),
            ("1---3", Number::Int(-2)),
            ("2*-3", Number::Int(-6)),
            ("7/2", Number::Float(3.5)),
            ("6/3", Number::Float(2.0)),
            ("1.5*2", Number::Float(3.0)),
            (".5+1", Number::Float(1.5)),
            ("(1+1)2", Number::Int(4)),
            (" 1 +  2 ", Number::Int(3)),
            ("0", Number::Int(0)),
            ("00", Number::Int(0)),
        ];
        for (input, expected) in tests {
            assert_eq!(eval(input), Ok(expected), "input = {}", input);
        }
    }

    #[test]
    fn variables_and_locals() {
        let mut env = Environment::new();
        env.set_variable("y", Number::Int(3));
        let mut locals = Bindings::new();
        locals.insert("x".to_owned(), Number::Int(2));

        assert_eq!(evaluate("6x", &env, Some(&locals)), Ok(Number::Int(12)));
        assert_eq!(evaluate("x*y", &env, Some(&locals)), Ok(Number::Int(6)));
        assert_eq!(
            evaluate("x*y", &env, None),
            Err(CalcError::UnknownVariable("x".to_owned()))
        );
    }

    #[test]
    fn errors() {
        assert_eq!(
            eval("1/0"),
            Err(CalcError::Evaluation("division by zero".to_owned()))
        );
        assert_eq!(eval("q+1"), Err(CalcError::UnknownVariable("q".to_owned())));
        assert_eq!(eval("7%2"), Err(CalcError::UnsupportedOperator));
        assert_eq!(eval("7//2"), Err(CalcError::UnsupportedOperator));
        assert_eq!(eval("+2"), Err(CalcError::UnsupportedUnaryOperator));
        assert_eq!(eval("2*g(3)"), Err(CalcError::UnsupportedExpression));
        assert_eq!(eval("g()"), Err(CalcError::UnsupportedExpression));
        // the left operand's error wins
        assert_eq!(eval("a+b"), Err(CalcError::UnknownVariable("a".to_owned())));
    }

    #[test]
    fn syntax_errors() {
        let bad = vec![
            "", "1+", "*2", "(1+2", "1+2)", "()", "2 3", "1 = 2", "007", "1..2", "$", ".",
            "(2)(3)", "1<2",
        ];
        for input in bad {
            assert!(
                matches!(eval(input), Err(CalcError::Syntax(_))),
                "input = {:?} gave {:?}",
                input,
                eval(input)
            );
        }
        assert_eq!(
            eval("(1+2"),
            Err(CalcError::Syntax("'(' was never closed".to_owned()))
        );
        assert_eq!(eval("1+2)"), Err(CalcError::Syntax("unmatched ')'".to_owned())));
    }

    #[test]
    fn tree_shape() {
        let tree = parse(&preprocess("-2^2+x/4")).unwrap();
        assert_eq!(tree.to_string(), "((-(2 ** 2)) + (x / 4))");
        let tree = parse("2**-3*4").unwrap();
        assert_eq!(tree.to_string(), "((2 ** (-3)) * 4)");
    }
}
