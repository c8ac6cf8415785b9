//! 求值器语法解析
//!
//! 支持 `Head[args]` 函数调用、`{a, b}` 列表、`a -> b` 规则、
//! 中缀 `+ - * / ^ %`、一元负号、后缀 `!`，以及数字与符号相邻时的隐式乘法。
//!
//! 基于 nom 组合子。左结合运算链逐项收集后迭代折叠，
//! 括号、参数列表、一元符号、乘方和阶乘的嵌套层数受 [`MAX_DEPTH`] 限制。

use std::fmt;

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{char, digit1, multispace0, one_of, satisfy},
    combinator::{cut, map, map_res, not, opt, recognize, value},
    error::{Error as NomError, ErrorKind},
    multi::{many0, many0_count, separated_list0},
    sequence::{pair, preceded, terminated},
    IResult,
};

use crate::error::EvalError;
use crate::utils::format_number;

/// 最大嵌套层数
pub const MAX_DEPTH: usize = 32;

// ============================================================================
// Expr
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Mod,
}

impl BinOp {
    fn precedence(self) -> u8 {
        match self {
            BinOp::Add | BinOp::Sub => 2,
            BinOp::Mul | BinOp::Div | BinOp::Mod => 3,
            BinOp::Pow => 5,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => " + ",
            BinOp::Sub => " - ",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Pow => "^",
            BinOp::Mod => "%",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Symbol(String),
    Apply { head: String, args: Vec<Expr> },
    List(Vec<Expr>),
    Neg(Box<Expr>),
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Factorial(Box<Expr>),
    Rule(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Expr::Number(n) => Some(*n),
            _ => None,
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::Rule(..) => 1,
            Expr::Binary { op, .. } => op.precedence(),
            Expr::Neg(_) => 4,
            Expr::Factorial(_) => 6,
            Expr::Number(n) if *n < 0.0 => 4,
            _ => 7,
        }
    }

    /// 展开左结合运算链：`a*b + c - d` 得到 `(a, [(*, b), (+, c), (-, d)])`
    ///
    /// 沿左子树向下走，遇到 `^`、非二元节点或输出时需要加括号的节点就停下。
    /// 长链（几千项的求和）在这里变成一个 `Vec`，调用方按顺序迭代，不会递归。
    pub(crate) fn left_chain(&self) -> (&Expr, Vec<(BinOp, &Expr)>) {
        let mut links: Vec<(BinOp, &Expr)> = Vec::new();
        let mut node = self;
        while let Expr::Binary { op, lhs, rhs } = node {
            if *op == BinOp::Pow {
                break;
            }
            if let Some((outer, _)) = links.last() {
                if node.precedence() < outer.precedence() {
                    break;
                }
            }
            links.push((*op, rhs.as_ref()));
            node = lhs.as_ref();
        }
        links.reverse();
        (node, links)
    }

    /// 按需加括号输出子表达式
    fn fmt_child(&self, f: &mut fmt::Formatter<'_>, min_precedence: u8) -> fmt::Result {
        if self.precedence() < min_precedence {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }

    /// 把子节点移到栈上，原位置留下叶子
    fn take_children(&mut self, stack: &mut Vec<Expr>) {
        match self {
            Expr::Neg(inner) | Expr::Factorial(inner) => stack.push(detach(inner)),
            Expr::Binary { lhs, rhs, .. } | Expr::Rule(lhs, rhs) => {
                stack.push(detach(lhs));
                stack.push(detach(rhs));
            }
            Expr::Apply { args, .. } | Expr::List(args) => stack.append(args),
            Expr::Number(_) | Expr::Symbol(_) => {}
        }
    }
}

fn detach(slot: &mut Expr) -> Expr {
    std::mem::replace(slot, Expr::Number(0.0))
}

// 显式栈释放，长运算链不会在析构时递归爆栈
impl Drop for Expr {
    fn drop(&mut self) {
        let mut stack = Vec::new();
        self.take_children(&mut stack);
        while let Some(mut node) = stack.pop() {
            node.take_children(&mut stack);
        }
    }
}

fn fmt_args(f: &mut fmt::Formatter<'_>, args: &[Expr]) -> fmt::Result {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", arg)?;
    }
    Ok(())
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{}", format_number(*n)),
            Expr::Symbol(name) => write!(f, "{}", name),
            Expr::Apply { head, args } => {
                write!(f, "{}[", head)?;
                fmt_args(f, args)?;
                write!(f, "]")
            }
            Expr::List(items) => {
                write!(f, "{{")?;
                fmt_args(f, items)?;
                write!(f, "}}")
            }
            Expr::Neg(inner) => {
                write!(f, "-")?;
                inner.fmt_child(f, 5)
            }
            // 右结合
            Expr::Binary {
                op: BinOp::Pow,
                lhs,
                rhs,
            } => {
                lhs.fmt_child(f, BinOp::Pow.precedence() + 1)?;
                write!(f, "{}", BinOp::Pow.symbol())?;
                rhs.fmt_child(f, BinOp::Pow.precedence())
            }
            Expr::Binary { .. } => {
                let (base, links) = self.left_chain();
                if let Some((first, _)) = links.first() {
                    base.fmt_child(f, first.precedence())?;
                }
                for (op, rhs) in links {
                    write!(f, "{}", op.symbol())?;
                    rhs.fmt_child(f, op.precedence() + 1)?;
                }
                Ok(())
            }
            Expr::Factorial(inner) => {
                inner.fmt_child(f, 7)?;
                write!(f, "!")
            }
            Expr::Rule(lhs, rhs) => {
                lhs.fmt_child(f, 2)?;
                write!(f, "->")?;
                rhs.fmt_child(f, 2)
            }
        }
    }
}

// ============================================================================
// Parser (nom)
// ============================================================================

fn too_deep(input: &str) -> nom::Err<NomError<&str>> {
    nom::Err::Failure(NomError::new(input, ErrorKind::TooLarge))
}

/// 进入下一层嵌套
fn descend(input: &str, depth: usize) -> Result<usize, nom::Err<NomError<&str>>> {
    if depth >= MAX_DEPTH {
        Err(too_deep(input))
    } else {
        Ok(depth + 1)
    }
}

// 数字：123、8.2、.5
fn parse_number(input: &str) -> IResult<&str, Expr> {
    map_res(
        alt((
            recognize(pair(digit1, opt(pair(char('.'), digit1)))),
            recognize(pair(char('.'), digit1)),
        )),
        |literal: &str| literal.parse::<f64>().map(Expr::Number),
    )(input)
}

// 标识符：字母开头，之后可以是字母、数字、下划线
fn parse_identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c: char| c.is_alphabetic()),
        take_while(|c: char| c.is_alphanumeric() || c == '_'),
    ))(input)
}

/// 成对括号包围的内容；吃掉开括号之后不再回溯
fn bracketed<'a, O>(
    open: char,
    close: char,
    depth: usize,
    inner: fn(&'a str, usize) -> IResult<&'a str, O>,
) -> impl FnMut(&'a str) -> IResult<&'a str, O> {
    move |input: &'a str| {
        let (rest, _) = char::<_, NomError<&str>>(open)(input)?;
        let depth = descend(input, depth)?;
        cut(terminated(
            move |i| inner(i, depth),
            preceded(multispace0, char(close)),
        ))(rest)
    }
}

fn parse_args(input: &str, depth: usize) -> IResult<&str, Vec<Expr>> {
    separated_list0(preceded(multispace0, char(',')), |i| parse_rule(i, depth))(input)
}

// Head[a, b]
fn parse_apply(input: &str, depth: usize) -> IResult<&str, Expr> {
    let (rest, head) = terminated(parse_identifier, multispace0)(input)?;
    let (rest, args) = bracketed('[', ']', depth, parse_args)(rest)?;
    Ok((
        rest,
        Expr::Apply {
            head: head.to_string(),
            args,
        },
    ))
}

fn parse_atom(input: &str, depth: usize) -> IResult<&str, Expr> {
    preceded(
        multispace0,
        alt((
            parse_number,
            |i| parse_apply(i, depth),
            map(parse_identifier, |name| Expr::Symbol(name.to_string())),
            bracketed('(', ')', depth, parse_rule),
            map(bracketed('{', '}', depth, parse_args), Expr::List),
        )),
    )(input)
}

// 后缀阶乘：n!、n!!
fn parse_postfix(input: &str, depth: usize) -> IResult<&str, Expr> {
    let (input, atom) = parse_atom(input, depth)?;
    let (rest, bangs) = many0_count(preceded(multispace0, char::<_, NomError<&str>>('!')))(input)?;
    if depth + bangs > MAX_DEPTH {
        return Err(too_deep(input));
    }
    let expr = (0..bangs).fold(atom, |inner, _| Expr::Factorial(Box::new(inner)));
    Ok((rest, expr))
}

// 乘方右结合，指数可以带符号：2^-1、2^3^2
fn parse_power(input: &str, depth: usize) -> IResult<&str, Expr> {
    let (input, base) = parse_postfix(input, depth)?;
    let (rest, caret) = opt(preceded(multispace0, char::<_, NomError<&str>>('^')))(input)?;
    if caret.is_none() {
        return Ok((input, base));
    }
    let depth = descend(input, depth)?;
    let (rest, exponent) = cut(|i| parse_unary(i, depth))(rest)?;
    Ok((rest, Expr::binary(BinOp::Pow, base, exponent)))
}

// `-` 不能是 `->` 的开头
fn minus(input: &str) -> IResult<&str, char> {
    terminated(char('-'), not(char('>')))(input)
}

fn parse_unary(input: &str, depth: usize) -> IResult<&str, Expr> {
    let (rest, sign) = opt(preceded(multispace0, alt((char('+'), minus))))(input)?;
    let Some(sign) = sign else {
        return parse_power(rest, depth);
    };
    let depth = descend(input, depth)?;
    let (rest, inner) = cut(|i| parse_unary(i, depth))(rest)?;
    let expr = if sign == '-' {
        Expr::Neg(Box::new(inner))
    } else {
        inner
    };
    Ok((rest, expr))
}

fn product_op(input: &str) -> IResult<&str, BinOp> {
    map(one_of("*/%"), |c| match c {
        '*' => BinOp::Mul,
        '/' => BinOp::Div,
        _ => BinOp::Mod,
    })(input)
}

fn sum_op(input: &str) -> IResult<&str, BinOp> {
    alt((value(BinOp::Add, char('+')), value(BinOp::Sub, minus)))(input)
}

fn fold_links(init: Expr, links: Vec<(BinOp, Expr)>) -> Expr {
    links
        .into_iter()
        .fold(init, |lhs, (op, rhs)| Expr::binary(op, lhs, rhs))
}

fn parse_product(input: &str, depth: usize) -> IResult<&str, Expr> {
    let (input, init) = parse_unary(input, depth)?;
    let (input, links) = many0(alt((
        pair(
            preceded(multispace0, product_op),
            cut(|i| parse_unary(i, depth)),
        ),
        // 隐式乘法：3x、2(x+1)、2 Pi
        map(|i| parse_power(i, depth), |rhs| (BinOp::Mul, rhs)),
    )))(input)?;
    Ok((input, fold_links(init, links)))
}

fn parse_sum(input: &str, depth: usize) -> IResult<&str, Expr> {
    let (input, init) = parse_product(input, depth)?;
    let (input, links) = many0(pair(
        preceded(multispace0, sum_op),
        cut(|i| parse_product(i, depth)),
    ))(input)?;
    Ok((input, fold_links(init, links)))
}

fn parse_rule(input: &str, depth: usize) -> IResult<&str, Expr> {
    let (input, lhs) = parse_sum(input, depth)?;
    let (input, rhs) = opt(preceded(
        preceded(multispace0, tag("->")),
        cut(|i| parse_sum(i, depth)),
    ))(input)?;
    let expr = match rhs {
        Some(rhs) => Expr::Rule(Box::new(lhs), Box::new(rhs)),
        None => lhs,
    };
    Ok((input, expr))
}

/// nom 错误转成带字节位置的解析错误
fn describe(source: &str, err: NomError<&str>) -> EvalError {
    let rest = err.input.trim_start();
    let position = source.len() - rest.len();
    let message = match (err.code, rest.chars().next()) {
        (ErrorKind::TooLarge, _) => {
            format!("expression nested deeper than {} levels", MAX_DEPTH)
        }
        (_, None) => "unexpected end of input".to_string(),
        (_, Some(c)) => format!("unexpected character '{}'", c),
    };
    EvalError::parse(position, message)
}

/// 解析表达式字符串，要求消费全部输入
pub fn parse(input: &str) -> Result<Expr, EvalError> {
    if input.trim().is_empty() {
        return Err(EvalError::parse(0, "empty expression"));
    }
    match parse_rule(input, 0) {
        Ok((rest, expr)) => {
            let rest = rest.trim_start();
            match rest.chars().next() {
                None => Ok(expr),
                Some(c) => Err(EvalError::parse(
                    input.len() - rest.len(),
                    format!("unexpected character '{}'", c),
                )),
            }
        }
        Err(nom::Err::Error(err)) | Err(nom::Err::Failure(err)) => Err(describe(input, err)),
        Err(nom::Err::Incomplete(_)) => {
            Err(EvalError::parse(input.len(), "unexpected end of input"))
        }
    }
}
