// ABOUTME: Precedence-climbing parser turning a token stream into an Expression tree

use crate::cursor::Cursor;
use crate::error::SyntaxError;
use crate::expr::Expression;
use crate::lexer::{can_start_primary, tokenize, Token};
use crate::value::Value;

/// Parse the interior of a `(( ... ))` fragment (the delimiters already stripped).
pub fn parse(source: &str) -> Result<Expression, SyntaxError> {
    let tokens = tokenize(source)?;
    let mut p = Parser {
        tokens,
        pos: 0,
        source,
    };
    let expr = p.parse_entry()?;
    if let Some((_, at)) = p.tokens.get(p.pos) {
        return Err(p.error_at(*at, "trailing input after expression"));
    }
    Ok(expr)
}

struct Parser<'a> {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    source: &'a str,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset).map(|(t, _)| t)
    }

    fn advance(&mut self) -> Option<Token> {
        let t = self.tokens.get(self.pos).map(|(t, _)| t.clone());
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn current_position(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|(_, p)| *p)
            .unwrap_or(self.source.len())
    }

    fn error(&self, message: impl Into<String>) -> SyntaxError {
        self.error_at(self.current_position(), message)
    }

    fn error_at(&self, position: usize, message: impl Into<String>) -> SyntaxError {
        SyntaxError::new(message, position, self.source.to_string())
    }

    fn expect(&mut self, want: &Token, context: &str) -> Result<(), SyntaxError> {
        match self.peek() {
            Some(t) if t == want => {
                self.advance();
                Ok(())
            }
            _ => Err(self.error(format!("expected {:?} {}", want, context))),
        }
    }

    /// Consume an optional `@target` suffix following an operator name.
    fn try_parse_target(&mut self) -> Option<String> {
        if self.peek() == Some(&Token::At) {
            if let Some(Token::Ident(name)) = self.peek_at(1) {
                let name = name.clone();
                self.advance();
                self.advance();
                return Some(name);
            }
        }
        None
    }

    /// The entry point for a fragment and for the content of any parenthesized
    /// group: detect the bare "IDENT [@target] arg arg ..." positional-call
    /// shape before falling back to ordinary precedence-climbing. This check
    /// fires only once per entry point — individual arguments are parsed at
    /// `parse_primary_strict`, which does not itself re-trigger the
    /// positional-call shape, so `grab a b c` yields three siblings rather
    /// than `a` swallowing `b` and `c`. A parenthesized argument re-enters
    /// `parse_entry` for its own bounded span, which is how
    /// `grab (concat a b)` resolves to one argument built from a nested call.
    fn parse_entry(&mut self) -> Result<Expression, SyntaxError> {
        if let Some(Token::Ident(name)) = self.peek() {
            let name = name.clone();
            let mut lookahead = self.pos + 1;
            let mut target = None;
            if self.tokens.get(lookahead).map(|(t, _)| t) == Some(&Token::At) {
                if let Some((Token::Ident(t), _)) = self.tokens.get(lookahead + 1) {
                    target = Some(t.clone());
                    lookahead += 2;
                }
            }
            let next = self.tokens.get(lookahead).map(|(t, _)| t);
            let starts_positional_call = match next {
                Some(Token::LParen) => false, // explicit call form, handled by primary
                Some(t) => can_start_primary(t),
                None => false,
            };
            if starts_positional_call {
                self.pos = lookahead;
                let mut args = Vec::new();
                while self.peek().map(can_start_primary).unwrap_or(false) {
                    args.push(self.parse_primary_strict()?);
                }
                let call = Expression::OperatorCall { name, target, args };
                // The positional-call loop only absorbs primaries, so a
                // trailing `|| default` (spec.md §4.6.5's secret-operator
                // fallback form) is still sitting in the token stream here;
                // fold it in the same way `parse_or` folds one for the
                // parenthesized/infix call shape, so `vault "x" || "y"`
                // parses rather than tripping the "trailing input" check.
                return self.fold_or(call);
            }
        }
        self.parse_ternary()
    }

    /// Right-associative `||` fold shared by the positional-call fast path
    /// above and `parse_or`'s ordinary precedence-climbing path below.
    fn fold_or(&mut self, left: Expression) -> Result<Expression, SyntaxError> {
        if self.peek() == Some(&Token::Or) {
            self.advance();
            let right = self.parse_or()?;
            return Ok(Expression::LogicalOr(Box::new(left), Box::new(right)));
        }
        Ok(left)
    }

    fn parse_ternary(&mut self) -> Result<Expression, SyntaxError> {
        let cond = self.parse_or()?;
        if self.peek() == Some(&Token::Question) {
            self.advance();
            let then_branch = self.parse_ternary()?;
            if self.peek() != Some(&Token::Colon) {
                return Err(self.error("expected `:` to close `?` ternary"));
            }
            self.advance();
            let else_branch = self.parse_ternary()?;
            return Ok(Expression::operator_call(
                "?:",
                vec![cond, then_branch, else_branch],
            ));
        }
        Ok(cond)
    }

    fn parse_or(&mut self) -> Result<Expression, SyntaxError> {
        let left = self.parse_and()?;
        self.fold_or(left)
    }

    fn parse_and(&mut self) -> Result<Expression, SyntaxError> {
        let mut left = self.parse_eq()?;
        while self.peek() == Some(&Token::And) {
            self.advance();
            let right = self.parse_eq()?;
            left = Expression::operator_call("&&", vec![left, right]);
        }
        Ok(left)
    }

    fn parse_eq(&mut self) -> Result<Expression, SyntaxError> {
        let mut left = self.parse_cmp()?;
        loop {
            let op = match self.peek() {
                Some(Token::EqEq) => "==",
                Some(Token::Ne) => "!=",
                _ => break,
            };
            self.advance();
            let right = self.parse_cmp()?;
            left = Expression::operator_call(op, vec![left, right]);
        }
        Ok(left)
    }

    fn parse_cmp(&mut self) -> Result<Expression, SyntaxError> {
        let mut left = self.parse_add()?;
        loop {
            let op = match self.peek() {
                Some(Token::Lt) => "<",
                Some(Token::Le) => "<=",
                Some(Token::Gt) => ">",
                Some(Token::Ge) => ">=",
                _ => break,
            };
            self.advance();
            let right = self.parse_add()?;
            left = Expression::operator_call(op, vec![left, right]);
        }
        Ok(left)
    }

    fn parse_add(&mut self) -> Result<Expression, SyntaxError> {
        let mut left = self.parse_mul()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => "+",
                Some(Token::Minus) => "-",
                _ => break,
            };
            self.advance();
            let right = self.parse_mul()?;
            left = Expression::operator_call(op, vec![left, right]);
        }
        Ok(left)
    }

    fn parse_mul(&mut self) -> Result<Expression, SyntaxError> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => "*",
                Some(Token::Slash) => "/",
                Some(Token::Percent) => "%",
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = Expression::operator_call(op, vec![left, right]);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expression, SyntaxError> {
        if self.peek() == Some(&Token::Bang) {
            self.advance();
            let operand = self.parse_unary()?;
            return Ok(Expression::operator_call("!", vec![operand]));
        }
        self.parse_primary_strict()
    }

    /// A single primary expression, with no bare-juxtaposition positional-call
    /// absorption: a bare identifier not immediately followed by `(` is just a
    /// `Reference`. An identifier immediately followed by `(` is an explicit
    /// call whose arguments are each parsed via `parse_entry` (so a nested
    /// bare call like `concat a b` can appear as a single argument).
    fn parse_primary_strict(&mut self) -> Result<Expression, SyntaxError> {
        match self.peek().cloned() {
            Some(Token::Null) => {
                self.advance();
                Ok(Expression::Literal(Value::Null))
            }
            Some(Token::Bool(b)) => {
                self.advance();
                Ok(Expression::Literal(Value::Bool(b)))
            }
            Some(Token::Int(i)) => {
                self.advance();
                Ok(Expression::Literal(Value::Int(i)))
            }
            Some(Token::Float(f)) => {
                self.advance();
                Ok(Expression::Literal(Value::Float(f)))
            }
            Some(Token::Str(s)) => {
                self.advance();
                Ok(Expression::Literal(Value::String(s)))
            }
            Some(Token::EnvVar(name)) => {
                self.advance();
                Ok(Expression::EnvVar(name))
            }
            Some(Token::Ident(name)) => {
                self.advance();
                let target = self.try_parse_target();
                if self.peek() == Some(&Token::LParen) {
                    self.advance();
                    let args = self.parse_call_args()?;
                    self.expect(&Token::RParen, "to close call arguments")?;
                    Ok(Expression::OperatorCall { name, target, args })
                } else if target.is_some() {
                    Ok(Expression::OperatorCall {
                        name,
                        target,
                        args: vec![],
                    })
                } else {
                    Ok(Expression::Reference(
                        Cursor::parse(&name).map_err(|e| self.error(e.message))?,
                    ))
                }
            }
            Some(Token::LParen) => {
                self.advance();
                let inner = self.parse_entry()?;
                self.expect(&Token::RParen, "to close grouped expression")?;
                Ok(inner)
            }
            other => Err(self.error(format!("unexpected token {:?}", other))),
        }
    }

    /// `args := expr ( ","? expr )*` — the comma between arguments is optional.
    fn parse_call_args(&mut self) -> Result<Vec<Expression>, SyntaxError> {
        let mut args = Vec::new();
        if self.peek() == Some(&Token::RParen) {
            return Ok(args);
        }
        args.push(self.parse_entry()?);
        loop {
            match self.peek() {
                Some(Token::RParen) => break,
                Some(Token::Comma) => {
                    self.advance();
                    args.push(self.parse_entry()?);
                }
                Some(t) if can_start_primary(t) => {
                    args.push(self.parse_entry()?);
                }
                _ => break,
            }
        }
        Ok(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call<'a>(e: &'a Expression) -> (&'a str, Option<&'a str>, &'a [Expression]) {
        match e {
            Expression::OperatorCall { name, target, args } => {
                (name.as_str(), target.as_deref(), args.as_slice())
            }
            other => panic!("expected OperatorCall, got {:?}", other),
        }
    }

    #[test]
    fn test_arithmetic_precedence() {
        // 2 + 3 * 4 -> +(2, *(3,4))
        let e = parse("2 + 3 * 4").unwrap();
        let (op, _, args) = call(&e);
        assert_eq!(op, "+");
        assert!(matches!(args[0], Expression::Literal(Value::Int(2))));
        let (inner_op, _, inner_args) = call(&args[1]);
        assert_eq!(inner_op, "*");
        assert!(matches!(inner_args[0], Expression::Literal(Value::Int(3))));
    }

    #[test]
    fn test_grouping_overrides_precedence() {
        // (2+3)*4 -> *(+(2,3), 4)
        let e = parse("(2+3)*4").unwrap();
        let (op, _, args) = call(&e);
        assert_eq!(op, "*");
        let (inner_op, _, _) = call(&args[0]);
        assert_eq!(inner_op, "+");
    }

    #[test]
    fn test_ternary() {
        let e = parse(r#"1 + 1 == 2 ? 10 * 2 : 5"#).unwrap();
        let (op, _, args) = call(&e);
        assert_eq!(op, "?:");
        assert_eq!(args.len(), 3);
    }

    #[test]
    fn test_dangling_question_is_syntax_error() {
        assert!(parse("1 == 1 ? 2").is_err());
    }

    #[test]
    fn test_logical_or_stays_unreduced() {
        let e = parse(r#"debug || name == "test""#).unwrap();
        match e {
            Expression::LogicalOr(l, r) => {
                assert!(matches!(*l, Expression::Reference(_)));
                let (op, _, _) = call(&r);
                assert_eq!(op, "==");
            }
            other => panic!("expected LogicalOr, got {:?}", other),
        }
    }

    #[test]
    fn test_bare_reference() {
        let e = parse("a.b.0").unwrap();
        assert!(matches!(e, Expression::Reference(_)));
    }

    #[test]
    fn test_positional_call_flattens_siblings() {
        // grab a b c -> grab(a, b, c), not grab(a(b, c))
        let e = parse("grab a b c").unwrap();
        let (op, target, args) = call(&e);
        assert_eq!(op, "grab");
        assert_eq!(target, None);
        assert_eq!(args.len(), 3);
        for a in args {
            assert!(matches!(a, Expression::Reference(_)));
        }
    }

    #[test]
    fn test_positional_call_with_parenthesized_nested_call() {
        // grab (concat a b) -> grab(concat(a, b)), one argument
        let e = parse("grab (concat a b)").unwrap();
        let (op, _, args) = call(&e);
        assert_eq!(op, "grab");
        assert_eq!(args.len(), 1);
        let (inner_op, _, inner_args) = call(&args[0]);
        assert_eq!(inner_op, "concat");
        assert_eq!(inner_args.len(), 2);
    }

    #[test]
    fn test_explicit_call_with_commas() {
        let e = parse(r#"concat("a", "b", "c")"#).unwrap();
        let (op, _, args) = call(&e);
        assert_eq!(op, "concat");
        assert_eq!(args.len(), 3);
    }

    #[test]
    fn test_target_suffix_on_call() {
        let e = parse(r#"vault@production("secret/x:y")"#).unwrap();
        let (op, target, args) = call(&e);
        assert_eq!(op, "vault");
        assert_eq!(target, Some("production"));
        assert_eq!(args.len(), 1);
    }

    #[test]
    fn test_target_suffix_on_positional_call() {
        let e = parse(r#"vault@production "secret/x:y""#).unwrap();
        let (op, target, args) = call(&e);
        assert_eq!(op, "vault");
        assert_eq!(target, Some("production"));
        assert_eq!(args.len(), 1);
    }

    #[test]
    fn test_unary_negate() {
        let e = parse("! enabled").unwrap();
        let (op, _, args) = call(&e);
        assert_eq!(op, "!");
        assert!(matches!(args[0], Expression::Reference(_)));
    }

    #[test]
    fn test_positional_call_with_trailing_fallback() {
        // vault "secret/x:y" || "default" -> LogicalOr(vault("secret/x:y"), "default")
        let e = parse(r#"vault "secret/x:y" || "default""#).unwrap();
        match e {
            Expression::LogicalOr(l, r) => {
                let (op, _, args) = call(&l);
                assert_eq!(op, "vault");
                assert_eq!(args.len(), 1);
                assert!(matches!(*r, Expression::Literal(Value::String(ref s)) if s == "default"));
            }
            other => panic!("expected LogicalOr, got {:?}", other),
        }
    }

    #[test]
    fn test_positional_call_with_trailing_fallback_and_target() {
        let e = parse(r#"vault@production "secret/x:y" || "default""#).unwrap();
        match e {
            Expression::LogicalOr(l, r) => {
                let (op, target, _) = call(&l);
                assert_eq!(op, "vault");
                assert_eq!(target, Some("production"));
                assert!(matches!(*r, Expression::Literal(Value::String(ref s)) if s == "default"));
            }
            other => panic!("expected LogicalOr, got {:?}", other),
        }
    }

    #[test]
    fn test_mismatched_paren_is_syntax_error() {
        assert!(parse("concat(a, b").is_err());
        assert!(parse("(2 + 3").is_err());
    }
}
