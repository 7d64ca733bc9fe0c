//! Integer constant expressions used as array sizes
//!
//! EBNF:
//!   expression ::= term (('+' | '-') term)*
//!   term       ::= unary (('*' | '/') unary)*
//!   unary      ::= ('+' | '-') unary | primary
//!   primary    ::= integer | constant_name | '(' expression ')'

use std::collections::BTreeMap;

pub struct IntegerEvaluator<'a> {
    tokens: Vec<String>,
    position: usize,
    constants: &'a BTreeMap<String, i64>,
}

/// Evaluate an expression given as tokens
pub fn evaluate(tokens: &[String], constants: &BTreeMap<String, i64>) -> Result<i64, String> {
    IntegerEvaluator::new(tokens, constants).evaluate()
}

impl<'a> IntegerEvaluator<'a> {
    pub fn new(tokens: &[String], constants: &'a BTreeMap<String, i64>) -> Self {
        // the tokenizer may glue a sign to the following number
        let mut split = Vec::with_capacity(tokens.len());
        for token in tokens {
            match token.strip_prefix(['+', '-']) {
                Some(rest) if !rest.is_empty() => {
                    split.push(token[..1].to_string());
                    split.push(rest.to_string());
                }
                _ => split.push(token.clone()),
            }
        }
        Self {
            tokens: split,
            position: 0,
            constants,
        }
    }

    pub fn evaluate(mut self) -> Result<i64, String> {
        if self.tokens.is_empty() {
            return Err("empty expression".to_string());
        }
        let value = self.expression()?;
        match self.current() {
            None => Ok(value),
            Some(token) => Err(format!("unexpected token '{token}'")),
        }
    }

    fn current(&self) -> Option<&str> {
        self.tokens.get(self.position).map(String::as_str)
    }

    fn expression(&mut self) -> Result<i64, String> {
        let mut value = self.term()?;
        while let Some(op) = self.current() {
            let op = match op {
                "+" | "-" => op.to_string(),
                _ => break,
            };
            self.position += 1;
            let rhs = self.term()?;
            value = if op == "+" {
                value.checked_add(rhs)
            } else {
                value.checked_sub(rhs)
            }
            .ok_or_else(|| "integer overflow".to_string())?;
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<i64, String> {
        let mut value = self.unary()?;
        while let Some(op) = self.current() {
            let op = match op {
                "*" | "/" => op.to_string(),
                _ => break,
            };
            self.position += 1;
            let rhs = self.unary()?;
            value = if op == "*" {
                value
                    .checked_mul(rhs)
                    .ok_or_else(|| "integer overflow".to_string())?
            } else {
                if rhs == 0 {
                    return Err("division by zero".to_string());
                }
                value
                    .checked_div(rhs)
                    .ok_or_else(|| "integer overflow".to_string())?
            };
        }
        Ok(value)
    }

    fn unary(&mut self) -> Result<i64, String> {
        match self.current() {
            Some("-") => {
                self.position += 1;
                self.unary()?
                    .checked_neg()
                    .ok_or_else(|| "integer overflow".to_string())
            }
            Some("+") => {
                self.position += 1;
                self.unary()
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<i64, String> {
        let token = self
            .current()
            .ok_or_else(|| "unexpected end of expression".to_string())?
            .to_string();
        self.position += 1;

        if token == "(" {
            let value = self.expression()?;
            return match self.current() {
                Some(")") => {
                    self.position += 1;
                    Ok(value)
                }
                _ => Err("unbalanced parenthesis".to_string()),
            };
        }
        if token.starts_with(|c: char| c.is_ascii_digit()) {
            return token
                .parse::<i64>()
                .map_err(|_| format!("'{token}' is not an integer"));
        }
        self.constants
            .get(&token)
            .copied()
            .ok_or_else(|| format!("unknown integer constant '{token}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(expression: &str) -> Vec<String> {
        expression.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_precedence_and_parentheses() {
        let constants = BTreeMap::new();
        assert_eq!(evaluate(&tokens("2 + 3 * 4"), &constants), Ok(14));
        assert_eq!(evaluate(&tokens("( 2 + 3 ) * 4"), &constants), Ok(20));
        assert_eq!(evaluate(&tokens("7 / 2 - 1"), &constants), Ok(2));
        assert_eq!(evaluate(&tokens("- ( 2 - 5 )"), &constants), Ok(3));
    }

    #[test]
    fn test_named_constants_and_glued_signs() {
        let constants = BTreeMap::from([("N".to_string(), 3)]);
        assert_eq!(evaluate(&tokens("2 * N"), &constants), Ok(6));
        assert_eq!(evaluate(&tokens("N -1"), &constants), Ok(2));
    }

    #[test]
    fn test_errors() {
        let constants = BTreeMap::new();
        assert!(evaluate(&tokens("M"), &constants).is_err());
        assert!(evaluate(&tokens("1 / 0"), &constants).is_err());
        assert!(evaluate(&tokens("( 1 + 2"), &constants).is_err());
        assert!(evaluate(&tokens("1 2"), &constants).is_err());
        assert!(evaluate(&[], &constants).is_err());
    }

    #[test]
    fn test_overflow_is_an_error() {
        let constants = BTreeMap::new();
        let min_over_minus_one = tokens("( 0 - 9223372036854775807 - 1 ) / ( 0 - 1 )");
        assert_eq!(
            evaluate(&min_over_minus_one, &constants),
            Err("integer overflow".to_string())
        );
        assert_eq!(
            evaluate(&tokens("9223372036854775807 * 2"), &constants),
            Err("integer overflow".to_string())
        );
        assert_eq!(
            evaluate(&tokens("- ( 0 - 9223372036854775807 - 1 )"), &constants),
            Err("integer overflow".to_string())
        );
    }
}
