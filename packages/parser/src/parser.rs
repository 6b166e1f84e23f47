use crate::error::{ParseError, ParseResult};
use crate::lexer::{lex, unescape, Token};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use indexmap::IndexMap;
use slicegen_value::{Heap, ObjectId, ObjectKind, Value, MAX_ARRAY_LENGTH};
use std::collections::HashMap;
use std::ops::Range;
use tracing::trace;

/// Deepest expression nesting the evaluator accepts. Each level costs several
/// recursive-descent frames, so this must fit a 2 MiB thread stack in debug builds.
const MAX_NESTING: usize = 64;

/// An evaluated state module
#[derive(Debug, Clone)]
pub struct Module {
    pub heap: Heap,
    pub default_export: Option<Value>,
    /// Named exports in declaration order
    pub exports: IndexMap<String, Value>,
}

#[derive(Debug, Clone)]
enum Binding {
    Value(Value),
    Class(ClassDecl),
}

#[derive(Debug, Clone)]
struct ClassDecl {
    name: String,
    /// Instance fields with the token position of their initializer
    fields: Vec<(String, Option<usize>)>,
}

/// Parser and evaluator for state modules.
///
/// Statements are evaluated as they are parsed, so bindings, object identity
/// and mutations (`obj.self = obj`) behave as they would at module load time.
pub struct Parser<'src> {
    tokens: Vec<(Token<'src>, Range<usize>)>,
    pos: usize,
    source_len: usize,
    depth: usize,
    heap: Heap,
    bindings: HashMap<String, Binding>,
    default_export: Option<Value>,
    exports: IndexMap<String, Value>,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> ParseResult<Self> {
        let tokens = lex(source)
            .map(|result| {
                result
                    .map(|spanned| (spanned.token, spanned.span))
                    .map_err(|e| ParseError::LexerError { span: e.span })
            })
            .collect::<ParseResult<Vec<_>>>()?;

        Ok(Self {
            tokens,
            pos: 0,
            source_len: source.len(),
            depth: 0,
            heap: Heap::new(),
            bindings: HashMap::new(),
            default_export: None,
            exports: IndexMap::new(),
        })
    }

    /// Evaluate every statement of a module
    pub fn evaluate_module(mut self) -> ParseResult<Module> {
        while !self.is_at_end() {
            self.parse_statement()?;
        }

        trace!(
            objects = self.heap.len(),
            has_default = self.default_export.is_some(),
            exports = self.exports.len(),
            "Evaluated module"
        );

        Ok(Module {
            heap: self.heap,
            default_export: self.default_export,
            exports: self.exports,
        })
    }

    /// Evaluate a single expression (optionally followed by `;`)
    pub fn evaluate_expression(mut self) -> ParseResult<(Heap, Value)> {
        let value = self.parse_expression()?;
        self.match_token(&Token::Semi);
        if !self.is_at_end() {
            return Err(self.error_at_current("end of input"));
        }
        Ok((self.heap, value))
    }

    // Statements

    fn parse_statement(&mut self) -> ParseResult<()> {
        let Some((token, span)) = self.peek().cloned() else {
            return Ok(());
        };

        match token {
            Token::Semi => {
                self.advance();
            }
            Token::Import => self.parse_import()?,
            Token::Export => self.parse_export()?,
            Token::Const | Token::Let | Token::Var => {
                self.parse_declaration()?;
            }
            Token::Function => {
                self.parse_function_declaration()?;
            }
            Token::Class => {
                self.parse_class_declaration()?;
            }
            Token::Ident("type") if self.ident_follows() => self.skip_type_alias()?,
            Token::Ident("interface") if self.ident_follows() => self.skip_interface()?,
            Token::Ident("async") if matches!(self.peek_ahead(1), Some((Token::Function, _))) => {
                self.advance();
                self.parse_function_declaration()?;
            }
            Token::Ident(_) => self.parse_expression_statement()?,
            other => {
                return Err(ParseError::unexpected_token(
                    span,
                    "statement",
                    other.describe(),
                ))
            }
        }

        Ok(())
    }

    fn parse_import(&mut self) -> ParseResult<()> {
        let span = self.expect(&Token::Import)?;

        // Only `import type … from '…'` carries no runtime value
        if !self.check_ident("type") {
            return Err(ParseError::unsupported(
                span,
                "value imports are not supported in state modules",
            ));
        }

        loop {
            match self.advance() {
                Some((Token::String(_), _)) => break,
                Some(_) => continue,
                None => return Err(ParseError::unexpected_eof(self.eof_span(), "module path")),
            }
        }

        self.match_token(&Token::Semi);
        Ok(())
    }

    fn parse_export(&mut self) -> ParseResult<()> {
        self.expect(&Token::Export)?;
        let Some((token, span)) = self.peek().cloned() else {
            return Err(ParseError::unexpected_eof(self.eof_span(), "export declaration"));
        };

        match token {
            Token::Default => {
                self.advance();
                let value = self.parse_expression()?;
                self.match_token(&Token::Semi);
                if self.default_export.is_some() {
                    return Err(ParseError::invalid_syntax(span, "Duplicate default export"));
                }
                self.default_export = Some(value);
            }
            Token::Const | Token::Let | Token::Var => {
                for name in self.parse_declaration()? {
                    if let Some(Binding::Value(value)) = self.bindings.get(&name) {
                        self.exports.insert(name, value.clone());
                    }
                }
            }
            Token::Function => {
                let (name, value) = self.parse_function_declaration()?;
                self.exports.insert(name, value);
            }
            Token::Class => {
                self.parse_class_declaration()?;
            }
            Token::Ident("type") if self.ident_follows() => self.skip_type_alias()?,
            Token::Ident("interface") if self.ident_follows() => self.skip_interface()?,
            Token::LBrace => self.parse_export_list()?,
            other => {
                return Err(ParseError::unexpected_token(
                    span,
                    "export declaration",
                    other.describe(),
                ))
            }
        }

        Ok(())
    }

    /// `export { a, b as c };`
    fn parse_export_list(&mut self) -> ParseResult<()> {
        self.expect(&Token::LBrace)?;
        while !self.match_token(&Token::RBrace) {
            let (name, span) = self.expect_ident()?;
            let exported = if self.check_ident("as") {
                self.advance();
                self.expect_property_name()?.0
            } else {
                name.clone()
            };
            let value = self.lookup(&name, span)?;
            self.exports.insert(exported, value);

            if !self.match_token(&Token::Comma) {
                self.expect(&Token::RBrace)?;
                break;
            }
        }

        if self.check_ident("from") {
            return Err(ParseError::unsupported(
                self.peek_span(),
                "re-exports are not supported in state modules",
            ));
        }
        self.match_token(&Token::Semi);
        Ok(())
    }

    /// `const a = 1, b: T = 2;`, returning the declared names
    fn parse_declaration(&mut self) -> ParseResult<Vec<String>> {
        self.advance(); // const / let / var

        let mut names = Vec::new();
        loop {
            if self.check(&Token::LBrace) || self.check(&Token::LBracket) {
                return Err(ParseError::unsupported(
                    self.peek_span(),
                    "destructuring declarations",
                ));
            }

            let (name, _) = self.expect_ident()?;
            if self.match_token(&Token::Colon) {
                self.skip_type()?;
            }

            let value = if self.match_token(&Token::Eq) {
                self.parse_expression()?
            } else {
                Value::Undefined
            };

            self.bindings.insert(name.clone(), Binding::Value(value));
            names.push(name);

            if !self.match_token(&Token::Comma) {
                break;
            }
        }

        self.match_token(&Token::Semi);
        Ok(names)
    }

    fn parse_function_declaration(&mut self) -> ParseResult<(String, Value)> {
        let span = self.peek_span();
        let (name, value) = self.parse_function()?;
        let Some(name) = name else {
            return Err(ParseError::invalid_syntax(
                span,
                "Function declarations require a name",
            ));
        };
        self.bindings
            .insert(name.clone(), Binding::Value(value.clone()));
        Ok((name, value))
    }

    /// `class Name { field = expr; method() { … } }`
    fn parse_class_declaration(&mut self) -> ParseResult<String> {
        self.expect(&Token::Class)?;
        let (name, _) = self.expect_ident()?;

        if self.check_punct("<") {
            self.skip_type()?;
        }
        if self.check_ident("extends") {
            return Err(ParseError::unsupported(self.peek_span(), "class inheritance"));
        }
        if self.check_ident("implements") {
            self.advance();
            self.skip_type()?;
            while self.match_token(&Token::Comma) {
                self.skip_type()?;
            }
        }

        self.expect(&Token::LBrace)?;

        let mut fields = Vec::new();
        loop {
            let Some((token, span)) = self.peek().cloned() else {
                return Err(ParseError::unexpected_eof(self.eof_span(), "'}'"));
            };

            match token {
                Token::RBrace => {
                    self.advance();
                    break;
                }
                Token::Semi => {
                    self.advance();
                }
                _ => {
                    if let Some(field) = self.parse_class_member(span)? {
                        fields.push(field);
                    }
                }
            }
        }

        self.bindings.insert(
            name.clone(),
            Binding::Class(ClassDecl {
                name: name.clone(),
                fields,
            }),
        );
        Ok(name)
    }

    /// Parse one class member; returns instance fields, skips everything else
    fn parse_class_member(
        &mut self,
        span: Range<usize>,
    ) -> ParseResult<Option<(String, Option<usize>)>> {
        let mut is_static = false;

        loop {
            let modifier = match self.peek() {
                Some((Token::Ident(word), _)) => *word,
                _ => break,
            };
            let is_modifier = matches!(
                modifier,
                "public"
                    | "private"
                    | "protected"
                    | "readonly"
                    | "declare"
                    | "override"
                    | "async"
                    | "accessor"
                    | "static"
                    | "get"
                    | "set"
            );
            if !is_modifier || !self.member_name_follows() {
                break;
            }
            if modifier == "static" {
                is_static = true;
            }
            if modifier == "get" || modifier == "set" {
                // Accessors live on the prototype
                is_static = true;
            }
            self.advance();
        }

        self.match_punct("*");
        self.match_punct("#");

        if self.check(&Token::LBracket) {
            return Err(ParseError::unsupported(span, "computed class members"));
        }
        let (name, _) = self.parse_property_key()?;

        self.match_punct("?");
        self.match_punct("!");

        if self.check(&Token::LParen) || self.check_punct("<") {
            self.skip_method_rest()?;
            return Ok(None);
        }

        if self.match_token(&Token::Colon) {
            self.skip_type()?;
        }

        let initializer = if self.match_token(&Token::Eq) {
            let start = self.pos;
            self.skip_expression()?;
            Some(start)
        } else {
            None
        };
        self.match_token(&Token::Semi);

        if is_static || name == "constructor" {
            return Ok(None);
        }
        Ok(Some((name, initializer)))
    }

    /// `type Name<T> = …;`
    fn skip_type_alias(&mut self) -> ParseResult<()> {
        self.advance(); // type
        self.skip_type()?;
        self.expect(&Token::Eq)?;
        self.skip_type()?;
        self.match_token(&Token::Semi);
        Ok(())
    }

    /// `interface Name extends Other { … }`
    fn skip_interface(&mut self) -> ParseResult<()> {
        self.advance(); // interface
        while !self.check(&Token::LBrace) {
            if self.advance().is_none() {
                return Err(ParseError::unexpected_eof(self.eof_span(), "'{'"));
            }
        }
        self.skip_balanced()
    }

    /// Assignments and mutating calls: `a.b = v`, `a[k] = v`, `a.push(v)`
    fn parse_expression_statement(&mut self) -> ParseResult<()> {
        let (name, span) = self.expect_ident()?;

        // CommonJS modules: `module.exports = …`
        if name == "module"
            && !self.bindings.contains_key("module")
            && self.check(&Token::Dot)
            && matches!(self.peek_ahead(1), Some((Token::Ident("exports"), _)))
            && matches!(self.peek_ahead(2), Some((Token::Eq, _)))
        {
            self.pos += 3;
            let value = self.parse_expression()?;
            self.match_token(&Token::Semi);
            self.default_export = Some(value);
            return Ok(());
        }

        let mut object = self.lookup(&name, span.clone())?;
        let mut pending: Option<(String, Range<usize>)> = None;

        loop {
            let key = if self.match_token(&Token::Dot) {
                self.expect_property_name()?
            } else if self.check(&Token::LBracket) {
                let key_span = self.peek_span();
                self.advance();
                let key = self.parse_expression()?;
                self.expect(&Token::RBracket)?;
                (self.to_property_key(&key, key_span.clone())?, key_span)
            } else {
                break;
            };

            if let Some((previous, previous_span)) = pending.take() {
                object = self.read_member(&object, &previous, previous_span)?;
            }
            pending = Some(key);
        }

        match (self.peek().map(|(token, _)| token.clone()), pending) {
            (Some(Token::Eq), None) => {
                self.advance();
                let value = self.parse_expression()?;
                self.bindings.insert(name, Binding::Value(value));
            }
            (Some(Token::Eq), Some((key, key_span))) => {
                self.advance();
                let value = self.parse_expression()?;
                self.assign_member(&object, &key, value, key_span)?;
            }
            (Some(Token::LParen), Some((method, method_span))) => {
                let args = self.parse_arguments()?;
                self.call_method(&object, &method, args, method_span)?;
            }
            _ => {
                return Err(ParseError::unsupported(
                    span,
                    "only assignments and push/set/add calls are allowed as statements",
                ))
            }
        }

        self.match_token(&Token::Semi);
        Ok(())
    }

    // Expressions

    fn parse_expression(&mut self) -> ParseResult<Value> {
        if self.depth >= MAX_NESTING {
            return Err(ParseError::invalid_syntax(
                self.peek_span(),
                "Expression nesting too deep",
            ));
        }

        self.depth += 1;
        let result = self.parse_unary();
        self.depth -= 1;

        let value = result?;
        self.skip_type_assertions()?;
        Ok(value)
    }

    /// `expr as T`, `expr satisfies T`, `expr!`
    fn skip_type_assertions(&mut self) -> ParseResult<()> {
        loop {
            if self.check_ident("as") || self.check_ident("satisfies") {
                self.advance();
                self.skip_type()?;
            } else if self.check_punct("!") {
                self.advance();
            } else {
                return Ok(());
            }
        }
    }

    /// Prefix `-`/`+` chains, applied innermost first
    fn parse_unary(&mut self) -> ParseResult<Value> {
        let mut operators = Vec::new();
        loop {
            let span = self.peek_span();
            if self.match_token(&Token::Minus) {
                operators.push((true, span));
            } else if self.match_token(&Token::Plus) {
                operators.push((false, span));
            } else {
                break;
            }
        }

        let mut value = self.parse_postfix()?;
        for (negate, span) in operators.into_iter().rev() {
            value = match (negate, value) {
                (true, Value::Number(n)) => Value::Number(-n),
                (true, Value::BigInt(digits)) => Value::BigInt(negate_bigint(&digits)),
                (false, Value::Number(n)) => Value::Number(n),
                (true, _) => {
                    return Err(ParseError::unsupported(
                        span,
                        "unary '-' on a non-numeric value",
                    ))
                }
                (false, _) => {
                    return Err(ParseError::unsupported(
                        span,
                        "unary '+' on a non-numeric value",
                    ))
                }
            };
        }
        Ok(value)
    }

    fn parse_postfix(&mut self) -> ParseResult<Value> {
        let mut value = self.parse_primary()?;

        loop {
            if self.check(&Token::Dot) {
                self.advance();
                let (key, span) = self.expect_property_name()?;
                value = self.read_member(&value, &key, span)?;
            } else if self.check(&Token::LBracket) {
                let span = self.peek_span();
                self.advance();
                let key = self.parse_expression()?;
                self.expect(&Token::RBracket)?;
                let key = self.to_property_key(&key, span.clone())?;
                value = self.read_member(&value, &key, span)?;
            } else {
                return Ok(value);
            }
        }
    }

    fn parse_primary(&mut self) -> ParseResult<Value> {
        let Some((token, span)) = self.peek().cloned() else {
            return Err(ParseError::unexpected_eof(self.eof_span(), "expression"));
        };

        match token {
            Token::Number(raw) => {
                self.advance();
                parse_number(raw, span)
            }
            Token::String(raw) => {
                self.advance();
                Ok(Value::String(string_literal(raw, span)?))
            }
            Token::Template(raw) => {
                self.advance();
                let body = &raw[1..raw.len() - 1];
                if body.contains("${") {
                    return Err(ParseError::unsupported(
                        span,
                        "template literal substitutions",
                    ));
                }
                let cooked = unescape(body).map_err(|m| ParseError::invalid_syntax(span, m))?;
                Ok(Value::String(cooked))
            }
            Token::True => {
                self.advance();
                Ok(Value::Bool(true))
            }
            Token::False => {
                self.advance();
                Ok(Value::Bool(false))
            }
            Token::Null => {
                self.advance();
                Ok(Value::Null)
            }
            Token::Regex(raw) => {
                self.advance();
                let close = raw.rfind('/').unwrap_or(0);
                let source = raw.get(1..close).unwrap_or_default();
                let flags = raw.get(close + 1..).unwrap_or_default();
                Ok(Value::Object(self.heap.alloc_regexp(source, flags)))
            }
            Token::LBracket => self.parse_array_literal(),
            Token::LBrace => self.parse_object_literal(),
            Token::LParen => {
                if self.is_arrow_function() {
                    return self.parse_arrow_function();
                }
                self.advance();
                let value = self.parse_expression()?;
                self.expect(&Token::RParen)?;
                Ok(value)
            }
            Token::Function => Ok(self.parse_function()?.1),
            Token::New => self.parse_new(),
            Token::Class => Err(ParseError::unsupported(span, "class expressions")),
            Token::Ident(name) => self.parse_identifier(name, span),
            other => Err(ParseError::unexpected_token(
                span,
                "expression",
                other.describe(),
            )),
        }
    }

    fn parse_identifier(&mut self, name: &str, span: Range<usize>) -> ParseResult<Value> {
        // `x => …`
        if matches!(self.peek_ahead(1), Some((Token::Arrow, _))) {
            return self.parse_arrow_function();
        }

        if name == "async" {
            match self.peek_ahead(1) {
                Some((Token::Function, _)) => {
                    self.advance();
                    return Ok(self.parse_function()?.1);
                }
                Some((Token::LParen, _)) | Some((Token::Ident(_), _)) => {
                    self.advance();
                    return self.parse_arrow_function();
                }
                _ => {}
            }
        }

        self.advance();

        match name {
            "undefined" => return Ok(Value::Undefined),
            "NaN" => return Ok(Value::Number(f64::NAN)),
            "Infinity" => return Ok(Value::Number(f64::INFINITY)),
            _ => {}
        }

        if let Some(binding) = self.bindings.get(name) {
            return match binding {
                Binding::Value(value) => Ok(value.clone()),
                Binding::Class(_) => Err(ParseError::unsupported(
                    span,
                    format!("class '{}' used as a value", name),
                )),
            };
        }

        match name {
            "Symbol" if self.check(&Token::LParen) => {
                let args = self.parse_arguments()?;
                let description = match args.first() {
                    None | Some(Value::Undefined) => None,
                    Some(value) => Some(self.to_property_key(value, span)?),
                };
                Ok(Value::Symbol(self.heap.alloc_symbol(description)))
            }
            "BigInt" if self.check(&Token::LParen) => {
                let args = self.parse_arguments()?;
                to_bigint(args.first(), span)
            }
            "Object" if self.member_call_follows("freeze") => {
                self.pos += 2;
                let args = self.parse_arguments()?;
                Ok(args.into_iter().next().unwrap_or(Value::Undefined))
            }
            "Date" if self.member_call_follows("now") => {
                self.pos += 2;
                self.parse_arguments()?;
                Ok(Value::Number(Utc::now().timestamp_millis() as f64))
            }
            _ => Err(ParseError::UndefinedBinding {
                span,
                name: name.to_string(),
            }),
        }
    }

    fn parse_array_literal(&mut self) -> ParseResult<Value> {
        self.expect(&Token::LBracket)?;

        let mut elements = Vec::new();
        loop {
            if self.match_token(&Token::RBracket) {
                break;
            }
            // Elision: `[1, , 3]`
            if self.match_token(&Token::Comma) {
                elements.push(Value::Undefined);
                continue;
            }

            let span = self.peek_span();
            if self.match_token(&Token::Ellipsis) {
                let spread = self.parse_expression()?;
                elements.extend(self.iterate(&spread, span)?);
            } else {
                elements.push(self.parse_expression()?);
            }

            if !self.match_token(&Token::Comma) {
                self.expect(&Token::RBracket)?;
                break;
            }
        }

        Ok(Value::Object(self.heap.alloc_array(elements)))
    }

    fn parse_object_literal(&mut self) -> ParseResult<Value> {
        self.expect(&Token::LBrace)?;
        let id = self.heap.alloc_object();

        loop {
            if self.match_token(&Token::RBrace) {
                break;
            }

            let span = self.peek_span();
            if self.match_token(&Token::Ellipsis) {
                let spread = self.parse_expression()?;
                self.spread_properties(id, &spread, span)?;
            } else {
                if let Some((Token::Ident(modifier), _)) = self.peek().cloned() {
                    if self.member_name_follows() {
                        match modifier {
                            "get" | "set" => {
                                return Err(ParseError::unsupported(span, "accessor properties"))
                            }
                            "async" => {
                                self.advance();
                            }
                            _ => {}
                        }
                    }
                }
                self.match_punct("*");

                let key_token = self.peek().map(|(token, _)| token.clone());
                let (key, key_span) = self.parse_property_key()?;

                let value = if self.match_token(&Token::Colon) {
                    self.parse_expression()?
                } else if self.check(&Token::LParen) || self.check_punct("<") {
                    self.skip_method_rest()?;
                    Value::Object(self.heap.alloc_function(Some(key.clone())))
                } else if matches!(key_token, Some(Token::Ident(_)))
                    && (self.check(&Token::Comma) || self.check(&Token::RBrace))
                {
                    self.lookup(&key, key_span)?
                } else {
                    return Err(self.error_at_current("':'"));
                };

                self.heap
                    .set_property(id, key, value)
                    .map_err(|e| ParseError::invalid_syntax(span, e.to_string()))?;
            }

            if !self.match_token(&Token::Comma) {
                self.expect(&Token::RBrace)?;
                break;
            }
        }

        Ok(Value::Object(id))
    }

    /// Property name in an object literal or class body
    fn parse_property_key(&mut self) -> ParseResult<(String, Range<usize>)> {
        let Some((token, span)) = self.peek().cloned() else {
            return Err(ParseError::unexpected_eof(self.eof_span(), "property name"));
        };

        if let Some(name) = token.property_name() {
            self.advance();
            return Ok((name.to_string(), span));
        }

        match token {
            Token::String(raw) => {
                self.advance();
                Ok((string_literal(raw, span.clone())?, span))
            }
            Token::Number(raw) => {
                self.advance();
                let key = match parse_number(raw, span.clone())? {
                    Value::Number(n) => number_to_string(n),
                    Value::BigInt(digits) => digits,
                    _ => raw.to_string(),
                };
                Ok((key, span))
            }
            Token::LBracket => {
                self.advance();
                let key = self.parse_expression()?;
                self.expect(&Token::RBracket)?;
                Ok((self.to_property_key(&key, span.clone())?, span))
            }
            other => Err(ParseError::unexpected_token(
                span,
                "property name",
                other.describe(),
            )),
        }
    }

    fn parse_new(&mut self) -> ParseResult<Value> {
        self.expect(&Token::New)?;
        let (name, span) = self.expect_ident()?;
        let args = if self.check(&Token::LParen) {
            self.parse_arguments()?
        } else {
            Vec::new()
        };

        if let Some(binding) = self.bindings.get(&name) {
            return match binding.clone() {
                Binding::Class(class) => self.instantiate(&class, span),
                Binding::Value(_) => Err(ParseError::unsupported(
                    span,
                    format!("'{}' is not a constructor", name),
                )),
            };
        }

        let value = match name.as_str() {
            "Object" => Value::Object(self.heap.alloc_object()),
            "Array" => match args.as_slice() {
                [Value::Number(n)] => {
                    if n.fract() != 0.0 || *n < 0.0 || *n >= u32::MAX as f64 {
                        return Err(ParseError::invalid_syntax(span, "Invalid array length"));
                    }
                    if *n as usize > MAX_ARRAY_LENGTH {
                        return Err(ParseError::unsupported(span, "array too large"));
                    }
                    Value::Object(
                        self.heap
                            .alloc_array(vec![Value::Undefined; *n as usize]),
                    )
                }
                _ => Value::Object(self.heap.alloc_array(args)),
            },
            "Map" => {
                let map = self.heap.alloc_map();
                if let Some(iterable) = args.first().filter(|v| !v.is_nullish()) {
                    for entry in self.iterate(iterable, span.clone())? {
                        let (key, value) = self.map_entry(&entry, span.clone())?;
                        self.heap
                            .map_set(map, key, value)
                            .map_err(|e| ParseError::invalid_syntax(span.clone(), e.to_string()))?;
                    }
                }
                Value::Object(map)
            }
            "Set" => {
                let set = self.heap.alloc_set();
                if let Some(iterable) = args.first().filter(|v| !v.is_nullish()) {
                    for member in self.iterate(iterable, span.clone())? {
                        self.heap
                            .set_add(set, member)
                            .map_err(|e| ParseError::invalid_syntax(span.clone(), e.to_string()))?;
                    }
                }
                Value::Object(set)
            }
            "Date" => {
                let time = self.date_time_value(&args);
                Value::Object(self.heap.alloc_date(time))
            }
            "RegExp" => {
                let (source, flags) = match args.first() {
                    Some(Value::Object(id)) => match self.heap.get(*id).map(|o| o.kind()) {
                        Some(ObjectKind::RegExp { source, flags }) => {
                            (source.clone(), flags.clone())
                        }
                        _ => (String::new(), String::new()),
                    },
                    Some(Value::Undefined) | None => ("(?:)".to_string(), String::new()),
                    Some(value) => (self.to_property_key(value, span.clone())?, String::new()),
                };
                let flags = match args.get(1) {
                    Some(Value::String(f)) => f.clone(),
                    _ => flags,
                };
                Value::Object(self.heap.alloc_regexp(source, flags))
            }
            _ => {
                return Err(ParseError::unsupported(
                    span,
                    format!("'new {}'", name),
                ))
            }
        };

        Ok(value)
    }

    fn instantiate(&mut self, class: &ClassDecl, span: Range<usize>) -> ParseResult<Value> {
        let id = self.heap.alloc_instance(class.name.clone());
        let saved = self.pos;

        for (field, initializer) in &class.fields {
            let value = match initializer {
                Some(start) => {
                    self.pos = *start;
                    self.parse_expression()?
                }
                None => Value::Undefined,
            };
            self.heap
                .set_property(id, field.clone(), value)
                .map_err(|e| ParseError::invalid_syntax(span.clone(), e.to_string()))?;
        }

        self.pos = saved;
        Ok(Value::Object(id))
    }

    /// `function name<T>(params): R { body }`; the body is skipped
    fn parse_function(&mut self) -> ParseResult<(Option<String>, Value)> {
        self.expect(&Token::Function)?;
        self.match_punct("*");

        let name = match self.peek() {
            Some((Token::Ident(name), _)) => {
                let name = name.to_string();
                self.advance();
                Some(name)
            }
            _ => None,
        };

        self.skip_method_rest()?;
        let id = self.heap.alloc_function(name.clone());
        Ok((name, Value::Object(id)))
    }

    /// `(params) => body` or `param => body`; the body is skipped
    fn parse_arrow_function(&mut self) -> ParseResult<Value> {
        if self.check(&Token::LParen) {
            self.skip_balanced()?;
            if self.match_token(&Token::Colon) {
                self.skip_type()?;
            }
        } else {
            self.expect_ident()?;
        }

        self.expect(&Token::Arrow)?;
        if self.check(&Token::LBrace) {
            self.skip_balanced()?;
        } else {
            self.skip_expression()?;
        }

        Ok(Value::Object(self.heap.alloc_function(None)))
    }

    /// Generic parameters, parameter list, return type and body of a method
    fn skip_method_rest(&mut self) -> ParseResult<()> {
        if self.check_punct("<") {
            self.skip_type()?;
        }
        if !self.check(&Token::LParen) {
            return Err(self.error_at_current("'('"));
        }
        self.skip_balanced()?;
        if self.match_token(&Token::Colon) {
            self.skip_type()?;
        }
        if !self.check(&Token::LBrace) {
            return Err(self.error_at_current("'{'"));
        }
        self.skip_balanced()
    }

    fn parse_arguments(&mut self) -> ParseResult<Vec<Value>> {
        self.expect(&Token::LParen)?;

        let mut args = Vec::new();
        loop {
            if self.match_token(&Token::RParen) {
                break;
            }

            let span = self.peek_span();
            if self.match_token(&Token::Ellipsis) {
                let spread = self.parse_expression()?;
                args.extend(self.iterate(&spread, span)?);
            } else {
                args.push(self.parse_expression()?);
            }

            if !self.match_token(&Token::Comma) {
                self.expect(&Token::RParen)?;
                break;
            }
        }

        Ok(args)
    }

    // Evaluation helpers

    fn lookup(&self, name: &str, span: Range<usize>) -> ParseResult<Value> {
        match self.bindings.get(name) {
            Some(Binding::Value(value)) => Ok(value.clone()),
            Some(Binding::Class(_)) => Err(ParseError::unsupported(
                span,
                format!("class '{}' used as a value", name),
            )),
            None => match name {
                "undefined" => Ok(Value::Undefined),
                "NaN" => Ok(Value::Number(f64::NAN)),
                "Infinity" => Ok(Value::Number(f64::INFINITY)),
                _ => Err(ParseError::UndefinedBinding {
                    span,
                    name: name.to_string(),
                }),
            },
        }
    }

    fn read_member(&self, object: &Value, key: &str, span: Range<usize>) -> ParseResult<Value> {
        match object {
            Value::Undefined | Value::Null => Err(ParseError::invalid_syntax(
                span,
                format!(
                    "Cannot read properties of {} (reading '{}')",
                    if object == &Value::Null { "null" } else { "undefined" },
                    key
                ),
            )),
            Value::String(s) if key == "length" => {
                Ok(Value::Number(s.encode_utf16().count() as f64))
            }
            Value::Object(id) => {
                let Some(obj) = self.heap.get(*id) else {
                    return Ok(Value::Undefined);
                };
                let value = match (obj.kind(), key) {
                    (ObjectKind::Array(elements), "length") => Value::Number(elements.len() as f64),
                    (ObjectKind::Map(entries), "size") => Value::Number(entries.len() as f64),
                    (ObjectKind::Set(members), "size") => Value::Number(members.len() as f64),
                    (ObjectKind::Array(elements), key) if canonical_index(key).is_some() => {
                        canonical_index(key)
                            .and_then(|idx| elements.get(idx))
                            .cloned()
                            .unwrap_or(Value::Undefined)
                    }
                    _ => obj.property(key).cloned().unwrap_or(Value::Undefined),
                };
                Ok(value)
            }
            _ => Ok(Value::Undefined),
        }
    }

    fn assign_member(
        &mut self,
        object: &Value,
        key: &str,
        value: Value,
        span: Range<usize>,
    ) -> ParseResult<()> {
        let Value::Object(id) = object else {
            return Err(ParseError::invalid_syntax(
                span,
                format!("Cannot set property '{}' on a primitive value", key),
            ));
        };

        let is_array = matches!(
            self.heap.get(*id).map(|o| o.kind()),
            Some(ObjectKind::Array(_))
        );
        let result = match canonical_index(key) {
            Some(idx) if is_array && idx >= MAX_ARRAY_LENGTH => {
                return Err(ParseError::unsupported(span, "array too large"));
            }
            Some(idx) if is_array => self.heap.array_set(*id, idx, value),
            _ => self.heap.set_property(*id, key, value),
        };
        result.map_err(|e| ParseError::invalid_syntax(span, e.to_string()))
    }

    fn call_method(
        &mut self,
        object: &Value,
        method: &str,
        args: Vec<Value>,
        span: Range<usize>,
    ) -> ParseResult<()> {
        let id = object.as_object();
        let kind = id
            .and_then(|id| self.heap.get(id))
            .map(|o| match o.kind() {
                ObjectKind::Array(_) => "array",
                ObjectKind::Map(_) => "map",
                ObjectKind::Set(_) => "set",
                _ => "object",
            });

        let result = match (id, kind, method) {
            (Some(id), Some("array"), "push") => args
                .into_iter()
                .try_for_each(|value| self.heap.array_push(id, value)),
            (Some(id), Some("map"), "set") => {
                let mut args = args.into_iter();
                let key = args.next().unwrap_or(Value::Undefined);
                let value = args.next().unwrap_or(Value::Undefined);
                self.heap.map_set(id, key, value)
            }
            (Some(id), Some("set"), "add") => {
                let value = args.into_iter().next().unwrap_or(Value::Undefined);
                self.heap.set_add(id, value)
            }
            _ => {
                return Err(ParseError::unsupported(
                    span,
                    format!("call to '{}'", method),
                ))
            }
        };

        result.map_err(|e| ParseError::invalid_syntax(span, e.to_string()))
    }

    /// Values produced by iterating an array, set, map or string
    fn iterate(&mut self, value: &Value, span: Range<usize>) -> ParseResult<Vec<Value>> {
        match value {
            Value::String(s) => Ok(s.chars().map(|c| Value::String(c.to_string())).collect()),
            Value::Object(id) => {
                let kind = self.heap.get(*id).map(|o| o.kind().clone());
                match kind {
                    Some(ObjectKind::Array(elements)) => Ok(elements),
                    Some(ObjectKind::Set(members)) => Ok(members),
                    Some(ObjectKind::Map(entries)) => Ok(entries
                        .into_iter()
                        .map(|(k, v)| Value::Object(self.heap.alloc_array(vec![k, v])))
                        .collect()),
                    _ => Err(ParseError::unsupported(span, "iterating a non-iterable value")),
                }
            }
            _ => Err(ParseError::unsupported(span, "iterating a non-iterable value")),
        }
    }

    fn map_entry(&self, entry: &Value, span: Range<usize>) -> ParseResult<(Value, Value)> {
        let elements = entry
            .as_object()
            .and_then(|id| self.heap.get(id))
            .and_then(|obj| match obj.kind() {
                ObjectKind::Array(elements) => Some(elements),
                _ => None,
            });

        match elements {
            Some(elements) => Ok((
                elements.first().cloned().unwrap_or(Value::Undefined),
                elements.get(1).cloned().unwrap_or(Value::Undefined),
            )),
            None => Err(ParseError::invalid_syntax(
                span,
                "Map entries must be [key, value] arrays",
            )),
        }
    }

    /// Copy own enumerable properties for `{ ...value }`
    fn spread_properties(
        &mut self,
        target: ObjectId,
        value: &Value,
        span: Range<usize>,
    ) -> ParseResult<()> {
        let entries: Vec<(String, Value)> = match value {
            Value::String(s) => s
                .chars()
                .enumerate()
                .map(|(i, c)| (i.to_string(), Value::String(c.to_string())))
                .collect(),
            Value::Object(id) => match self.heap.get(*id) {
                Some(obj) => match obj.kind() {
                    ObjectKind::Array(elements) => elements
                        .iter()
                        .enumerate()
                        .map(|(i, v)| (i.to_string(), v.clone()))
                        .collect(),
                    _ => obj
                        .entries()
                        .into_iter()
                        .map(|(k, v)| (k.to_string(), v.clone()))
                        .collect(),
                },
                None => Vec::new(),
            },
            _ => Vec::new(),
        };

        for (key, value) in entries {
            self.heap
                .set_property(target, key, value)
                .map_err(|e| ParseError::invalid_syntax(span.clone(), e.to_string()))?;
        }
        Ok(())
    }

    fn to_property_key(&self, value: &Value, span: Range<usize>) -> ParseResult<String> {
        match value {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(number_to_string(*n)),
            Value::BigInt(digits) => Ok(digits.clone()),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Null => Ok("null".to_string()),
            Value::Undefined => Ok("undefined".to_string()),
            Value::Symbol(_) => Err(ParseError::unsupported(span, "symbol property keys")),
            Value::Object(_) => Err(ParseError::unsupported(span, "object property keys")),
        }
    }

    /// Time value for `new Date(…)`. Components and zone-less strings are read as UTC.
    fn date_time_value(&self, args: &[Value]) -> Option<f64> {
        match args {
            [] => Some(Utc::now().timestamp_millis() as f64),
            [Value::Number(ms)] => Some(*ms),
            [Value::String(s)] => parse_date_string(s),
            [Value::Object(id)] => match self.heap.get(*id).map(|o| o.kind()) {
                Some(ObjectKind::Date(time)) => *time,
                _ => None,
            },
            [_] => None,
            components => {
                let mut numbers = Vec::with_capacity(components.len());
                for value in components.iter().take(7) {
                    match value {
                        Value::Number(n) if n.is_finite() => numbers.push(n.trunc()),
                        _ => return None,
                    }
                }
                date_from_components(&numbers)
            }
        }
    }

    // Skipping

    /// Skip a bracketed group starting at the current `(`, `[` or `{`
    fn skip_balanced(&mut self) -> ParseResult<()> {
        let open_span = self.peek_span();
        if !matches!(
            self.peek(),
            Some((Token::LParen | Token::LBracket | Token::LBrace, _))
        ) {
            return Err(self.error_at_current("'(', '[' or '{'"));
        }

        let mut depth = 0usize;
        while let Some((token, _)) = self.advance() {
            match token {
                Token::LParen | Token::LBracket | Token::LBrace => depth += 1,
                Token::RParen | Token::RBracket | Token::RBrace => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                _ => {}
            }
        }

        Err(ParseError::unexpected_eof(open_span, "closing bracket"))
    }

    /// Skip a TypeScript type, stopping at the first token that cannot continue it
    fn skip_type(&mut self) -> ParseResult<()> {
        let mut depth = 0usize;
        let mut expect_operand = true;
        let mut after_paren = false;

        while let Some((token, _)) = self.peek() {
            if depth == 0 {
                let stop = match token {
                    Token::Comma
                    | Token::Semi
                    | Token::Eq
                    | Token::RParen
                    | Token::RBracket
                    | Token::RBrace => true,
                    Token::Arrow => !after_paren,
                    token => !expect_operand && !is_type_operator(token),
                };
                if stop {
                    break;
                }
            }

            after_paren = false;
            match token {
                Token::LParen | Token::LBracket | Token::LBrace | Token::Punct("<") => {
                    depth += 1;
                    expect_operand = true;
                }
                Token::RParen => {
                    depth = depth.saturating_sub(1);
                    expect_operand = false;
                    after_paren = depth == 0;
                }
                Token::RBracket | Token::RBrace | Token::Punct(">") => {
                    depth = depth.saturating_sub(1);
                    expect_operand = false;
                }
                Token::Punct(_)
                | Token::Dot
                | Token::Arrow
                | Token::Colon
                | Token::Comma
                | Token::Semi
                | Token::Eq
                | Token::Minus
                | Token::Plus
                | Token::Ellipsis => expect_operand = true,
                Token::Ident("keyof" | "typeof" | "readonly" | "unique" | "infer") => {
                    expect_operand = true
                }
                _ => expect_operand = false,
            }
            self.advance();
        }

        Ok(())
    }

    /// Skip an expression without evaluating it (arrow bodies, class field initializers)
    fn skip_expression(&mut self) -> ParseResult<()> {
        let mut depth = 0usize;
        let mut expect_operand = true;
        let mut consumed = 0usize;

        while let Some((token, _)) = self.peek() {
            if depth == 0 {
                let stop = match token {
                    Token::Comma | Token::Semi | Token::RParen | Token::RBracket | Token::RBrace => {
                        true
                    }
                    Token::Const
                    | Token::Let
                    | Token::Var
                    | Token::Export
                    | Token::Import
                    | Token::Class
                    | Token::Function => consumed > 0 && !expect_operand,
                    Token::LParen | Token::LBracket | Token::Dot => false,
                    token => !expect_operand && !is_expression_operator(token),
                };
                if stop {
                    break;
                }
            }

            match token {
                Token::LParen | Token::LBracket | Token::LBrace => {
                    depth += 1;
                    expect_operand = true;
                }
                Token::RParen | Token::RBracket | Token::RBrace => {
                    depth = depth.saturating_sub(1);
                    expect_operand = false;
                }
                token if is_expression_operator(token) => expect_operand = true,
                Token::Colon | Token::Comma | Token::Semi | Token::New => expect_operand = true,
                _ => expect_operand = false,
            }
            consumed += 1;
            self.advance();
        }

        if consumed == 0 {
            return Err(self.error_at_current("expression"));
        }
        Ok(())
    }

    /// Whether the `(` at the cursor opens an arrow function's parameter list
    fn is_arrow_function(&self) -> bool {
        let mut depth = 0usize;
        let mut idx = self.pos;

        while let Some((token, _)) = self.tokens.get(idx) {
            match token {
                Token::LParen | Token::LBracket | Token::LBrace => depth += 1,
                Token::RParen | Token::RBracket | Token::RBrace => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
            idx += 1;
        }

        match self.tokens.get(idx + 1) {
            Some((Token::Arrow, _)) => true,
            // Return type annotation: scan for the arrow
            Some((Token::Colon, _)) => {
                let mut depth = 0usize;
                for (token, _) in &self.tokens[idx + 2..] {
                    match token {
                        Token::Arrow if depth == 0 => return true,
                        Token::LParen | Token::LBracket | Token::LBrace => depth += 1,
                        Token::RParen | Token::RBracket | Token::RBrace => {
                            if depth == 0 {
                                return false;
                            }
                            depth -= 1;
                        }
                        Token::Comma | Token::Semi | Token::Eq if depth == 0 => return false,
                        _ => {}
                    }
                }
                false
            }
            _ => false,
        }
    }

    // Token helpers

    fn peek(&self) -> Option<&(Token<'src>, Range<usize>)> {
        self.tokens.get(self.pos)
    }

    fn peek_ahead(&self, offset: usize) -> Option<&(Token<'src>, Range<usize>)> {
        self.tokens.get(self.pos + offset)
    }

    fn advance(&mut self) -> Option<&(Token<'src>, Range<usize>)> {
        let token = self.tokens.get(self.pos);
        self.pos += 1;
        token
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn check(&self, token: &Token) -> bool {
        if let Some((t, _)) = self.peek() {
            std::mem::discriminant(t) == std::mem::discriminant(token)
        } else {
            false
        }
    }

    fn check_ident(&self, name: &str) -> bool {
        matches!(self.peek(), Some((Token::Ident(ident), _)) if *ident == name)
    }

    fn check_punct(&self, punct: &str) -> bool {
        matches!(self.peek(), Some((Token::Punct(p), _)) if *p == punct)
    }

    fn match_token(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_punct(&mut self, punct: &str) -> bool {
        if self.check_punct(punct) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &Token) -> ParseResult<Range<usize>> {
        if self.check(token) {
            let span = self.peek_span();
            self.advance();
            Ok(span)
        } else {
            Err(self.error_at_current(&token.describe()))
        }
    }

    fn expect_ident(&mut self) -> ParseResult<(String, Range<usize>)> {
        match self.peek() {
            Some((Token::Ident(name), span)) => {
                let result = (name.to_string(), span.clone());
                self.advance();
                Ok(result)
            }
            _ => Err(self.error_at_current("identifier")),
        }
    }

    /// Identifier or keyword after `.`
    fn expect_property_name(&mut self) -> ParseResult<(String, Range<usize>)> {
        let name = self
            .peek()
            .and_then(|(token, span)| token.property_name().map(|n| (n.to_string(), span.clone())));
        match name {
            Some(result) => {
                self.advance();
                Ok(result)
            }
            None => Err(self.error_at_current("property name")),
        }
    }

    /// Next token is an identifier (`type Foo`, `interface Foo`)
    fn ident_follows(&self) -> bool {
        matches!(self.peek_ahead(1), Some((Token::Ident(_), _)))
    }

    /// A modifier word is followed by a member name rather than ending the member
    fn member_name_follows(&self) -> bool {
        matches!(
            self.peek_ahead(1),
            Some((
                Token::Ident(_)
                    | Token::String(_)
                    | Token::Number(_)
                    | Token::LBracket
                    | Token::Punct("*" | "#")
                    | Token::Const
                    | Token::Let
                    | Token::Var
                    | Token::Export
                    | Token::Default
                    | Token::Import
                    | Token::Function
                    | Token::Class
                    | Token::New
                    | Token::Null
                    | Token::True
                    | Token::False,
                _
            ))
        )
    }

    /// `.name(` follows the current identifier
    fn member_call_follows(&self, method: &str) -> bool {
        matches!(self.peek(), Some((Token::Dot, _)))
            && matches!(self.peek_ahead(1), Some((Token::Ident(m), _)) if *m == method)
            && matches!(self.peek_ahead(2), Some((Token::LParen, _)))
    }

    fn peek_span(&self) -> Range<usize> {
        self.peek()
            .map(|(_, span)| span.clone())
            .unwrap_or_else(|| self.eof_span())
    }

    fn eof_span(&self) -> Range<usize> {
        let end = self
            .tokens
            .last()
            .map(|(_, span)| span.end)
            .unwrap_or(self.source_len);
        end..end
    }

    fn error_at_current(&self, expected: &str) -> ParseError {
        match self.peek() {
            Some((token, span)) => {
                ParseError::unexpected_token(span.clone(), expected, token.describe())
            }
            None => ParseError::unexpected_eof(self.eof_span(), expected),
        }
    }
}

fn is_type_operator(token: &Token) -> bool {
    matches!(
        token,
        Token::Punct("|" | "&" | "<") | Token::Dot | Token::LBracket
    )
}

fn is_expression_operator(token: &Token) -> bool {
    matches!(
        token,
        Token::Punct(_)
            | Token::Dot
            | Token::Arrow
            | Token::Eq
            | Token::Minus
            | Token::Plus
            | Token::Ellipsis
            | Token::Ident(
                "typeof" | "instanceof" | "in" | "of" | "void" | "await" | "delete" | "yield"
                    | "as" | "satisfies" | "keyof"
            )
    )
}

fn string_literal(raw: &str, span: Range<usize>) -> ParseResult<String> {
    unescape(&raw[1..raw.len() - 1]).map_err(|m| ParseError::invalid_syntax(span, m))
}

/// Evaluate a numeric literal (`1_000`, `0xFF`, `.5`, `10n`)
fn parse_number(raw: &str, span: Range<usize>) -> ParseResult<Value> {
    let invalid = || ParseError::invalid_syntax(span.clone(), format!("Invalid number literal '{}'", raw));

    let cleaned: String = raw.chars().filter(|c| *c != '_').collect();
    let (digits, is_bigint) = match cleaned.strip_suffix('n') {
        Some(digits) => (digits, true),
        None => (cleaned.as_str(), false),
    };

    let radix = match digits.get(..2) {
        Some("0x" | "0X") => 16,
        Some("0o" | "0O") => 8,
        Some("0b" | "0B") => 2,
        _ => 10,
    };

    if radix != 10 {
        let n = u128::from_str_radix(&digits[2..], radix).map_err(|_| invalid())?;
        return Ok(if is_bigint {
            Value::BigInt(n.to_string())
        } else {
            Value::Number(n as f64)
        });
    }

    if is_bigint {
        if digits.contains(|c| matches!(c, '.' | 'e' | 'E')) {
            return Err(invalid());
        }
        let n: u128 = digits.parse().map_err(|_| invalid())?;
        return Ok(Value::BigInt(n.to_string()));
    }

    digits.parse::<f64>().map(Value::Number).map_err(|_| invalid())
}

fn to_bigint(value: Option<&Value>, span: Range<usize>) -> ParseResult<Value> {
    let invalid = |what: &str| {
        ParseError::invalid_syntax(span.clone(), format!("Cannot convert {} to a BigInt", what))
    };

    match value {
        Some(Value::BigInt(digits)) => Ok(Value::BigInt(digits.clone())),
        Some(Value::Number(n)) if n.is_finite() && n.fract() == 0.0 => {
            Ok(Value::BigInt(number_to_string(*n)))
        }
        Some(Value::Bool(b)) => Ok(Value::BigInt(if *b { "1" } else { "0" }.to_string())),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            let (negative, digits) = match trimmed.strip_prefix('-') {
                Some(rest) => (true, rest),
                None => (false, trimmed),
            };
            let n: u128 = if digits.is_empty() {
                0
            } else {
                digits.parse().map_err(|_| invalid(s))?
            };
            let normalized = n.to_string();
            Ok(Value::BigInt(if negative {
                negate_bigint(&normalized)
            } else {
                normalized
            }))
        }
        Some(Value::Number(n)) => Err(invalid(&number_to_string(*n))),
        _ => Err(invalid("value")),
    }
}

fn negate_bigint(digits: &str) -> String {
    match digits.strip_prefix('-') {
        Some(positive) => positive.to_string(),
        None if digits == "0" => digits.to_string(),
        None => format!("-{}", digits),
    }
}

/// `Number.prototype.toString()` for property keys
pub(crate) fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{:.0}", n)
    } else {
        format!("{}", n)
    }
}

/// Canonical array index of a property key (`"0"`, `"12"`, not `"01"`)
fn canonical_index(key: &str) -> Option<usize> {
    if key.is_empty() || (key.len() > 1 && key.starts_with('0')) {
        return None;
    }
    if !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse::<u32>().ok().filter(|n| *n != u32::MAX).map(|n| n as usize)
}

fn parse_date_string(s: &str) -> Option<f64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis() as f64);
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc().timestamp_millis() as f64);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().timestamp_millis() as f64)
}

/// `new Date(year, monthIndex, day?, hours?, minutes?, seconds?, ms?)` in UTC
fn date_from_components(numbers: &[f64]) -> Option<f64> {
    let mut year = *numbers.first()?;
    if (0.0..=99.0).contains(&year) {
        year += 1900.0;
    }
    let month = numbers.get(1).copied().unwrap_or(0.0);
    let day = numbers.get(2).copied().unwrap_or(1.0);
    let hours = numbers.get(3).copied().unwrap_or(0.0);
    let minutes = numbers.get(4).copied().unwrap_or(0.0);
    let seconds = numbers.get(5).copied().unwrap_or(0.0);
    let millis = numbers.get(6).copied().unwrap_or(0.0);

    // Months overflow into years the way `MakeDay` does
    let year = year + (month / 12.0).floor();
    let month = month.rem_euclid(12.0);

    let first_of_month = NaiveDate::from_ymd_opt(year as i32, month as u32 + 1, 1)?
        .and_hms_opt(0, 0, 0)?
        .and_utc()
        .timestamp_millis() as f64;

    let day_ms = 86_400_000.0;
    Some(
        first_of_month
            + (day - 1.0) * day_ms
            + hours * 3_600_000.0
            + minutes * 60_000.0
            + seconds * 1_000.0
            + millis,
    )
}

/// Evaluate a state module
pub fn parse_module(source: &str) -> ParseResult<Module> {
    Parser::new(source)?.evaluate_module()
}

/// Evaluate a standalone expression into a fresh heap
pub fn parse_value(source: &str) -> ParseResult<(Heap, Value)> {
    Parser::new(source)?.evaluate_expression()
}
