//! Recursive descent parser for GraphQL documents.
//!
//! GraphQL syntax errors are not recoverable: parsing stops at the first error,
//! which is reported through the returned [`DiagnosticBag`].

use crate::ast::*;
use crate::lexer::{block_string_value, string_value, Lexer};
use crate::token::{DirectiveLocation, Token, TokenKind};
use gqltag_core::{diagnostics::codes, Diagnostic, DiagnosticBag, Span};
use std::sync::Arc;

type PResult<T> = Result<T, Diagnostic>;

/// Options controlling what the parser accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Accept variable definitions on fragments:
    /// `fragment Foo($v: Int) on T { ... }`.
    pub allow_legacy_fragment_variables: bool,
}

/// Result of parsing.
///
/// When `diagnostics` contains an error, `document` holds only the
/// definitions that were complete before the error.
#[derive(Debug)]
pub struct ParseResult {
    pub document: Document,
    pub diagnostics: DiagnosticBag,
}

impl ParseResult {
    /// Returns the document, or the first syntax error.
    pub fn into_result(self) -> Result<Document, Diagnostic> {
        match self.diagnostics.first_error() {
            Some(error) => Err(error.clone()),
            None => Ok(self.document),
        }
    }
}

/// Parses a source string into a document.
pub fn parse(source: &str, options: ParseOptions) -> ParseResult {
    let mut parser = Parser::new(source, options);
    let mut definitions = Vec::new();
    let mut diagnostics = DiagnosticBag::new();

    if let Err(error) = parser.parse_definitions(&mut definitions) {
        diagnostics.add(error);
    }

    let document = Document {
        definitions,
        loc: Some(Location {
            span: Some(Span::new(0, parser.prev_end)),
            source: Arc::from(source),
        }),
    };

    ParseResult {
        document,
        diagnostics,
    }
}

/// Parser for GraphQL documents.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    prev_end: u32,
    options: ParseOptions,
}

impl<'a> Parser<'a> {
    /// Creates a new parser.
    pub fn new(source: &'a str, options: ParseOptions) -> Self {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token();
        Self {
            lexer,
            current,
            prev_end: 0,
            options,
        }
    }

    /// Returns the current token kind.
    #[inline]
    fn at(&self) -> TokenKind {
        self.current.kind
    }

    /// Returns true if at the given kind.
    #[inline]
    fn at_kind(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    /// Advances to the next token.
    fn advance(&mut self) {
        self.prev_end = self.current.span.end;
        self.current = self.lexer.next_token();
    }

    /// Span from `start` to the end of the last consumed token.
    #[inline]
    fn span_from(&self, start: u32) -> Option<Span> {
        Some(Span::new(start, self.prev_end))
    }

    /// Gets the text of the current token.
    fn current_text(&self) -> &'a str {
        self.lexer.span_text(self.current.span)
    }

    /// Expects a specific token kind.
    fn expect(&mut self, kind: TokenKind) -> PResult<Token> {
        if self.at_kind(kind) {
            let token = self.current;
            self.advance();
            Ok(token)
        } else {
            Err(self.expected(&describe_kind(kind)))
        }
    }

    /// Advances if at the given kind.
    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at_kind(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Describes the current token for error messages.
    fn describe_current(&self) -> String {
        let kind = self.at();
        match kind {
            TokenKind::Eof => kind.as_str().to_string(),
            TokenKind::Ident | TokenKind::IntLiteral | TokenKind::FloatLiteral => {
                format!("{} \"{}\"", kind.as_str(), self.current_text())
            }
            TokenKind::StringLiteral | TokenKind::BlockStringLiteral => {
                format!("{} {}", kind.as_str(), self.current_text())
            }
            _ if kind.is_keyword() => format!("Name \"{}\"", self.current_text()),
            _ => format!("\"{}\"", self.current_text()),
        }
    }

    /// Error for a token that cannot start or continue the current construct.
    fn unexpected(&self) -> Diagnostic {
        let span = self.current.span;
        match self.at() {
            TokenKind::Eof => Diagnostic::error(codes::UNEXPECTED_EOF, "Unexpected <EOF>.")
                .with_span(span, "unexpected end of input"),
            TokenKind::UnterminatedString => {
                Diagnostic::error(codes::UNTERMINATED_STRING, "Unterminated string.")
                    .with_span(span, "string starts here")
            }
            TokenKind::Error => {
                let text = self.current_text();
                let title = if text.starts_with(|c: char| c == '-' || c.is_ascii_digit()) {
                    format!("Invalid number \"{text}\".")
                } else {
                    format!("Unexpected character: \"{text}\".")
                };
                Diagnostic::error(codes::INVALID_SYNTAX, title).with_span(span, "invalid token")
            }
            _ => Diagnostic::error(
                codes::UNEXPECTED_TOKEN,
                format!("Unexpected {}.", self.describe_current()),
            )
            .with_span(span, "unexpected token"),
        }
    }

    /// Error for a missing expected construct.
    fn expected(&self, what: &str) -> Diagnostic {
        let span = self.current.span;
        match self.at() {
            TokenKind::Error | TokenKind::UnterminatedString => self.unexpected(),
            TokenKind::Eof => Diagnostic::error(
                codes::UNEXPECTED_EOF,
                format!("Expected {what}, found <EOF>."),
            )
            .with_span(span, format!("expected {what}")),
            _ => Diagnostic::error(
                codes::UNEXPECTED_TOKEN,
                format!("Expected {what}, found {}.", self.describe_current()),
            )
            .with_span(span, format!("expected {what}")),
        }
    }

    /// Parses one or more items between `open` and `close`.
    fn many<T>(
        &mut self,
        open: TokenKind,
        close: TokenKind,
        mut item: impl FnMut(&mut Self) -> PResult<T>,
    ) -> PResult<Vec<T>> {
        self.expect(open)?;
        let mut items = Vec::new();
        loop {
            items.push(item(self)?);
            if self.eat(close) {
                return Ok(items);
            }
        }
    }

    /// Parses one or more items between `open` and `close` if `open` is present.
    fn optional_many<T>(
        &mut self,
        open: TokenKind,
        close: TokenKind,
        item: impl FnMut(&mut Self) -> PResult<T>,
    ) -> PResult<Vec<T>> {
        if self.at_kind(open) {
            self.many(open, close, item)
        } else {
            Ok(Vec::new())
        }
    }

    /// Parses all definitions of a document. At least one is required.
    fn parse_definitions(&mut self, definitions: &mut Vec<Definition>) -> PResult<()> {
        loop {
            definitions.push(self.parse_definition()?);
            if self.current.is_eof() {
                return Ok(());
            }
        }
    }

    /// Parses a definition.
    fn parse_definition(&mut self) -> PResult<Definition> {
        if self.at_kind(TokenKind::LBrace) {
            return Ok(Definition::Operation(self.parse_operation()?));
        }

        let start = self.current.span.start;
        let description = self.parse_description()?;

        match self.at() {
            TokenKind::Query
            | TokenKind::Mutation
            | TokenKind::Subscription
            | TokenKind::Fragment
            | TokenKind::Extend
                if description.is_some() =>
            {
                Err(Diagnostic::error(
                    codes::INVALID_SYNTAX,
                    "Unexpected description, descriptions are supported only on type definitions.",
                )
                .with_span(Span::new(start, self.prev_end), "description"))
            }
            TokenKind::Query | TokenKind::Mutation | TokenKind::Subscription => {
                Ok(Definition::Operation(self.parse_operation()?))
            }
            TokenKind::Fragment => Ok(Definition::Fragment(self.parse_fragment_definition()?)),
            TokenKind::Schema => Ok(Definition::Schema(
                self.parse_schema_definition(start, description, false)?,
            )),
            TokenKind::Scalar
            | TokenKind::Type
            | TokenKind::Interface
            | TokenKind::Union
            | TokenKind::Enum
            | TokenKind::Input => Ok(Definition::Type(
                self.parse_type_definition(start, description, false)?,
            )),
            TokenKind::Directive => Ok(Definition::Directive(
                self.parse_directive_definition(start, description)?,
            )),
            TokenKind::Extend => self.parse_extension(),
            _ => Err(self.unexpected()),
        }
    }

    /// Parses a description string.
    fn parse_description(&mut self) -> PResult<Option<StringValue>> {
        if matches!(
            self.at(),
            TokenKind::StringLiteral | TokenKind::BlockStringLiteral
        ) {
            self.parse_string_value().map(Some)
        } else {
            Ok(None)
        }
    }

    /// Parses a name.
    fn parse_name(&mut self) -> PResult<Name> {
        if self.at().is_name() {
            let token = self.current;
            self.advance();
            Ok(Name::new(self.lexer.span_text(token.span), token.span))
        } else {
            Err(self.expected("Name"))
        }
    }

    // =========================================================================
    // Executable definitions
    // =========================================================================

    /// Parses an operation definition.
    fn parse_operation(&mut self) -> PResult<OperationDefinition> {
        let start = self.current.span.start;

        if self.at_kind(TokenKind::LBrace) {
            let selection_set = self.parse_selection_set()?;
            return Ok(OperationDefinition {
                operation: OperationType::Query,
                name: None,
                variables: Vec::new(),
                directives: Vec::new(),
                selection_set,
                span: self.span_from(start),
            });
        }

        let operation = self.parse_operation_type()?;
        let name = if self.at().is_name() {
            Some(self.parse_name()?)
        } else {
            None
        };
        let variables = self.optional_many(TokenKind::LParen, TokenKind::RParen, |p| {
            p.parse_variable_definition()
        })?;
        let directives = self.parse_directives(false)?;
        let selection_set = self.parse_selection_set()?;

        Ok(OperationDefinition {
            operation,
            name,
            variables,
            directives,
            selection_set,
            span: self.span_from(start),
        })
    }

    fn parse_operation_type(&mut self) -> PResult<OperationType> {
        let operation = match self.at() {
            TokenKind::Query => OperationType::Query,
            TokenKind::Mutation => OperationType::Mutation,
            TokenKind::Subscription => OperationType::Subscription,
            _ => return Err(self.unexpected()),
        };
        self.advance();
        Ok(operation)
    }

    /// Parses a variable definition.
    fn parse_variable_definition(&mut self) -> PResult<VariableDefinition> {
        let start = self.current.span.start;
        self.expect(TokenKind::Dollar)?;
        let name = self.parse_name()?;
        self.expect(TokenKind::Colon)?;
        let ty = self.parse_type()?;
        let default_value = if self.eat(TokenKind::Eq) {
            Some(self.parse_value(true)?)
        } else {
            None
        };
        let directives = self.parse_directives(true)?;

        Ok(VariableDefinition {
            name,
            ty,
            default_value,
            directives,
            span: self.span_from(start),
        })
    }

    /// Parses a fragment definition.
    fn parse_fragment_definition(&mut self) -> PResult<FragmentDefinition> {
        let start = self.current.span.start;
        self.advance(); // fragment

        if self.at_kind(TokenKind::On) {
            return Err(self.unexpected());
        }
        let name = self.parse_name()?;

        let variables = if self.at_kind(TokenKind::LParen) {
            if !self.options.allow_legacy_fragment_variables {
                return Err(Diagnostic::error(
                    codes::LEGACY_FRAGMENT_VARIABLES,
                    "Expected \"on\", found \"(\".",
                )
                .with_span(
                    self.current.span,
                    "fragment variables require legacy fragment variable parsing",
                ));
            }
            Some(self.many(TokenKind::LParen, TokenKind::RParen, |p| {
                p.parse_variable_definition()
            })?)
        } else {
            None
        };

        self.expect(TokenKind::On)?;
        let type_condition = self.parse_name()?;
        let directives = self.parse_directives(false)?;
        let selection_set = self.parse_selection_set()?;

        Ok(FragmentDefinition {
            name,
            variables,
            type_condition,
            directives,
            selection_set,
            span: self.span_from(start),
        })
    }

    /// Parses a selection set.
    fn parse_selection_set(&mut self) -> PResult<SelectionSet> {
        let start = self.current.span.start;
        let selections = self.many(TokenKind::LBrace, TokenKind::RBrace, |p| {
            p.parse_selection()
        })?;

        Ok(SelectionSet {
            selections,
            span: self.span_from(start),
        })
    }

    /// Parses a selection.
    fn parse_selection(&mut self) -> PResult<Selection> {
        if !self.at_kind(TokenKind::Spread) {
            return self.parse_field().map(Selection::Field);
        }

        let start = self.current.span.start;
        self.advance(); // ...

        if self.at().is_name() && !self.at_kind(TokenKind::On) {
            let name = self.parse_name()?;
            let directives = self.parse_directives(false)?;
            return Ok(Selection::FragmentSpread(FragmentSpread {
                name,
                directives,
                span: self.span_from(start),
            }));
        }

        let type_condition = if self.eat(TokenKind::On) {
            Some(self.parse_name()?)
        } else {
            None
        };
        let directives = self.parse_directives(false)?;
        let selection_set = self.parse_selection_set()?;

        Ok(Selection::InlineFragment(InlineFragment {
            type_condition,
            directives,
            selection_set,
            span: self.span_from(start),
        }))
    }

    /// Parses a field selection.
    fn parse_field(&mut self) -> PResult<Field> {
        let start = self.current.span.start;
        let name_or_alias = self.parse_name()?;

        let (alias, name) = if self.eat(TokenKind::Colon) {
            (Some(name_or_alias), self.parse_name()?)
        } else {
            (None, name_or_alias)
        };

        let arguments = self.parse_arguments(false)?;
        let directives = self.parse_directives(false)?;
        let selection_set = if self.at_kind(TokenKind::LBrace) {
            Some(self.parse_selection_set()?)
        } else {
            None
        };

        Ok(Field {
            alias,
            name,
            arguments,
            directives,
            selection_set,
            span: self.span_from(start),
        })
    }

    // =========================================================================
    // Shared nodes
    // =========================================================================

    /// Parses arguments.
    fn parse_arguments(&mut self, is_const: bool) -> PResult<Vec<Argument>> {
        self.optional_many(TokenKind::LParen, TokenKind::RParen, |p| {
            let start = p.current.span.start;
            let name = p.parse_name()?;
            p.expect(TokenKind::Colon)?;
            let value = p.parse_value(is_const)?;
            Ok(Argument {
                name,
                value,
                span: p.span_from(start),
            })
        })
    }

    /// Parses directives.
    fn parse_directives(&mut self, is_const: bool) -> PResult<Vec<Directive>> {
        let mut directives = Vec::new();
        while self.at_kind(TokenKind::At) {
            let start = self.current.span.start;
            self.advance(); // @
            let name = self.parse_name()?;
            let arguments = self.parse_arguments(is_const)?;
            directives.push(Directive {
                name,
                arguments,
                span: self.span_from(start),
            });
        }
        Ok(directives)
    }

    /// Parses a type reference.
    fn parse_type(&mut self) -> PResult<Type> {
        let start = self.current.span.start;

        let ty = if self.eat(TokenKind::LBracket) {
            let inner = self.parse_type()?;
            self.expect(TokenKind::RBracket)?;
            Type::List(Box::new(inner), self.span_from(start))
        } else {
            Type::Named(self.parse_name()?)
        };

        if self.eat(TokenKind::Bang) {
            Ok(Type::NonNull(Box::new(ty), self.span_from(start)))
        } else {
            Ok(ty)
        }
    }

    /// Parses a value. Variables are rejected when `is_const` is set.
    fn parse_value(&mut self, is_const: bool) -> PResult<Value> {
        let start = self.current.span.start;

        match self.at() {
            TokenKind::Dollar if !is_const => {
                self.advance();
                Ok(Value::Variable(self.parse_name()?))
            }
            TokenKind::IntLiteral => {
                let text = self.current_text().to_string();
                self.advance();
                Ok(Value::Int(text, self.span_from(start)))
            }
            TokenKind::FloatLiteral => {
                let text = self.current_text().to_string();
                self.advance();
                Ok(Value::Float(text, self.span_from(start)))
            }
            TokenKind::StringLiteral | TokenKind::BlockStringLiteral => {
                self.parse_string_value().map(Value::String)
            }
            TokenKind::True | TokenKind::False => {
                let value = self.at_kind(TokenKind::True);
                self.advance();
                Ok(Value::Boolean(value, self.span_from(start)))
            }
            TokenKind::Null => {
                self.advance();
                Ok(Value::Null(self.span_from(start)))
            }
            TokenKind::LBracket => {
                self.advance();
                let mut values = Vec::new();
                while !self.eat(TokenKind::RBracket) {
                    values.push(self.parse_value(is_const)?);
                }
                Ok(Value::List(values, self.span_from(start)))
            }
            TokenKind::LBrace => {
                self.advance();
                let mut fields = Vec::new();
                while !self.eat(TokenKind::RBrace) {
                    let field_start = self.current.span.start;
                    let name = self.parse_name()?;
                    self.expect(TokenKind::Colon)?;
                    let value = self.parse_value(is_const)?;
                    fields.push(ObjectField {
                        name,
                        value,
                        span: self.span_from(field_start),
                    });
                }
                Ok(Value::Object(fields, self.span_from(start)))
            }
            kind if kind.is_name() => Ok(Value::Enum(self.parse_name()?)),
            _ => Err(self.unexpected()),
        }
    }

    /// Parses a string or block string literal.
    fn parse_string_value(&mut self) -> PResult<StringValue> {
        let token = self.current;
        let raw = self.current_text();
        let block = token.kind == TokenKind::BlockStringLiteral;

        let value = if block {
            block_string_value(raw)
        } else {
            string_value(raw).map_err(|escape| {
                Diagnostic::error(
                    codes::INVALID_SYNTAX,
                    format!("Invalid character escape sequence: \"{escape}\"."),
                )
                .with_span(token.span, "invalid escape")
            })?
        };
        self.advance();

        Ok(StringValue {
            value,
            block,
            span: Some(token.span),
        })
    }

    // =========================================================================
    // Type system definitions
    // =========================================================================

    /// Parses a type system extension.
    fn parse_extension(&mut self) -> PResult<Definition> {
        let start = self.current.span.start;
        self.advance(); // extend

        let definition = match self.at() {
            TokenKind::Schema => {
                Definition::Schema(self.parse_schema_definition(start, None, true)?)
            }
            TokenKind::Scalar
            | TokenKind::Type
            | TokenKind::Interface
            | TokenKind::Union
            | TokenKind::Enum
            | TokenKind::Input => Definition::Type(self.parse_type_definition(start, None, true)?),
            _ => return Err(self.unexpected()),
        };

        if is_empty_extension(&definition) {
            return Err(self.unexpected());
        }
        Ok(definition)
    }

    /// Parses a schema definition or extension.
    fn parse_schema_definition(
        &mut self,
        start: u32,
        description: Option<StringValue>,
        extend: bool,
    ) -> PResult<SchemaDefinition> {
        self.advance(); // schema

        let directives = self.parse_directives(true)?;
        let operation_type = |p: &mut Self| -> PResult<OperationTypeDefinition> {
            let op_start = p.current.span.start;
            let operation = p.parse_operation_type()?;
            p.expect(TokenKind::Colon)?;
            let type_name = p.parse_name()?;
            Ok(OperationTypeDefinition {
                operation,
                type_name,
                span: p.span_from(op_start),
            })
        };
        let operations = if extend {
            self.optional_many(TokenKind::LBrace, TokenKind::RBrace, operation_type)?
        } else {
            self.many(TokenKind::LBrace, TokenKind::RBrace, operation_type)?
        };

        Ok(SchemaDefinition {
            description,
            extend,
            directives,
            operations,
            span: self.span_from(start),
        })
    }

    /// Parses a named type definition or extension.
    fn parse_type_definition(
        &mut self,
        start: u32,
        description: Option<StringValue>,
        extend: bool,
    ) -> PResult<TypeDefinition> {
        let kind = self.at();
        self.advance(); // keyword

        let name = self.parse_name()?;

        let definition = match kind {
            TokenKind::Scalar => TypeDefinition::Scalar(ScalarTypeDefinition {
                description,
                extend,
                name,
                directives: self.parse_directives(true)?,
                span: self.span_from(start),
            }),
            TokenKind::Type | TokenKind::Interface => {
                let implements = self.parse_implements()?;
                let directives = self.parse_directives(true)?;
                let fields = self.optional_many(TokenKind::LBrace, TokenKind::RBrace, |p| {
                    p.parse_field_definition()
                })?;
                let definition = ObjectTypeDefinition {
                    description,
                    extend,
                    name,
                    implements,
                    directives,
                    fields,
                    span: self.span_from(start),
                };
                if kind == TokenKind::Type {
                    TypeDefinition::Object(definition)
                } else {
                    TypeDefinition::Interface(definition)
                }
            }
            TokenKind::Union => {
                let directives = self.parse_directives(true)?;
                let mut members = Vec::new();
                if self.eat(TokenKind::Eq) {
                    self.eat(TokenKind::Pipe);
                    members.push(self.parse_name()?);
                    while self.eat(TokenKind::Pipe) {
                        members.push(self.parse_name()?);
                    }
                }
                TypeDefinition::Union(UnionTypeDefinition {
                    description,
                    extend,
                    name,
                    directives,
                    members,
                    span: self.span_from(start),
                })
            }
            TokenKind::Enum => {
                let directives = self.parse_directives(true)?;
                let values = self.optional_many(TokenKind::LBrace, TokenKind::RBrace, |p| {
                    p.parse_enum_value_definition()
                })?;
                TypeDefinition::Enum(EnumTypeDefinition {
                    description,
                    extend,
                    name,
                    directives,
                    values,
                    span: self.span_from(start),
                })
            }
            _ => {
                let directives = self.parse_directives(true)?;
                let fields = self.optional_many(TokenKind::LBrace, TokenKind::RBrace, |p| {
                    p.parse_input_value_definition()
                })?;
                TypeDefinition::Input(InputObjectTypeDefinition {
                    description,
                    extend,
                    name,
                    directives,
                    fields,
                    span: self.span_from(start),
                })
            }
        };

        Ok(definition)
    }

    /// Parses `implements A & B`.
    fn parse_implements(&mut self) -> PResult<Vec<Name>> {
        let mut interfaces = Vec::new();
        if self.eat(TokenKind::Implements) {
            self.eat(TokenKind::Amp);
            interfaces.push(self.parse_name()?);
            while self.eat(TokenKind::Amp) {
                interfaces.push(self.parse_name()?);
            }
        }
        Ok(interfaces)
    }

    /// Parses a field definition.
    fn parse_field_definition(&mut self) -> PResult<FieldDefinition> {
        let start = self.current.span.start;
        let description = self.parse_description()?;
        let name = self.parse_name()?;
        let arguments = self.optional_many(TokenKind::LParen, TokenKind::RParen, |p| {
            p.parse_input_value_definition()
        })?;
        self.expect(TokenKind::Colon)?;
        let ty = self.parse_type()?;
        let directives = self.parse_directives(true)?;

        Ok(FieldDefinition {
            description,
            name,
            arguments,
            ty,
            directives,
            span: self.span_from(start),
        })
    }

    /// Parses an input value definition.
    fn parse_input_value_definition(&mut self) -> PResult<InputValueDefinition> {
        let start = self.current.span.start;
        let description = self.parse_description()?;
        let name = self.parse_name()?;
        self.expect(TokenKind::Colon)?;
        let ty = self.parse_type()?;
        let default_value = if self.eat(TokenKind::Eq) {
            Some(self.parse_value(true)?)
        } else {
            None
        };
        let directives = self.parse_directives(true)?;

        Ok(InputValueDefinition {
            description,
            name,
            ty,
            default_value,
            directives,
            span: self.span_from(start),
        })
    }

    /// Parses an enum value definition.
    fn parse_enum_value_definition(&mut self) -> PResult<EnumValueDefinition> {
        let start = self.current.span.start;
        let description = self.parse_description()?;

        if matches!(
            self.at(),
            TokenKind::True | TokenKind::False | TokenKind::Null
        ) {
            return Err(Diagnostic::error(
                codes::INVALID_SYNTAX,
                format!(
                    "Name \"{}\" is reserved and cannot be used for an enum value.",
                    self.current_text()
                ),
            )
            .with_span(self.current.span, "reserved name"));
        }

        let name = self.parse_name()?;
        let directives = self.parse_directives(true)?;

        Ok(EnumValueDefinition {
            description,
            name,
            directives,
            span: self.span_from(start),
        })
    }

    /// Parses a directive definition.
    fn parse_directive_definition(
        &mut self,
        start: u32,
        description: Option<StringValue>,
    ) -> PResult<DirectiveDefinition> {
        self.advance(); // directive
        self.expect(TokenKind::At)?;
        let name = self.parse_name()?;
        let arguments = self.optional_many(TokenKind::LParen, TokenKind::RParen, |p| {
            p.parse_input_value_definition()
        })?;
        let repeatable = self.eat(TokenKind::Repeatable);
        self.expect(TokenKind::On)?;

        self.eat(TokenKind::Pipe);
        let mut locations = vec![self.parse_directive_location()?];
        while self.eat(TokenKind::Pipe) {
            locations.push(self.parse_directive_location()?);
        }

        Ok(DirectiveDefinition {
            description,
            name,
            arguments,
            repeatable,
            locations,
            span: self.span_from(start),
        })
    }

    fn parse_directive_location(&mut self) -> PResult<DirectiveLocation> {
        if !self.at().is_name() {
            return Err(self.expected("Name"));
        }
        match DirectiveLocation::parse(self.current_text()) {
            Some(location) => {
                self.advance();
                Ok(location)
            }
            None => Err(self.unexpected()),
        }
    }
}

fn describe_kind(kind: TokenKind) -> String {
    match kind {
        TokenKind::Ident => "Name".to_string(),
        TokenKind::Eof => kind.as_str().to_string(),
        _ => format!("\"{}\"", kind.as_str()),
    }
}

fn is_empty_extension(definition: &Definition) -> bool {
    match definition {
        Definition::Schema(def) => def.directives.is_empty() && def.operations.is_empty(),
        Definition::Type(TypeDefinition::Scalar(def)) => def.directives.is_empty(),
        Definition::Type(TypeDefinition::Object(def) | TypeDefinition::Interface(def)) => {
            def.implements.is_empty() && def.directives.is_empty() && def.fields.is_empty()
        }
        Definition::Type(TypeDefinition::Union(def)) => {
            def.directives.is_empty() && def.members.is_empty()
        }
        Definition::Type(TypeDefinition::Enum(def)) => {
            def.directives.is_empty() && def.values.is_empty()
        }
        Definition::Type(TypeDefinition::Input(def)) => {
            def.directives.is_empty() && def.fields.is_empty()
        }
        _ => false,
    }
}
