//! Abstract Syntax Tree types for GraphQL documents.
//!
//! Every node owns its data so documents can be cached and shared across
//! threads. Node spans are optional: the parser fills them in, and the cache
//! layer clears them once a document has been processed.

use crate::token::DirectiveLocation;
use gqltag_core::Span;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::Serialize;

/// A complete document.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Document {
    pub definitions: Vec<Definition>,
    pub loc: Option<Location>,
}

/// The location record of a document.
///
/// `source` is the full text the document was parsed from and is retained
/// even after `span` has been cleared.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Location {
    pub span: Option<Span>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub source: Arc<str>,
}

impl Document {
    /// Returns the source text this document was parsed from.
    #[must_use]
    pub fn source(&self) -> Option<&str> {
        self.loc.as_ref().map(|loc| &*loc.source)
    }

    /// Returns the fragment definitions in document order.
    pub fn fragments(&self) -> impl Iterator<Item = &FragmentDefinition> {
        self.definitions.iter().filter_map(|def| match def {
            Definition::Fragment(fragment) => Some(fragment),
            _ => None,
        })
    }

    /// Returns the operation definitions in document order.
    pub fn operations(&self) -> impl Iterator<Item = &OperationDefinition> {
        self.definitions.iter().filter_map(|def| match def {
            Definition::Operation(operation) => Some(operation),
            _ => None,
        })
    }
}

/// A top-level definition.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Definition {
    Operation(OperationDefinition),
    Fragment(FragmentDefinition),
    Schema(SchemaDefinition),
    Type(TypeDefinition),
    Directive(DirectiveDefinition),
}

impl Definition {
    /// Returns the span of this definition.
    #[must_use]
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Operation(def) => def.span,
            Self::Fragment(def) => def.span,
            Self::Schema(def) => def.span,
            Self::Type(def) => def.span(),
            Self::Directive(def) => def.span,
        }
    }
}

// =============================================================================
// Executable definitions
// =============================================================================

/// Type of operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum OperationType {
    Query,
    Mutation,
    Subscription,
}

impl OperationType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Mutation => "mutation",
            Self::Subscription => "subscription",
        }
    }
}

/// Operation definition.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct OperationDefinition {
    pub operation: OperationType,
    pub name: Option<Name>,
    pub variables: Vec<VariableDefinition>,
    pub directives: Vec<Directive>,
    pub selection_set: SelectionSet,
    pub span: Option<Span>,
}

/// Variable definition.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct VariableDefinition {
    pub name: Name,
    pub ty: Type,
    pub default_value: Option<Value>,
    pub directives: Vec<Directive>,
    pub span: Option<Span>,
}

/// Fragment definition.
///
/// `variables` is only populated when legacy fragment variables are enabled
/// in the parser.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct FragmentDefinition {
    pub name: Name,
    pub variables: Option<Vec<VariableDefinition>>,
    pub type_condition: Name,
    pub directives: Vec<Directive>,
    pub selection_set: SelectionSet,
    pub span: Option<Span>,
}

/// Selection set.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SelectionSet {
    pub selections: Vec<Selection>,
    pub span: Option<Span>,
}

/// Selection.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Selection {
    Field(Field),
    FragmentSpread(FragmentSpread),
    InlineFragment(InlineFragment),
}

/// Field selection.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Field {
    pub alias: Option<Name>,
    pub name: Name,
    pub arguments: Vec<Argument>,
    pub directives: Vec<Directive>,
    pub selection_set: Option<SelectionSet>,
    pub span: Option<Span>,
}

/// Fragment spread.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct FragmentSpread {
    pub name: Name,
    pub directives: Vec<Directive>,
    pub span: Option<Span>,
}

/// Inline fragment.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct InlineFragment {
    pub type_condition: Option<Name>,
    pub directives: Vec<Directive>,
    pub selection_set: SelectionSet,
    pub span: Option<Span>,
}

// =============================================================================
// Shared nodes
// =============================================================================

/// Directive usage.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Directive {
    pub name: Name,
    pub arguments: Vec<Argument>,
    pub span: Option<Span>,
}

/// Argument.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Argument {
    pub name: Name,
    pub value: Value,
    pub span: Option<Span>,
}

/// Type reference.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Type {
    /// Named type: `User`
    Named(Name),
    /// List type: `[User]`
    List(Box<Type>, Option<Span>),
    /// Non-null type: `User!`
    NonNull(Box<Type>, Option<Span>),
}

/// Value.
///
/// Int and float values keep their literal text.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Value {
    Variable(Name),
    Int(String, Option<Span>),
    Float(String, Option<Span>),
    String(StringValue),
    Boolean(bool, Option<Span>),
    Null(Option<Span>),
    Enum(Name),
    List(Vec<Value>, Option<Span>),
    Object(Vec<ObjectField>, Option<Span>),
}

/// String value, also used for descriptions.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct StringValue {
    pub value: String,
    pub block: bool,
    pub span: Option<Span>,
}

/// A field of an input object value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ObjectField {
    pub name: Name,
    pub value: Value,
    pub span: Option<Span>,
}

/// Name with span.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Name {
    pub value: String,
    pub span: Option<Span>,
}

impl Name {
    pub fn new(value: impl Into<String>, span: Span) -> Self {
        Self {
            value: value.into(),
            span: Some(span),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

// =============================================================================
// Type system definitions
// =============================================================================

/// Schema definition or extension.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SchemaDefinition {
    pub description: Option<StringValue>,
    pub extend: bool,
    pub directives: Vec<Directive>,
    pub operations: Vec<OperationTypeDefinition>,
    pub span: Option<Span>,
}

/// Root operation type in a schema definition.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct OperationTypeDefinition {
    pub operation: OperationType,
    pub type_name: Name,
    pub span: Option<Span>,
}

/// Type definitions and extensions.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum TypeDefinition {
    Scalar(ScalarTypeDefinition),
    Object(ObjectTypeDefinition),
    Interface(ObjectTypeDefinition),
    Union(UnionTypeDefinition),
    Enum(EnumTypeDefinition),
    Input(InputObjectTypeDefinition),
}

impl TypeDefinition {
    /// Returns the defined type's name.
    #[must_use]
    pub fn name(&self) -> &Name {
        match self {
            Self::Scalar(def) => &def.name,
            Self::Object(def) | Self::Interface(def) => &def.name,
            Self::Union(def) => &def.name,
            Self::Enum(def) => &def.name,
            Self::Input(def) => &def.name,
        }
    }

    #[must_use]
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Scalar(def) => def.span,
            Self::Object(def) | Self::Interface(def) => def.span,
            Self::Union(def) => def.span,
            Self::Enum(def) => def.span,
            Self::Input(def) => def.span,
        }
    }
}

/// Scalar type definition.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ScalarTypeDefinition {
    pub description: Option<StringValue>,
    pub extend: bool,
    pub name: Name,
    pub directives: Vec<Directive>,
    pub span: Option<Span>,
}

/// Object or interface type definition.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ObjectTypeDefinition {
    pub description: Option<StringValue>,
    pub extend: bool,
    pub name: Name,
    pub implements: Vec<Name>,
    pub directives: Vec<Directive>,
    pub fields: Vec<FieldDefinition>,
    pub span: Option<Span>,
}

/// Union type definition.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct UnionTypeDefinition {
    pub description: Option<StringValue>,
    pub extend: bool,
    pub name: Name,
    pub directives: Vec<Directive>,
    pub members: Vec<Name>,
    pub span: Option<Span>,
}

/// Enum type definition.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct EnumTypeDefinition {
    pub description: Option<StringValue>,
    pub extend: bool,
    pub name: Name,
    pub directives: Vec<Directive>,
    pub values: Vec<EnumValueDefinition>,
    pub span: Option<Span>,
}

/// Enum value definition.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct EnumValueDefinition {
    pub description: Option<StringValue>,
    pub name: Name,
    pub directives: Vec<Directive>,
    pub span: Option<Span>,
}

/// Input object type definition.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct InputObjectTypeDefinition {
    pub description: Option<StringValue>,
    pub extend: bool,
    pub name: Name,
    pub directives: Vec<Directive>,
    pub fields: Vec<InputValueDefinition>,
    pub span: Option<Span>,
}

/// Field definition.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct FieldDefinition {
    pub description: Option<StringValue>,
    pub name: Name,
    pub arguments: Vec<InputValueDefinition>,
    pub ty: Type,
    pub directives: Vec<Directive>,
    pub span: Option<Span>,
}

/// Input value definition (arguments, input fields).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct InputValueDefinition {
    pub description: Option<StringValue>,
    pub name: Name,
    pub ty: Type,
    pub default_value: Option<Value>,
    pub directives: Vec<Directive>,
    pub span: Option<Span>,
}

/// Directive definition.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DirectiveDefinition {
    pub description: Option<StringValue>,
    pub name: Name,
    pub arguments: Vec<InputValueDefinition>,
    pub repeatable: bool,
    pub locations: Vec<DirectiveLocation>,
    pub span: Option<Span>,
}
