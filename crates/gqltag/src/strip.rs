//! Location stripping.
//!
//! Cached documents carry no positional metadata, so two documents parsed from
//! differently formatted text compare equal node for node. The document's own
//! location keeps its source text; only the span is cleared.

use gqltag_core::Span;
use gqltag_syntax::ast::*;

/// Visits every span slot of a syntax tree node, children included.
pub trait VisitSpans {
    fn visit_spans(&mut self, visit: &mut impl FnMut(&mut Option<Span>));
}

/// Clears every span in `node`.
pub fn strip_locations<T: VisitSpans>(node: &mut T) {
    node.visit_spans(&mut |span| *span = None);
}

/// Counts the spans still present in `node`.
#[must_use]
pub fn location_count<T: VisitSpans + Clone>(node: &T) -> usize {
    let mut count = 0;
    node.clone().visit_spans(&mut |span| {
        if span.is_some() {
            count += 1;
        }
    });
    count
}

impl<T: VisitSpans> VisitSpans for Vec<T> {
    fn visit_spans(&mut self, visit: &mut impl FnMut(&mut Option<Span>)) {
        for item in self {
            item.visit_spans(visit);
        }
    }
}

impl<T: VisitSpans> VisitSpans for Option<T> {
    fn visit_spans(&mut self, visit: &mut impl FnMut(&mut Option<Span>)) {
        if let Some(item) = self {
            item.visit_spans(visit);
        }
    }
}

impl<T: VisitSpans> VisitSpans for Box<T> {
    fn visit_spans(&mut self, visit: &mut impl FnMut(&mut Option<Span>)) {
        (**self).visit_spans(visit);
    }
}

impl VisitSpans for Document {
    fn visit_spans(&mut self, visit: &mut impl FnMut(&mut Option<Span>)) {
        self.definitions.visit_spans(visit);
        if let Some(loc) = &mut self.loc {
            visit(&mut loc.span);
        }
    }
}

impl VisitSpans for Definition {
    fn visit_spans(&mut self, visit: &mut impl FnMut(&mut Option<Span>)) {
        match self {
            Self::Operation(def) => def.visit_spans(visit),
            Self::Fragment(def) => def.visit_spans(visit),
            Self::Schema(def) => def.visit_spans(visit),
            Self::Type(def) => def.visit_spans(visit),
            Self::Directive(def) => def.visit_spans(visit),
        }
    }
}

impl VisitSpans for Name {
    fn visit_spans(&mut self, visit: &mut impl FnMut(&mut Option<Span>)) {
        visit(&mut self.span);
    }
}

impl VisitSpans for OperationDefinition {
    fn visit_spans(&mut self, visit: &mut impl FnMut(&mut Option<Span>)) {
        self.name.visit_spans(visit);
        self.variables.visit_spans(visit);
        self.directives.visit_spans(visit);
        self.selection_set.visit_spans(visit);
        visit(&mut self.span);
    }
}

impl VisitSpans for VariableDefinition {
    fn visit_spans(&mut self, visit: &mut impl FnMut(&mut Option<Span>)) {
        self.name.visit_spans(visit);
        self.ty.visit_spans(visit);
        self.default_value.visit_spans(visit);
        self.directives.visit_spans(visit);
        visit(&mut self.span);
    }
}

impl VisitSpans for FragmentDefinition {
    fn visit_spans(&mut self, visit: &mut impl FnMut(&mut Option<Span>)) {
        self.name.visit_spans(visit);
        self.variables.visit_spans(visit);
        self.type_condition.visit_spans(visit);
        self.directives.visit_spans(visit);
        self.selection_set.visit_spans(visit);
        visit(&mut self.span);
    }
}

impl VisitSpans for SelectionSet {
    fn visit_spans(&mut self, visit: &mut impl FnMut(&mut Option<Span>)) {
        self.selections.visit_spans(visit);
        visit(&mut self.span);
    }
}

impl VisitSpans for Selection {
    fn visit_spans(&mut self, visit: &mut impl FnMut(&mut Option<Span>)) {
        match self {
            Self::Field(field) => {
                field.alias.visit_spans(visit);
                field.name.visit_spans(visit);
                field.arguments.visit_spans(visit);
                field.directives.visit_spans(visit);
                field.selection_set.visit_spans(visit);
                visit(&mut field.span);
            }
            Self::FragmentSpread(spread) => {
                spread.name.visit_spans(visit);
                spread.directives.visit_spans(visit);
                visit(&mut spread.span);
            }
            Self::InlineFragment(inline) => {
                inline.type_condition.visit_spans(visit);
                inline.directives.visit_spans(visit);
                inline.selection_set.visit_spans(visit);
                visit(&mut inline.span);
            }
        }
    }
}

impl VisitSpans for Directive {
    fn visit_spans(&mut self, visit: &mut impl FnMut(&mut Option<Span>)) {
        self.name.visit_spans(visit);
        self.arguments.visit_spans(visit);
        visit(&mut self.span);
    }
}

impl VisitSpans for Argument {
    fn visit_spans(&mut self, visit: &mut impl FnMut(&mut Option<Span>)) {
        self.name.visit_spans(visit);
        self.value.visit_spans(visit);
        visit(&mut self.span);
    }
}

impl VisitSpans for Type {
    fn visit_spans(&mut self, visit: &mut impl FnMut(&mut Option<Span>)) {
        match self {
            Self::Named(name) => name.visit_spans(visit),
            Self::List(inner, span) | Self::NonNull(inner, span) => {
                inner.visit_spans(visit);
                visit(span);
            }
        }
    }
}

impl VisitSpans for Value {
    fn visit_spans(&mut self, visit: &mut impl FnMut(&mut Option<Span>)) {
        match self {
            Self::Variable(name) | Self::Enum(name) => name.visit_spans(visit),
            Self::Int(_, span) | Self::Float(_, span) | Self::Boolean(_, span) | Self::Null(span) => {
                visit(span);
            }
            Self::String(string) => string.visit_spans(visit),
            Self::List(values, span) => {
                values.visit_spans(visit);
                visit(span);
            }
            Self::Object(fields, span) => {
                for field in fields {
                    field.name.visit_spans(visit);
                    field.value.visit_spans(visit);
                    visit(&mut field.span);
                }
                visit(span);
            }
        }
    }
}

impl VisitSpans for StringValue {
    fn visit_spans(&mut self, visit: &mut impl FnMut(&mut Option<Span>)) {
        visit(&mut self.span);
    }
}

impl VisitSpans for SchemaDefinition {
    fn visit_spans(&mut self, visit: &mut impl FnMut(&mut Option<Span>)) {
        self.description.visit_spans(visit);
        self.directives.visit_spans(visit);
        for operation in &mut self.operations {
            operation.type_name.visit_spans(visit);
            visit(&mut operation.span);
        }
        visit(&mut self.span);
    }
}

impl VisitSpans for TypeDefinition {
    fn visit_spans(&mut self, visit: &mut impl FnMut(&mut Option<Span>)) {
        match self {
            Self::Scalar(def) => {
                def.description.visit_spans(visit);
                def.name.visit_spans(visit);
                def.directives.visit_spans(visit);
                visit(&mut def.span);
            }
            Self::Object(def) | Self::Interface(def) => {
                def.description.visit_spans(visit);
                def.name.visit_spans(visit);
                def.implements.visit_spans(visit);
                def.directives.visit_spans(visit);
                def.fields.visit_spans(visit);
                visit(&mut def.span);
            }
            Self::Union(def) => {
                def.description.visit_spans(visit);
                def.name.visit_spans(visit);
                def.directives.visit_spans(visit);
                def.members.visit_spans(visit);
                visit(&mut def.span);
            }
            Self::Enum(def) => {
                def.description.visit_spans(visit);
                def.name.visit_spans(visit);
                def.directives.visit_spans(visit);
                for value in &mut def.values {
                    value.description.visit_spans(visit);
                    value.name.visit_spans(visit);
                    value.directives.visit_spans(visit);
                    visit(&mut value.span);
                }
                visit(&mut def.span);
            }
            Self::Input(def) => {
                def.description.visit_spans(visit);
                def.name.visit_spans(visit);
                def.directives.visit_spans(visit);
                def.fields.visit_spans(visit);
                visit(&mut def.span);
            }
        }
    }
}

impl VisitSpans for FieldDefinition {
    fn visit_spans(&mut self, visit: &mut impl FnMut(&mut Option<Span>)) {
        self.description.visit_spans(visit);
        self.name.visit_spans(visit);
        self.arguments.visit_spans(visit);
        self.ty.visit_spans(visit);
        self.directives.visit_spans(visit);
        visit(&mut self.span);
    }
}

impl VisitSpans for InputValueDefinition {
    fn visit_spans(&mut self, visit: &mut impl FnMut(&mut Option<Span>)) {
        self.description.visit_spans(visit);
        self.name.visit_spans(visit);
        self.ty.visit_spans(visit);
        self.default_value.visit_spans(visit);
        self.directives.visit_spans(visit);
        visit(&mut self.span);
    }
}

impl VisitSpans for DirectiveDefinition {
    fn visit_spans(&mut self, visit: &mut impl FnMut(&mut Option<Span>)) {
        self.description.visit_spans(visit);
        self.name.visit_spans(visit);
        self.arguments.visit_spans(visit);
        visit(&mut self.span);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gqltag_syntax::{parse, ParseOptions};

    fn parse_ok(source: &str) -> Document {
        parse(source, ParseOptions::default())
            .into_result()
            .expect("valid document")
    }

    #[test]
    fn test_strip_executable_document() {
        let mut document = parse_ok(
            r#"
            query Q($id: ID! = "1", $list: [Int] = [1, 2]) @dir(a: {b: [$x]}) {
                alias: user(id: $id, filter: {name: "n", active: true, role: ADMIN, x: null, f: 1.5}) {
                    ...F @skip(if: false)
                    ... on User { id }
                }
            }
            fragment F on User { name }
        "#,
        );
        assert!(location_count(&document) > 0);

        strip_locations(&mut document);

        assert_eq!(location_count(&document), 0);
        assert!(document.source().is_some_and(|s| s.contains("fragment F")));
        assert!(document.loc.as_ref().is_some_and(|loc| loc.span.is_none()));
    }

    #[test]
    fn test_strip_type_system_document() {
        let mut document = parse_ok(
            r#"
            "schema" schema @a { query: Q }
            "scalar" scalar Date @b
            type Q implements N { f(a: [Int!] = [1] @c): String @d }
            union U = A | B
            enum E { "v" V @e }
            input I { x: Int = 1 }
            directive @x("arg" a: Int) on FIELD
            extend interface N @f
        "#,
        );
        strip_locations(&mut document);
        assert_eq!(location_count(&document), 0);
    }

    #[test]
    fn test_stripped_documents_compare_equal() {
        let mut compact = parse_ok("{a(x:1){b}}");
        let mut spaced = parse_ok("{\n  a(x: 1) {\n    b\n  }\n}\n");
        assert_ne!(compact, spaced);

        strip_locations(&mut compact);
        strip_locations(&mut spaced);
        assert_eq!(compact.definitions, spaced.definitions);
    }
}
