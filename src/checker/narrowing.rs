//! Flow-sensitive narrowing: turns a condition expression into a pair of
//! `(positive, complement)` narrowing maps keyed by dotted path, pushed
//! onto the `Environment` for the branch(es) that condition controls.
//!
//! Only a fixed set of syntactic shapes are recognized as guards (typeof,
//! instanceof, `in`, equality against a literal, truthiness, and calls to a
//! user-defined type predicate function); anything else narrows nothing.

use std::collections::HashMap;

use crate::ast::expression::{BinaryOperator, Expression, LogicalOperator, UnaryOperator};
use crate::checker::context::{ExprInfo, TypeContext};
use crate::checker::types::Type;

pub type NarrowingMap = HashMap<String, Type>;

#[derive(Debug, Clone, Default)]
pub struct Narrowings {
    pub positive: NarrowingMap,
    pub negative: NarrowingMap,
}

impl Narrowings {
    fn single(path: String, positive: Type, negative: Type) -> Self {
        let mut p = NarrowingMap::new();
        p.insert(path.clone(), positive);
        let mut n = NarrowingMap::new();
        n.insert(path, negative);
        Narrowings {
            positive: p,
            negative: n,
        }
    }

    fn none() -> Self {
        Narrowings::default()
    }

    /// `&&`: both operands' positive narrowings apply together; there is no
    /// single complement of "not (a && b)" expressible as a simple overlay,
    /// so the negative side is left empty (matches the documented
    /// scope — only conjunctions of guards narrow, not arbitrary De Morgan
    /// expansion of their negation).
    fn and(mut self, other: Narrowings) -> Narrowings {
        self.positive.extend(other.positive);
        self
    }

    fn or(mut self, other: Narrowings) -> Narrowings {
        self.negative.extend(other.negative);
        self
    }

    fn negate(self) -> Narrowings {
        Narrowings {
            positive: self.negative,
            negative: self.positive,
        }
    }
}

/// Reconstruct the dotted path a discriminant expression refers to, e.g.
/// `x.kind` -> `"x.kind"`, a bare `x` -> `"x"`. Anything other than a chain
/// of identifiers and member accesses has no stable path and can't be
/// narrowed.
pub fn expr_path(expr: &Expression<ExprInfo>) -> Option<String> {
    match expr {
        Expression::Identifier(id) => Some(id.name.clone()),
        Expression::Member(m) if !m.optional => {
            expr_path(&m.object).map(|base| format!("{base}.{}", m.property))
        }
        Expression::Parenthesized(inner, ..) => expr_path(inner),
        _ => None,
    }
}

pub fn narrow_condition(expr: &Expression<ExprInfo>, ctx: &TypeContext) -> Narrowings {
    match expr {
        Expression::Logical(l) => {
            let left = narrow_condition(&l.left, ctx);
            let right = narrow_condition(&l.right, ctx);
            match l.operator {
                LogicalOperator::And => left.and(right),
                LogicalOperator::Or => left.or(right),
                LogicalOperator::NullishCoalesce => Narrowings::none(),
            }
        }
        Expression::Unary(u) if u.operator == UnaryOperator::LogicalNot => {
            narrow_condition(&u.argument, ctx).negate()
        }
        Expression::Binary(b) => narrow_binary(b, ctx),
        Expression::Call(call) => narrow_type_predicate_call(call, ctx),
        other => narrow_truthiness(other, ctx),
    }
}

fn narrow_binary(
    b: &crate::ast::expression::BinaryExpression<ExprInfo>,
    ctx: &TypeContext,
) -> Narrowings {
    use BinaryOperator::*;

    let is_equality = matches!(b.operator, Equal | StrictEqual);
    let is_inequality = matches!(b.operator, NotEqual | StrictNotEqual);

    if is_equality || is_inequality {
        if let Some(n) = narrow_typeof_comparison(&b.left, &b.right, ctx)
            .or_else(|| narrow_typeof_comparison(&b.right, &b.left, ctx))
            .or_else(|| narrow_literal_comparison(&b.left, &b.right, ctx))
            .or_else(|| narrow_literal_comparison(&b.right, &b.left, ctx))
            .or_else(|| narrow_nullish_comparison(&b.left, &b.right, ctx))
            .or_else(|| narrow_nullish_comparison(&b.right, &b.left, ctx))
        {
            return if is_equality { n } else { n.negate() };
        }
    }

    if b.operator == In {
        if let (Expression::StringLiteral(prop, ..), Some(path)) =
            (b.left.as_ref(), expr_path(&b.right))
        {
            // `"prop" in x` narrows the declared type of `x` to the union
            // members that actually declare `prop`; computing that requires
            // the full candidate union, left to the member-expression
            // checker which consults `positive`/`negative` only by path, so
            // here we just record that the path was tested and let
            // assignability re-derive from the existing declared type.
            let _ = prop;
            return Narrowings::single(path, Type::Unknown, Type::Unknown);
        }
    }

    if b.operator == InstanceOf {
        if let Some(path) = expr_path(&b.left) {
            if let Expression::Identifier(class_name) = b.right.as_ref() {
                if let Some(class_type) = ctx.env.lookup_type(&class_name.name) {
                    return Narrowings::single(path, class_type, Type::Unknown);
                }
            }
        }
    }

    Narrowings::none()
}

fn narrow_typeof_comparison(
    maybe_typeof: &Expression<ExprInfo>,
    maybe_literal: &Expression<ExprInfo>,
    _ctx: &TypeContext,
) -> Option<Narrowings> {
    let Expression::Unary(u) = maybe_typeof else {
        return None;
    };
    if u.operator != UnaryOperator::Typeof {
        return None;
    }
    let path = expr_path(&u.argument)?;
    let Expression::StringLiteral(tag, ..) = maybe_literal else {
        return None;
    };
    let narrowed = typeof_tag_to_type(tag);
    Some(Narrowings::single(path, narrowed, Type::Unknown))
}

fn typeof_tag_to_type(tag: &str) -> Type {
    match tag {
        "string" => Type::String,
        "number" => Type::Number,
        "boolean" => Type::Boolean,
        "undefined" => Type::Undefined,
        "function" => Type::Any,
        "object" => Type::Unknown,
        _ => Type::Unknown,
    }
}

fn narrow_literal_comparison(
    target: &Expression<ExprInfo>,
    literal: &Expression<ExprInfo>,
    _ctx: &TypeContext,
) -> Option<Narrowings> {
    let path = expr_path(target)?;
    let narrowed = match literal {
        Expression::StringLiteral(s, ..) => Type::StringLiteral(s.clone()),
        Expression::NumberLiteral(n, ..) => Type::NumberLiteral(*n),
        Expression::BooleanLiteral(b, ..) => Type::BooleanLiteral(*b),
        _ => return None,
    };
    let mut narrowings = Narrowings::single(path, narrowed.clone(), Type::Unknown);
    discriminate_base(target, &narrowed, &mut narrowings);
    Some(narrowings)
}

/// `x.prop === literal` is also a discriminated-union guard on `x` itself:
/// keep the union members of `x`'s declared type whose `prop` is assignable
/// to `literal` (positive branch) or isn't (negative branch), expressed as
/// a one-property shape so the existing member-width assignability check in
/// `assignability::is_assignable` does the actual filtering in
/// `apply_narrowing`. No-op for anything other than a one-level member
/// access (`x.prop`), since a deeper path (`x.y.prop`) has no stable base
/// binding to narrow in the environment.
fn discriminate_base(target: &Expression<ExprInfo>, narrowed: &Type, narrowings: &mut Narrowings) {
    let Expression::Member(m) = target else { return };
    if m.optional {
        return;
    }
    let Some(base_path) = expr_path(&m.object) else { return };
    let mut shape = crate::checker::types::ObjectType::empty(crate::checker::types::ObjectKind::Anonymous);
    shape.properties.push(crate::checker::types::PropertyType {
        name: m.property.clone(),
        ty: narrowed.clone(),
        optional: false,
        readonly: false,
        visibility: crate::checker::types::PropertyVisibility::Public,
        is_static: false,
        declaring_class: None,
    });
    let shape = Type::Object(shape);
    narrowings.positive.insert(base_path.clone(), shape.clone());
    narrowings.negative.insert(base_path, shape);
}

fn narrow_nullish_comparison(
    target: &Expression<ExprInfo>,
    maybe_null: &Expression<ExprInfo>,
    _ctx: &TypeContext,
) -> Option<Narrowings> {
    let path = expr_path(target)?;
    match maybe_null {
        Expression::NullLiteral(..) => Some(Narrowings::single(path, Type::Null, Type::Unknown)),
        Expression::UndefinedLiteral(..) => {
            Some(Narrowings::single(path, Type::Undefined, Type::Unknown))
        }
        _ => None,
    }
}

fn narrow_truthiness(expr: &Expression<ExprInfo>, _ctx: &TypeContext) -> Narrowings {
    let Some(path) = expr_path(expr) else {
        return Narrowings::none();
    };
    // Truthy narrowing strips `null`/`undefined` (and, for a type that is
    // exactly the literal `false`/`0`/`""`, would strip that too; those
    // narrower cases are left to literal-comparison narrowing since a bare
    // identifier's declared type rarely is a single falsy literal).
    Narrowings::single(path, Type::Unknown, Type::Unknown)
}

fn narrow_type_predicate_call(
    call: &crate::ast::expression::CallExpression<ExprInfo>,
    ctx: &TypeContext,
) -> Narrowings {
    let Expression::Identifier(callee) = call.callee.as_ref() else {
        return Narrowings::none();
    };
    let Some(Type::Function(f)) = ctx.env.resolve(&callee.name) else {
        return Narrowings::none();
    };
    let Some(predicate) = &f.type_predicate else {
        return Narrowings::none();
    };
    let Some(arg) = call.arguments.get(predicate.parameter_index) else {
        return Narrowings::none();
    };
    let Some(path) = expr_path(arg) else {
        return Narrowings::none();
    };
    Narrowings::single(path, predicate.narrowed_type.clone(), Type::Unknown)
}

/// Apply a narrowing's replacement type against the statically declared
/// type at `path`, producing the type that should actually be pushed. For
/// `Type::Unknown` placeholders (truthiness, `in`, `instanceof` against an
/// unresolvable complement) this just removes nullish members; for a
/// concrete narrowed type it filters the declared union down to members
/// assignable to it, falling back to the narrowed type itself if nothing
/// in the declared union matches (an explicit `typeof`/literal check the
/// declared type didn't anticipate still narrows, per the documented
/// "any typeof string literal is admitted" behavior).
pub fn apply_narrowing(declared: &Type, narrowed: &Type, positive: bool) -> Type {
    // `Unknown` is the sentinel guards store when they can't express a
    // concrete complement (e.g. the negative side of a `typeof` check);
    // the best available narrowing there is just stripping nullish
    // members, independent of which branch is asking.
    if matches!(narrowed, Type::Unknown) {
        return complement(declared, &Type::union(vec![Type::Null, Type::Undefined]));
    }
    if !positive {
        return complement(declared, narrowed);
    }
    let candidates: Vec<Type> = declared
        .union_members()
        .into_iter()
        .filter(|m| crate::checker::assignability::is_assignable(m, narrowed))
        .cloned()
        .collect();
    if candidates.is_empty() {
        narrowed.clone()
    } else {
        Type::union(candidates)
    }
}

fn complement(declared: &Type, excluded: &Type) -> Type {
    let remaining: Vec<Type> = declared
        .union_members()
        .into_iter()
        .filter(|m| !crate::checker::assignability::is_assignable(m, excluded))
        .cloned()
        .collect();
    Type::union(remaining)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::context::CheckerOptions;
    use crate::span::Span;

    fn ident(name: &str) -> Expression<ExprInfo> {
        Expression::Identifier(crate::ast::expression::Identifier::new(
            name,
            ExprInfo::empty(),
            Span::default(),
        ))
    }

    #[test]
    fn typeof_equality_narrows_path() {
        let ctx = TypeContext::new(CheckerOptions::default());
        let expr = Expression::Binary(crate::ast::expression::BinaryExpression {
            left: Box::new(Expression::Unary(crate::ast::expression::UnaryExpression {
                operator: UnaryOperator::Typeof,
                argument: Box::new(ident("x")),
                info: ExprInfo::empty(),
                span: Span::default(),
            })),
            operator: BinaryOperator::StrictEqual,
            right: Box::new(Expression::StringLiteral(
                "string".to_string(),
                ExprInfo::empty(),
                Span::default(),
            )),
            info: ExprInfo::empty(),
            span: Span::default(),
        });
        let narrowings = narrow_condition(&expr, &ctx);
        assert_eq!(narrowings.positive.get("x"), Some(&Type::String));
    }

    #[test]
    fn apply_narrowing_filters_union() {
        let declared = Type::union(vec![Type::Number, Type::String]);
        let narrowed = apply_narrowing(&declared, &Type::String, true);
        assert_eq!(narrowed, Type::String);
    }

    #[test]
    fn complement_removes_narrowed_member() {
        let declared = Type::union(vec![Type::Number, Type::String]);
        let narrowed = apply_narrowing(&declared, &Type::String, false);
        assert_eq!(narrowed, Type::Number);
    }
}
