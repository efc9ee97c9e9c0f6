//! If/while/do-while/for/for-of/for-in/block/try/switch/return statement
//! checking, with narrowing-overlay push/pop around branches and loop
//! conditions (the same `narrowing::narrow_condition` +
//! `operators::build_overlay` pattern `expression::operators`'s `&&`/`||`
//! checker and `expression::conditional`'s ternary checker already use).

use crate::ast::expression::Expression;
use crate::ast::statement::{
    CatchClause, DoWhileStatement, ForInInit as _, ForInStatement, ForInit, ForOfStatement,
    ForStatement, IfStatement, Statement, SwitchCase, SwitchStatement, TryStatement,
    VariableKind, WhileStatement,
};
use crate::checker::context::{ExprInfo, TypeContext};
use crate::checker::error::{TypeCheckError, TypeMismatch, UnreachableCode};
use crate::checker::narrowing;
use crate::checker::typed_ast::expression::{destructure, infer_expression, operators};
use crate::checker::typed_ast::statement::declaration;
use crate::checker::types::Type;
use crate::span::Span;

pub fn check_return(
    expr: Option<Expression<()>>,
    span: Span,
    ctx: &mut TypeContext,
) -> Statement<ExprInfo> {
    let checked = expr.map(|e| infer_expression(e, ctx));
    Statement::Return(checked, span)
}

pub fn check_if(s: IfStatement<()>, ctx: &mut TypeContext) -> IfStatement<ExprInfo> {
    let span = s.span.clone();
    let test = infer_expression(s.test, ctx);
    let guards = narrowing::narrow_condition(&test, ctx);

    let positive = operators::build_overlay(&guards.positive, true, ctx);
    ctx.env.push_narrowings(positive);
    let consequent = Box::new(super::check_statement(*s.consequent, ctx));
    ctx.env.pop_narrowings();

    let alternate = s.alternate.map(|alt| {
        let negative = operators::build_overlay(&guards.negative, false, ctx);
        ctx.env.push_narrowings(negative);
        let checked = Box::new(super::check_statement(*alt, ctx));
        ctx.env.pop_narrowings();
        checked
    });

    IfStatement {
        test,
        consequent,
        alternate,
        span,
    }
}

pub fn check_while(s: WhileStatement<()>, ctx: &mut TypeContext) -> WhileStatement<ExprInfo> {
    let span = s.span.clone();
    let test = infer_expression(s.test, ctx);
    let guards = narrowing::narrow_condition(&test, ctx);
    let overlay = operators::build_overlay(&guards.positive, true, ctx);
    ctx.env.push_narrowings(overlay);
    let body = Box::new(super::check_statement(*s.body, ctx));
    ctx.env.pop_narrowings();
    WhileStatement { test, body, span }
}

pub fn check_do_while(s: DoWhileStatement<()>, ctx: &mut TypeContext) -> DoWhileStatement<ExprInfo> {
    let span = s.span.clone();
    let body = Box::new(super::check_statement(*s.body, ctx));
    let test = infer_expression(s.test, ctx);
    DoWhileStatement { body, test, span }
}

pub fn check_for(s: ForStatement<()>, ctx: &mut TypeContext) -> ForStatement<ExprInfo> {
    let span = s.span.clone();
    ctx.env.enter_scope();
    let init = s.init.map(|init| match init {
        ForInit::VariableDeclaration(decl) => {
            ForInit::VariableDeclaration(declaration::check_variable_declaration(decl, ctx))
        }
        ForInit::Expression(expr) => ForInit::Expression(infer_expression(expr, ctx)),
    });
    let test = s.test.map(|t| infer_expression(t, ctx));
    let update = s.update.map(|u| infer_expression(u, ctx));
    let body = Box::new(super::check_statement(*s.body, ctx));
    ctx.env.exit_scope();
    ForStatement {
        init,
        test,
        update,
        body,
        span,
    }
}

/// `Array<T>`/tuple/string element type an iterable's declared type yields
/// to a `for...of` binding; unions distribute, everything else falls back
/// to `any` (no dedicated iterator-protocol modeling here, matching how
/// `destructure::array_element_type` handles the same fallback case).
fn iterable_element_type(ty: &Type, span: &Span, ctx: &mut TypeContext) -> Type {
    match ty {
        Type::Array(el) => (**el).clone(),
        Type::Tuple(elements) => Type::union(elements.iter().map(|e| e.ty.clone()).collect()),
        Type::String | Type::StringLiteral(_) => Type::String,
        Type::Any | Type::Unknown => Type::Any,
        Type::Union(members) => {
            Type::union(members.iter().map(|m| iterable_element_type(m, span, ctx)).collect())
        }
        _ => {
            let _ = ctx.report(TypeCheckError::TypeMismatch(
                TypeMismatch {
                    expected: Type::Array(Box::new(Type::Unknown)),
                    actual: ty.clone(),
                },
                span.clone(),
            ));
            Type::Any
        }
    }
}

pub fn check_for_of(s: ForOfStatement<()>, ctx: &mut TypeContext) -> ForOfStatement<ExprInfo> {
    let span = s.span.clone();
    let iterable = infer_expression(s.iterable, ctx);
    let iterable_ty = iterable.info().get().unwrap_or(Type::Any);
    let element_ty = iterable_element_type(&iterable_ty, &span, ctx);

    ctx.env.enter_scope();
    let mutable = s.binding_kind != VariableKind::Const;
    destructure::declare_binding_target(&s.binding, &element_ty, mutable, &span, ctx);
    let body = Box::new(super::check_statement(*s.body, ctx));
    ctx.env.exit_scope();

    ForOfStatement {
        binding_kind: s.binding_kind,
        binding: s.binding,
        iterable,
        body,
        is_await: s.is_await,
        span,
    }
}

pub fn check_for_in(s: ForInStatement<()>, ctx: &mut TypeContext) -> ForInStatement<ExprInfo> {
    let span = s.span.clone();
    let object = infer_expression(s.object, ctx);

    ctx.env.enter_scope();
    let mutable = s.binding_kind != VariableKind::Const;
    destructure::declare_binding_target(&s.binding, &Type::String, mutable, &span, ctx);
    let body = Box::new(super::check_statement(*s.body, ctx));
    ctx.env.exit_scope();

    ForInStatement {
        binding_kind: s.binding_kind,
        binding: s.binding,
        object,
        body,
        span,
    }
}

pub fn check_block(statements: Vec<Statement<()>>, span: Span, ctx: &mut TypeContext) -> Statement<ExprInfo> {
    ctx.env.enter_scope();
    let mut checked = Vec::with_capacity(statements.len());
    let mut terminated = false;
    let mut reported_unreachable = false;
    let mut fallthrough_narrowings = 0;
    for stmt in statements {
        if terminated && !reported_unreachable {
            let _ = ctx.report(TypeCheckError::UnreachableCode(UnreachableCode {}, stmt.span()));
            reported_unreachable = true;
        }
        let checked_stmt = super::check_statement(stmt, ctx);
        if super::always_terminates(&checked_stmt) {
            terminated = true;
        }
        // `if (guard) { return/throw/... }` with no `else`: everything
        // after it only runs when `guard` was false, so the rest of this
        // block sees the complement narrowing for the remainder of its
        // statements.
        if let Statement::If(if_stmt) = &checked_stmt {
            if if_stmt.alternate.is_none() && super::always_terminates(&if_stmt.consequent) {
                let guards = narrowing::narrow_condition(&if_stmt.test, ctx);
                let overlay = operators::build_overlay(&guards.negative, false, ctx);
                ctx.env.push_narrowings(overlay);
                fallthrough_narrowings += 1;
            }
        }
        checked.push(checked_stmt);
    }
    for _ in 0..fallthrough_narrowings {
        ctx.env.pop_narrowings();
    }
    ctx.env.exit_scope();
    Statement::Block(checked, span)
}

fn check_stmt_list(statements: Vec<Statement<()>>, ctx: &mut TypeContext) -> Vec<Statement<ExprInfo>> {
    statements.into_iter().map(|s| super::check_statement(s, ctx)).collect()
}

fn check_catch_clause(h: CatchClause<()>, ctx: &mut TypeContext) -> CatchClause<ExprInfo> {
    let span = h.span.clone();
    ctx.env.enter_scope();
    if let Some(parameter) = &h.parameter {
        let ty = match &h.annotation {
            Some(annotation) => match crate::checker::annotation::resolve_annotation(annotation, ctx) {
                Ok(ty) if matches!(ty, Type::Any | Type::Unknown) => ty,
                Ok(other) => {
                    let _ = ctx.report(TypeCheckError::TypeMismatch(
                        TypeMismatch {
                            expected: Type::Unknown,
                            actual: other,
                        },
                        span.clone(),
                    ));
                    Type::Any
                }
                Err(err) => {
                    let _ = ctx.report(err);
                    Type::Any
                }
            },
            None => Type::Any,
        };
        destructure::declare_binding_target(parameter, &ty, true, &span, ctx);
    }
    let body = check_stmt_list(h.body, ctx);
    ctx.env.exit_scope();
    CatchClause {
        parameter: h.parameter,
        annotation: h.annotation,
        body,
        span,
    }
}

pub fn check_try(s: TryStatement<()>, ctx: &mut TypeContext) -> TryStatement<ExprInfo> {
    let span = s.span.clone();

    ctx.env.enter_scope();
    let block = check_stmt_list(s.block, ctx);
    ctx.env.exit_scope();

    let handler = s.handler.map(|h| check_catch_clause(h, ctx));

    let finalizer = s.finalizer.map(|stmts| {
        ctx.env.enter_scope();
        let checked = check_stmt_list(stmts, ctx);
        ctx.env.exit_scope();
        checked
    });

    TryStatement {
        block,
        handler,
        finalizer,
        span,
    }
}

/// The concrete type a `case <literal>:` test narrows the discriminant to,
/// if `test` is a literal the discriminant's declared type could plausibly
/// equal. Anything else (a computed case test) narrows nothing.
fn switch_case_narrowed_type(test: &Expression<ExprInfo>) -> Option<Type> {
    match test {
        Expression::StringLiteral(s, ..) => Some(Type::StringLiteral(s.clone())),
        Expression::NumberLiteral(n, ..) => Some(Type::NumberLiteral(*n)),
        Expression::BooleanLiteral(b, ..) => Some(Type::BooleanLiteral(*b)),
        _ => None,
    }
}

pub fn check_switch(s: SwitchStatement<()>, ctx: &mut TypeContext) -> SwitchStatement<ExprInfo> {
    let span = s.span.clone();
    let discriminant = infer_expression(s.discriminant, ctx);
    let disc_ty = discriminant.info().get().unwrap_or(Type::Any);
    let disc_path = narrowing::expr_path(&discriminant);

    let mut cases = Vec::with_capacity(s.cases.len());
    for case in s.cases {
        let case_span = case.span.clone();
        let test = case.test.map(|t| infer_expression(t, ctx));

        let narrowed = test.as_ref().and_then(switch_case_narrowed_type);
        let pushed = match (&disc_path, &narrowed) {
            (Some(path), Some(narrowed_ty)) => {
                let mut overlay = std::collections::HashMap::new();
                overlay.insert(
                    path.clone(),
                    narrowing::apply_narrowing(&disc_ty, narrowed_ty, true),
                );
                ctx.env.push_narrowings(overlay);
                true
            }
            _ => false,
        };

        ctx.env.enter_scope();
        let consequent = case
            .consequent
            .into_iter()
            .map(|stmt| super::check_statement(stmt, ctx))
            .collect();
        ctx.env.exit_scope();

        if pushed {
            ctx.env.pop_narrowings();
        }

        cases.push(SwitchCase {
            test,
            consequent,
            span: case_span,
        });
    }

    SwitchStatement {
        discriminant,
        cases,
        span,
    }
}
