//! Evaluation of the expression forms keycodes sections use: assignment
//! targets, integer keycodes and indicator name strings. Failures are
//! reported to the diagnostics sink and return `None`.

use super::expr::{BinaryOp, ExprDef, ExprKind, Literal, UnaryOp, ValueType};
use crate::diag::Diagnostics;

/// Left-hand side of an assignment: `[element.]field[index]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lhs<'a> {
    pub element: Option<&'a str>,
    pub field: &'a str,
    pub index: Option<&'a ExprDef>,
}

pub fn resolve_lhs<'a>(diag: &mut Diagnostics, expr: &'a ExprDef) -> Option<Lhs<'a>> {
    match &expr.kind {
        ExprKind::Ident(name) => Some(Lhs {
            element: None,
            field: name,
            index: None,
        }),
        ExprKind::FieldRef { element, field } => Some(Lhs {
            element: Some(element),
            field,
            index: None,
        }),
        ExprKind::ArrayRef {
            element,
            field,
            entry,
        } => Some(Lhs {
            element: element.as_deref(),
            field,
            index: Some(entry),
        }),
        _ => {
            diag.internal("Unexpected operator in resolve_lhs");
            None
        }
    }
}

fn type_text(value_type: ValueType) -> &'static str {
    match value_type {
        ValueType::Unknown => "unknown",
        ValueType::Boolean => "boolean",
        ValueType::Int => "int",
        ValueType::String => "string",
        ValueType::Action => "action",
        ValueType::KeyName => "keyname",
        ValueType::Symbols => "symbols",
    }
}

/// Resolves an integer expression used as a keycode or bound
pub fn resolve_keycode(diag: &mut Diagnostics, expr: &ExprDef) -> Option<i64> {
    match &expr.kind {
        ExprKind::Value(Literal::Int(value)) => Some(*value),
        ExprKind::Value(_) => {
            diag.error(format!(
                "Found constant of type {} where an int was expected",
                type_text(expr.value_type)
            ));
            None
        }
        ExprKind::Ident(name) => {
            diag.error(format!("Identifier \"{}\" of type int is unknown", name));
            None
        }
        ExprKind::Binary { op, left, right } if *op != BinaryOp::Assign => {
            let left = resolve_keycode(diag, left)?;
            let right = resolve_keycode(diag, right)?;
            match op {
                BinaryOp::Add => left.checked_add(right),
                BinaryOp::Subtract => left.checked_sub(right),
                BinaryOp::Multiply => left.checked_mul(right),
                BinaryOp::Divide => {
                    if right == 0 {
                        diag.error("Cannot divide by zero");
                        return None;
                    }
                    left.checked_div(right)
                }
                BinaryOp::Assign => None,
            }
            .or_else(|| {
                diag.error("Integer overflow in keycode expression");
                None
            })
        }
        ExprKind::Unary { op, child } => {
            let value = resolve_keycode(diag, child)?;
            match op {
                UnaryOp::Negate => value.checked_neg().or_else(|| {
                    diag.error("Integer overflow in keycode expression");
                    None
                }),
                UnaryOp::Plus => Some(value),
                UnaryOp::Invert => Some(!value),
                UnaryOp::Not => {
                    diag.error("The ! operator cannot be applied to a keycode");
                    None
                }
            }
        }
        _ => {
            diag.internal("Unknown operator in keycode expression");
            None
        }
    }
}

/// Resolves a string expression; `+` concatenates
pub fn resolve_string(diag: &mut Diagnostics, expr: &ExprDef) -> Option<String> {
    match &expr.kind {
        ExprKind::Value(Literal::Str(text)) => Some(text.clone()),
        ExprKind::Value(_) => {
            diag.error(format!(
                "Found constant of type {}, expected a string",
                type_text(expr.value_type)
            ));
            None
        }
        ExprKind::Ident(name) => {
            diag.error(format!("Identifier \"{}\" of type string not found", name));
            None
        }
        ExprKind::FieldRef { element, field } => {
            diag.error(format!(
                "Default \"{}.{}\" of type string not found",
                element, field
            ));
            None
        }
        ExprKind::Binary {
            op: BinaryOp::Add,
            left,
            right,
        } => {
            let mut text = resolve_string(diag, left)?;
            text.push_str(&resolve_string(diag, right)?);
            Some(text)
        }
        _ => {
            diag.error("Operation not permitted on strings");
            None
        }
    }
}
