use super::keysym::KeysymList;
use crate::types::KeyName;

/// Value type attached to an expression node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Unknown,
    Boolean,
    Int,
    String,
    Action,
    KeyName,
    Symbols,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Str(String),
    Boolean(bool),
    KeyName(KeyName),
}

impl Literal {
    pub fn value_type(&self) -> ValueType {
        match self {
            Literal::Int(_) => ValueType::Int,
            Literal::Str(_) => ValueType::String,
            Literal::Boolean(_) => ValueType::Boolean,
            Literal::KeyName(_) => ValueType::KeyName,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,
    Plus,
    Not,
    Invert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Assign,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Ident(String),
    Value(Literal),
    /// `element.field`
    FieldRef { element: String, field: String },
    /// `element.field[entry]` or `field[entry]`
    ArrayRef {
        element: Option<String>,
        field: String,
        entry: Box<ExprDef>,
    },
    Unary { op: UnaryOp, child: Box<ExprDef> },
    Binary {
        op: BinaryOp,
        left: Box<ExprDef>,
        right: Box<ExprDef>,
    },
    /// `Name(args...)`
    Action { name: String, args: Vec<ExprDef> },
    /// `{ Action(), Action() }`
    ActionList(Vec<ExprDef>),
    KeysymList(KeysymList),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprDef {
    pub value_type: ValueType,
    pub kind: ExprKind,
}

impl ExprDef {
    pub fn new(kind: ExprKind, value_type: ValueType) -> Self {
        Self { value_type, kind }
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Self::new(ExprKind::Ident(name.into()), ValueType::Unknown)
    }

    pub fn value(literal: Literal) -> Self {
        let value_type = literal.value_type();
        Self::new(ExprKind::Value(literal), value_type)
    }

    pub fn int(value: i64) -> Self {
        Self::value(Literal::Int(value))
    }

    pub fn string(text: impl Into<String>) -> Self {
        Self::value(Literal::Str(text.into()))
    }

    pub fn field_ref(element: impl Into<String>, field: impl Into<String>) -> Self {
        Self::new(
            ExprKind::FieldRef {
                element: element.into(),
                field: field.into(),
            },
            ValueType::Unknown,
        )
    }

    pub fn array_ref(element: Option<String>, field: impl Into<String>, entry: ExprDef) -> Self {
        Self::new(
            ExprKind::ArrayRef {
                element,
                field: field.into(),
                entry: Box::new(entry),
            },
            ValueType::Unknown,
        )
    }

    pub fn unary(op: UnaryOp, value_type: ValueType, child: ExprDef) -> Self {
        Self::new(
            ExprKind::Unary {
                op,
                child: Box::new(child),
            },
            value_type,
        )
    }

    /// Builds a binary node. Assignments and unknown-typed left operands take
    /// the right side's type; mismatched known types collapse to unknown.
    pub fn binary(op: BinaryOp, left: ExprDef, right: ExprDef) -> Self {
        let value_type = if op == BinaryOp::Assign || left.value_type == ValueType::Unknown {
            right.value_type
        } else if left.value_type == right.value_type || right.value_type == ValueType::Unknown {
            left.value_type
        } else {
            ValueType::Unknown
        };
        Self::new(
            ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            value_type,
        )
    }

    pub fn action(name: impl Into<String>, args: Vec<ExprDef>) -> Self {
        Self::new(
            ExprKind::Action {
                name: name.into(),
                args,
            },
            ValueType::Unknown,
        )
    }

    pub fn action_list(actions: Vec<ExprDef>) -> Self {
        Self::new(ExprKind::ActionList(actions), ValueType::Action)
    }

    pub fn keysyms(list: KeysymList) -> Self {
        Self::new(ExprKind::KeysymList(list), ValueType::Symbols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_type_inference() {
        let sum = ExprDef::binary(BinaryOp::Add, ExprDef::int(1), ExprDef::int(2));
        assert_eq!(sum.value_type, ValueType::Int);

        let unknown_left = ExprDef::binary(BinaryOp::Add, ExprDef::ident("x"), ExprDef::string("a"));
        assert_eq!(unknown_left.value_type, ValueType::String);

        let unknown_right = ExprDef::binary(BinaryOp::Add, ExprDef::int(1), ExprDef::ident("x"));
        assert_eq!(unknown_right.value_type, ValueType::Int);

        let mismatch = ExprDef::binary(BinaryOp::Add, ExprDef::int(1), ExprDef::string("a"));
        assert_eq!(mismatch.value_type, ValueType::Unknown);

        let assign = ExprDef::binary(BinaryOp::Assign, ExprDef::int(1), ExprDef::string("a"));
        assert_eq!(assign.value_type, ValueType::String);
    }
}
