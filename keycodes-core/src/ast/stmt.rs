use super::expr::ExprDef;
use super::include::IncludeStmt;
use crate::types::{KeyName, MergeMode};

/// `<ESC> = 9;`
#[derive(Debug, Clone, PartialEq)]
pub struct KeycodeDef {
    pub merge: MergeMode,
    pub name: KeyName,
    pub value: u64,
}

impl KeycodeDef {
    pub fn new(name: &str, value: u64) -> Self {
        Self {
            merge: MergeMode::Default,
            name: KeyName::new(name),
            value,
        }
    }
}

/// `alias <MENU> = <COMP>;`
#[derive(Debug, Clone, PartialEq)]
pub struct KeyAliasDef {
    pub merge: MergeMode,
    pub alias: KeyName,
    pub real: KeyName,
}

impl KeyAliasDef {
    pub fn new(alias: &str, real: &str) -> Self {
        Self {
            merge: MergeMode::Default,
            alias: KeyName::new(alias),
            real: KeyName::new(real),
        }
    }
}

/// `name = value;`, or a bare `name;` / `!name;` boolean setting
#[derive(Debug, Clone, PartialEq)]
pub struct VarDef {
    pub merge: MergeMode,
    pub name: Option<ExprDef>,
    pub value: Option<ExprDef>,
}

impl VarDef {
    pub fn new(name: ExprDef, value: ExprDef) -> Self {
        Self {
            merge: MergeMode::Default,
            name: Some(name),
            value: Some(value),
        }
    }

    pub fn boolean(name: &str, set: bool) -> Self {
        Self::new(
            ExprDef::ident(name),
            ExprDef::value(super::expr::Literal::Boolean(set)),
        )
    }
}

/// `virtual_modifiers NumLock = Mod2;`
#[derive(Debug, Clone, PartialEq)]
pub struct VModDef {
    pub merge: MergeMode,
    pub name: String,
    pub value: Option<ExprDef>,
}

impl VModDef {
    pub fn new(name: impl Into<String>, value: Option<ExprDef>) -> Self {
        Self {
            merge: MergeMode::Default,
            name: name.into(),
            value,
        }
    }
}

/// `interpret Num_Lock + AnyOf(all) { ... };`
#[derive(Debug, Clone, PartialEq)]
pub struct InterpDef {
    pub merge: MergeMode,
    pub sym: String,
    pub match_expr: Option<ExprDef>,
    pub body: Vec<VarDef>,
}

impl InterpDef {
    pub fn new(sym: impl Into<String>, match_expr: Option<ExprDef>, body: Vec<VarDef>) -> Self {
        Self {
            merge: MergeMode::Default,
            sym: sym.into(),
            match_expr,
            body,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyTypeDef {
    pub merge: MergeMode,
    pub name: String,
    pub body: Vec<VarDef>,
}

impl KeyTypeDef {
    pub fn new(name: impl Into<String>, body: Vec<VarDef>) -> Self {
        Self {
            merge: MergeMode::Default,
            name: name.into(),
            body,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SymbolsDef {
    pub merge: MergeMode,
    pub key_name: KeyName,
    pub symbols: Vec<VarDef>,
}

impl SymbolsDef {
    pub fn new(key_name: &str, symbols: Vec<VarDef>) -> Self {
        Self {
            merge: MergeMode::Default,
            key_name: KeyName::new(key_name),
            symbols,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupCompatDef {
    pub merge: MergeMode,
    pub group: i32,
    pub def: ExprDef,
}

impl GroupCompatDef {
    pub fn new(group: i32, def: ExprDef) -> Self {
        Self {
            merge: MergeMode::Default,
            group,
            def,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModMapDef {
    pub merge: MergeMode,
    pub modifier: String,
    pub keys: Vec<ExprDef>,
}

impl ModMapDef {
    pub fn new(modifier: impl Into<String>, keys: Vec<ExprDef>) -> Self {
        Self {
            merge: MergeMode::Default,
            modifier: modifier.into(),
            keys,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorMapDef {
    pub merge: MergeMode,
    pub name: String,
    pub body: Vec<VarDef>,
}

impl IndicatorMapDef {
    pub fn new(name: impl Into<String>, body: Vec<VarDef>) -> Self {
        Self {
            merge: MergeMode::Default,
            name: name.into(),
            body,
        }
    }
}

/// `indicator 1 = "Caps Lock";` or `virtual indicator 4 = "Shift Lock";`
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorNameDef {
    pub merge: MergeMode,
    pub ndx: i64,
    pub name: ExprDef,
    pub is_virtual: bool,
}

impl IndicatorNameDef {
    pub fn new(ndx: i64, name: ExprDef, is_virtual: bool) -> Self {
        Self {
            merge: MergeMode::Default,
            ndx,
            name,
            is_virtual,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Include(IncludeStmt),
    KeycodeDef(KeycodeDef),
    KeyAliasDef(KeyAliasDef),
    VarDef(VarDef),
    VModDef(VModDef),
    InterpDef(InterpDef),
    KeyTypeDef(KeyTypeDef),
    SymbolsDef(SymbolsDef),
    GroupCompatDef(GroupCompatDef),
    ModMapDef(ModMapDef),
    IndicatorMapDef(IndicatorMapDef),
    IndicatorNameDef(IndicatorNameDef),
    Expr(ExprDef),
}

impl Stmt {
    /// Human-readable kind, used in diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Stmt::Include(_) => "include",
            Stmt::KeycodeDef(_) => "key name",
            Stmt::KeyAliasDef(_) => "key alias",
            Stmt::VarDef(_) => "variable",
            Stmt::VModDef(_) => "virtual modifiers",
            Stmt::InterpDef(_) => "a symbol interpretation",
            Stmt::KeyTypeDef(_) => "key type",
            Stmt::SymbolsDef(_) => "key symbols",
            Stmt::GroupCompatDef(_) => "group compatibility map",
            Stmt::ModMapDef(_) => "modifier map",
            Stmt::IndicatorMapDef(_) => "indicator map",
            Stmt::IndicatorNameDef(_) => "indicator name",
            Stmt::Expr(_) => "expression",
        }
    }

    /// Applies a statement-level merge prefix. Include statements carry
    /// theirs on the first link.
    pub fn set_merge(&mut self, merge: MergeMode) {
        match self {
            Stmt::Include(stmt) => {
                if let Some(first) = stmt.links.first_mut() {
                    first.merge = merge;
                }
            }
            Stmt::KeycodeDef(def) => def.merge = merge,
            Stmt::KeyAliasDef(def) => def.merge = merge,
            Stmt::VarDef(def) => def.merge = merge,
            Stmt::VModDef(def) => def.merge = merge,
            Stmt::InterpDef(def) => def.merge = merge,
            Stmt::KeyTypeDef(def) => def.merge = merge,
            Stmt::SymbolsDef(def) => def.merge = merge,
            Stmt::GroupCompatDef(def) => def.merge = merge,
            Stmt::ModMapDef(def) => def.merge = merge,
            Stmt::IndicatorMapDef(def) => def.merge = merge,
            Stmt::IndicatorNameDef(def) => def.merge = merge,
            Stmt::Expr(_) => {}
        }
    }
}

macro_rules! impl_into_stmt {
    ($($ty:ident),*) => {
        $(impl From<$ty> for Stmt {
            fn from(def: $ty) -> Self {
                Stmt::$ty(def)
            }
        })*
    };
}

impl_into_stmt!(
    KeycodeDef,
    KeyAliasDef,
    VarDef,
    VModDef,
    InterpDef,
    KeyTypeDef,
    SymbolsDef,
    GroupCompatDef,
    ModMapDef,
    IndicatorMapDef,
    IndicatorNameDef
);

impl From<IncludeStmt> for Stmt {
    fn from(stmt: IncludeStmt) -> Self {
        Stmt::Include(stmt)
    }
}

impl From<ExprDef> for Stmt {
    fn from(expr: ExprDef) -> Self {
        Stmt::Expr(expr)
    }
}

/// Ordered statement sequence; later statements may override earlier ones
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StmtList {
    stmts: Vec<Stmt>,
}

impl StmtList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, stmt: impl Into<Stmt>) {
        self.stmts.push(stmt.into());
    }

    /// Splices `other` onto the tail; an empty `other` leaves `self` unchanged
    pub fn append(mut self, other: StmtList) -> Self {
        if other.is_empty() {
            return self;
        }
        self.stmts.extend(other.stmts);
        self
    }

    pub fn len(&self) -> usize {
        self.stmts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Stmt> {
        self.stmts.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Stmt> {
        self.stmts.iter_mut()
    }
}

impl From<Vec<Stmt>> for StmtList {
    fn from(stmts: Vec<Stmt>) -> Self {
        Self { stmts }
    }
}

impl FromIterator<Stmt> for StmtList {
    fn from_iter<I: IntoIterator<Item = Stmt>>(iter: I) -> Self {
        Self {
            stmts: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for StmtList {
    type Item = Stmt;
    type IntoIter = std::vec::IntoIter<Stmt>;

    fn into_iter(self) -> Self::IntoIter {
        self.stmts.into_iter()
    }
}

impl<'a> IntoIterator for &'a mut StmtList {
    type Item = &'a mut Stmt;
    type IntoIter = std::slice::IterMut<'a, Stmt>;

    fn into_iter(self) -> Self::IntoIter {
        self.stmts.iter_mut()
    }
}
