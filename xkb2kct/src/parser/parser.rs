use crate::errors::{KctError, Result};
use crate::lexer::{Lexer, Token};
use keycodes_core::ast::{
    check_default_map, BinaryOp, ExprDef, FileType, GroupCompatDef, IncludeStmt,
    IndicatorMapDef, IndicatorNameDef, InterpDef, KeyAliasDef, KeyTypeDef, KeycodeDef,
    KeysymList, Literal, MapFlags, ModMapDef, Stmt, StmtList, SymbolsDef, UnaryOp, ValueType,
    VModDef, VarDef, XkbFile,
};
use keycodes_core::{Context, KeyName, MergeMode};

const SECTION_FLAGS: &[(&str, MapFlags)] = &[
    ("default", MapFlags::DEFAULT),
    ("partial", MapFlags::PARTIAL),
    ("hidden", MapFlags::HIDDEN),
    ("alphanumeric_keys", MapFlags::ALPHANUMERIC_KEYS),
    ("modifier_keys", MapFlags::MODIFIER_KEYS),
    ("keypad_keys", MapFlags::KEYPAD_KEYS),
    ("function_keys", MapFlags::FUNCTION_KEYS),
    ("alternate_group", MapFlags::ALTERNATE_GROUP),
];

const SECTION_TYPES: &[(&str, FileType)] = &[
    ("xkb_keycodes", FileType::Keycodes),
    ("xkb_types", FileType::Types),
    ("xkb_compatibility", FileType::Compat),
    ("xkb_compatibility_map", FileType::Compat),
    ("xkb_compat", FileType::Compat),
    ("xkb_compat_map", FileType::Compat),
    ("xkb_symbols", FileType::Symbols),
    ("xkb_geometry", FileType::Geometry),
    ("xkb_keymap", FileType::Keymap),
    ("xkb_semantics", FileType::Keymap),
    ("xkb_layout", FileType::Keymap),
];

const MERGE_KEYWORDS: &[(&str, MergeMode)] = &[
    ("include", MergeMode::Default),
    ("augment", MergeMode::Augment),
    ("override", MergeMode::Override),
    ("replace", MergeMode::Replace),
];

fn keyword_value<T: Copy>(table: &[(&str, T)], token: Option<&Token>) -> Option<T> {
    let token = token?;
    table
        .iter()
        .find(|(keyword, _)| token.is_keyword(keyword))
        .map(|&(_, value)| value)
}

/// Recursive-descent parser for XKB source files
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Option<Token>,
    peek: Option<Token>,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            lexer: Lexer::new(input),
            current: None,
            peek: None,
        }
    }

    /// Parses every section in the input. Sections nested in a keymap
    /// block are returned alongside top-level ones.
    pub fn parse(&mut self, ctx: &mut Context, file_name: Option<&str>) -> Result<Vec<XkbFile>> {
        self.advance()?;

        let mut files = Vec::new();
        while self.current.is_some() {
            self.parse_section(ctx, &mut files)?;
        }

        check_default_map(ctx, &mut files, file_name);
        Ok(files)
    }

    fn advance(&mut self) -> Result<()> {
        self.current = self.lexer.next_token()?;
        self.peek = self.lexer.peek();
        Ok(())
    }

    fn error<T>(&self, message: impl Into<String>) -> Result<T> {
        Err(KctError::Parse {
            line: self.lexer.current_line(),
            message: message.into(),
        })
    }

    fn expect(&mut self, expected: Token) -> Result<()> {
        if self.current.as_ref() != Some(&expected) {
            return self.error(format!("Expected {:?}, found {:?}", expected, self.current));
        }
        self.advance()
    }

    fn accept(&mut self, token: Token) -> Result<bool> {
        if self.current.as_ref() == Some(&token) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn is_keyword(&self, keyword: &str) -> bool {
        self.current.as_ref().is_some_and(|t| t.is_keyword(keyword))
    }

    fn expect_ident(&mut self, what: &str) -> Result<String> {
        match self.current.take() {
            Some(Token::Ident(name)) => {
                self.advance()?;
                Ok(name)
            }
            other => {
                self.current = other;
                self.error(format!("Expected {}, found {:?}", what, self.current))
            }
        }
    }

    fn expect_string(&mut self, what: &str) -> Result<String> {
        match self.current.take() {
            Some(Token::String(text)) => {
                self.advance()?;
                Ok(text)
            }
            other => {
                self.current = other;
                self.error(format!("Expected {}, found {:?}", what, self.current))
            }
        }
    }

    fn expect_key_name(&mut self) -> Result<String> {
        match self.current.take() {
            Some(Token::KeyName(name)) => {
                self.advance()?;
                Ok(name)
            }
            other => {
                self.current = other;
                self.error(format!("Expected key name, found {:?}", self.current))
            }
        }
    }

    fn expect_integer(&mut self, what: &str) -> Result<i64> {
        match self.current {
            Some(Token::Integer(value)) => {
                self.advance()?;
                Ok(value)
            }
            _ => self.error(format!("Expected {}, found {:?}", what, self.current)),
        }
    }

    /// `[flags] xkb_keycodes ["name"] { ... };`
    fn parse_section(&mut self, ctx: &mut Context, files: &mut Vec<XkbFile>) -> Result<()> {
        let mut flags = MapFlags::empty();
        while let Some(flag) = keyword_value(SECTION_FLAGS, self.current.as_ref()) {
            flags.insert(flag);
            self.advance()?;
        }

        let Some(file_type) = keyword_value(SECTION_TYPES, self.current.as_ref()) else {
            return self.error(format!("Expected section type, found {:?}", self.current));
        };
        self.advance()?;

        let name = if matches!(self.current, Some(Token::String(_))) {
            Some(self.expect_string("section name")?)
        } else {
            None
        };

        self.expect(Token::LBrace)?;
        if file_type == FileType::Keymap {
            while self.current.is_some() && self.current != Some(Token::RBrace) {
                self.parse_section(ctx, files)?;
            }
        } else {
            let mut defs = StmtList::new();
            while self.current.is_some() && self.current != Some(Token::RBrace) {
                for stmt in self.parse_decl()? {
                    defs.push(stmt);
                }
            }
            files.push(XkbFile::new(ctx, file_type, name, defs, flags));
        }
        self.expect(Token::RBrace)?;
        self.accept(Token::Semi)?;
        Ok(())
    }

    /// One declaration, optionally preceded by a merge keyword. A
    /// `virtual_modifiers` list yields one statement per modifier.
    fn parse_decl(&mut self) -> Result<Vec<Stmt>> {
        if let Some(merge) = keyword_value(MERGE_KEYWORDS, self.current.as_ref()) {
            let include_keyword = self.is_keyword("include");
            self.advance()?;

            if include_keyword || matches!(self.current, Some(Token::String(_))) {
                let line = self.lexer.current_line();
                let text = self.expect_string("include file name")?;
                let include = IncludeStmt::parse(&text, merge).map_err(|e| KctError::Parse {
                    line,
                    message: e.to_string(),
                })?;
                self.accept(Token::Semi)?;
                return Ok(vec![include.into()]);
            }

            let mut stmts = self.parse_decl_body()?;
            for stmt in stmts.iter_mut() {
                stmt.set_merge(merge);
            }
            return Ok(stmts);
        }

        self.parse_decl_body()
    }

    fn parse_decl_body(&mut self) -> Result<Vec<Stmt>> {
        if matches!(self.current, Some(Token::KeyName(_))) {
            return Ok(vec![self.parse_keycode_def()?.into()]);
        }

        let stmt: Stmt = if self.is_keyword("alias") {
            self.advance()?;
            let alias = self.expect_key_name()?;
            self.expect(Token::Equals)?;
            let real = self.expect_key_name()?;
            self.expect(Token::Semi)?;
            KeyAliasDef::new(&alias, &real).into()
        } else if self.is_keyword("virtual")
            && self.peek.as_ref().is_some_and(|t| t.is_keyword("indicator"))
        {
            self.advance()?;
            self.advance()?;
            self.parse_indicator_name(true)?.into()
        } else if self.is_keyword("indicator") {
            self.advance()?;
            if matches!(self.current, Some(Token::String(_))) {
                let name = self.expect_string("indicator name")?;
                let body = self.parse_var_block()?;
                IndicatorMapDef::new(name, body).into()
            } else {
                self.parse_indicator_name(false)?.into()
            }
        } else if self.is_keyword("virtual_modifiers") {
            self.advance()?;
            return self.parse_vmod_list();
        } else if self.is_keyword("interpret") {
            self.advance()?;
            self.parse_interp()?.into()
        } else if self.is_keyword("type") && matches!(self.peek, Some(Token::String(_))) {
            self.advance()?;
            let name = self.expect_string("type name")?;
            let body = self.parse_var_block()?;
            KeyTypeDef::new(name, body).into()
        } else if self.is_keyword("key") && matches!(self.peek, Some(Token::KeyName(_))) {
            self.advance()?;
            let key_name = self.expect_key_name()?;
            let symbols = self.parse_symbols_body()?;
            SymbolsDef::new(&key_name, symbols).into()
        } else if self.is_keyword("modifier_map")
            || self.is_keyword("mod_map")
            || self.is_keyword("modmap")
        {
            self.advance()?;
            let modifier = self.expect_ident("modifier name")?;
            self.expect(Token::LBrace)?;
            let keys = self.parse_expr_list(Token::RBrace)?;
            self.expect(Token::RBrace)?;
            self.expect(Token::Semi)?;
            ModMapDef::new(modifier, keys).into()
        } else if self.is_keyword("group") && matches!(self.peek, Some(Token::Integer(_))) {
            self.advance()?;
            let group = self.expect_integer("group number")?;
            self.expect(Token::Equals)?;
            let def = self.parse_expr()?;
            self.expect(Token::Semi)?;
            GroupCompatDef::new(group as i32, def).into()
        } else {
            self.parse_var_decl()?.into()
        };
        Ok(vec![stmt])
    }

    /// `<ESC> = 9;`
    fn parse_keycode_def(&mut self) -> Result<KeycodeDef> {
        let name = self.expect_key_name()?;
        self.expect(Token::Equals)?;
        let value = self.expect_integer("keycode")?;
        self.expect(Token::Semi)?;
        Ok(KeycodeDef::new(&name, value as u64))
    }

    /// `indicator 1 = "Caps Lock";` after the `indicator` keyword
    fn parse_indicator_name(&mut self, is_virtual: bool) -> Result<IndicatorNameDef> {
        let ndx = self.expect_integer("indicator index")?;
        self.expect(Token::Equals)?;
        let name = self.parse_expr()?;
        self.expect(Token::Semi)?;
        Ok(IndicatorNameDef::new(ndx, name, is_virtual))
    }

    /// `NumLock, Alt = Mod1;`
    fn parse_vmod_list(&mut self) -> Result<Vec<Stmt>> {
        let mut stmts = Vec::new();
        loop {
            let name = self.expect_ident("virtual modifier name")?;
            let value = if self.accept(Token::Equals)? {
                Some(self.parse_expr()?)
            } else {
                None
            };
            stmts.push(VModDef::new(name, value).into());
            if !self.accept(Token::Comma)? {
                break;
            }
        }
        self.expect(Token::Semi)?;
        Ok(stmts)
    }

    /// `Num_Lock + AnyOf(all) { ... };` after the `interpret` keyword
    fn parse_interp(&mut self) -> Result<InterpDef> {
        let sym = self.parse_keysym_name()?;
        let match_expr = if self.accept(Token::Plus)? {
            Some(self.parse_expr()?)
        } else {
            None
        };
        let body = self.parse_var_block()?;
        Ok(InterpDef::new(sym, match_expr, body))
    }

    /// `{ name = value; ... };`
    fn parse_var_block(&mut self) -> Result<Vec<VarDef>> {
        self.expect(Token::LBrace)?;
        let mut body = Vec::new();
        while self.current.is_some() && self.current != Some(Token::RBrace) {
            body.push(self.parse_var_decl()?);
        }
        self.expect(Token::RBrace)?;
        self.expect(Token::Semi)?;
        Ok(body)
    }

    /// `field = expr;`, `field;` or `!field;`
    fn parse_var_decl(&mut self) -> Result<VarDef> {
        let def = self.parse_var_item()?;
        self.expect(Token::Semi)?;
        Ok(def)
    }

    fn parse_var_item(&mut self) -> Result<VarDef> {
        if self.accept(Token::Exclam)? {
            let name = self.expect_ident("field name")?;
            return Ok(VarDef::boolean(&name, false));
        }

        let lhs = self.parse_lhs()?;
        let value = if self.accept(Token::Equals)? {
            self.parse_expr()?
        } else {
            ExprDef::value(Literal::Boolean(true))
        };
        Ok(VarDef::new(lhs, value))
    }

    /// `{ [ a, A ], type = "TWO_LEVEL", symbols[Group2] = [ b ] };`
    fn parse_symbols_body(&mut self) -> Result<Vec<VarDef>> {
        self.expect(Token::LBrace)?;
        let mut symbols = Vec::new();
        while self.current.is_some() && self.current != Some(Token::RBrace) {
            if self.current == Some(Token::LBracket) {
                symbols.push(VarDef {
                    merge: MergeMode::Default,
                    name: None,
                    value: Some(self.parse_bracket_list()?),
                });
            } else {
                symbols.push(self.parse_var_item()?);
            }
            if !self.accept(Token::Comma)? {
                break;
            }
        }
        self.expect(Token::RBrace)?;
        self.expect(Token::Semi)?;
        Ok(symbols)
    }

    /// `field`, `element.field`, `field[index]` or `element.field[index]`
    fn parse_lhs(&mut self) -> Result<ExprDef> {
        let first = self.expect_ident("field name")?;
        let (element, field) = if self.accept(Token::Dot)? {
            (Some(first), self.expect_ident("field name")?)
        } else {
            (None, first)
        };

        if self.accept(Token::LBracket)? {
            let entry = self.parse_expr()?;
            self.expect(Token::RBracket)?;
            return Ok(ExprDef::array_ref(element, field, entry));
        }

        Ok(match element {
            Some(element) => ExprDef::field_ref(element, field),
            None => ExprDef::ident(field),
        })
    }

    fn parse_expr_list(&mut self, end: Token) -> Result<Vec<ExprDef>> {
        let mut items = Vec::new();
        if self.current.as_ref() == Some(&end) {
            return Ok(items);
        }
        loop {
            items.push(self.parse_expr()?);
            if !self.accept(Token::Comma)? {
                break;
            }
        }
        Ok(items)
    }

    pub fn parse_expr(&mut self) -> Result<ExprDef> {
        let mut left = self.parse_term()?;
        loop {
            let op = match self.current {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Subtract,
                _ => return Ok(left),
            };
            self.advance()?;
            let right = self.parse_term()?;
            left = ExprDef::binary(op, left, right);
        }
    }

    fn parse_term(&mut self) -> Result<ExprDef> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.current {
                Some(Token::Times) => BinaryOp::Multiply,
                Some(Token::Divide) => BinaryOp::Divide,
                _ => return Ok(left),
            };
            self.advance()?;
            let right = self.parse_unary()?;
            left = ExprDef::binary(op, left, right);
        }
    }

    fn parse_unary(&mut self) -> Result<ExprDef> {
        let op = match self.current {
            Some(Token::Minus) => UnaryOp::Negate,
            Some(Token::Plus) => UnaryOp::Plus,
            Some(Token::Exclam) => UnaryOp::Not,
            Some(Token::Invert) => UnaryOp::Invert,
            _ => return self.parse_primary(),
        };
        self.advance()?;
        let child = self.parse_unary()?;
        let value_type = if op == UnaryOp::Not {
            ValueType::Boolean
        } else {
            child.value_type
        };
        Ok(ExprDef::unary(op, value_type, child))
    }

    fn parse_primary(&mut self) -> Result<ExprDef> {
        match self.current.take() {
            Some(Token::Integer(value)) => {
                self.advance()?;
                Ok(ExprDef::int(value))
            }
            Some(Token::String(text)) => {
                self.advance()?;
                Ok(ExprDef::string(text))
            }
            Some(Token::KeyName(name)) => {
                self.advance()?;
                Ok(ExprDef::value(Literal::KeyName(KeyName::new(&name))))
            }
            Some(Token::LParen) => {
                self.advance()?;
                let inner = self.parse_expr()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Some(Token::LBracket) => {
                self.current = Some(Token::LBracket);
                self.parse_bracket_list()
            }
            Some(Token::Ident(name)) => {
                self.current = Some(Token::Ident(name));
                match self.peek {
                    Some(Token::LParen) => self.parse_action(),
                    _ => self.parse_lhs(),
                }
            }
            other => {
                self.current = other;
                self.error(format!("Expected expression, found {:?}", self.current))
            }
        }
    }

    /// `SetMods(modifiers = Shift, clearLocks)`
    fn parse_action(&mut self) -> Result<ExprDef> {
        let name = self.expect_ident("action name")?;
        self.expect(Token::LParen)?;
        let mut args = Vec::new();
        if self.current != Some(Token::RParen) {
            loop {
                let arg = self.parse_expr()?;
                let arg = if self.accept(Token::Equals)? {
                    let value = self.parse_expr()?;
                    ExprDef::binary(BinaryOp::Assign, arg, value)
                } else {
                    arg
                };
                args.push(arg);
                if !self.accept(Token::Comma)? {
                    break;
                }
            }
        }
        self.expect(Token::RParen)?;
        Ok(ExprDef::action(name, args))
    }

    /// `[ a, { b, c }, d ]` or `[ SetMods(...), NoAction() ]`
    fn parse_bracket_list(&mut self) -> Result<ExprDef> {
        self.expect(Token::LBracket)?;

        if self.accept(Token::RBracket)? {
            return Ok(ExprDef::keysyms(KeysymList::default()));
        }

        if matches!(self.current, Some(Token::Ident(_))) && self.peek == Some(Token::LParen) {
            let mut actions = Vec::new();
            loop {
                actions.push(self.parse_action()?);
                if !self.accept(Token::Comma)? {
                    break;
                }
            }
            self.expect(Token::RBracket)?;
            return Ok(ExprDef::action_list(actions));
        }

        let mut list: Option<KeysymList> = None;
        loop {
            let level = self.parse_keysym_level()?;
            list = Some(match list {
                None => level,
                Some(list) => list.append_multi(level),
            });
            if !self.accept(Token::Comma)? {
                break;
            }
        }
        self.expect(Token::RBracket)?;
        Ok(ExprDef::keysyms(list.unwrap_or_default()))
    }

    /// One level of a keysym list: a keysym or `{ keysym, ... }`
    fn parse_keysym_level(&mut self) -> Result<KeysymList> {
        if !self.accept(Token::LBrace)? {
            return Ok(KeysymList::new(self.parse_keysym_name()?));
        }

        let mut level = KeysymList::new(self.parse_keysym_name()?);
        while self.accept(Token::Comma)? {
            level = level.append(self.parse_keysym_name()?);
        }
        self.expect(Token::RBrace)?;
        Ok(level.into_multi())
    }

    fn parse_keysym_name(&mut self) -> Result<String> {
        match self.current.take() {
            Some(Token::Ident(name)) => {
                self.advance()?;
                Ok(name)
            }
            Some(Token::Integer(value)) => {
                self.advance()?;
                Ok(if (0..10).contains(&value) {
                    value.to_string()
                } else {
                    format!("0x{:x}", value)
                })
            }
            other => {
                self.current = other;
                self.error(format!("Expected keysym, found {:?}", self.current))
            }
        }
    }
}
