use crate::ast::*;
use crate::error::{ParseError, ParseResult, TokenSpan};
use crate::tokenizer::{tokenize, Spanned, Token};

/// Contextual keywords that act as member modifiers when they lead a declaration
const CONTEXTUAL_MODIFIERS: &[&str] = &["partial", "async", "required", "file", "fixed"];

/// Declaration parser for C# source files.
///
/// Builds the declaration tree only: namespaces, types and the signatures of
/// their members. Method bodies, initializers and member kinds the tree does
/// not model are skipped by balanced-bracket scanning.
pub struct Parser<'src> {
    source: &'src str,
    tokens: Vec<Spanned<'src>>,
    pos: usize,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> ParseResult<Self> {
        let tokens = tokenize(source)?;
        Ok(Self {
            source,
            tokens,
            pos: 0,
        })
    }

    /// Parse a complete source file
    pub fn parse_compilation_unit(&mut self) -> ParseResult<CompilationUnit> {
        let mut unit = CompilationUnit::new(TokenSpan::new(0, self.source.len()));
        self.parse_declarations(&mut unit.usings, &mut unit.members)?;

        if let Some((token, span)) = self.peek() {
            return Err(ParseError::unexpected_token(
                to_span(span),
                "declaration",
                token.to_string(),
            ));
        }

        Ok(unit)
    }

    /// Parse usings and declarations until a closing brace or end of input
    fn parse_declarations(
        &mut self,
        usings: &mut Vec<UsingDirective>,
        members: &mut Vec<Declaration>,
    ) -> ParseResult<()> {
        while !self.is_at_end() && !self.check(&Token::RBrace) {
            if self.is_using_directive() {
                usings.push(self.parse_using()?);
                continue;
            }

            match self.peek() {
                Some((Token::Namespace, _)) => {
                    members.push(Declaration::Namespace(self.parse_namespace()?));
                }
                Some((Token::Semicolon, _)) => {
                    self.advance();
                }
                _ => {
                    let start = self.current_pos();
                    let attributes = self.parse_attribute_lists()?;
                    let modifiers = self.parse_modifiers();

                    if self.is_type_keyword() {
                        let decl = self.parse_type_decl(start, attributes, modifiers)?;
                        members.push(Declaration::Type(decl));
                    } else if self.check(&Token::Delegate) {
                        self.skip_member()?;
                    } else if modifiers.is_empty() && is_global_attribute_section(&attributes) {
                        // [assembly: ...] and [module: ...] sections stand alone
                    } else {
                        return Err(self.unexpected("type declaration"));
                    }
                }
            }
        }

        Ok(())
    }

    fn is_using_directive(&self) -> bool {
        match self.peek() {
            Some((Token::Using, _)) => true,
            Some((Token::Ident("global"), _)) => {
                matches!(self.peek_ahead(1), Some((Token::Using, _)))
            }
            _ => false,
        }
    }

    /// Parse a using directive
    fn parse_using(&mut self) -> ParseResult<UsingDirective> {
        let start = self.current_pos();
        let is_global = self.match_ident("global");
        self.expect(&Token::Using)?;

        let is_static = self.match_token(&Token::Modifier("static"));

        let alias = match (self.peek(), self.peek_ahead(1)) {
            (Some((Token::Ident(alias), _)), Some((Token::Equals, _))) => {
                let alias = alias.to_string();
                self.advance();
                self.advance();
                Some(alias)
            }
            _ => None,
        };

        let name = self.parse_type()?;
        self.expect(&Token::Semicolon)?;

        Ok(UsingDirective {
            name,
            alias,
            is_static,
            is_global,
            span: TokenSpan::new(start, self.prev_end()),
        })
    }

    /// Parse a namespace declaration, block-bodied or file-scoped
    fn parse_namespace(&mut self) -> ParseResult<NamespaceDecl> {
        let start = self.current_pos();
        self.expect(&Token::Namespace)?;
        let name = self.parse_dotted_name()?;

        let mut usings = Vec::new();
        let mut members = Vec::new();

        let file_scoped = self.match_token(&Token::Semicolon);
        if file_scoped {
            // Everything after a file-scoped namespace belongs to it
            self.parse_declarations(&mut usings, &mut members)?;
        } else {
            self.expect(&Token::LBrace)?;
            self.parse_declarations(&mut usings, &mut members)?;
            self.expect(&Token::RBrace)?;
            self.match_token(&Token::Semicolon);
        }

        Ok(NamespaceDecl {
            name,
            file_scoped,
            usings,
            members,
            span: TokenSpan::new(start, self.prev_end()),
        })
    }

    fn is_type_keyword(&self) -> bool {
        match self.peek() {
            Some((Token::Class | Token::Struct | Token::Interface | Token::Enum, _)) => true,
            Some((Token::Ident("record"), _)) => matches!(
                self.peek_ahead(1),
                Some((Token::Ident(_) | Token::Class | Token::Struct, _))
            ),
            _ => false,
        }
    }

    /// Parse a type declaration whose attributes and modifiers were already consumed
    fn parse_type_decl(
        &mut self,
        start: usize,
        attributes: Vec<AttributeList>,
        modifiers: Vec<String>,
    ) -> ParseResult<TypeDecl> {
        let kind = match self.advance() {
            Some((Token::Class, _)) => TypeKind::Class,
            Some((Token::Struct, _)) => TypeKind::Struct,
            Some((Token::Interface, _)) => TypeKind::Interface,
            Some((Token::Enum, _)) => TypeKind::Enum,
            Some((Token::Ident("record"), _)) => {
                if !self.match_token(&Token::Class) {
                    self.match_token(&Token::Struct);
                }
                TypeKind::Record
            }
            _ => return Err(self.unexpected_previous("type keyword")),
        };

        let name = self.expect_ident()?;

        let type_parameters = if self.check(&Token::LAngle) {
            self.parse_type_parameter_list()?
        } else {
            Vec::new()
        };

        // Record primary constructor
        if kind == TypeKind::Record && self.check(&Token::LParen) {
            self.skip_balanced()?;
        }

        let mut base_types = Vec::new();
        if self.match_token(&Token::Colon) {
            loop {
                base_types.push(self.parse_type()?);
                if self.check(&Token::LParen) {
                    self.skip_balanced()?;
                }
                if !self.match_token(&Token::Comma) {
                    break;
                }
            }
        }

        let constraint_clauses = self.parse_constraint_clauses()?;

        let mut members = Vec::new();
        if kind == TypeKind::Enum {
            if !self.check(&Token::LBrace) {
                return Err(self.unexpected("'{'"));
            }
            self.skip_balanced()?;
        } else if !self.match_token(&Token::Semicolon) {
            self.expect(&Token::LBrace)?;
            while !self.check(&Token::RBrace) {
                if self.is_at_end() {
                    return Err(ParseError::unexpected_eof(self.source.len(), "'}'"));
                }
                if self.match_token(&Token::Semicolon) {
                    continue;
                }
                members.push(self.parse_member()?);
            }
            self.expect(&Token::RBrace)?;
        }
        self.match_token(&Token::Semicolon);

        Ok(TypeDecl {
            kind,
            name,
            attributes,
            modifiers,
            type_parameters,
            base_types,
            constraint_clauses,
            members,
            span: TokenSpan::new(start, self.prev_end()),
        })
    }

    /// Parse a single member of a type body
    fn parse_member(&mut self) -> ParseResult<MemberDecl> {
        let start = self.current_pos();
        let attributes = self.parse_attribute_lists()?;
        let modifiers = self.parse_modifiers();

        if self.is_type_keyword() {
            return Ok(MemberDecl::Type(
                self.parse_type_decl(start, attributes, modifiers)?,
            ));
        }

        match self.peek() {
            Some((
                Token::Delegate | Token::Event | Token::Implicit | Token::Explicit | Token::Tilde,
                _,
            )) => return self.skip_other(start),
            None => return Err(ParseError::unexpected_eof(self.source.len(), "member")),
            _ => {}
        }

        let ty = self.parse_type()?;

        match self.peek() {
            // Constructors, operators and indexers
            Some((Token::LParen | Token::Operator | Token::This, _)) => {
                return self.skip_other(start);
            }
            Some((Token::Ident(_), _)) => {}
            _ => return Err(self.unexpected("member name")),
        }

        let name = self.expect_ident()?;
        // Explicit implementations (`void IBar.Run()`) are not reachable
        // through the declaring interface
        if self.check(&Token::Dot) {
            while self.match_token(&Token::Dot) {
                if self.check(&Token::This) {
                    break;
                }
                self.expect_ident()?;
            }
            return self.skip_other(start);
        }

        match self.peek() {
            Some((Token::LAngle | Token::LParen, _)) => Ok(MemberDecl::Method(
                self.parse_method_rest(start, attributes, modifiers, ty, name)?,
            )),
            Some((Token::LBrace, _)) => {
                let accessors = self.parse_accessor_list()?;
                if self.match_token(&Token::Equals) {
                    self.skip_until_semicolon()?;
                }
                Ok(MemberDecl::Property(PropertyDecl {
                    attributes,
                    modifiers,
                    ty,
                    name,
                    accessors,
                    span: TokenSpan::new(start, self.prev_end()),
                }))
            }
            Some((Token::FatArrow, arrow)) => {
                let arrow = to_span(arrow);
                self.skip_until_semicolon()?;
                Ok(MemberDecl::Property(PropertyDecl {
                    attributes,
                    modifiers,
                    ty,
                    name,
                    accessors: vec![Accessor {
                        kind: AccessorKind::Get,
                        modifiers: Vec::new(),
                        has_body: true,
                        span: arrow,
                    }],
                    span: TokenSpan::new(start, self.prev_end()),
                }))
            }
            // Fields
            Some((Token::Semicolon | Token::Equals | Token::Comma | Token::LBracket, _)) => {
                self.skip_other(start)
            }
            _ => Err(self.unexpected("'(', '{', '=>' or ';'")),
        }
    }

    /// Parse a method after its return type and name
    fn parse_method_rest(
        &mut self,
        start: usize,
        attributes: Vec<AttributeList>,
        modifiers: Vec<String>,
        return_type: String,
        name: String,
    ) -> ParseResult<MethodDecl> {
        let type_parameters = if self.check(&Token::LAngle) {
            self.parse_type_parameter_list()?
        } else {
            Vec::new()
        };

        let parameters = self.parse_parameter_list()?;
        let constraint_clauses = self.parse_constraint_clauses()?;

        let has_body = match self.peek() {
            Some((Token::Semicolon, _)) => {
                self.advance();
                false
            }
            Some((Token::LBrace, _)) => {
                self.skip_balanced()?;
                true
            }
            Some((Token::FatArrow, _)) => {
                self.skip_until_semicolon()?;
                true
            }
            _ => return Err(self.unexpected("';', '{' or '=>'")),
        };

        Ok(MethodDecl {
            attributes,
            modifiers,
            return_type,
            name,
            type_parameters,
            parameters,
            constraint_clauses,
            has_body,
            span: TokenSpan::new(start, self.prev_end()),
        })
    }

    /// Parse `{ get; set; }` and friends
    fn parse_accessor_list(&mut self) -> ParseResult<Vec<Accessor>> {
        self.expect(&Token::LBrace)?;
        let mut accessors = Vec::new();

        while !self.match_token(&Token::RBrace) {
            let start = self.current_pos();
            self.parse_attribute_lists()?;
            let modifiers = self.parse_modifiers();

            let kind = match self.advance() {
                Some((Token::Ident("get"), _)) => AccessorKind::Get,
                Some((Token::Ident("set"), _)) => AccessorKind::Set,
                Some((Token::Ident("init"), _)) => AccessorKind::Init,
                Some(_) => return Err(self.unexpected_previous("'get', 'set' or 'init'")),
                None => return Err(ParseError::unexpected_eof(self.source.len(), "'}'")),
            };

            let has_body = match self.peek() {
                Some((Token::Semicolon, _)) => {
                    self.advance();
                    false
                }
                Some((Token::LBrace, _)) => {
                    self.skip_balanced()?;
                    true
                }
                Some((Token::FatArrow, _)) => {
                    self.skip_until_semicolon()?;
                    true
                }
                _ => return Err(self.unexpected("';', '{' or '=>'")),
            };

            accessors.push(Accessor {
                kind,
                modifiers,
                has_body,
                span: TokenSpan::new(start, self.prev_end()),
            });
        }

        Ok(accessors)
    }

    fn parse_type_parameter_list(&mut self) -> ParseResult<Vec<TypeParameter>> {
        self.expect(&Token::LAngle)?;
        let mut parameters = Vec::new();

        loop {
            let start = self.current_pos();
            self.parse_attribute_lists()?;

            let variance = match self.peek() {
                Some((Token::ParamModifier(m @ ("in" | "out")), _)) => {
                    let m = m.to_string();
                    self.advance();
                    Some(m)
                }
                _ => None,
            };

            let name = self.expect_ident()?;
            parameters.push(TypeParameter {
                name,
                variance,
                span: TokenSpan::new(start, self.prev_end()),
            });

            if !self.match_token(&Token::Comma) {
                break;
            }
        }

        self.expect(&Token::RAngle)?;
        Ok(parameters)
    }

    fn parse_parameter_list(&mut self) -> ParseResult<Vec<ParameterDecl>> {
        self.expect(&Token::LParen)?;
        let mut parameters = Vec::new();

        if self.match_token(&Token::RParen) {
            return Ok(parameters);
        }

        loop {
            parameters.push(self.parse_parameter()?);
            if !self.match_token(&Token::Comma) {
                break;
            }
        }

        self.expect(&Token::RParen)?;
        Ok(parameters)
    }

    fn parse_parameter(&mut self) -> ParseResult<ParameterDecl> {
        let start = self.current_pos();
        let attributes = self.parse_attribute_lists()?;

        let mut modifiers = Vec::new();
        loop {
            match self.peek() {
                Some((Token::ParamModifier(m), _)) => {
                    modifiers.push(m.to_string());
                }
                Some((Token::This, _)) => modifiers.push("this".to_string()),
                Some((Token::Modifier("readonly"), _)) => modifiers.push("readonly".to_string()),
                Some((Token::Ident("scoped"), _))
                    if matches!(
                        self.peek_ahead(1),
                        Some((Token::Ident(_) | Token::ParamModifier(_), _))
                    ) && !matches!(
                        self.peek_ahead(2),
                        Some((Token::Comma | Token::RParen | Token::Equals, _))
                    ) =>
                {
                    modifiers.push("scoped".to_string());
                }
                _ => break,
            }
            self.advance();
        }

        let ty = self.parse_type()?;
        let name = self.expect_ident()?;

        let default_value = if self.match_token(&Token::Equals) {
            let value_start = self.current_pos();
            self.skip_until_list_separator()?;
            Some(self.source[value_start..self.prev_end()].to_string())
        } else {
            None
        };

        Ok(ParameterDecl {
            attributes,
            modifiers,
            ty,
            name,
            default_value,
            span: TokenSpan::new(start, self.prev_end()),
        })
    }

    fn parse_constraint_clauses(&mut self) -> ParseResult<Vec<ConstraintClause>> {
        let mut clauses = Vec::new();

        while self.check_ident("where") {
            let start = self.current_pos();
            self.advance();
            let type_parameter = self.expect_ident()?;
            self.expect(&Token::Colon)?;

            let mut constraints = Vec::new();
            loop {
                constraints.push(self.parse_constraint()?);
                if !self.match_token(&Token::Comma) {
                    break;
                }
            }

            clauses.push(ConstraintClause {
                type_parameter,
                constraints,
                span: TokenSpan::new(start, self.prev_end()),
            });
        }

        Ok(clauses)
    }

    /// One constraint as written: `class`, `new()`, `IFoo<T>`, `notnull`, ...
    fn parse_constraint(&mut self) -> ParseResult<String> {
        let start = self.current_pos();
        let mut depth = 0usize;

        loop {
            match self.peek() {
                None => return Err(ParseError::unexpected_eof(self.source.len(), "'{' or ';'")),
                Some((Token::LAngle | Token::LParen | Token::LBracket, _)) => depth += 1,
                Some((Token::RAngle | Token::RParen | Token::RBracket, _)) if depth > 0 => {
                    depth -= 1
                }
                Some((Token::Comma | Token::LBrace | Token::Semicolon | Token::FatArrow, _))
                    if depth == 0 =>
                {
                    break
                }
                Some((Token::Ident("where"), _)) if depth == 0 => break,
                Some((Token::RAngle | Token::RParen | Token::RBracket | Token::RBrace, _)) => {
                    return Err(self.unexpected("constraint"));
                }
                _ => {}
            }
            self.advance();
        }

        if self.current_pos() == start {
            return Err(self.unexpected("constraint"));
        }

        Ok(self.source[start..self.prev_end()].to_string())
    }

    /// Parse zero or more `[...]` attribute sections
    fn parse_attribute_lists(&mut self) -> ParseResult<Vec<AttributeList>> {
        let mut lists = Vec::new();

        while self.check(&Token::LBracket) {
            let start = self.current_pos();
            self.advance();

            let target = match (self.peek(), self.peek_ahead(1)) {
                (Some((Token::Ident(target), _)), Some((Token::Colon, _))) => Some(target.to_string()),
                (Some((Token::Event, _)), Some((Token::Colon, _))) => Some("event".to_string()),
                _ => None,
            };
            if target.is_some() {
                self.advance();
                self.advance();
            }

            let mut attributes = Vec::new();
            loop {
                let attr_start = self.current_pos();
                let name = self.parse_type()?;
                let arguments = if self.check(&Token::LParen) {
                    let args_start = self.current_pos();
                    self.skip_balanced()?;
                    Some(self.source[args_start..self.prev_end()].to_string())
                } else {
                    None
                };

                attributes.push(Attribute {
                    name,
                    arguments,
                    span: TokenSpan::new(attr_start, self.prev_end()),
                });

                if !self.match_token(&Token::Comma) || self.check(&Token::RBracket) {
                    break;
                }
            }

            self.expect(&Token::RBracket)?;
            lists.push(AttributeList {
                target,
                attributes,
                span: TokenSpan::new(start, self.prev_end()),
            });
        }

        Ok(lists)
    }

    /// Collect declaration modifiers in source order
    fn parse_modifiers(&mut self) -> Vec<String> {
        let mut modifiers = Vec::new();

        loop {
            match self.peek() {
                Some((Token::Modifier(m), _)) => modifiers.push(m.to_string()),
                Some((Token::New, _)) => modifiers.push("new".to_string()),
                Some((Token::Ident(word), _))
                    if CONTEXTUAL_MODIFIERS.contains(word)
                        && matches!(
                            self.peek_ahead(1),
                            Some((
                                Token::Ident(_)
                                    | Token::Modifier(_)
                                    | Token::ParamModifier("ref")
                                    | Token::Class
                                    | Token::Struct
                                    | Token::Interface
                                    | Token::Enum
                                    | Token::Delegate,
                                _
                            ))
                        ) =>
                {
                    modifiers.push(word.to_string())
                }
                _ => break,
            }
            self.advance();
        }

        modifiers
    }

    /// Parse a type and return it exactly as written
    fn parse_type(&mut self) -> ParseResult<String> {
        let start = self.current_pos();

        if self.match_token(&Token::ParamModifier("ref")) {
            self.match_token(&Token::Modifier("readonly"));
        }

        if self.check(&Token::LParen) {
            self.parse_tuple_type()?;
        } else {
            self.parse_named_type()?;
        }

        loop {
            match self.peek() {
                Some((Token::Question | Token::Star, _)) => {
                    self.advance();
                }
                Some((Token::LBracket, _))
                    if matches!(
                        self.peek_ahead(1),
                        Some((Token::RBracket | Token::Comma, _))
                    ) =>
                {
                    self.advance();
                    while self.match_token(&Token::Comma) {}
                    self.expect(&Token::RBracket)?;
                }
                _ => break,
            }
        }

        Ok(self.source[start..self.prev_end()].to_string())
    }

    fn parse_named_type(&mut self) -> ParseResult<()> {
        self.expect_ident()?;
        if self.match_token(&Token::DoubleColon) {
            self.expect_ident()?;
        }
        self.parse_type_argument_list()?;

        while self.check(&Token::Dot)
            && matches!(self.peek_ahead(1), Some((Token::Ident(_), _)))
        {
            self.advance();
            self.expect_ident()?;
            self.parse_type_argument_list()?;
        }

        Ok(())
    }

    fn parse_type_argument_list(&mut self) -> ParseResult<()> {
        if !self.match_token(&Token::LAngle) {
            return Ok(());
        }

        // Unbound generic names such as `Dictionary<,>`
        if self.check(&Token::Comma) || self.check(&Token::RAngle) {
            while self.match_token(&Token::Comma) {}
            self.expect(&Token::RAngle)?;
            return Ok(());
        }

        loop {
            self.parse_type()?;
            if !self.match_token(&Token::Comma) {
                break;
            }
        }
        self.expect(&Token::RAngle)?;
        Ok(())
    }

    fn parse_tuple_type(&mut self) -> ParseResult<()> {
        self.expect(&Token::LParen)?;
        loop {
            self.parse_type()?;
            if let Some((Token::Ident(_), _)) = self.peek() {
                self.advance();
            }
            if !self.match_token(&Token::Comma) {
                break;
            }
        }
        self.expect(&Token::RParen)?;
        Ok(())
    }

    fn parse_dotted_name(&mut self) -> ParseResult<String> {
        let start = self.current_pos();
        self.expect_ident()?;
        if self.match_token(&Token::DoubleColon) {
            self.expect_ident()?;
        }
        while self.match_token(&Token::Dot) {
            self.expect_ident()?;
        }
        Ok(self.source[start..self.prev_end()].to_string())
    }

    // Skipping

    fn skip_other(&mut self, start: usize) -> ParseResult<MemberDecl> {
        self.skip_member()?;
        Ok(MemberDecl::Other {
            span: TokenSpan::new(start, self.prev_end()),
        })
    }

    /// Skip the remainder of a member the tree does not model
    fn skip_member(&mut self) -> ParseResult<()> {
        loop {
            match self.peek() {
                None => return Err(ParseError::unexpected_eof(self.source.len(), "';' or '}'")),
                Some((Token::Semicolon, _)) => {
                    self.advance();
                    return Ok(());
                }
                Some((Token::LBrace, _)) => {
                    self.skip_balanced()?;
                    // `{ get; } = value;` and `= { ... };` keep going to the semicolon
                    if self.check(&Token::Equals) {
                        continue;
                    }
                    self.match_token(&Token::Semicolon);
                    return Ok(());
                }
                Some((Token::LParen | Token::LBracket, _)) => self.skip_balanced()?,
                Some((Token::RBrace | Token::RParen | Token::RBracket, _)) => {
                    return Err(self.unexpected("';'"));
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Skip an expression up to and including the terminating semicolon
    fn skip_until_semicolon(&mut self) -> ParseResult<()> {
        loop {
            match self.peek() {
                None => return Err(ParseError::unexpected_eof(self.source.len(), "';'")),
                Some((Token::Semicolon, _)) => {
                    self.advance();
                    return Ok(());
                }
                Some((Token::LBrace | Token::LParen | Token::LBracket, _)) => self.skip_balanced()?,
                Some((Token::RBrace | Token::RParen | Token::RBracket, _)) => {
                    return Err(self.unexpected("';'"));
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Skip an expression up to, not including, a `,` or `)` at the current depth
    fn skip_until_list_separator(&mut self) -> ParseResult<()> {
        let start = self.pos;
        loop {
            match self.peek() {
                None => return Err(ParseError::unexpected_eof(self.source.len(), "')'")),
                Some((Token::Comma | Token::RParen, _)) => break,
                Some((Token::LBrace | Token::LParen | Token::LBracket, _)) => self.skip_balanced()?,
                Some((Token::RBrace | Token::RBracket | Token::Semicolon, _)) => {
                    return Err(self.unexpected("')'"));
                }
                _ => {
                    self.advance();
                }
            }
        }

        if self.pos == start {
            let equals_end = self.prev_end();
            return Err(ParseError::invalid_syntax(
                TokenSpan::new(equals_end.saturating_sub(1), equals_end),
                "missing default value after '='",
            ));
        }
        Ok(())
    }

    /// Skip a bracketed region starting at the current opening token
    fn skip_balanced(&mut self) -> ParseResult<()> {
        let mut closers: Vec<Token<'src>> = Vec::new();

        loop {
            let Some((token, span)) = self.peek() else {
                let expected = closers
                    .last()
                    .map(|closer| closer.to_string())
                    .unwrap_or_else(|| "'{'".to_string());
                return Err(ParseError::unexpected_eof(self.source.len(), expected));
            };

            match token {
                Token::LBrace => closers.push(Token::RBrace),
                Token::LParen => closers.push(Token::RParen),
                Token::LBracket => closers.push(Token::RBracket),
                Token::RBrace | Token::RParen | Token::RBracket => match closers.pop() {
                    Some(expected) if expected == *token => {}
                    Some(expected) => {
                        return Err(ParseError::unexpected_token(
                            to_span(span),
                            expected.to_string(),
                            token.to_string(),
                        ));
                    }
                    None => return Err(self.unexpected("opening bracket")),
                },
                _ if closers.is_empty() => return Err(self.unexpected("opening bracket")),
                _ => {}
            }

            self.advance();
            if closers.is_empty() {
                return Ok(());
            }
        }
    }

    // Token helpers

    fn peek(&self) -> Option<&Spanned<'src>> {
        self.tokens.get(self.pos)
    }

    fn peek_ahead(&self, n: usize) -> Option<&Spanned<'src>> {
        self.tokens.get(self.pos + n)
    }

    fn advance(&mut self) -> Option<&Spanned<'src>> {
        if self.is_at_end() {
            return None;
        }
        self.pos += 1;
        self.tokens.get(self.pos - 1)
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn check(&self, token: &Token) -> bool {
        matches!(self.peek(), Some((t, _)) if t == token)
    }

    fn check_ident(&self, word: &str) -> bool {
        matches!(self.peek(), Some((Token::Ident(ident), _)) if *ident == word)
    }

    fn match_token(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_ident(&mut self, word: &str) -> bool {
        if self.check_ident(word) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &Token) -> ParseResult<()> {
        if self.match_token(token) {
            Ok(())
        } else {
            Err(self.unexpected(token.to_string()))
        }
    }

    fn expect_ident(&mut self) -> ParseResult<String> {
        match self.peek() {
            Some((Token::Ident(ident), _)) => {
                let ident = ident.to_string();
                self.advance();
                Ok(ident)
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    /// Byte offset where the current token starts, or the end of input
    fn current_pos(&self) -> usize {
        self.peek()
            .map(|(_, span)| span.start)
            .unwrap_or(self.source.len())
    }

    /// Byte offset where the previously consumed token ends
    fn prev_end(&self) -> usize {
        if self.pos == 0 {
            return 0;
        }
        self.tokens
            .get(self.pos - 1)
            .map(|(_, span)| span.end)
            .unwrap_or(self.source.len())
    }

    fn unexpected(&self, expected: impl Into<String>) -> ParseError {
        match self.peek() {
            Some((token, span)) => {
                ParseError::unexpected_token(to_span(span), expected, token.to_string())
            }
            None => ParseError::unexpected_eof(self.source.len(), expected),
        }
    }

    fn unexpected_previous(&self, expected: impl Into<String>) -> ParseError {
        match self.pos.checked_sub(1).and_then(|index| self.tokens.get(index)) {
            Some((token, span)) => {
                ParseError::unexpected_token(to_span(span), expected, token.to_string())
            }
            None => ParseError::unexpected_eof(self.source.len(), expected),
        }
    }
}

fn to_span(range: &std::ops::Range<usize>) -> TokenSpan {
    TokenSpan::new(range.start, range.end)
}

fn is_global_attribute_section(lists: &[AttributeList]) -> bool {
    !lists.is_empty()
        && lists.iter().all(|list| {
            matches!(list.target.as_deref(), Some("assembly") | Some("module"))
        })
}

/// Parse C# source text into a declaration tree
pub fn parse(source: &str) -> ParseResult<CompilationUnit> {
    let mut parser = Parser::new(source)?;
    parser.parse_compilation_unit()
}
