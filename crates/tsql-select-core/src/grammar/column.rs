//! Column grammar.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::{identifier_of, parse_alias, parse_segments, parse_whole, starts_subselect, Grammar};
use crate::ast::{
    AggregateFunction, AggregationColumn, AliasColumn, ArithmeticColumn, ArithmeticOperation,
    ArithmeticOperator, BracketColumn, CaseBranch, CaseColumn, CastColumn, ConvertColumn,
    FunctionColumn, Identifier, IifColumn, Literal, LiteralColumn, NegatedColumn, NullColumn,
    OverColumn, ParseColumn, PrimitiveColumn, StarColumn, SubselectColumn, VariableColumn,
};
use crate::lexer::{Keyword, Token, TokenKind};
use crate::parser::{ErrorKind, ParseContext, ParseError, TokenList};
use crate::tree::NodeId;

const fn arithmetic_operator(token: &Token) -> Option<ArithmeticOperator> {
    match token.kind {
        TokenKind::Plus => Some(ArithmeticOperator::Add),
        TokenKind::Minus => Some(ArithmeticOperator::Subtract),
        TokenKind::Star => Some(ArithmeticOperator::Multiply),
        TokenKind::Slash => Some(ArithmeticOperator::Divide),
        TokenKind::Percent => Some(ArithmeticOperator::Modulo),
        TokenKind::Concat => Some(ArithmeticOperator::Concat),
        _ => None,
    }
}

impl Grammar {
    /// Parses a select-list entry: a column with an optional alias.
    ///
    /// # Errors
    ///
    /// Returns a syntax error if no column starts here.
    pub fn parse_select_column(
        &mut self,
        ctx: &mut ParseContext<'_>,
    ) -> Result<NodeId, ParseError> {
        let column = self.parse_column(ctx)?;
        match parse_alias(ctx, true)? {
            Some(alias) => Ok(self.add(AliasColumn {
                column: Some(column),
                alias,
            })),
            None => Ok(column),
        }
    }

    /// Parses a column: a primary column, a flat arithmetic run, and an
    /// optional `OVER (...)` suffix.
    ///
    /// # Errors
    ///
    /// Returns a syntax error if no column starts here.
    pub fn parse_column(&mut self, ctx: &mut ParseContext<'_>) -> Result<NodeId, ParseError> {
        let left = self.parse_primary_column(ctx)?;

        let mut operations = Vec::new();
        while let Some(operator) = ctx.tokens.peek(0).and_then(arithmetic_operator) {
            ctx.tokens.advance(1);
            let operand = self.parse_primary_column(ctx)?;
            operations.push(Some(self.add(ArithmeticOperation {
                operator,
                operand: Some(operand),
            })));
        }
        let column = if operations.is_empty() {
            left
        } else {
            self.add(ArithmeticColumn {
                left: Some(left),
                operations,
            })
        };

        if ctx.check_keyword(Keyword::Over) {
            let window = self.parse_over(ctx)?;
            return Ok(self.add(OverColumn {
                column: Some(column),
                window: Some(window),
            }));
        }
        Ok(column)
    }

    /// Parses one operand of an arithmetic run.
    ///
    /// # Errors
    ///
    /// Returns a syntax error if the current token cannot start a column.
    pub fn parse_primary_column(
        &mut self,
        ctx: &mut ParseContext<'_>,
    ) -> Result<NodeId, ParseError> {
        if let Some(hook) = self.hooks.column {
            if let Some(column) = hook(self, ctx)? {
                return Ok(column);
            }
        }

        let Some(token) = ctx.tokens.peek(0) else {
            return Err(ctx.error_here("a column"));
        };

        match &token.kind {
            TokenKind::LeftBrace => self.parse_datetime_escape(ctx),
            TokenKind::Minus => {
                ctx.tokens.advance(1);
                self.nested(ctx, Self::parse_negative)
            }
            TokenKind::Integer(value) => {
                ctx.tokens.advance(1);
                Ok(self.literal(Literal::Integer(*value)))
            }
            TokenKind::Decimal(value) => {
                ctx.tokens.advance(1);
                Ok(self.literal(Literal::Decimal(value.clone())))
            }
            TokenKind::String(value) => {
                ctx.tokens.advance(1);
                Ok(self.literal(Literal::String(value.clone())))
            }
            TokenKind::NationalString(value) => {
                ctx.tokens.advance(1);
                Ok(self.literal(Literal::NationalString(value.clone())))
            }
            TokenKind::Variable(name) => {
                ctx.tokens.advance(1);
                Ok(self.add(VariableColumn { name: name.clone() }))
            }
            TokenKind::Keyword(Keyword::Case) => self.nested(ctx, Self::parse_case),
            TokenKind::Keyword(Keyword::Null) => {
                ctx.tokens.advance(1);
                Ok(self.add(NullColumn))
            }
            TokenKind::Keyword(keyword)
                if keyword.is_function()
                    && ctx.tokens.peek(1).is_some_and(|t| t.kind == TokenKind::LeftParen) =>
            {
                ctx.tokens.advance(1);
                self.parse_function_call(ctx, vec![Identifier::new(token.text.as_str())])
            }
            TokenKind::LeftParen => self.parse_bracket_column(ctx),
            TokenKind::Star => {
                ctx.tokens.advance(1);
                Ok(self.add(StarColumn { table: None }))
            }
            _ => match identifier_of(token) {
                Some(name) => {
                    ctx.tokens.advance(1);
                    self.parse_identifier_column(ctx, token, name)
                }
                None => Err(ctx.error_here("a column")),
            },
        }
    }

    fn literal(&mut self, value: Literal) -> NodeId {
        self.add(LiteralColumn { value })
    }

    /// After a `-`: a negative number literal, or a negated column.
    fn parse_negative(&mut self, ctx: &mut ParseContext<'_>) -> Result<NodeId, ParseError> {
        match ctx.tokens.peek(0).map(|token| &token.kind) {
            Some(TokenKind::Integer(value)) => {
                ctx.tokens.advance(1);
                Ok(self.literal(Literal::Integer(-value)))
            }
            Some(TokenKind::Decimal(value)) => {
                ctx.tokens.advance(1);
                Ok(self.literal(Literal::Decimal(format!("-{value}"))))
            }
            _ => {
                let operand = self.parse_primary_column(ctx)?;
                Ok(self.add(NegatedColumn {
                    operand: Some(operand),
                }))
            }
        }
    }

    /// `{d '...'}`, `{t '...'}` or `{ts '...'}`.
    fn parse_datetime_escape(&mut self, ctx: &mut ParseContext<'_>) -> Result<NodeId, ParseError> {
        let open = ctx.expect(&TokenKind::LeftBrace, "'{'")?;

        let tag = match ctx.tokens.take() {
            Some(Token {
                kind: TokenKind::Identifier(tag),
                ..
            }) => tag.to_ascii_lowercase(),
            _ => {
                return Err(ctx.error_at(
                    open,
                    ErrorKind::Syntax,
                    "date/time escape expects d, t or ts",
                ));
            }
        };
        let Some(literal) = ctx.tokens.take() else {
            return Err(ctx.error_here("a quoted date/time value"));
        };
        let TokenKind::String(text) = &literal.kind else {
            return Err(ctx.error_at(
                literal,
                ErrorKind::Syntax,
                format!("expected a quoted date/time value, found '{}'", literal.text),
            ));
        };

        let value = match tag.as_str() {
            "d" => NaiveDate::parse_from_str(text, "%Y-%m-%d").map(Literal::Date),
            "t" => NaiveTime::parse_from_str(text, "%H:%M:%S%.f").map(Literal::Time),
            "ts" => {
                NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f").map(Literal::Timestamp)
            }
            _ => {
                return Err(ctx.error_at(
                    open,
                    ErrorKind::Syntax,
                    format!("unknown date/time escape '{tag}'"),
                ));
            }
        }
        .map_err(|e| {
            ctx.error_at(
                literal,
                ErrorKind::Syntax,
                format!("invalid {tag} literal '{text}': {e}"),
            )
        })?;

        ctx.expect(&TokenKind::RightBrace, "'}'")?;
        Ok(self.literal(value))
    }

    /// A name path and whatever it turns out to be: a special form, an
    /// aggregation, a function call, `t.*`, or a column reference.
    fn parse_identifier_column(
        &mut self,
        ctx: &mut ParseContext<'_>,
        first: &Token,
        name: Identifier,
    ) -> Result<NodeId, ParseError> {
        let mut parts = vec![name];
        while ctx.check(&TokenKind::Dot) {
            match ctx.tokens.peek(1) {
                Some(token) if token.kind == TokenKind::Star => {
                    ctx.tokens.advance(2);
                    if parts.len() > 1 {
                        return Err(too_many_parts(ctx, first, &parts));
                    }
                    return Ok(self.add(StarColumn { table: parts.pop() }));
                }
                Some(token) => {
                    let Some(part) = identifier_of(token) else {
                        return Err(ctx.error_at(
                            token,
                            ErrorKind::Syntax,
                            format!("expected a name after '.', found '{}'", token.text),
                        ));
                    };
                    ctx.tokens.advance(2);
                    parts.push(part);
                }
                None => {
                    ctx.tokens.advance(1);
                    return Err(ctx.error_here("a name after '.'"));
                }
            }
        }

        if ctx.check(&TokenKind::LeftParen) {
            if let [single] = parts.as_slice() {
                if !single.delimited {
                    let upper = single.name.to_ascii_uppercase();
                    match upper.as_str() {
                        "CAST" | "TRY_CAST" => return self.parse_cast(ctx, &upper),
                        "CONVERT" | "TRY_CONVERT" => return self.parse_convert(ctx, &upper),
                        "PARSE" | "TRY_PARSE" => return self.parse_parse(ctx, &upper),
                        "IIF" => return self.parse_iif(ctx),
                        _ => {}
                    }
                    if let Some(function) = AggregateFunction::from_name(&upper) {
                        return self.parse_aggregation(ctx, first, function);
                    }
                }
            }
            if parts.len() > 2 {
                return Err(too_many_parts(ctx, first, &parts));
            }
            return self.parse_function_call(ctx, parts);
        }

        match parts.as_slice() {
            [name] => Ok(self.add(PrimitiveColumn {
                table: None,
                name: name.clone(),
            })),
            [table, name] => Ok(self.add(PrimitiveColumn {
                table: Some(table.clone()),
                name: name.clone(),
            })),
            _ => Err(too_many_parts(ctx, first, &parts)),
        }
    }

    fn parse_function_call(
        &mut self,
        ctx: &mut ParseContext<'_>,
        name: Vec<Identifier>,
    ) -> Result<NodeId, ParseError> {
        let (_, mut inner) = ctx.take_bracketed()?;
        let arguments = parse_segments(self, &mut inner, Self::parse_column)?;
        Ok(self.add(FunctionColumn { name, arguments }))
    }

    fn parse_aggregation(
        &mut self,
        ctx: &mut ParseContext<'_>,
        name: &Token,
        function: AggregateFunction,
    ) -> Result<NodeId, ParseError> {
        let (_, mut inner) = ctx.take_bracketed()?;
        let distinct = inner.eat_keyword(Keyword::Distinct);
        if !distinct {
            inner.eat_keyword(Keyword::All);
        }
        if !inner.tokens.has_more() {
            return Err(ctx.error_at(
                name,
                ErrorKind::Syntax,
                format!("{} requires at least one column", function.as_str()),
            ));
        }
        let arguments = parse_segments(self, &mut inner, Self::parse_column)?;
        Ok(self.add(AggregationColumn {
            function,
            distinct,
            arguments,
        }))
    }

    /// `CAST(value AS type)`: the type is everything after the last
    /// top-level `AS`.
    fn parse_cast(
        &mut self,
        ctx: &mut ParseContext<'_>,
        label: &str,
    ) -> Result<NodeId, ParseError> {
        let (open, inner) = ctx.take_bracketed()?;
        let Some(split) = inner.tokens.last_top_level_keyword(Keyword::As) else {
            return Err(ctx.error_at(
                open,
                ErrorKind::Syntax,
                format!("{label} requires AS followed by a type"),
            ));
        };
        let (value, mut type_tokens) = inner.tokens.split_at(split);
        type_tokens.advance(1);
        let type_name = type_tokens.text();
        if type_name.is_empty() {
            return Err(ctx.error_at(
                open,
                ErrorKind::Syntax,
                format!("{label} requires a type after AS"),
            ));
        }

        let value = self.single_column(&inner, value, open, label)?;
        Ok(self.add(CastColumn {
            value: Some(value),
            type_name,
            try_cast: label.starts_with("TRY_"),
        }))
    }

    /// `CONVERT(type, value [, style])`.
    fn parse_convert(
        &mut self,
        ctx: &mut ParseContext<'_>,
        label: &str,
    ) -> Result<NodeId, ParseError> {
        let (open, mut inner) = ctx.take_bracketed()?;
        let type_name = inner.tokens.parse_text_until_comma();
        if type_name.is_empty() {
            return Err(ctx.error_at(open, ErrorKind::Syntax, format!("{label} requires a type")));
        }
        let arguments = parse_segments(self, &mut inner, Self::parse_column)?;
        let (value, style) = match arguments.as_slice() {
            [value] => (*value, None),
            [value, style] => (*value, *style),
            _ => {
                return Err(ctx.error_at(
                    open,
                    ErrorKind::Syntax,
                    format!("{label} expects one or two columns after the type"),
                ));
            }
        };
        Ok(self.add(ConvertColumn {
            type_name,
            value,
            style,
            try_convert: label.starts_with("TRY_"),
        }))
    }

    /// `PARSE(value AS type [USING culture])`.
    fn parse_parse(
        &mut self,
        ctx: &mut ParseContext<'_>,
        label: &str,
    ) -> Result<NodeId, ParseError> {
        let (open, inner) = ctx.take_bracketed()?;
        let Some(split) = inner.tokens.last_top_level_keyword(Keyword::As) else {
            return Err(ctx.error_at(
                open,
                ErrorKind::Syntax,
                format!("{label} requires AS followed by a type"),
            ));
        };
        let (value, mut rest) = inner.tokens.split_at(split);
        rest.advance(1);
        let (type_tokens, culture) = match rest.first_top_level_keyword(Keyword::Using) {
            Some(using) => {
                let (type_tokens, mut culture) = rest.split_at(using);
                culture.advance(1);
                (type_tokens, Some(culture))
            }
            None => (rest, None),
        };
        let type_name = type_tokens.text();
        if type_name.is_empty() {
            return Err(ctx.error_at(
                open,
                ErrorKind::Syntax,
                format!("{label} requires a type after AS"),
            ));
        }

        let value = self.single_column(&inner, value, open, label)?;
        let culture = match culture {
            Some(tokens) => Some(parse_whole(self, &inner, tokens, Self::parse_column)?),
            None => None,
        };
        Ok(self.add(ParseColumn {
            value: Some(value),
            type_name,
            culture,
            try_parse: label.starts_with("TRY_"),
        }))
    }

    /// `IIF(condition, then, else)`.
    fn parse_iif(&mut self, ctx: &mut ParseContext<'_>) -> Result<NodeId, ParseError> {
        let (open, mut inner) = ctx.take_bracketed()?;
        let segments = inner.tokens.split_commas();
        let [condition, then_value, else_value] = segments.as_slice() else {
            return Err(ctx.error_at(
                open,
                ErrorKind::Syntax,
                "IIF expects exactly three arguments",
            ));
        };
        let condition = parse_whole(self, &inner, *condition, Self::parse_condition)
            .map_err(ParseError::committed)?;
        let then_value = parse_whole(self, &inner, *then_value, Self::parse_column)?;
        let else_value = parse_whole(self, &inner, *else_value, Self::parse_column)?;
        Ok(self.add(IifColumn {
            condition: Some(condition),
            then_value: Some(then_value),
            else_value: Some(else_value),
        }))
    }

    /// Parses `tokens` as exactly one column.
    fn single_column<'a>(
        &mut self,
        inner: &ParseContext<'a>,
        tokens: TokenList<'a>,
        open: &Token,
        label: &str,
    ) -> Result<NodeId, ParseError> {
        let mut segment = inner.segment(tokens);
        let columns = parse_segments(self, &mut segment, Self::parse_column)?;
        match columns.as_slice() {
            [Some(column)] => Ok(*column),
            _ => Err(inner.error_at(
                open,
                ErrorKind::Syntax,
                format!("{label} expects exactly one column"),
            )),
        }
    }

    /// `( column )` or `( SELECT ... )`.
    ///
    /// # Errors
    ///
    /// Empty brackets are an error reported at the opening bracket.
    pub fn parse_bracket_column(
        &mut self,
        ctx: &mut ParseContext<'_>,
    ) -> Result<NodeId, ParseError> {
        let (open, mut inner) = ctx.take_bracketed()?;
        if !inner.tokens.has_more() {
            return Err(ctx.error_at(open, ErrorKind::Syntax, "empty brackets"));
        }
        if starts_subselect(&inner) {
            let select = self.parse_select_statement(&mut inner)?;
            inner.expect_end()?;
            return Ok(self.add(SubselectColumn {
                select: Some(select),
            }));
        }
        let column = self.parse_column(&mut inner)?;
        inner.expect_end()?;
        Ok(self.add(BracketColumn {
            inner: Some(column),
        }))
    }

    /// `CASE [operand] WHEN .. THEN .. [ELSE ..] END`.
    fn parse_case(&mut self, ctx: &mut ParseContext<'_>) -> Result<NodeId, ParseError> {
        ctx.expect_keyword(Keyword::Case)?;
        let operand = if ctx.check_keyword(Keyword::When) {
            None
        } else {
            Some(self.parse_column(ctx)?)
        };

        let mut branches = Vec::new();
        while ctx.eat_keyword(Keyword::When) {
            let (condition, value) = if operand.is_some() {
                (None, Some(self.parse_column(ctx)?))
            } else {
                let condition = self.parse_condition(ctx).map_err(ParseError::committed)?;
                (Some(condition), None)
            };
            ctx.expect_keyword(Keyword::Then)?;
            let result = self.parse_column(ctx)?;
            branches.push(Some(self.add(CaseBranch {
                condition,
                value,
                result: Some(result),
            })));
        }
        if branches.is_empty() {
            return Err(ctx.error_here("WHEN"));
        }

        let otherwise = if ctx.eat_keyword(Keyword::Else) {
            Some(self.parse_column(ctx)?)
        } else {
            None
        };
        ctx.expect_keyword(Keyword::End)?;
        Ok(self.add(CaseColumn {
            operand,
            branches,
            otherwise,
        }))
    }
}

fn too_many_parts(ctx: &ParseContext<'_>, first: &Token, parts: &[Identifier]) -> ParseError {
    ctx.error_at(
        first,
        ErrorKind::Syntax,
        format!(
            "column name '{}' has more than two parts",
            Identifier::join(parts)
        ),
    )
}
