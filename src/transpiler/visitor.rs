//! Phase-driven compiler from query expressions to clause fragments.
//!
//! The active [`ParsePhase`] travels down the recursion in a [`Scope`] value,
//! so a nested visit can never leak its phase into a sibling.

use crate::ast::eval::evaluate;
use crate::ast::{BinaryOp, Expr, Method, UnaryOp, Value};
use crate::error::{CqlError, CqlResult};
use crate::mapping::{PocoColumn, PocoData};
use crate::transpiler::ParsePhase;
use crate::transpiler::escape::escape_identifier;
use crate::transpiler::params::{Clause, ParamMode};

/// Statement being compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Select,
    Count,
    Update,
    Delete,
}

/// How a SET assignment combines its value with the column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionKind {
    Assign,
    /// Counter `+`
    Increment,
    /// Counter `-`
    Decrement,
    Append,
    Prepend,
    /// Remove elements from a collection.
    Remove,
}

/// One SET assignment of an UPDATE.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    /// Escaped column name.
    pub column: String,
    pub value: Value,
    pub kind: ProjectionKind,
}

impl Projection {
    /// Render the assignment around the text standing for its value.
    pub fn render(&self, value: &str) -> String {
        let column = &self.column;
        match self.kind {
            ProjectionKind::Assign => format!("{} = {}", column, value),
            ProjectionKind::Increment | ProjectionKind::Append => {
                format!("{} = {} + {}", column, column, value)
            }
            ProjectionKind::Decrement | ProjectionKind::Remove => {
                format!("{} = {} - {}", column, column, value)
            }
            ProjectionKind::Prepend => format!("{} = {} + {}", column, value, column),
        }
    }
}

/// Clause fragments collected from one expression.
#[derive(Debug, Clone)]
pub struct QueryParts {
    pub kind: QueryKind,
    pub mode: ParamMode,
    /// Rendered table name.
    pub table: String,
    pub where_clause: Clause,
    /// IF conditions of a conditional UPDATE or DELETE.
    pub update_if: Clause,
    pub select_fields: Vec<String>,
    /// Column and whether it sorts ascending.
    pub order_by: Vec<(String, bool)>,
    pub group_by: Vec<String>,
    pub limit: Option<i32>,
    pub allow_filtering: bool,
    pub projections: Vec<Projection>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConditionTarget {
    Where,
    UpdateIf,
}

#[derive(Debug, Clone, Copy)]
struct Scope<'e> {
    phase: ParsePhase,
    target: ConditionTarget,
    /// Comparison enclosing a `CompareTo` call.
    tag: Option<BinaryOp>,
    /// Member a projection value is assigned to.
    binding: Option<&'e str>,
}

impl<'e> Scope<'e> {
    fn root() -> Self {
        Self {
            phase: ParsePhase::None,
            target: ConditionTarget::Where,
            tag: None,
            binding: None,
        }
    }

    fn phase(self, phase: ParsePhase) -> Self {
        Self {
            phase,
            tag: None,
            binding: None,
            ..self
        }
    }

    fn condition(self, target: ConditionTarget) -> Self {
        Self {
            target,
            ..self.phase(ParsePhase::Condition)
        }
    }

    fn tagged(self, op: BinaryOp) -> Self {
        Self {
            tag: Some(op),
            ..self
        }
    }

    fn untagged(self) -> Self {
        Self { tag: None, ..self }
    }

    fn bound(self, member: &'e str) -> Self {
        Self {
            binding: Some(member),
            ..self
        }
    }
}

/// Compiles one query expression against the mapping of its entity type.
pub struct CqlExpressionVisitor<'a> {
    poco: &'a PocoData,
    parts: QueryParts,
}

impl<'a> CqlExpressionVisitor<'a> {
    pub fn new(
        poco: &'a PocoData,
        table: impl Into<String>,
        kind: QueryKind,
        mode: ParamMode,
    ) -> Self {
        Self {
            poco,
            parts: QueryParts {
                kind,
                mode,
                table: table.into(),
                where_clause: Clause::new(mode),
                update_if: Clause::new(mode),
                select_fields: Vec::new(),
                order_by: Vec::new(),
                group_by: Vec::new(),
                limit: None,
                allow_filtering: false,
                projections: Vec::new(),
            },
        }
    }

    /// Visit the whole expression and hand back what it produced.
    pub fn compile(mut self, expr: &Expr) -> CqlResult<QueryParts> {
        self.visit(expr, Scope::root())?;
        Ok(self.parts)
    }

    fn visit<'e>(&mut self, expr: &'e Expr, scope: Scope<'e>) -> CqlResult<()> {
        match expr {
            Expr::Root => Ok(()),
            Expr::Call { method, args } => self.visit_call(method, args, expr, scope),
            Expr::Lambda(body) => {
                let scope = if scope.phase == ParsePhase::Select {
                    scope.phase(ParsePhase::SelectBinding)
                } else {
                    scope
                };
                self.visit(body, scope)
            }
            Expr::Binary { op, left, right } => self.visit_binary(*op, left, right, expr, scope),
            Expr::Unary { op, operand } => self.visit_unary(*op, operand, expr, scope),
            Expr::Member { member, .. } => self.visit_member(member, expr, scope),
            Expr::Constant(value) => self.bind_value(value.clone(), expr, scope),
            Expr::New(bindings) | Expr::MemberInit(bindings)
                if scope.phase == ParsePhase::SelectBinding =>
            {
                for (name, value) in bindings {
                    self.visit(value, scope.bound(name))?;
                }
                Ok(())
            }
            // `x => x` selects every column
            Expr::Parameter
                if scope.phase == ParsePhase::SelectBinding && scope.binding.is_none() =>
            {
                Ok(())
            }
            Expr::GroupKey if scope.phase == ParsePhase::SelectBinding => {
                let keys = self.parts.group_by.clone();
                self.parts.select_fields.extend(keys);
                Ok(())
            }
            _ => Err(CqlError::unsupported(expr, scope.phase)),
        }
    }

    fn visit_call<'e>(
        &mut self,
        method: &'e Method,
        args: &'e [Expr],
        expr: &'e Expr,
        scope: Scope<'e>,
    ) -> CqlResult<()> {
        match method {
            Method::Where => {
                self.visit(arg(args, 0, method)?, scope)?;
                self.open_condition(ConditionTarget::Where);
                self.visit(arg(args, 1, method)?, scope.condition(ConditionTarget::Where))
            }
            Method::UpdateIf | Method::DeleteIf => {
                self.visit(arg(args, 0, method)?, scope)?;
                self.open_condition(ConditionTarget::UpdateIf);
                self.visit(arg(args, 1, method)?, scope.condition(ConditionTarget::UpdateIf))
            }
            Method::Select => {
                self.visit(arg(args, 0, method)?, scope)?;
                self.visit(arg(args, 1, method)?, scope.phase(ParsePhase::Select))
            }
            Method::Take => {
                self.visit(arg(args, 0, method)?, scope)?;
                self.visit(arg(args, 1, method)?, scope.phase(ParsePhase::Take))
            }
            Method::OrderBy | Method::ThenBy => {
                self.visit(arg(args, 0, method)?, scope)?;
                self.visit(arg(args, 1, method)?, scope.phase(ParsePhase::OrderBy))
            }
            Method::OrderByDescending | Method::ThenByDescending => {
                self.visit(arg(args, 0, method)?, scope)?;
                self.visit(
                    arg(args, 1, method)?,
                    scope.phase(ParsePhase::OrderByDescending),
                )
            }
            Method::GroupBy => {
                self.visit(arg(args, 0, method)?, scope)?;
                self.visit(arg(args, 1, method)?, scope.phase(ParsePhase::GroupBy))
            }
            Method::AllowFiltering => {
                self.visit(arg(args, 0, method)?, scope)?;
                self.parts.allow_filtering = true;
                Ok(())
            }
            Method::First | Method::FirstOrDefault => {
                self.visit(arg(args, 0, method)?, scope)?;
                if let Some(predicate) = args.get(1) {
                    self.open_condition(ConditionTarget::Where);
                    self.visit(predicate, scope.condition(ConditionTarget::Where))?;
                }
                self.parts.limit = Some(1);
                Ok(())
            }
            Method::Min | Method::Max | Method::Average | Method::Sum | Method::Count => {
                self.visit_aggregate(method, args, expr, scope)
            }
            _ => match scope.phase {
                ParsePhase::Condition => self.visit_condition_call(method, args, expr, scope),
                ParsePhase::SelectBinding => self.visit_binding_call(method, args, expr, scope),
                _ => Err(CqlError::unsupported(expr, scope.phase)),
            },
        }
    }

    fn visit_aggregate<'e>(
        &mut self,
        method: &'e Method,
        args: &'e [Expr],
        expr: &'e Expr,
        scope: Scope<'e>,
    ) -> CqlResult<()> {
        let name = match method.aggregate_name() {
            Some(name)
                if scope.phase == ParsePhase::SelectBinding
                    && self.parts.kind == QueryKind::Select =>
            {
                name
            }
            _ => return Err(CqlError::unsupported(expr, scope.phase)),
        };

        let Some(selector) = args.get(1) else {
            if matches!(method, Method::Count) {
                self.parts.select_fields.push("COUNT(*)".to_string());
                return Ok(());
            }
            return Err(CqlError::unsupported(expr, scope.phase));
        };

        let before = self.parts.select_fields.len();
        self.visit(selector, scope.phase(ParsePhase::SelectBinding))?;
        match self.parts.select_fields.pop() {
            Some(field) if self.parts.select_fields.len() == before => {
                self.parts.select_fields.push(format!("{}({})", name, field));
                Ok(())
            }
            _ => Err(CqlError::Mapping(format!(
                "{} must select exactly one mapped column of {}",
                method, self.poco.type_name
            ))),
        }
    }

    fn visit_condition_call<'e>(
        &mut self,
        method: &'e Method,
        args: &'e [Expr],
        expr: &'e Expr,
        scope: Scope<'e>,
    ) -> CqlResult<()> {
        let inner = scope.untagged();
        match method {
            Method::Contains => {
                let collection = arg(args, 0, method)?.without_convert();
                let item = arg(args, 1, method)?;
                if collection.parameter_member().is_some() {
                    self.visit(collection, inner)?;
                    self.clause(scope.target).push_str(" CONTAINS ");
                    return self.visit(item, inner);
                }

                let value = evaluate(collection)?;
                let elements = value.elements().ok_or_else(|| {
                    CqlError::Evaluation(format!("{} value is not a collection", value.kind()))
                })?;
                self.visit(item.without_convert(), inner)?;
                let clause = self.clause(scope.target);
                clause.push_str(" IN (");
                for (i, element) in elements.into_iter().enumerate() {
                    if i > 0 {
                        clause.push_str(", ");
                    }
                    clause.push_param(element);
                }
                clause.push_str(")");
                Ok(())
            }
            Method::ContainsKey => {
                let map = arg(args, 0, method)?.without_convert();
                if map.parameter_member().is_none() {
                    return self.fold(expr, scope);
                }
                self.visit(map, inner)?;
                self.clause(scope.target).push_str(" CONTAINS KEY ");
                self.visit(arg(args, 1, method)?, inner)
            }
            Method::StartsWith => {
                let target = arg(args, 0, method)?.without_convert();
                let Some(member) = target.parameter_member() else {
                    return self.fold(expr, scope);
                };
                let prefix = match evaluate(arg(args, 1, method)?)? {
                    Value::Text(prefix) => prefix,
                    other => {
                        return Err(CqlError::InvalidArgument(format!(
                            "StartsWith expects a text prefix, got {}",
                            other.kind()
                        )));
                    }
                };
                let column = self.mapped_column(member, scope.phase)?;
                let column = self.escape(&column.column_name);
                let end = format!("{}{}", prefix, '\u{10FFFF}');

                let clause = self.clause(scope.target);
                clause.push_str(&format!("{} >= ", column));
                clause.push_param(Value::Text(prefix));
                clause.push_str(&format!(" AND {} < ", column));
                clause.push_param(Value::Text(end));
                Ok(())
            }
            Method::CompareTo => {
                let Some(tag) = scope.tag.and_then(BinaryOp::cql_tag) else {
                    return self.fold(expr, scope);
                };
                self.visit(arg(args, 0, method)?.without_convert(), inner)?;
                self.clause(scope.target).push_str(&format!(" {} ", tag));
                self.visit(arg(args, 1, method)?.without_convert(), inner)
            }
            Method::Equals => {
                self.visit(arg(args, 0, method)?.without_convert(), inner)?;
                self.clause(scope.target).push_str(" = ");
                self.visit(arg(args, 1, method)?.without_convert(), inner)
            }
            Method::Token => {
                self.clause(scope.target).push_str("token(");
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        self.clause(scope.target).push_str(", ");
                    }
                    self.visit(a.without_convert(), inner)?;
                }
                self.clause(scope.target).push_str(")");
                Ok(())
            }
            Method::MaxTimeUuid | Method::MinTimeUuid => {
                let function = method.to_string().to_lowercase();
                self.clause(scope.target).push_str(&format!("{}(", function));
                self.visit(arg(args, 0, method)?, inner)?;
                self.clause(scope.target).push_str(")");
                Ok(())
            }
            _ => self.fold(expr, scope),
        }
    }

    fn visit_binding_call<'e>(
        &mut self,
        method: &'e Method,
        args: &'e [Expr],
        expr: &'e Expr,
        scope: Scope<'e>,
    ) -> CqlResult<()> {
        let kind = match method {
            Method::Append => ProjectionKind::Append,
            Method::Prepend => ProjectionKind::Prepend,
            Method::SubtractAssign => ProjectionKind::Remove,
            _ => return self.fold(expr, scope),
        };
        let Some(member) = scope.binding else {
            return Err(CqlError::unsupported(expr, scope.phase));
        };
        let value = evaluate(arg(args, 0, method)?)?;
        self.assign(member, value, kind)
    }

    fn visit_binary<'e>(
        &mut self,
        op: BinaryOp,
        left: &'e Expr,
        right: &'e Expr,
        expr: &'e Expr,
        scope: Scope<'e>,
    ) -> CqlResult<()> {
        match scope.phase {
            ParsePhase::Condition => self.visit_condition_binary(op, left, right, expr, scope),
            ParsePhase::SelectBinding => {
                // counter + n, counter - n
                if let Some(member) = scope.binding.filter(|m| self.is_counter(m)) {
                    let on_same_counter = left.without_convert().parameter_member() == Some(member);
                    if on_same_counter && matches!(op, BinaryOp::Add | BinaryOp::Sub) {
                        let kind = if op == BinaryOp::Add {
                            ProjectionKind::Increment
                        } else {
                            ProjectionKind::Decrement
                        };
                        return self.assign(member, evaluate(right)?, kind);
                    }
                }
                self.fold(expr, scope)
            }
            _ => self.fold(expr, scope),
        }
    }

    fn visit_condition_binary<'e>(
        &mut self,
        op: BinaryOp,
        left: &'e Expr,
        right: &'e Expr,
        expr: &'e Expr,
        scope: Scope<'e>,
    ) -> CqlResult<()> {
        let Some(tag) = op.cql_tag() else {
            // OR and arithmetic only survive when they fold to a value
            if expr.references_parameter() {
                return Err(CqlError::unsupported(expr, scope.phase));
            }
            return self.fold(expr, scope);
        };

        if op.is_comparison() {
            if is_compare_to(left) {
                self.expect_zero(right, expr, scope.phase)?;
                return self.visit(left.without_convert(), scope.tagged(op));
            }
            if is_compare_to(right) {
                self.expect_zero(left, expr, scope.phase)?;
                let inverse = op.inverse().unwrap_or(op);
                return self.visit(right.without_convert(), scope.tagged(inverse));
            }
        }

        let inner = scope.untagged();
        self.visit(left.without_convert(), inner)?;
        self.clause(scope.target).push_str(&format!(" {} ", tag));
        self.visit(right.without_convert(), inner)
    }

    fn visit_unary<'e>(
        &mut self,
        op: UnaryOp,
        operand: &'e Expr,
        expr: &'e Expr,
        scope: Scope<'e>,
    ) -> CqlResult<()> {
        match (op, scope.phase) {
            (UnaryOp::Convert, _) => self.visit(operand, scope),
            (UnaryOp::Not, ParsePhase::Condition) if expr.references_parameter() => {
                self.clause(scope.target).push_str("NOT (");
                self.visit(operand, scope.untagged())?;
                self.clause(scope.target).push_str(")");
                Ok(())
            }
            (UnaryOp::Negate | UnaryOp::Plus, ParsePhase::SelectBinding) => {
                match scope.binding.filter(|m| self.is_counter(m)) {
                    Some(member) => {
                        let kind = if op == UnaryOp::Negate {
                            ProjectionKind::Decrement
                        } else {
                            ProjectionKind::Increment
                        };
                        self.assign(member, evaluate(operand)?, kind)
                    }
                    None => self.fold(expr, scope),
                }
            }
            _ => self.fold(expr, scope),
        }
    }

    fn visit_member<'e>(
        &mut self,
        member: &'e str,
        expr: &'e Expr,
        scope: Scope<'e>,
    ) -> CqlResult<()> {
        if expr.parameter_member().is_none() {
            return self.fold(expr, scope);
        }

        match scope.phase {
            ParsePhase::Condition => {
                let column = self.mapped_column(member, scope.phase)?;
                let text = self.escape(&column.column_name);
                self.clause(scope.target).push_str(&text);
                Ok(())
            }
            ParsePhase::SelectBinding => {
                match self.poco.get_column_by_member_name(member) {
                    Some(column) => {
                        let text = self.escape(&column.column_name);
                        self.parts.select_fields.push(text);
                    }
                    None => tracing::debug!(
                        "Skipping unmapped member '{}' of {} in projection",
                        member,
                        self.poco.type_name
                    ),
                }
                Ok(())
            }
            ParsePhase::OrderBy | ParsePhase::OrderByDescending => {
                let column = self.mapped_column(member, scope.phase)?;
                let text = self.escape(&column.column_name);
                self.parts
                    .order_by
                    .push((text, scope.phase == ParsePhase::OrderBy));
                Ok(())
            }
            ParsePhase::GroupBy => {
                let column = self.mapped_column(member, scope.phase)?;
                let text = self.escape(&column.column_name);
                self.parts.group_by.push(text);
                Ok(())
            }
            _ => Err(CqlError::unsupported(expr, scope.phase)),
        }
    }

    /// Evaluate a node on the host and use the result as a value.
    fn fold<'e>(&mut self, expr: &'e Expr, scope: Scope<'e>) -> CqlResult<()> {
        if scope.phase != ParsePhase::Condition && expr.references_parameter() {
            return Err(CqlError::unsupported(expr, scope.phase));
        }
        let value = evaluate(expr)?;
        self.bind_value(value, expr, scope)
    }

    fn bind_value<'e>(
        &mut self,
        value: Value,
        expr: &'e Expr,
        scope: Scope<'e>,
    ) -> CqlResult<()> {
        match scope.phase {
            ParsePhase::Condition => {
                let clause = self.clause(scope.target);
                match value {
                    Value::Token(components) => {
                        clause.push_str("token(");
                        for (i, component) in components.into_iter().enumerate() {
                            if i > 0 {
                                clause.push_str(", ");
                            }
                            clause.push_param(component);
                        }
                        clause.push_str(")");
                    }
                    value => clause.push_param(value),
                }
                Ok(())
            }
            ParsePhase::Take => {
                let limit = value
                    .as_integer()
                    .and_then(|n| i32::try_from(n).ok())
                    .ok_or_else(|| {
                        CqlError::InvalidArgument(format!(
                            "Take expects an int value, got {}",
                            value.kind()
                        ))
                    })?;
                self.parts.limit = Some(limit);
                Ok(())
            }
            ParsePhase::OrderBy | ParsePhase::OrderByDescending => match value {
                Value::Text(name) => {
                    let column = self.escape(&name);
                    self.parts
                        .order_by
                        .push((column, scope.phase == ParsePhase::OrderBy));
                    Ok(())
                }
                _ => Err(CqlError::unsupported(expr, scope.phase)),
            },
            ParsePhase::SelectBinding => match scope.binding {
                Some(member) => self.assign(member, value, ProjectionKind::Assign),
                None => Err(CqlError::unsupported(expr, scope.phase)),
            },
            _ => Err(CqlError::unsupported(expr, scope.phase)),
        }
    }

    /// Record a SET assignment of `value` to `member`.
    fn assign(&mut self, member: &str, value: Value, kind: ProjectionKind) -> CqlResult<()> {
        if matches!(self.parts.kind, QueryKind::Select | QueryKind::Count) {
            return Err(CqlError::Conflict(format!(
                "a {:?} query cannot assign a value to '{}'",
                self.parts.kind, member
            )));
        }
        let column = self.poco.get_column_by_member_name(member).ok_or_else(|| {
            CqlError::Mapping(format!(
                "cannot assign '{}' of {}: the member is excluded from the mappings",
                member, self.poco.type_name
            ))
        })?;

        let kind = if column.is_counter {
            match kind {
                ProjectionKind::Assign | ProjectionKind::Increment | ProjectionKind::Append => {
                    ProjectionKind::Increment
                }
                ProjectionKind::Decrement | ProjectionKind::Remove => ProjectionKind::Decrement,
                ProjectionKind::Prepend => {
                    return Err(CqlError::Mapping(format!(
                        "cannot prepend to counter column '{}'",
                        column.column_name
                    )));
                }
            }
        } else {
            check_collection_kind(column, kind)?;
            kind
        };

        if column.is_counter && value.as_integer().is_none() {
            return Err(CqlError::InvalidArgument(format!(
                "counter column '{}' takes int or bigint values, got {}",
                column.column_name,
                value.kind()
            )));
        }

        let text = self.escape(&column.column_name);
        self.parts.projections.push(Projection {
            column: text,
            value,
            kind,
        });
        Ok(())
    }

    fn expect_zero(&self, other: &Expr, expr: &Expr, phase: ParsePhase) -> CqlResult<()> {
        match evaluate(other) {
            Ok(value) if value.as_integer() == Some(0) => Ok(()),
            _ => Err(CqlError::unsupported(expr, phase)),
        }
    }

    fn open_condition(&mut self, target: ConditionTarget) {
        let clause = self.clause(target);
        if !clause.is_empty() {
            clause.push_str(" AND ");
        }
    }

    fn clause(&mut self, target: ConditionTarget) -> &mut Clause {
        match target {
            ConditionTarget::Where => &mut self.parts.where_clause,
            ConditionTarget::UpdateIf => &mut self.parts.update_if,
        }
    }

    fn mapped_column(&self, member: &str, phase: ParsePhase) -> CqlResult<&'a PocoColumn> {
        self.poco.get_column_by_member_name(member).ok_or_else(|| {
            CqlError::Mapping(format!(
                "member '{}' of {} is not mapped and cannot be used in the {} phase",
                member, self.poco.type_name, phase
            ))
        })
    }

    fn is_counter(&self, member: &str) -> bool {
        self.poco
            .get_column_by_member_name(member)
            .is_some_and(|c| c.is_counter)
    }

    fn escape(&self, name: &str) -> String {
        escape_identifier(name, self.poco.case_sensitive)
    }
}

fn arg<'e>(args: &'e [Expr], index: usize, method: &Method) -> CqlResult<&'e Expr> {
    args.get(index).ok_or_else(|| {
        CqlError::InvalidArgument(format!(
            "{} expects at least {} arguments, got {}",
            method,
            index + 1,
            args.len()
        ))
    })
}

fn is_compare_to(expr: &Expr) -> bool {
    matches!(
        expr.without_convert(),
        Expr::Call {
            method: Method::CompareTo,
            ..
        }
    )
}

fn check_collection_kind(column: &PocoColumn, kind: ProjectionKind) -> CqlResult<()> {
    let ty = &column.column_type;
    let problem = match kind {
        ProjectionKind::Prepend if !ty.is_list() => "prepend requires a list column",
        ProjectionKind::Append | ProjectionKind::Remove if !ty.is_collection() => {
            "append and remove require a collection or counter column"
        }
        ProjectionKind::Increment | ProjectionKind::Decrement => {
            "increment and decrement require a counter column"
        }
        _ => return Ok(()),
    };
    Err(CqlError::Mapping(format!(
        "{}: '{}' is {}",
        problem, column.column_name, ty
    )))
}
