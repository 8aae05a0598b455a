use sea_query::backend::{
    EscapeBuilder, OperLeftAssocDecider, PrecedenceDecider, QuotedBuilder, TableRefBuilder,
};
use sea_query::prepare::SqlWriter;
use sea_query::{BinOper, Oper, Quote, SimpleExpr, SubQueryStatement, Value};

/// Renders statement text with ANSI quoted identifiers.
///
/// Parameter markers are passed through as custom expressions, so no values
/// are ever bound by this builder.
pub struct AnsiBuilder {
    /// Identifier quote characters.
    pub quote: Quote,
}

impl Default for AnsiBuilder {
    fn default() -> Self {
        Self {
            quote: Quote::new(b'"'),
        }
    }
}

impl QuotedBuilder for AnsiBuilder {
    fn quote(&self) -> Quote {
        self.quote
    }
}

impl EscapeBuilder for AnsiBuilder {}

impl TableRefBuilder for AnsiBuilder {}

impl OperLeftAssocDecider for AnsiBuilder {
    fn well_known_left_associative(&self, op: &BinOper) -> bool {
        matches!(op, BinOper::And | BinOper::Or)
    }
}

impl PrecedenceDecider for AnsiBuilder {
    // columns and parameter markers never need parentheses
    fn inner_expr_well_known_greater_precedence(
        &self, inner: &SimpleExpr, _outer_oper: &Oper,
    ) -> bool {
        matches!(inner, SimpleExpr::Column(_) | SimpleExpr::Custom(_))
    }
}

impl sea_query::backend::QueryBuilder for AnsiBuilder {
    fn prepare_query_statement(&self, query: &SubQueryStatement, sql: &mut dyn SqlWriter) {
        match query {
            SubQueryStatement::SelectStatement(s) => self.prepare_select_statement(s, sql),
            SubQueryStatement::InsertStatement(s) => self.prepare_insert_statement(s, sql),
            SubQueryStatement::UpdateStatement(s) => self.prepare_update_statement(s, sql),
            SubQueryStatement::DeleteStatement(s) => self.prepare_delete_statement(s, sql),
            SubQueryStatement::WithStatement(s) => self.prepare_with_query(s, sql),
        }
    }

    fn prepare_value(&self, value: &Value, sql: &mut dyn SqlWriter) {
        sql.push_param(value.clone(), self);
    }

    fn placeholder(&self) -> (&str, bool) {
        ("?", false)
    }
}
