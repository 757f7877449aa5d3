//! SQL Parser
//!
//! Converts SQL text into a `Statement`. Each command is classified by its
//! leading keyword (case-insensitive) and extracted by keyword scanning over
//! the raw text; there is one supported surface form per command.

use super::ast::*;
use crate::catalog::DataType;
use crate::error::{Error, Result};
use crate::storage::Value;
use indexmap::IndexMap;

/// Comparison operators in probe order. Two-character operators come before
/// their single-character prefixes so `>=` is never read as `>`.
const OPERATORS: [(&str, CompareOp); 6] = [
    (">=", CompareOp::Ge),
    ("<=", CompareOp::Le),
    ("!=", CompareOp::Ne),
    ("=", CompareOp::Eq),
    (">", CompareOp::Gt),
    ("<", CompareOp::Lt),
];

/// Words that terminate a table reference and therefore cannot be an alias
const RESERVED_AFTER_TABLE: [&str; 4] = ["WHERE", "INNER", "JOIN", "ON"];

/// SQL Parser
pub struct Parser;

impl Parser {
    /// Parse a single SQL statement
    pub fn parse(sql: &str) -> Result<Statement> {
        let sql = sql.trim();
        let sql = sql.strip_suffix(';').unwrap_or(sql).trim_end();
        if sql.is_empty() {
            return Err(Error::Parse("empty SQL statement".to_string()));
        }

        let head = peek_word(sql).unwrap_or_default().to_ascii_uppercase();
        match head.as_str() {
            "CREATE" => parse_create_table(sql),
            "INSERT" => parse_insert(sql),
            "SELECT" => parse_select(sql),
            "UPDATE" => parse_update(sql),
            "DELETE" => parse_delete(sql),
            _ => Err(Error::Parse(format!(
                "unsupported SQL statement: {}",
                head_of(sql)
            ))),
        }
    }
}

// ========== CREATE TABLE ==========

fn parse_create_table(sql: &str) -> Result<Statement> {
    let rest = expect_keyword(sql, "CREATE")?;
    let rest = expect_keyword(rest, "TABLE")?;

    // IF NOT EXISTS is accepted but carries no meaning here; the executor
    // still fails if the table exists.
    let rest = if let Ok(r) = expect_keyword(rest, "IF") {
        let r = expect_keyword(r, "NOT")?;
        expect_keyword(r, "EXISTS")?
    } else {
        rest
    };

    let (table_name, rest) = take_identifier(rest)?;

    let open = rest
        .find('(')
        .ok_or_else(|| Error::Parse("invalid CREATE TABLE syntax".to_string()))?;
    let close = rest[open + 1..]
        .find(')')
        .map(|i| open + 1 + i)
        .ok_or_else(|| Error::Parse("invalid CREATE TABLE syntax".to_string()))?;
    let body = &rest[open + 1..close];

    let mut columns = IndexMap::new();
    let mut primary_key = None;
    let mut unique = Vec::new();

    for def in body.split(',') {
        let def = def.trim();
        if def.is_empty() {
            continue;
        }

        let mut parts = def.split_whitespace();
        let name = match parts.next() {
            Some(name) => name.to_string(),
            None => continue,
        };
        let written_type = parts.next().and_then(|t| t.parse::<DataType>().ok());

        if find_keyword(def, "PRIMARY").is_some() && find_keyword(def, "KEY").is_some() {
            if primary_key.is_some() {
                return Err(Error::Parse(
                    "only one PRIMARY KEY column is supported".to_string(),
                ));
            }
            columns.insert(name.clone(), written_type.unwrap_or(DataType::Int));
            primary_key = Some(name);
        } else if find_keyword(def, "UNIQUE").is_some() {
            columns.insert(name.clone(), written_type.unwrap_or(DataType::Varchar));
            unique.push(name);
        } else {
            let ty_token = def.split_whitespace().nth(1).ok_or_else(|| {
                Error::Parse(format!("invalid column definition '{}'", def))
            })?;
            columns.insert(name, ty_token.parse::<DataType>()?);
        }
    }

    if columns.is_empty() {
        return Err(Error::Parse("invalid CREATE TABLE syntax".to_string()));
    }

    Ok(Statement::CreateTable(CreateTableStatement {
        table_name,
        columns,
        primary_key,
        unique,
    }))
}

// ========== INSERT ==========

fn parse_insert(sql: &str) -> Result<Statement> {
    let rest = expect_keyword(sql, "INSERT")?;
    let rest = expect_keyword(rest, "INTO")?;
    let (table_name, rest) = take_identifier(rest)?;
    let rest = expect_keyword(rest, "VALUES")?;

    let open = rest
        .find('(')
        .ok_or_else(|| Error::Parse("invalid INSERT syntax".to_string()))?;
    let close = rest
        .rfind(')')
        .filter(|&c| c > open)
        .ok_or_else(|| Error::Parse("invalid INSERT syntax".to_string()))?;

    let values = split_commas(&rest[open + 1..close])
        .iter()
        .map(|token| parse_literal(token))
        .collect();

    Ok(Statement::Insert(InsertStatement { table_name, values }))
}

// ========== SELECT ==========

fn parse_select(sql: &str) -> Result<Statement> {
    let rest = expect_keyword(sql, "SELECT")?;

    let from_pos = find_keyword(rest, "FROM")
        .ok_or_else(|| Error::Parse("invalid SELECT syntax: missing FROM".to_string()))?;
    let cols_str = rest[..from_pos].trim();
    if cols_str.is_empty() {
        return Err(Error::Parse("invalid SELECT syntax".to_string()));
    }

    let columns = if cols_str == "*" {
        None
    } else {
        Some(
            cols_str
                .split(',')
                .map(|c| c.trim().to_string())
                .collect::<Vec<_>>(),
        )
    };

    let after_from = &rest[from_pos + 4..];
    let (table_name, after_table) = take_identifier(after_from)?;

    let mut table_alias = None;
    let mut rest = after_table;
    if let Some(word) = peek_word(after_table) {
        if !RESERVED_AFTER_TABLE
            .iter()
            .any(|kw| word.eq_ignore_ascii_case(kw))
        {
            let (alias, after_alias) = take_identifier(after_table)?;
            table_alias = Some(alias);
            rest = after_alias;
        }
    }

    // The JOIN section precedes the WHERE clause in this dialect
    let (before_where, where_clause) = match find_keyword(rest, "WHERE") {
        Some(pos) => (&rest[..pos], Some(&rest[pos + 5..])),
        None => (rest, None),
    };

    let join = parse_join(before_where)?;
    let predicate = where_clause.map(parse_predicate).transpose()?;

    Ok(Statement::Select(SelectStatement {
        table_name,
        table_alias,
        columns,
        predicate,
        join,
    }))
}

fn parse_join(input: &str) -> Result<Option<JoinClause>> {
    let Some(pos) = find_keyword(input, "JOIN") else {
        return Ok(None);
    };
    let after = &input[pos + 4..];

    let (table, after) =
        take_identifier(after).map_err(|_| Error::Parse("invalid JOIN syntax".to_string()))?;
    let (alias, after) = take_identifier(after)
        .map_err(|_| Error::Parse("JOIN requires a table alias".to_string()))?;
    if alias.eq_ignore_ascii_case("ON") {
        return Err(Error::Parse("JOIN requires a table alias".to_string()));
    }

    let after = expect_keyword(after, "ON")
        .map_err(|_| Error::Parse("JOIN requires an ON condition".to_string()))?;

    let (left_column, after) = take_qualified_column(after)?;
    let after = after.trim_start();
    let after = after
        .strip_prefix('=')
        .ok_or_else(|| Error::Parse("invalid JOIN condition".to_string()))?;
    let (right_column, _) = take_qualified_column(after)?;

    Ok(Some(JoinClause {
        table,
        alias,
        left_column,
        right_column,
    }))
}

// ========== UPDATE ==========

fn parse_update(sql: &str) -> Result<Statement> {
    let rest = expect_keyword(sql, "UPDATE")?;
    let (table_name, rest) = take_identifier(rest)?;
    let rest = expect_keyword(rest, "SET")?;

    let (set_str, where_clause) = match find_keyword(rest, "WHERE") {
        Some(pos) => (&rest[..pos], Some(&rest[pos + 5..])),
        None => (rest, None),
    };

    let mut assignments = Vec::new();
    for part in split_commas(set_str) {
        let (column, value) = part.split_once('=').ok_or_else(|| {
            Error::Parse(format!("invalid SET assignment '{}'", part.trim()))
        })?;
        assignments.push(Assignment {
            column: column.trim().to_string(),
            value: parse_literal(value.trim()),
        });
    }
    if assignments.is_empty() {
        return Err(Error::Parse("invalid UPDATE syntax".to_string()));
    }

    let predicate = where_clause.map(parse_predicate).transpose()?;

    Ok(Statement::Update(UpdateStatement {
        table_name,
        assignments,
        predicate,
    }))
}

// ========== DELETE ==========

fn parse_delete(sql: &str) -> Result<Statement> {
    let rest = expect_keyword(sql, "DELETE")?;
    let rest = expect_keyword(rest, "FROM")?;
    let (table_name, rest) = take_identifier(rest)?;

    let predicate = match find_keyword(rest, "WHERE") {
        Some(pos) => Some(parse_predicate(&rest[pos + 5..])?),
        None => None,
    };

    Ok(Statement::Delete(DeleteStatement {
        table_name,
        predicate,
    }))
}

// ========== Predicates and literals ==========

/// Parse a single `column OP value` comparison.
///
/// The operator is found by probing `OPERATORS` in order and splitting at the
/// first operator substring present anywhere in the clause.
fn parse_predicate(clause: &str) -> Result<Predicate> {
    let clause = clause.trim();

    for (op_str, op) in OPERATORS {
        if let Some(pos) = clause.find(op_str) {
            let column = clause[..pos].trim().to_string();
            let value = parse_literal(clause[pos + op_str.len()..].trim());
            return Ok(Predicate { column, op, value });
        }
    }

    Err(Error::Parse(format!(
        "unsupported operator in WHERE clause: {}",
        clause
    )))
}

/// Parse a single literal token.
///
/// Matching quotes make a string; `NULL`, `TRUE` and `FALSE` are
/// case-insensitive; a token containing `.` that parses as a number is a
/// float; otherwise an integer if parseable; otherwise the raw token is kept
/// as a string.
pub(crate) fn parse_literal(token: &str) -> Value {
    let token = token.trim();
    let bytes = token.as_bytes();

    if token.len() >= 2 {
        let (first, last) = (bytes[0], bytes[token.len() - 1]);
        if (first == b'\'' && last == b'\'') || (first == b'"' && last == b'"') {
            return Value::String(token[1..token.len() - 1].to_string());
        }
    }

    if token.eq_ignore_ascii_case("NULL") {
        return Value::Null;
    }
    if token.eq_ignore_ascii_case("TRUE") {
        return Value::Boolean(true);
    }
    if token.eq_ignore_ascii_case("FALSE") {
        return Value::Boolean(false);
    }

    if token.contains('.') {
        if let Ok(f) = token.parse::<f64>() {
            return Value::Float(f);
        }
    }
    if let Ok(i) = token.parse::<i64>() {
        return Value::Integer(i);
    }

    Value::String(token.to_string())
}

/// Split a comma-separated list, ignoring commas inside quoted strings
fn split_commas(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for ch in input.chars() {
        match ch {
            '\'' | '"' => {
                match quote {
                    None => quote = Some(ch),
                    Some(q) if q == ch => quote = None,
                    Some(_) => {}
                }
                current.push(ch);
            }
            ',' if quote.is_none() => {
                tokens.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    if !current.trim().is_empty() {
        tokens.push(current.trim().to_string());
    }

    tokens
}

// ========== Scanning helpers ==========

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Find a keyword case-insensitively at word boundaries
fn find_keyword(haystack: &str, keyword: &str) -> Option<usize> {
    let upper = haystack.to_ascii_uppercase();
    let bytes = upper.as_bytes();
    let mut start = 0;

    while let Some(rel) = upper[start..].find(keyword) {
        let pos = start + rel;
        let end = pos + keyword.len();
        let before_ok = pos == 0 || !is_word_byte(bytes[pos - 1]);
        let after_ok = end >= bytes.len() || !is_word_byte(bytes[end]);
        if before_ok && after_ok {
            return Some(pos);
        }
        start = pos + 1;
    }

    None
}

/// Consume a leading keyword (after whitespace), returning the remainder
fn expect_keyword<'a>(input: &'a str, keyword: &str) -> Result<&'a str> {
    let s = input.trim_start();
    let n = keyword.len();
    if s.len() >= n
        && s[..n].eq_ignore_ascii_case(keyword)
        && (s.len() == n || !is_word_byte(s.as_bytes()[n]))
    {
        Ok(&s[n..])
    } else {
        Err(Error::Parse(format!(
            "expected {} near '{}'",
            keyword,
            head_of(s)
        )))
    }
}

/// Consume a leading identifier (after whitespace), returning it and the rest
fn take_identifier(input: &str) -> Result<(String, &str)> {
    let s = input.trim_start();
    let end = s
        .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
        .unwrap_or(s.len());
    if end == 0 {
        Err(Error::Parse(format!(
            "expected identifier near '{}'",
            head_of(s)
        )))
    } else {
        Ok((s[..end].to_string(), &s[end..]))
    }
}

/// Consume an `alias.column` reference, returning the column part
fn take_qualified_column(input: &str) -> Result<(String, &str)> {
    let s = input.trim_start();
    let end = s
        .find(|c: char| !c.is_ascii_alphanumeric() && c != '_' && c != '.')
        .unwrap_or(s.len());
    let token = &s[..end];

    match token.split_once('.') {
        Some((alias, column)) if !alias.is_empty() && !column.is_empty() && !column.contains('.') => {
            Ok((column.to_string(), &s[end..]))
        }
        _ => Err(Error::Parse(format!(
            "invalid JOIN condition near '{}'",
            head_of(s)
        ))),
    }
}

/// Peek at the next word without consuming it
fn peek_word(input: &str) -> Option<&str> {
    let s = input.trim_start();
    let end = s
        .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
        .unwrap_or(s.len());
    if end == 0 {
        None
    } else {
        Some(&s[..end])
    }
}

/// Truncated snippet of the input for error messages
fn head_of(s: &str) -> String {
    s.chars().take(40).collect()
}
