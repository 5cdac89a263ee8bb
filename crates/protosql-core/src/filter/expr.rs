use crate::{
    config::{PlaceholderStyle, SqlConfig},
    error::InputError,
    filter::{Filter, Joiner, Lowered, Operand, placeholder},
    value::SqlValue,
};

///
/// Operator
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Operator {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    /// Case-insensitive substring match; the operand is wrapped in `%…%`.
    Contain,
    In,
    /// JSON array column contains any of the listed strings.
    JsonArrIn,
    /// JSON document column contains the operand document.
    JsonContain,
    EmptyStr,
    NotEmptyStr,
    ArrContain,
    ArrOverlap,
    ArrEmpty,
}

impl Operator {
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Eq | Self::EmptyStr | Self::ArrEmpty => "=",
            Self::Neq | Self::NotEmptyStr => "!=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Contain => "ILIKE",
            Self::In => "IN",
            Self::JsonArrIn => "?|",
            Self::JsonContain | Self::ArrContain => "@>",
            Self::ArrOverlap => "&&",
        }
    }

    /// Operators that expand a list operand into one placeholder per element.
    #[must_use]
    pub const fn is_multi_valued(self) -> bool {
        matches!(
            self,
            Self::In | Self::JsonArrIn | Self::ArrContain | Self::ArrOverlap
        )
    }

    /// Operators that take no operand at all.
    #[must_use]
    pub const fn is_nullary(self) -> bool {
        matches!(self, Self::EmptyStr | Self::NotEmptyStr | Self::ArrEmpty)
    }
}

///
/// FilterExpr
///
/// One node of a filter. Comparisons bind parameters; groups lower a nested
/// filter in place; raw fragments are trusted literal SQL.
///

#[derive(Clone, Debug, PartialEq)]
pub enum FilterExpr {
    Compare {
        column: String,
        op: Operator,
        operand: Operand,
    },
    Group {
        joiner: Joiner,
        filter: Filter,
    },
    Raw(String),
}

///
/// Lowering
///
/// Outcome of lowering one expression. `Skip` is the soft-skip signal and
/// is not an error.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Lowering {
    Emit(Lowered),
    Skip,
}

impl FilterExpr {
    /// Lower this expression with its first placeholder at `start`.
    pub fn lower(&self, start: usize, config: &SqlConfig) -> Result<Lowering, InputError> {
        match self {
            Self::Raw(text) => Ok(Lowering::Emit(Lowered {
                sql: text.clone(),
                args: Vec::new(),
            })),
            Self::Group { joiner, filter } => {
                let inner = filter.lower_joined(start, *joiner, config)?;
                if inner.is_empty() {
                    return Ok(Lowering::Skip);
                }

                Ok(Lowering::Emit(Lowered {
                    sql: format!("({})", inner.sql),
                    args: inner.args,
                }))
            }
            Self::Compare {
                column,
                op,
                operand,
            } => lower_compare(column, *op, operand, start, config),
        }
    }
}

fn lower_compare(
    column: &str,
    op: Operator,
    operand: &Operand,
    start: usize,
    config: &SqlConfig,
) -> Result<Lowering, InputError> {
    if op.is_nullary() {
        let sql = match op {
            Operator::ArrEmpty => format!("COALESCE(array_length({column}, 1), 0) = 0"),
            _ => format!("{column} {} ''", op.symbol()),
        };

        return Ok(emit(sql, Vec::new()));
    }

    let unsupported = || InputError::UnsupportedOperand {
        column: column.to_string(),
        operator: op.symbol(),
        operand: operand.type_name(),
    };

    let args = match operand {
        Operand::Absent | Operand::Value(SqlValue::Null) | Operand::Enum(0) => {
            return Ok(Lowering::Skip);
        }
        Operand::Enum(code) => vec![SqlValue::Int32(*code)],
        Operand::Value(SqlValue::Array(_) | SqlValue::Json(_)) => return Err(unsupported()),
        Operand::Value(value) => match (op, value) {
            (Operator::Contain, SqlValue::Text(text)) => vec![SqlValue::Text(format!("%{text}%"))],
            (Operator::JsonContain, SqlValue::Text(doc)) => vec![SqlValue::Json(doc.clone())],
            (Operator::Contain | Operator::JsonContain, _) => return Err(unsupported()),
            _ => vec![value.clone()],
        },
        Operand::Json(doc) => match op {
            Operator::JsonContain | Operator::Eq | Operator::Neq => {
                vec![SqlValue::Json(doc.clone())]
            }
            _ => return Err(unsupported()),
        },
        Operand::List(items) => {
            if !op.is_multi_valued() {
                return Err(unsupported());
            }
            if items.iter().any(|item| !item.is_array_element()) {
                return Err(unsupported());
            }
            if items.is_empty() {
                return Ok(Lowering::Skip);
            }
            items.clone()
        }
    };

    if !op.is_multi_valued() {
        return Ok(emit(
            format!("{column} {} {}", op.symbol(), placeholder(start)),
            args,
        ));
    }

    // `?|` cannot be told apart from a `?` placeholder
    if op == Operator::JsonArrIn && config.placeholder_style == PlaceholderStyle::Question {
        return Err(InputError::PlaceholderConflict {
            column: column.to_string(),
            operator: op.symbol(),
        });
    }

    let list = (start..start + args.len())
        .map(placeholder)
        .collect::<Vec<_>>()
        .join(", ");

    let sql = match op {
        Operator::In => format!("{column} IN ({list})"),
        Operator::JsonArrIn => format!("{column} ?| array[{list}]"),
        _ => {
            let elem = config.array_types.infer(&args[0]);
            format!("{column}::{elem}[] {} array[{list}]::{elem}[]", op.symbol())
        }
    };

    Ok(emit(sql, args))
}

const fn emit(sql: String, args: Vec<SqlValue>) -> Lowering {
    Lowering::Emit(Lowered { sql, args })
}
