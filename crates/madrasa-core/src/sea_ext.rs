use sea_orm::{
    ColumnTrait, EntityTrait, QueryFilter, Select,
    sea_query::{Expr, Func},
};

/// Case-insensitive equality on a text column: `LOWER(col) = lower(value)`.
pub trait FilterLowerEq {
    fn filter_lower_eq<C: ColumnTrait>(self, column: C, value: &str) -> Self;
}

impl<E> FilterLowerEq for Select<E>
where
    E: EntityTrait,
{
    fn filter_lower_eq<C: ColumnTrait>(self, column: C, value: &str) -> Self {
        self.filter(Expr::expr(Func::lower(Expr::col(column))).eq(value.to_lowercase()))
    }
}
