//! SQL text issued by the adapter.
//!
//! Catalog queries take their filter values as `?` bindings.

pub const DATABASE_NAME: &str = "select name as database_name from v$database";

pub const LIST_SCHEMAS: &str = "SELECT distinct A.NAME SCHEMA_NAME FROM SYSOBJECTS A, DBA_USERS B \
     WHERE A.PID = B.USER_ID AND A.TYPE$ = 'SCH' ORDER BY SCHEMA_NAME";

/// Tables and views of one schema. Binds the schema twice.
pub const LIST_RELATIONS: &str = r#"select
    t.table_name as name,
    t.owner as schema_name,
    'table' as kind
from all_tables t
where t.owner = ?
union all
select
    v.view_name as name,
    v.owner as schema_name,
    'view' as kind
from all_views v
where v.owner = ?"#;

/// Table names of one schema.
pub const LIST_TABLES: &str = "SELECT distinct TABLE_NAME from dba_tables WHERE owner = ?";

/// Columns of one relation in column order. Binds owner and table name.
pub const COLUMNS_IN_RELATION: &str = r#"select
    A.COLUMN_ID as column_id,
    A.COLUMN_NAME as column_name,
    A.DATA_TYPE as data_type,
    A.DATA_LENGTH as data_length,
    A.DATA_PRECISION as data_precision,
    A.DATA_SCALE as data_scale,
    B.COMMENTS as column_comment
from ALL_TAB_COLUMNS A
left join ALL_COL_COMMENTS B on A.COLUMN_NAME = B.COLUMN_NAME
      and A.TABLE_NAME = B.TABLE_NAME and A.OWNER = B.OWNER
where A.OWNER = ?
  and A.TABLE_NAME = ?
order by A.COLUMN_ID"#;

/// Catalog rows for every column of the given schemas.
pub fn catalog(schema_count: usize) -> String {
    let placeholders = vec!["?"; schema_count].join(", ");
    format!(
        r#"select
    '' as table_database,
    A.OWNER as table_schema,
    A.TABLE_NAME as table_name,
    case when O.OBJECT_TYPE = 'VIEW' then 'VIEW' else 'BASE TABLE' end as table_type,
    C.COMMENTS as table_comment,
    A.COLUMN_NAME as column_name,
    A.COLUMN_ID as column_index,
    case when A.DATA_TYPE in ('VARCHAR', 'CHAR') then concat(A.DATA_TYPE, '(', A.DATA_LENGTH, ')')
         when A.DATA_TYPE in ('DEC', 'DECIMAL') then concat(A.DATA_TYPE, '(', A.DATA_PRECISION, ',', A.DATA_SCALE, ')')
         else A.DATA_TYPE
    end as column_type,
    B.COMMENTS as column_comment,
    A.OWNER as table_owner
from ALL_TAB_COLUMNS A
join ALL_OBJECTS O on O.OWNER = A.OWNER and O.OBJECT_NAME = A.TABLE_NAME
      and O.OBJECT_TYPE in ('TABLE', 'VIEW')
left join ALL_COL_COMMENTS B on A.COLUMN_NAME = B.COLUMN_NAME
      and A.TABLE_NAME = B.TABLE_NAME and A.OWNER = B.OWNER
left join ALL_TAB_COMMENTS C on A.TABLE_NAME = C.TABLE_NAME and A.OWNER = C.OWNER
where A.OWNER in ({placeholders})
order by A.OWNER, A.TABLE_NAME, A.COLUMN_ID"#
    )
}

/// Compares two relations: row-count difference and number of mismatched rows.
///
/// The CTE names carry a fixed suffix so they cannot collide with relations
/// named `table_a`/`table_b`. Arguments are substituted once, so braces in
/// them are kept as written.
pub fn rows_different(
    columns_csv: &str,
    relation_a: &str,
    relation_b: &str,
    except_operator: &str,
) -> String {
    format!(
        r#"with diff_count as (
    SELECT
        1 as id,
        COUNT(*) as num_missing FROM (
            (SELECT {columns} FROM {relation_a} {except_op}
             SELECT {columns} FROM {relation_b})
             MINUS
            (SELECT {columns} FROM {relation_b} {except_op}
             SELECT {columns} FROM {relation_a})
        ) a
), table_a_56c36b as (
    SELECT COUNT(*) as num_rows FROM {relation_a}
), table_b_56c36b as (
    SELECT COUNT(*) as num_rows FROM {relation_b}
), row_count_diff as (
    select
        1 as id,
        table_a_56c36b.num_rows - table_b_56c36b.num_rows as difference
    from table_a_56c36b, table_b_56c36b
)
select
    row_count_diff.difference as row_count_difference,
    diff_count.num_missing as num_mismatched
from row_count_diff
join diff_count using (id)"#,
        columns = columns_csv,
        relation_a = relation_a,
        relation_b = relation_b,
        except_op = except_operator,
    )
}

pub fn select_all(relation: &str) -> String {
    format!("SELECT * FROM {}", relation)
}

pub fn record_count(relation: &str) -> String {
    format!("select count(1) as record_count from {}", relation)
}
