//! Reserved words of the DM8 SQL dialect.
//!
//! Identifiers whose uppercase form appears here must be quoted when they are
//! used as table, column or schema names.

use std::collections::HashSet;
use std::sync::LazyLock;

/// DM8 reserved words (uppercase).
const DAMENG_RESERVED_WORDS: &[&str] = &[
    "ABORT", "ABSOLUTE", "ABSTRACT", "ACCESSED", "ACCOUNT", "ACROSS", "ACTION", "ADD", "ADMIN",
    "AFTER", "AGGREGATE", "ALL", "ALLOW_DATETIME", "ALLOW_IP", "ALTER", "ANALYZE", "AND", "ANY",
    "ARCHIVEDIR", "ARCHIVELOG", "ARCHIVESTYLE", "ARRAY", "ARRAYLEN", "AS", "ASC", "ASENSITIVE",
    "ASSIGN", "ASYNCHRONOUS", "AT", "ATTACH", "AUDIT", "AUTHID", "AUTHORIZATION", "AUTO",
    "AUTO_INCREMENT", "AUTOEXTEND", "AVG", "BACKUP", "BAKFILE", "BEFORE", "BEGIN", "BETWEEN",
    "BIGDATEDIFF", "BIGINT", "BINARY", "BIT", "BITMAP", "BLOB", "BLOCK", "BODY", "BOTH",
    "BREAK", "BSTRING", "BTREE", "BY", "BYTE", "CACHE", "CALL", "CASCADE", "CASCADED", "CASE",
    "CAST", "CATALOG", "CHAIN", "CHAR", "CHARACTER", "CHECK", "CIPHER", "CLASS", "CLOB",
    "CLOSE", "CLUSTER", "CLUSTERBTR", "COLUMN", "COMMENT", "COMMIT", "COMMITTED", "COMMITWORK",
    "COMPILE", "COMPRESS", "CONNECT", "CONNECT_BY_ISCYCLE", "CONNECT_BY_ISLEAF",
    "CONNECT_BY_ROOT", "CONST", "CONSTRAINT", "CONTAINS", "CONTEXT", "CONTINUE", "CONVERT",
    "CROSS", "CUBE", "CURRENT", "CURSOR", "CYCLE", "DATABASE", "DATAFILE", "DATE", "DATEADD",
    "DATEDIFF", "DATEPART", "DATETIME", "DEC", "DECIMAL", "DECLARE", "DECODE", "DEFAULT",
    "DELETE", "DELETING", "DESC", "DETERMINISTIC", "DISABLE", "DISTINCT", "DISTRIBUTED",
    "DOUBLE", "DROP", "EACH", "ELSE", "ELSEIF", "ELSIF", "ENABLE", "END", "EQU", "ESCAPE",
    "EXCEPT", "EXCEPTION", "EXCHANGE", "EXCLUSIVE", "EXEC", "EXECUTE", "EXISTS", "EXIT",
    "EXPLAIN", "EXTERN", "EXTERNAL", "EXTRACT", "FETCH", "FINAL", "FIRST", "FLOAT", "FOR",
    "FOREIGN", "FROM", "FULL", "FULLY", "FUNCTION", "GOTO", "GRANT", "GROUP", "GROUPING",
    "HASH", "HAVING", "HEXTORAW", "IDENTIFIED", "IDENTITY", "IDENTITY_INSERT", "IF",
    "IMMEDIATE", "IN", "INCREASE", "INDEX", "INITIAL", "INNER", "INSERT", "INSERTING",
    "INSTANTIABLE", "INSTEAD", "INT", "INTEGER", "INTERSECT", "INTERVAL", "INTO", "IS",
    "ISOLATION", "JOIN", "KEY", "LAST", "LEFT", "LESS", "LEVEL", "LIKE", "LIMIT", "LINK",
    "LIST", "LNNVL", "LOB", "LOCAL", "LOCK", "LOGFILE", "LONG", "LONGVARBINARY", "LONGVARCHAR",
    "LOOP", "MATCH", "MATCHED", "MAXVALUE", "MEMBER", "MERGE", "MINUS", "MINVALUE", "MODE",
    "MODIFY", "MOUNT", "NATURAL", "NEW", "NEXT", "NOAUDIT", "NOCACHE", "NOCOPY", "NOCYCLE",
    "NOMAXVALUE", "NOMINVALUE", "NOORDER", "NOT", "NOWAIT", "NULL", "NUMBER", "NUMERIC",
    "OBJECT", "OF", "OFF", "OFFSET", "OLD", "ON", "ONLY", "OPEN", "OPTION", "OR", "ORDER",
    "OUT", "OUTER", "OVER", "OVERLAPS", "OVERLAY", "OVERRIDE", "PACKAGE", "PARTITION",
    "PARTITIONS", "PENDANT", "PERCENT", "PIPE", "PRECISION", "PRESERVE", "PRIMARY", "PRINT",
    "PRIOR", "PRIVATE", "PRIVILEGES", "PROCEDURE", "PROTECTED", "PUBLIC", "RAISE", "RANGE",
    "RAW", "READ", "REAL", "REF", "REFERENCE", "REFERENCES", "REFERENCING", "RELATED",
    "RELATIVE", "RENAME", "REPEAT", "REPEATABLE", "REPLACE", "REPLICATE", "RESIZE",
    "RESTRICT", "RETURN", "RETURNING", "REVERSE", "REVOKE", "RIGHT", "ROLE", "ROLLBACK",
    "ROLLUP", "ROW", "ROWCOUNT", "ROWID", "ROWNUM", "ROWS", "SAVEPOINT", "SBYTE", "SCHEMA",
    "SCROLL", "SEALED", "SECTION", "SELECT", "SELF", "SEQUENCE", "SERIALIZABLE", "SESSION",
    "SET", "SETS", "SHARE", "SHORT", "SIZE", "SIZEOF", "SMALLINT", "SNAPSHOT", "SOME",
    "SPATIAL", "START", "STATEMENT", "STATIC", "STORAGE", "STRUCT", "SUBPARTITION",
    "SUBPARTITIONS", "SYNONYM", "SYSDATE", "TABLE", "TABLESPACE", "TEMPORARY", "THEN",
    "THROW", "TIES", "TIME", "TIMESTAMP", "TINYINT", "TO", "TOP", "TRAILING", "TRANSACTION",
    "TRIGGER", "TRIGGERS", "TRIM", "TRUNCATE", "TRY", "TYPEOF", "UINT", "ULONG", "UNCOMMITTED",
    "UNDER", "UNION", "UNIQUE", "UNTIL", "UPDATE", "UPDATING", "USER", "USHORT", "USING",
    "VALUES", "VARBINARY", "VARCHAR", "VARCHAR2", "VARRAY", "VARYING", "VIEW", "VIRTUAL",
    "VOID", "VOLATILE", "WHEN", "WHENEVER", "WHERE", "WHILE", "WITH", "WORK", "WRAPPED",
    "WRITE", "XOR",
];

static DAMENG_KEYWORDS: LazyLock<KeywordSet> =
    LazyLock::new(|| KeywordSet::from_words(DAMENG_RESERVED_WORDS.iter().copied()));

/// Immutable, case-insensitive set of reserved words.
#[derive(Debug, Clone, Default)]
pub struct KeywordSet {
    words: HashSet<String>,
}

impl KeywordSet {
    /// Build a set from arbitrary words; they are stored uppercased.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words.into_iter().map(|w| w.as_ref().to_uppercase()).collect(),
        }
    }

    /// The DM8 reserved words, built on first use and shared afterwards.
    pub fn dameng() -> &'static KeywordSet {
        &DAMENG_KEYWORDS
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.to_uppercase())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
