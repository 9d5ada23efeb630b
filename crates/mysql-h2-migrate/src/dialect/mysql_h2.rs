//! MySQL → H2 rewrite rules.
//!
//! The rules are order-sensitive. Removals leave blank lines behind; only the
//! final newline rules clean those up, so they must stay last.
//!
//! Whitespace is ASCII only, and a line also ends at U+0085, U+2028 or
//! U+2029. Rules that run to the end of a line keep that terminator.

use crate::error::Result;
use crate::rewrite::RewritePipeline;

/// ASCII whitespace.
const WS: &str = "[[:space:]]";

/// Any character that does not end a line.
const LINE: &str = r"[^\r\n\x{85}\x{2028}\x{2029}]";

/// End of a line, capturing a Unicode terminator when there is one.
const EOL: &str = r"([\x{85}\x{2028}\x{2029}]|$)";

/// Replacement type for `TEXT` columns.
fn widened_text() -> String {
    format!("${{1}}VARCHAR({})${{2}}", i32::MAX)
}

/// Build the MySQL → H2 rule pipeline.
pub fn mysql_to_h2_pipeline() -> Result<RewritePipeline> {
    RewritePipeline::builder()
        // Session variables: SET ... @...
        .replace(&format!("(?m)^SET{WS}+{LINE}*?@{LINE}*?{EOL}"), "${1}")
        // Table locks, possibly indented
        .replace(&format!("(?m)^[ \\t]*LOCK{WS}+TABLES{WS}+{LINE}*?{EOL}"), "${1}")
        .replace(&format!("(?m)^[ \\t]*UNLOCK{WS}+TABLES{LINE}*?{EOL}"), "${1}")
        // UNIQUE /* CONSTRAINT */ INDEX|KEY
        .replace(
            &format!(r"UNIQUE{WS}*/\*{WS}*CONSTRAINT{WS}*\*/{WS}*(?:INDEX|KEY)"),
            "INDEX",
        )
        // DROP /* UNIQUE */ INDEX|KEY
        .replace(
            &format!(r"DROP{WS}*/\*{WS}*UNIQUE{WS}*\*/{WS}*(?:INDEX|KEY)"),
            "DROP CONSTRAINT",
        )
        // Full-text indexes
        .replace(&format!("FULLTEXT{WS}+(?:INDEX|KEY)"), "INDEX")
        .replace("FULLTEXT", "INDEX")
        .remove(&format!("WITH{WS}+PARSER{WS}+[^;]+"))
        // TEXT has no length in H2's full-text-compatible types
        .replace(&format!("({WS}+)TEXT([[:space:],]+)"), widened_text())
        // Column reposition
        .replace(
            &format!("({WS}*CHANGE{WS}+COLUMN{WS}+{LINE}*?){WS}+AFTER{WS}+[^;]+"),
            "${1}",
        )
        .replace(
            &format!("({WS}*MODIFY{WS}+COLUMN{WS}+{LINE}*?){WS}+AFTER{WS}+[^;]+"),
            "${1}",
        )
        // Column character set / collation
        .remove(&format!(
            "{WS}*CHARACTER{WS}+SET{WS}+'{LINE}*?'{WS}+COLLATE{WS}+'{LINE}*?'"
        ))
        .remove(&format!("{WS}*CHARACTER{WS}+SET{WS}+'{LINE}*?'"))
        // Table comment: a quoted literal or a bare word
        .remove(&format!(
            r"{WS}*COMMENT{WS}*={WS}*(?:'(?:[^'\\]|\\.|'')*'|[^[:space:];)]+)"
        ))
        // Identifier quoting
        .replace("`", "\"")
        // Full-line comments
        .replace(&format!("(?m)^--{LINE}*?{EOL}"), "${1}")
        // Line endings and blank-line runs
        .replace(r"\r\n", "\n")
        .replace(r"\r", "\n")
        .replace(r"\n{3,}", "\n\n")
        .remove(r"\A\n+")
        .replace(r"\n+\z", "\n")
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translate(sql: &str) -> String {
        mysql_to_h2_pipeline().unwrap().apply(sql)
    }

    #[test]
    fn test_table_comment_and_backticks() {
        assert_eq!(
            translate("CREATE TABLE `foo` (a INT) COMMENT='demo';\n"),
            "CREATE TABLE \"foo\" (a INT);\n"
        );
    }

    #[test]
    fn test_table_comment_keeps_closing_paren() {
        assert_eq!(
            translate("ALTER TABLE foo COMMENT='demo')"),
            "ALTER TABLE foo)"
        );
    }

    #[test]
    fn test_table_comment_without_semicolon_keeps_next_statement() {
        assert_eq!(
            translate("CREATE TABLE a (x INT) COMMENT='demo'\nCREATE TABLE b (y INT);\n"),
            "CREATE TABLE a (x INT)\nCREATE TABLE b (y INT);\n"
        );
    }

    #[test]
    fn test_table_comment_text_with_semicolon_and_quotes() {
        assert_eq!(
            translate("CREATE TABLE a (x INT) COMMENT='a;b';\n"),
            "CREATE TABLE a (x INT);\n"
        );
        assert_eq!(
            translate("CREATE TABLE a (x INT) COMMENT = 'it''s; \\'x\\'';\n"),
            "CREATE TABLE a (x INT);\n"
        );
        assert_eq!(
            translate("CREATE TABLE a (x INT) comment=demo;\n"),
            "CREATE TABLE a (x INT);\n"
        );
    }

    #[test]
    fn test_unicode_line_separator_ends_session_variable_line() {
        assert_eq!(
            translate("SET @x=1;\u{2028}INSERT INTO t VALUES (1);\n"),
            "\u{2028}INSERT INTO t VALUES (1);\n"
        );
    }

    #[test]
    fn test_non_ascii_space_is_not_whitespace() {
        assert_eq!(translate("x\u{a0}TEXT,"), "x\u{a0}TEXT,");
    }

    #[test]
    fn test_indented_lock_statements_removed() {
        let out = translate("INSERT INTO foo VALUES (1);\n  lock tables bar READ;\n\tUNLOCK TABLES;\n");
        assert_eq!(out, "INSERT INTO foo VALUES (1);\n");
        assert!(!out.to_uppercase().contains("LOCK TABLES"));
    }

    #[test]
    fn test_session_variable_line_removed() {
        assert_eq!(
            translate("SET @x = 1;\nINSERT INTO foo VALUES (1);\n"),
            "INSERT INTO foo VALUES (1);\n"
        );
    }

    #[test]
    fn test_set_without_variable_is_kept() {
        assert_eq!(translate("SET MODE MySQL;\n"), "SET MODE MySQL;\n");
    }

    #[test]
    fn test_commented_unique_index() {
        assert_eq!(
            translate("ALTER TABLE foo ADD UNIQUE /* CONSTRAINT */ INDEX idx (a);"),
            "ALTER TABLE foo ADD INDEX idx (a);"
        );
        assert_eq!(
            translate("ALTER TABLE foo ADD unique/*constraint*/key idx (a);"),
            "ALTER TABLE foo ADD INDEX idx (a);"
        );
    }

    #[test]
    fn test_commented_index_drop() {
        assert_eq!(
            translate("ALTER TABLE foo DROP /* UNIQUE */ KEY idx;"),
            "ALTER TABLE foo DROP CONSTRAINT idx;"
        );
    }

    #[test]
    fn test_fulltext_index_and_parser() {
        assert_eq!(
            translate("ALTER TABLE foo ADD FULLTEXT KEY ft (body) WITH PARSER ngram;"),
            "ALTER TABLE foo ADD INDEX ft (body) ;"
        );
        assert_eq!(
            translate("ALTER TABLE foo ADD FULLTEXT ft (body);"),
            "ALTER TABLE foo ADD INDEX ft (body);"
        );
    }

    #[test]
    fn test_text_column_widened() {
        assert_eq!(
            translate("CREATE TABLE foo (a TEXT, b text NOT NULL);"),
            "CREATE TABLE foo (a VARCHAR(2147483647), b VARCHAR(2147483647) NOT NULL);"
        );
        // Only whole-word TEXT preceded by whitespace
        assert_eq!(
            translate("CREATE TABLE foo (a MEDIUMTEXT, b LONGTEXT);"),
            "CREATE TABLE foo (a MEDIUMTEXT, b LONGTEXT);"
        );
    }

    #[test]
    fn test_after_clause_removed() {
        assert_eq!(
            translate("ALTER TABLE foo CHANGE COLUMN a b INT NOT NULL AFTER c;"),
            "ALTER TABLE foo CHANGE COLUMN a b INT NOT NULL;"
        );
        assert_eq!(
            translate("ALTER TABLE foo MODIFY COLUMN a BIGINT AFTER c;"),
            "ALTER TABLE foo MODIFY COLUMN a BIGINT;"
        );
    }

    #[test]
    fn test_character_set_removed() {
        assert_eq!(
            translate("ALTER TABLE foo MODIFY COLUMN a VARCHAR(10) CHARACTER SET 'utf8mb4' COLLATE 'utf8mb4_bin';"),
            "ALTER TABLE foo MODIFY COLUMN a VARCHAR(10);"
        );
        assert_eq!(
            translate("ALTER TABLE foo MODIFY COLUMN a VARCHAR(10) CHARACTER SET 'latin1';"),
            "ALTER TABLE foo MODIFY COLUMN a VARCHAR(10);"
        );
    }

    #[test]
    fn test_lock_statements_removed() {
        let out = translate("LOCK TABLES foo WRITE;\nINSERT INTO foo VALUES (1);\nunlock tables;\n");
        assert_eq!(out, "INSERT INTO foo VALUES (1);\n");
        assert!(!out.to_uppercase().contains("LOCK TABLES"));
    }

    #[test]
    fn test_comment_lines_removed() {
        assert_eq!(
            translate("-- create foo\nCREATE TABLE foo (a INT);\n"),
            "CREATE TABLE foo (a INT);\n"
        );
    }

    #[test]
    fn test_line_endings_and_blank_runs() {
        assert_eq!(
            translate("CREATE TABLE foo (a INT);\r\n\r\n\r\nCREATE TABLE bar (b INT);\r\n"),
            "CREATE TABLE foo (a INT);\n\nCREATE TABLE bar (b INT);\n"
        );
        assert_eq!(translate("\n\n\nSELECT 1;\n\n\n\n"), "SELECT 1;\n");
        assert_eq!(translate("SELECT 1;\rSELECT 2;"), "SELECT 1;\nSELECT 2;");
    }

    #[test]
    fn test_compatible_input_is_unchanged() {
        let sql = "CREATE TABLE foo (\n  id BIGINT NOT NULL,\n  name VARCHAR(64)\n);\n\nINSERT INTO foo VALUES (1, 'a');\n";
        assert_eq!(translate(sql), sql);
    }

    #[test]
    fn test_backticks_become_quotes_in_order() {
        let input = "SELECT `a`, `b` FROM `t`;";
        let out = translate(input);
        assert_eq!(out, "SELECT \"a\", \"b\" FROM \"t\";");
        assert_eq!(
            out.matches('"').count(),
            input.matches('`').count()
        );
    }
}
