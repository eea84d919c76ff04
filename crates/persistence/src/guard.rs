//! Statement safety filter
//!
//! Every named statement passes through [`checked`] before it reaches SQLite.
//! It is a substring tripwire, not a parser: user data only ever travels as
//! bind parameters, and a statement that trips the filter is a programming
//! error surfaced as [`PersistenceError::UnsafeStatement`].

use crate::error::{PersistenceError, PersistenceResult};

/// Substrings no statement may contain (matched case-insensitively)
const DISALLOWED: [&str; 10] = [
    ";", "'", "--", "/*", "*/", "xp_", "exec", "drop", "truncate", "alter",
];

/// Return the statement unchanged if it passes the filter
pub fn checked(sql: &'static str) -> PersistenceResult<&'static str> {
    let lowered = sql.to_lowercase();
    match DISALLOWED
        .into_iter()
        .find(|pattern| lowered.contains(pattern))
    {
        Some(pattern) => {
            tracing::warn!(pattern, "statement rejected by safety filter");
            Err(PersistenceError::UnsafeStatement { pattern })
        }
        None => Ok(sql),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_parameterized_statements() {
        let sql = "SELECT id_user FROM user WHERE cpf = ?";
        assert_eq!(checked(sql).unwrap(), sql);
        assert!(checked("INSERT INTO \"transaction\" (amount) VALUES (?)").is_ok());
    }

    #[test]
    fn test_rejects_disallowed_patterns() {
        let cases: [(&'static str, &str); 6] = [
            ("SELECT 1; SELECT 2", ";"),
            ("SELECT * FROM user WHERE cpf = '1'", "'"),
            ("SELECT 1 -- comment", "--"),
            ("DROP TABLE account", "drop"),
            ("ALTER TABLE user ADD x", "alter"),
            ("EXEC xp_cmdshell", "xp_"),
        ];

        for (sql, expected) in cases {
            match checked(sql) {
                Err(PersistenceError::UnsafeStatement { pattern }) => assert_eq!(pattern, expected),
                other => panic!("expected rejection of {sql:?}, got {other:?}"),
            }
        }
    }
}
