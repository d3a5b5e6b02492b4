//! File record operations.

use mediamorph_common::{Error, Result, SessionId};
use rusqlite::{params, Connection, OptionalExtension};

use crate::models::FileRecord;

/// Insert or overwrite the single file owned by a session.
///
/// The UNIQUE constraint on `session_id` makes a re-upload replace the
/// previous record, resetting the converted flag.
pub fn upsert_file(conn: &Connection, record: &FileRecord) -> Result<()> {
    conn.execute(
        "INSERT INTO files (file_id, session_id, display_name, format, contents, converted)
         VALUES (?, ?, ?, ?, ?, ?)
         ON CONFLICT(session_id) DO UPDATE SET
            file_id = excluded.file_id,
            display_name = excluded.display_name,
            format = excluded.format,
            contents = excluded.contents,
            converted = excluded.converted",
        params![
            record.file_id,
            record.session_id.to_string(),
            record.display_name,
            record.format,
            record.contents,
            record.converted as i64,
        ],
    )
    .map_err(|e| Error::storage(e.to_string()))?;
    Ok(())
}

/// Fetch the file owned by a session, if any.
pub fn get_file(conn: &Connection, session_id: SessionId) -> Result<Option<FileRecord>> {
    conn.query_row(
        "SELECT file_id, display_name, format, contents, converted
         FROM files WHERE session_id = ?",
        [session_id.to_string()],
        |row| {
            Ok(FileRecord {
                file_id: row.get(0)?,
                session_id,
                display_name: row.get(1)?,
                format: row.get(2)?,
                contents: row.get(3)?,
                converted: row.get::<_, i64>(4)? != 0,
            })
        },
    )
    .optional()
    .map_err(|e| Error::storage(e.to_string()))
}

/// Replace a converted file's name, format, and contents, and mark it
/// converted. Returns `SessionNotFound` if the session has no file.
pub fn replace_converted(
    conn: &Connection,
    session_id: SessionId,
    display_name: &str,
    format: &str,
    contents: &[u8],
) -> Result<()> {
    let file_id = FileRecord::derive_id(display_name, session_id);
    let updated = conn
        .execute(
            "UPDATE files
             SET file_id = ?, display_name = ?, format = ?, contents = ?, converted = 1
             WHERE session_id = ?",
            params![
                file_id,
                display_name,
                format,
                contents,
                session_id.to_string()
            ],
        )
        .map_err(|e| Error::storage(e.to_string()))?;

    if updated == 0 {
        return Err(Error::session_not_found(session_id.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{get_conn, init_memory_pool};
    use crate::queries::sessions::insert_session;

    fn record(session_id: SessionId, name: &str) -> FileRecord {
        FileRecord {
            file_id: FileRecord::derive_id(name, session_id),
            session_id,
            display_name: name.to_string(),
            format: "PNG".to_string(),
            contents: vec![1, 2, 3],
            converted: false,
        }
    }

    #[test]
    fn test_upsert_then_get() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();

        let session = SessionId::new();
        insert_session(&conn, session, 100).unwrap();
        upsert_file(&conn, &record(session, "photo.png")).unwrap();

        let stored = get_file(&conn, session).unwrap().unwrap();
        assert_eq!(stored.display_name, "photo.png");
        assert_eq!(stored.contents, vec![1, 2, 3]);
        assert!(!stored.converted);
    }

    #[test]
    fn test_upsert_overwrites_single_file() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();

        let session = SessionId::new();
        insert_session(&conn, session, 100).unwrap();
        upsert_file(&conn, &record(session, "first.png")).unwrap();

        let mut second = record(session, "second.png");
        second.contents = vec![9];
        upsert_file(&conn, &second).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM files", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);

        let stored = get_file(&conn, session).unwrap().unwrap();
        assert_eq!(stored.display_name, "second.png");
        assert_eq!(stored.contents, vec![9]);
    }

    #[test]
    fn test_get_file_missing() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();
        assert!(get_file(&conn, SessionId::new()).unwrap().is_none());
    }

    #[test]
    fn test_replace_converted() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();

        let session = SessionId::new();
        insert_session(&conn, session, 100).unwrap();
        upsert_file(&conn, &record(session, "photo.png")).unwrap();

        replace_converted(&conn, session, "photo.jpg", "JPG", &[7, 8]).unwrap();

        let stored = get_file(&conn, session).unwrap().unwrap();
        assert_eq!(stored.display_name, "photo.jpg");
        assert_eq!(stored.format, "JPG");
        assert_eq!(stored.contents, vec![7, 8]);
        assert!(stored.converted);
        assert_eq!(stored.file_id, FileRecord::derive_id("photo.jpg", session));
    }

    #[test]
    fn test_replace_converted_missing_file() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();

        let err = replace_converted(&conn, SessionId::new(), "a.jpg", "JPG", &[]).unwrap_err();
        assert!(matches!(err, Error::SessionNotFound(_)));
    }
}
