//! Frame repository contract and SQLite implementation.
//!
//! # Invariants
//! - Frames are listed in insertion order.
//! - Deleting a frame that still owns circles fails with
//!   [`RepoError::FrameReferenced`]; nothing cascades.

use crate::model::frame::{Frame, FrameId};
use crate::repo::store::{
    parse_stored_decimal, parse_uuid, RepoError, RepoResult, SqliteRegionStore,
};
use rusqlite::{ffi, params, ErrorCode, OptionalExtension, Row};

const FRAME_SELECT_SQL: &str = "SELECT
    uuid,
    center_x,
    center_y,
    width,
    height
FROM frames";

/// Store capabilities over persisted frames.
pub trait FrameRepository {
    fn insert_frame(&self, frame: &Frame) -> RepoResult<()>;
    fn update_frame(&self, frame: &Frame) -> RepoResult<()>;
    fn delete_frame(&self, id: FrameId) -> RepoResult<()>;
    fn get_frame(&self, id: FrameId) -> RepoResult<Option<Frame>>;
    /// Lists every frame, optionally leaving one out.
    fn list_frames(&self, except: Option<FrameId>) -> RepoResult<Vec<Frame>>;
}

impl FrameRepository for SqliteRegionStore<'_> {
    fn insert_frame(&self, frame: &Frame) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO frames (
                uuid,
                center_x,
                center_y,
                width,
                height
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                frame.id.to_string(),
                frame.center_x.to_string(),
                frame.center_y.to_string(),
                frame.width.to_string(),
                frame.height.to_string(),
            ],
        )?;
        Ok(())
    }

    fn update_frame(&self, frame: &Frame) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE frames
             SET
                center_x = ?1,
                center_y = ?2,
                width = ?3,
                height = ?4,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?5;",
            params![
                frame.center_x.to_string(),
                frame.center_y.to_string(),
                frame.width.to_string(),
                frame.height.to_string(),
                frame.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::FrameNotFound(frame.id));
        }
        Ok(())
    }

    fn delete_frame(&self, id: FrameId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM frames WHERE uuid = ?1;", [id.to_string()])
            .map_err(|err| match err {
                rusqlite::Error::SqliteFailure(failure, _)
                    if failure.code == ErrorCode::ConstraintViolation
                        && failure.extended_code == ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
                {
                    RepoError::FrameReferenced(id)
                }
                other => other.into(),
            })?;

        if changed == 0 {
            return Err(RepoError::FrameNotFound(id));
        }
        Ok(())
    }

    fn get_frame(&self, id: FrameId) -> RepoResult<Option<Frame>> {
        self.conn
            .query_row(
                &format!("{FRAME_SELECT_SQL} WHERE uuid = ?1;"),
                [id.to_string()],
                RawFrame::from_row,
            )
            .optional()?
            .map(RawFrame::into_frame)
            .transpose()
    }

    fn list_frames(&self, except: Option<FrameId>) -> RepoResult<Vec<Frame>> {
        let mut stmt = self.conn.prepare(&format!(
            "{FRAME_SELECT_SQL}
             WHERE ?1 IS NULL OR uuid <> ?1
             ORDER BY rowid ASC;"
        ))?;

        let mut rows = stmt.query([except.map(|id| id.to_string())])?;
        let mut frames = Vec::new();
        while let Some(row) = rows.next()? {
            frames.push(RawFrame::from_row(row)?.into_frame()?);
        }
        Ok(frames)
    }
}

/// Text columns of one `frames` row before decimal parsing.
struct RawFrame {
    uuid: String,
    center_x: String,
    center_y: String,
    width: String,
    height: String,
}

impl RawFrame {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            uuid: row.get("uuid")?,
            center_x: row.get("center_x")?,
            center_y: row.get("center_y")?,
            width: row.get("width")?,
            height: row.get("height")?,
        })
    }

    fn into_frame(self) -> RepoResult<Frame> {
        Ok(Frame {
            id: parse_uuid(&self.uuid, "frames.uuid")?,
            center_x: parse_stored_decimal(&self.center_x, "frames.center_x")?,
            center_y: parse_stored_decimal(&self.center_y, "frames.center_y")?,
            width: parse_stored_decimal(&self.width, "frames.width")?,
            height: parse_stored_decimal(&self.height, "frames.height")?,
        })
    }
}
