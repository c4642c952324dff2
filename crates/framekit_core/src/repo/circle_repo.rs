//! Circle repository contract and SQLite implementation.
//!
//! # Invariants
//! - Circles are listed in insertion order.
//! - `frame_uuid` is written once on insert and never updated.

use crate::model::circle::{Circle, CircleId};
use crate::model::frame::FrameId;
use crate::repo::store::{
    parse_stored_decimal, parse_uuid, RepoError, RepoResult, SqliteRegionStore,
};
use rusqlite::{params, OptionalExtension, Row};

const CIRCLE_SELECT_SQL: &str = "SELECT
    uuid,
    frame_uuid,
    center_x,
    center_y,
    radius
FROM circles";

/// Store capabilities over persisted circles.
pub trait CircleRepository {
    fn insert_circle(&self, circle: &Circle) -> RepoResult<()>;
    /// Rewrites geometry only; the owning frame is left untouched.
    fn update_circle(&self, circle: &Circle) -> RepoResult<()>;
    fn delete_circle(&self, id: CircleId) -> RepoResult<()>;
    fn get_circle(&self, id: CircleId) -> RepoResult<Option<Circle>>;
    /// Lists circles, optionally restricted to one frame and leaving one out.
    fn list_circles(
        &self,
        frame_id: Option<FrameId>,
        except: Option<CircleId>,
    ) -> RepoResult<Vec<Circle>>;
    fn count_circles(&self, frame_id: FrameId) -> RepoResult<usize>;
}

impl CircleRepository for SqliteRegionStore<'_> {
    fn insert_circle(&self, circle: &Circle) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO circles (
                uuid,
                frame_uuid,
                center_x,
                center_y,
                radius
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                circle.id.to_string(),
                circle.frame_id.to_string(),
                circle.center_x.to_string(),
                circle.center_y.to_string(),
                circle.radius.to_string(),
            ],
        )?;
        Ok(())
    }

    fn update_circle(&self, circle: &Circle) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE circles
             SET
                center_x = ?1,
                center_y = ?2,
                radius = ?3,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?4;",
            params![
                circle.center_x.to_string(),
                circle.center_y.to_string(),
                circle.radius.to_string(),
                circle.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::CircleNotFound(circle.id));
        }
        Ok(())
    }

    fn delete_circle(&self, id: CircleId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM circles WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::CircleNotFound(id));
        }
        Ok(())
    }

    fn get_circle(&self, id: CircleId) -> RepoResult<Option<Circle>> {
        self.conn
            .query_row(
                &format!("{CIRCLE_SELECT_SQL} WHERE uuid = ?1;"),
                [id.to_string()],
                RawCircle::from_row,
            )
            .optional()?
            .map(RawCircle::into_circle)
            .transpose()
    }

    fn list_circles(
        &self,
        frame_id: Option<FrameId>,
        except: Option<CircleId>,
    ) -> RepoResult<Vec<Circle>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CIRCLE_SELECT_SQL}
             WHERE (?1 IS NULL OR frame_uuid = ?1)
               AND (?2 IS NULL OR uuid <> ?2)
             ORDER BY rowid ASC;"
        ))?;

        let mut rows = stmt.query(params![
            frame_id.map(|id| id.to_string()),
            except.map(|id| id.to_string()),
        ])?;
        let mut circles = Vec::new();
        while let Some(row) = rows.next()? {
            circles.push(RawCircle::from_row(row)?.into_circle()?);
        }
        Ok(circles)
    }

    fn count_circles(&self, frame_id: FrameId) -> RepoResult<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM circles WHERE frame_uuid = ?1;",
            [frame_id.to_string()],
            |row| row.get(0),
        )?;
        usize::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("invalid circle count `{count}`")))
    }
}

struct RawCircle {
    uuid: String,
    frame_uuid: String,
    center_x: String,
    center_y: String,
    radius: String,
}

impl RawCircle {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            uuid: row.get("uuid")?,
            frame_uuid: row.get("frame_uuid")?,
            center_x: row.get("center_x")?,
            center_y: row.get("center_y")?,
            radius: row.get("radius")?,
        })
    }

    fn into_circle(self) -> RepoResult<Circle> {
        Ok(Circle {
            id: parse_uuid(&self.uuid, "circles.uuid")?,
            frame_id: parse_uuid(&self.frame_uuid, "circles.frame_uuid")?,
            center_x: parse_stored_decimal(&self.center_x, "circles.center_x")?,
            center_y: parse_stored_decimal(&self.center_y, "circles.center_y")?,
            radius: parse_stored_decimal(&self.radius, "circles.radius")?,
        })
    }
}
