//! [`SqliteStore`] — the SQLite implementation of [`ExpeditionStore`].

use std::path::Path;

use chrono::{NaiveDate, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use clairiere_core::{
  Result, StoreError,
  expedition::{Expedition, ExpeditionSummary},
  expeditioner::Expeditioner,
  store::ExpeditionStore,
  subscriber::EmailSubscriber,
};

use crate::{
  encode::{
    RawExpedition, RawExpeditionSummary, RawExpeditioner, encode_date,
    encode_dt, encode_uuid,
  },
  error::{Error, is_unique_violation},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An expedition store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All writes
/// funnel through one connection, so the UNIQUE constraints in the schema
/// are the final arbiter for concurrent identical requests.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self, Error> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<(), Error> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── ExpeditionStore impl ────────────────────────────────────────────────────

impl ExpeditionStore for SqliteStore {
  // ── Subscribers ───────────────────────────────────────────────────────────

  async fn add_subscriber(&self, email: String) -> Result<EmailSubscriber> {
    let subscriber = EmailSubscriber {
      id:         Uuid::new_v4(),
      email:      email.clone(),
      created_at: Utc::now(),
    };

    let id_str = encode_uuid(subscriber.id);
    let at_str = encode_dt(subscriber.created_at);
    let email_param = email.clone();

    let res = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO subscribers (subscriber_id, email, created_at)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![id_str, email_param, at_str],
        )?;
        Ok(())
      })
      .await;

    match res {
      Ok(()) => Ok(subscriber),
      Err(e) if is_unique_violation(&e) => {
        Err(StoreError::DuplicateEmail(email))
      }
      Err(e) => Err(Error::Database(e).into()),
    }
  }

  // ── Expeditions ───────────────────────────────────────────────────────────

  async fn add_expedition(&self, name: String) -> Result<Expedition> {
    let expedition = Expedition {
      id: Uuid::new_v4(),
      name,
      created_at: Utc::now(),
    };

    let id_str   = encode_uuid(expedition.id);
    let name_str = expedition.name.clone();
    let at_str   = encode_dt(expedition.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO expeditions (expedition_id, name, created_at)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![id_str, name_str, at_str],
        )?;
        Ok(())
      })
      .await
      .map_err(Error::Database)?;

    Ok(expedition)
  }

  async fn list_expeditions(&self) -> Result<Vec<Expedition>> {
    let raws: Vec<RawExpedition> = self
      .conn
      .call(|conn| {
        // rowid breaks created-at ties for rows inserted in the same instant.
        let mut stmt = conn.prepare(
          "SELECT expedition_id, name, created_at FROM expeditions
           ORDER BY created_at DESC, rowid DESC",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawExpedition {
              expedition_id: row.get(0)?,
              name:          row.get(1)?,
              created_at:    row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(Error::Database)?;

    raws
      .into_iter()
      .map(|r| r.into_expedition().map_err(StoreError::from))
      .collect()
  }

  async fn latest_expedition(&self) -> Result<Option<Expedition>> {
    let raw: Option<RawExpedition> = self
      .conn
      .call(|conn| {
        Ok(
          conn
            .query_row(
              "SELECT expedition_id, name, created_at FROM expeditions
               ORDER BY created_at DESC, rowid DESC LIMIT 1",
              [],
              |row| {
                Ok(RawExpedition {
                  expedition_id: row.get(0)?,
                  name:          row.get(1)?,
                  created_at:    row.get(2)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await
      .map_err(Error::Database)?;

    raw
      .map(|r| r.into_expedition().map_err(StoreError::from))
      .transpose()
  }

  async fn get_expedition(&self, id: Uuid) -> Result<Option<ExpeditionSummary>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawExpeditionSummary> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT e.expedition_id, e.name, e.created_at,
                      (SELECT COUNT(*) FROM memberships m
                        WHERE m.expedition_id = e.expedition_id)
               FROM expeditions e
               WHERE e.expedition_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawExpeditionSummary {
                  expedition_id:      row.get(0)?,
                  name:               row.get(1)?,
                  created_at:         row.get(2)?,
                  expeditioner_count: row.get(3)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await
      .map_err(Error::Database)?;

    raw
      .map(|r| r.into_summary().map_err(StoreError::from))
      .transpose()
  }

  async fn delete_expedition(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);

    // ON DELETE CASCADE clears the memberships; expeditioner records stay.
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM expeditions WHERE expedition_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await
      .map_err(Error::Database)?;

    if deleted == 0 {
      return Err(StoreError::ExpeditionNotFound(id));
    }
    Ok(())
  }

  // ── Expeditioners ─────────────────────────────────────────────────────────

  async fn create_expeditioner(
    &self,
    name: String,
    birthday: NaiveDate,
  ) -> Result<Expeditioner> {
    let expeditioner = Expeditioner {
      id: Uuid::new_v4(),
      name: name.clone(),
      birthday,
      created_at: Utc::now(),
    };

    let id_str       = encode_uuid(expeditioner.id);
    let name_param   = name.clone();
    let birthday_str = encode_date(birthday);
    let at_str       = encode_dt(expeditioner.created_at);

    let res = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO expeditioners (expeditioner_id, name, birthday, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, name_param, birthday_str, at_str],
        )?;
        Ok(())
      })
      .await;

    match res {
      Ok(()) => Ok(expeditioner),
      Err(e) if is_unique_violation(&e) => {
        Err(StoreError::DuplicateExpeditioner { name, birthday })
      }
      Err(e) => Err(Error::Database(e).into()),
    }
  }

  async fn find_expeditioner(
    &self,
    name: String,
    birthday: NaiveDate,
  ) -> Result<Option<Expeditioner>> {
    let birthday_str = encode_date(birthday);

    let raw: Option<RawExpeditioner> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT expeditioner_id, name, birthday, created_at
               FROM expeditioners WHERE name = ?1 AND birthday = ?2",
              rusqlite::params![name, birthday_str],
              |row| {
                Ok(RawExpeditioner {
                  expeditioner_id: row.get(0)?,
                  name:            row.get(1)?,
                  birthday:        row.get(2)?,
                  created_at:      row.get(3)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await
      .map_err(Error::Database)?;

    raw
      .map(|r| r.into_expeditioner().map_err(StoreError::from))
      .transpose()
  }

  async fn get_expeditioner(&self, id: Uuid) -> Result<Option<Expeditioner>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawExpeditioner> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT expeditioner_id, name, birthday, created_at
               FROM expeditioners WHERE expeditioner_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawExpeditioner {
                  expeditioner_id: row.get(0)?,
                  name:            row.get(1)?,
                  birthday:        row.get(2)?,
                  created_at:      row.get(3)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await
      .map_err(Error::Database)?;

    raw
      .map(|r| r.into_expeditioner().map_err(StoreError::from))
      .transpose()
  }

  // ── Memberships ───────────────────────────────────────────────────────────

  async fn add_membership(
    &self,
    expeditioner_id: Uuid,
    expedition_id: Uuid,
  ) -> Result<bool> {
    let er_str = encode_uuid(expeditioner_id);
    let ex_str = encode_uuid(expedition_id);
    let at_str = encode_dt(Utc::now());

    // The upsert form of the join: a concurrent duplicate relation is
    // swallowed here instead of erroring anywhere up the stack.
    let inserted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "INSERT OR IGNORE INTO memberships
             (expeditioner_id, expedition_id, created_at)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![er_str, ex_str, at_str],
        )?)
      })
      .await
      .map_err(Error::Database)?;

    Ok(inserted > 0)
  }

  async fn is_member(
    &self,
    expeditioner_id: Uuid,
    expedition_id: Uuid,
  ) -> Result<bool> {
    let er_str = encode_uuid(expeditioner_id);
    let ex_str = encode_uuid(expedition_id);

    let found: bool = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM memberships
               WHERE expeditioner_id = ?1 AND expedition_id = ?2",
              rusqlite::params![er_str, ex_str],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await
      .map_err(Error::Database)?;

    Ok(found)
  }

  async fn expeditions_for(
    &self,
    expeditioner_id: Uuid,
  ) -> Result<Vec<ExpeditionSummary>> {
    let er_str = encode_uuid(expeditioner_id);

    let raws: Vec<RawExpeditionSummary> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT e.expedition_id, e.name, e.created_at,
                  (SELECT COUNT(*) FROM memberships m2
                    WHERE m2.expedition_id = e.expedition_id)
           FROM expeditions e
           JOIN memberships m ON m.expedition_id = e.expedition_id
           WHERE m.expeditioner_id = ?1
           ORDER BY e.created_at DESC, e.rowid DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![er_str], |row| {
            Ok(RawExpeditionSummary {
              expedition_id:      row.get(0)?,
              name:               row.get(1)?,
              created_at:         row.get(2)?,
              expeditioner_count: row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(Error::Database)?;

    raws
      .into_iter()
      .map(|r| r.into_summary().map_err(StoreError::from))
      .collect()
  }
}
