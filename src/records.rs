//! Generic records (`dados`): a name and an age.

use serde::{Deserialize, Serialize};

use crate::db::{FromRow, Handle, params};
use crate::response::{self, msg};
use crate::router::Router;
use crate::{Error, Module, Result};

/// A row of the `dados` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: i64,
    pub nome: String,
    pub idade: i64,
}

impl FromRow for Record {
    fn from_row(row: &libsql::Row) -> Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            nome: row.get(1)?,
            idade: row.get(2)?,
        })
    }
}

/// Request body for create and update.
///
/// Fields are optional so an absent field is reported as missing rather
/// than as a malformed body.
#[derive(Debug, Default, Deserialize)]
pub struct RecordInput {
    pub nome: Option<String>,
    pub idade: Option<i64>,
}

/// A validated set of record fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFields {
    pub nome: String,
    pub idade: i64,
}

impl RecordInput {
    /// Empty strings and zero count as missing.
    pub fn validate(self) -> Result<RecordFields> {
        let nome = self
            .nome
            .filter(|n| !n.is_empty())
            .ok_or(Error::MissingField {
                field: "nome",
                message: "Nome é obrigatório",
            })?;
        let idade = self
            .idade
            .filter(|&i| i != 0)
            .ok_or(Error::MissingField {
                field: "idade",
                message: "Idade é obrigatória",
            })?;
        Ok(RecordFields { nome, idade })
    }
}

pub async fn create(db: &Handle, fields: &RecordFields) -> Result<i64> {
    db.insert(
        "INSERT INTO dados (nome, idade) VALUES (?1, ?2)",
        params![fields.nome.as_str(), fields.idade],
    )
    .await
}

pub async fn list(db: &Handle) -> Result<Vec<Record>> {
    db.fetch_all("SELECT id, nome, idade FROM dados ORDER BY id", ())
        .await
}

pub async fn get(db: &Handle, id: i64) -> Result<Record> {
    db.fetch_optional(
        "SELECT id, nome, idade FROM dados WHERE id = ?1",
        params![id],
    )
    .await?
    .ok_or(Error::IdNotFound(id))
}

pub async fn update(db: &Handle, id: i64, fields: &RecordFields) -> Result<()> {
    let changed = db
        .execute(
            "UPDATE dados SET nome = ?1, idade = ?2 WHERE id = ?3",
            params![fields.nome.as_str(), fields.idade, id],
        )
        .await?;
    if changed == 0 {
        return Err(Error::IdNotFound(id));
    }
    Ok(())
}

pub async fn delete(db: &Handle, id: i64) -> Result<()> {
    let changed = db
        .execute("DELETE FROM dados WHERE id = ?1", params![id])
        .await?;
    if changed == 0 {
        return Err(Error::IdNotFound(id));
    }
    Ok(())
}

/// Routes for `/dados`.
pub struct Records;

impl Module for Records {
    fn name(&self) -> &'static str {
        "dados"
    }

    fn routes(&self, router: &mut Router) {
        router.post("/dados", |ctx| async move {
            let fields = ctx.json::<RecordInput>()?.validate()?;
            let id = create(&ctx.db, &fields).await?;
            tracing::info!("Record {id} created");
            response::created(&serde_json::json!({
                "message": msg::CREATED,
                "id": id,
            }))
        });

        router.get("/dados", |ctx| async move {
            response::ok(&list(&ctx.db).await?)
        });

        router.get("/dados/{id}", |ctx| async move {
            let id = ctx.id_param("id")?;
            response::ok(&get(&ctx.db, id).await?)
        });

        router.put("/dados/{id}", |ctx| async move {
            let id = ctx.id_param("id")?;
            let fields = ctx.json::<RecordInput>()?.validate()?;
            update(&ctx.db, id, &fields).await?;
            tracing::info!("Record {id} updated");
            response::message(msg::UPDATED)
        });

        router.delete("/dados/{id}", |ctx| async move {
            let id = ctx.id_param("id")?;
            delete(&ctx.db, id).await?;
            tracing::info!("Record {id} deleted");
            response::message(msg::DELETED)
        });
    }
}
