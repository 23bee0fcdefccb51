//! Cities (`cidades`): a name and a state code.
//!
//! The collection lives at `/cidades` and single cities at `/cidade/{id}`.

use serde::{Deserialize, Serialize};

use crate::db::{FromRow, Handle, params};
use crate::response::{self, msg};
use crate::router::Router;
use crate::{Error, Module, Result};

/// A row of the `cidades` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub id_cidade: i64,
    pub nome_cidade: String,
    pub uf_cidade: String,
}

impl FromRow for City {
    fn from_row(row: &libsql::Row) -> Result<Self> {
        Ok(Self {
            id_cidade: row.get(0)?,
            nome_cidade: row.get(1)?,
            uf_cidade: row.get(2)?,
        })
    }
}

/// Request body for create and update.
#[derive(Debug, Default, Deserialize)]
pub struct CityInput {
    pub nome_cidade: Option<String>,
    pub uf_cidade: Option<String>,
}

/// A validated set of city fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityFields {
    pub nome_cidade: String,
    pub uf_cidade: String,
}

impl CityInput {
    pub fn validate(self) -> Result<CityFields> {
        let nome_cidade = self
            .nome_cidade
            .filter(|n| !n.is_empty())
            .ok_or(Error::MissingField {
                field: "nome_cidade",
                message: "Nome da cidade é obrigatório",
            })?;
        let uf_cidade = self
            .uf_cidade
            .filter(|u| !u.is_empty())
            .ok_or(Error::MissingField {
                field: "uf_cidade",
                message: "UF da cidade é obrigatória",
            })?;
        Ok(CityFields {
            nome_cidade,
            uf_cidade,
        })
    }
}

pub async fn create(db: &Handle, fields: &CityFields) -> Result<i64> {
    db.insert(
        "INSERT INTO cidades (nome_cidade, uf_cidade) VALUES (?1, ?2)",
        params![fields.nome_cidade.as_str(), fields.uf_cidade.as_str()],
    )
    .await
}

pub async fn list(db: &Handle) -> Result<Vec<City>> {
    db.fetch_all(
        "SELECT id_cidade, nome_cidade, uf_cidade FROM cidades ORDER BY id_cidade",
        (),
    )
    .await
}

pub async fn get(db: &Handle, id: i64) -> Result<City> {
    db.fetch_optional(
        "SELECT id_cidade, nome_cidade, uf_cidade FROM cidades WHERE id_cidade = ?1",
        params![id],
    )
    .await?
    .ok_or(Error::IdNotFound(id))
}

pub async fn update(db: &Handle, id: i64, fields: &CityFields) -> Result<()> {
    let changed = db
        .execute(
            "UPDATE cidades SET nome_cidade = ?1, uf_cidade = ?2 WHERE id_cidade = ?3",
            params![fields.nome_cidade.as_str(), fields.uf_cidade.as_str(), id],
        )
        .await?;
    if changed == 0 {
        return Err(Error::IdNotFound(id));
    }
    Ok(())
}

pub async fn delete(db: &Handle, id: i64) -> Result<()> {
    let changed = db
        .execute("DELETE FROM cidades WHERE id_cidade = ?1", params![id])
        .await?;
    if changed == 0 {
        return Err(Error::IdNotFound(id));
    }
    Ok(())
}

/// Routes for `/cidades` and `/cidade/{id}`.
pub struct Cities;

impl Module for Cities {
    fn name(&self) -> &'static str {
        "cidades"
    }

    fn routes(&self, router: &mut Router) {
        router.get("/cidades", |ctx| async move {
            response::ok(&list(&ctx.db).await?)
        });

        router.post("/cidades", |ctx| async move {
            let fields = ctx.json::<CityInput>()?.validate()?;
            let id = create(&ctx.db, &fields).await?;
            tracing::info!("City {id} created");
            response::created(&serde_json::json!({
                "message": msg::CREATED,
                "id_cidade": id,
            }))
        });

        router.get("/cidade/{id}", |ctx| async move {
            let id = ctx.id_param("id")?;
            response::ok(&get(&ctx.db, id).await?)
        });

        router.put("/cidade/{id}", |ctx| async move {
            let id = ctx.id_param("id")?;
            let fields = ctx.json::<CityInput>()?.validate()?;
            update(&ctx.db, id, &fields).await?;
            tracing::info!("City {id} updated");
            response::message(msg::UPDATED)
        });

        router.delete("/cidade/{id}", |ctx| async move {
            let id = ctx.id_param("id")?;
            delete(&ctx.db, id).await?;
            tracing::info!("City {id} deleted");
            response::message(msg::DELETED)
        });
    }
}
