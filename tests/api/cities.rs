//! `/cidades` and `/cidade/{id}` endpoints.

use std::collections::HashSet;

use serde_json::json;

use super::{delete, get, post, put, start};

#[tokio::test]
async fn create_then_read_back() {
    let server = start().await;
    let addr = server.addr();

    let created = post(
        addr,
        "/cidades",
        json!({ "nome_cidade": "Olinda", "uf_cidade": "PE" }),
    )
    .await;
    assert_eq!(created.status, 201, "{}", created.body);
    let id = created.json()["id_cidade"].as_i64().unwrap();

    let one = get(addr, &format!("/cidade/{id}")).await;
    let all = get(addr, "/cidades").await;
    server.shutdown().await.unwrap();

    let expected = json!({ "id_cidade": id, "nome_cidade": "Olinda", "uf_cidade": "PE" });
    assert_eq!(one.status, 200);
    assert_eq!(one.json(), expected);
    assert_eq!(all.json(), json!([expected]));
}

#[tokio::test]
async fn empty_fields_are_rejected_without_inserting() {
    let server = start().await;
    let addr = server.addr();

    let no_uf = post(
        addr,
        "/cidades",
        json!({ "nome_cidade": "Olinda", "uf_cidade": "" }),
    )
    .await;
    let no_name = post(addr, "/cidades", json!({ "uf_cidade": "PE" })).await;
    let all = get(addr, "/cidades").await;
    server.shutdown().await.unwrap();

    assert_eq!(no_uf.status, 400);
    assert_eq!(no_uf.json()["error"], "UF da cidade é obrigatória");
    assert_eq!(no_name.status, 400);
    assert_eq!(no_name.json()["error"], "Nome da cidade é obrigatório");
    assert_eq!(all.json(), json!([]));
}

#[tokio::test]
async fn update_and_delete() {
    let server = start().await;
    let addr = server.addr();

    let id = post(
        addr,
        "/cidades",
        json!({ "nome_cidade": "Olinda", "uf_cidade": "PE" }),
    )
    .await
    .json()["id_cidade"]
        .as_i64()
        .unwrap();
    let path = format!("/cidade/{id}");

    let updated = put(
        addr,
        &path,
        json!({ "nome_cidade": "João Pessoa", "uf_cidade": "PB" }),
    )
    .await;
    let after_update = get(addr, &path).await;
    let deleted = delete(addr, &path).await;
    let after_delete = get(addr, &path).await;
    server.shutdown().await.unwrap();

    assert_eq!(updated.status, 200);
    assert_eq!(
        after_update.json(),
        json!({ "id_cidade": id, "nome_cidade": "João Pessoa", "uf_cidade": "PB" })
    );
    assert_eq!(deleted.status, 200);
    assert_eq!(after_delete.status, 404);
    assert_eq!(after_delete.json()["error"], "ID não encontrado");
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let server = start().await;
    let addr = server.addr();

    let updated = put(
        addr,
        "/cidade/42",
        json!({ "nome_cidade": "Natal", "uf_cidade": "RN" }),
    )
    .await;
    let deleted = delete(addr, "/cidade/42").await;
    let all = get(addr, "/cidades").await;
    server.shutdown().await.unwrap();

    assert_eq!(updated.status, 404);
    assert_eq!(deleted.status, 404);
    assert_eq!(all.json(), json!([]));
}

#[tokio::test]
async fn collection_path_rejects_other_methods() {
    let server = start().await;
    let addr = server.addr();

    let reply = delete(addr, "/cidades").await;
    let singular_list = get(addr, "/cidade").await;
    server.shutdown().await.unwrap();

    assert_eq!(reply.status, 405);
    assert_eq!(reply.json()["error"], "Method not allowed");
    assert_eq!(singular_list.status, 404);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_get_distinct_ids() {
    const CLIENTS: usize = 25;

    let server = start().await;
    let addr = server.addr();

    let tasks: Vec<_> = (0..CLIENTS)
        .map(|i| {
            tokio::spawn(async move {
                post(
                    addr,
                    "/cidades",
                    json!({ "nome_cidade": format!("Cidade {i}"), "uf_cidade": "PE" }),
                )
                .await
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for task in tasks {
        let reply = task.await.unwrap();
        assert_eq!(reply.status, 201, "{}", reply.body);
        ids.insert(reply.json()["id_cidade"].as_i64().unwrap());
    }

    let all = get(addr, "/cidades").await;
    server.shutdown().await.unwrap();

    assert_eq!(ids.len(), CLIENTS);
    assert_eq!(all.json().as_array().unwrap().len(), CLIENTS);
}
