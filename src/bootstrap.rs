//! Usage page and on-demand schema setup.

use crate::response::{self, msg};
use crate::router::Router;
use crate::Module;

const USAGE: &str = r#"<h1>Bem vindo à API</h1>
<p>Esta API permite que você execute operações nas tabelas 'dados' e 'cidades'.</p>
<p>Rotas disponíveis</p>
<ul>
    <li>GET /initdb - Cria as tabelas, se ainda não existirem.</li>
    <li>POST /dados - Adiciona um novo dado. Envie um JSON com os campos 'nome' e 'idade'.</li>
    <li>GET /dados - Retorna todos os dados da tabela.</li>
    <li>GET /dados/{id} - Retorna um dado em específico.</li>
    <li>PUT /dados/{id} - Atualiza um dado existente. Envie um JSON com os campos 'nome' e 'idade'.</li>
    <li>DELETE /dados/{id} - Deleta um dado existente.</li>
    <li>POST /cidades - Adiciona uma cidade. Envie um JSON com os campos 'nome_cidade' e 'uf_cidade'.</li>
    <li>GET /cidades - Retorna todas as cidades.</li>
    <li>GET /cidade/{id} - Retorna uma cidade em específico.</li>
    <li>PUT /cidade/{id} - Atualiza uma cidade existente.</li>
    <li>DELETE /cidade/{id} - Deleta uma cidade existente.</li>
</ul>
"#;

/// Routes for `/` and `/initdb`.
pub struct Bootstrap;

impl Module for Bootstrap {
    fn name(&self) -> &'static str {
        "bootstrap"
    }

    fn routes(&self, router: &mut Router) {
        router.get("/", |_ctx| async move { Ok(response::html(USAGE)) });

        router.get("/initdb", |ctx| async move {
            ctx.db.init_schema().await?;
            tracing::info!("Schema applied to {}", ctx.config.database.url);
            response::message(msg::SCHEMA_READY)
        });
    }
}
