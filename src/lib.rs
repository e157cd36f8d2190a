pub mod bedrock;
pub mod error;
pub mod form;
pub mod models;
pub mod render;
pub mod routes;

use worker::{Context, Env, Request, Response, Result, event};

#[event(fetch)]
async fn fetch(req: Request, env: Env, ctx: Context) -> Result<Response> {
    routes::handle(req, env, ctx).await
}
