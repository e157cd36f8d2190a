use compass_matrix::pipeline::{AnalysisInput, AnalysisReport, Pipeline, WAITING_FOR_INPUTS};
use compass_matrix::{ModelChoice, ModelConfig};
use serde::Serialize;
use worker::{Context, Env, Request, Response, Result, RouteContext, Router};

use crate::bedrock::{BedrockSettings, BedrockTransport};
use crate::error::ApiError;
use crate::form::{AnalysisForm, parse_model_config, read_analysis_form};
use crate::models::{AnalysisResponse, ModelsResponse};
use crate::render;

pub async fn handle(req: Request, env: Env, _ctx: Context) -> Result<Response> {
    Router::new()
        .get("/", index_route)
        .post_async("/analyze", analyze_page_route)
        .post_async("/api/v1/analyze", analyze_api_route)
        .get("/api/v1/models", models_route)
        .run(req, env)
        .await
}

fn index_route(_req: Request, _ctx: RouteContext<()>) -> Result<Response> {
    html_response(render::render_index(), 200)
}

fn models_route(_req: Request, _ctx: RouteContext<()>) -> Result<Response> {
    json_response(&ModelsResponse::current())
}

async fn analyze_page_route(mut req: Request, ctx: RouteContext<()>) -> Result<Response> {
    match analyze_request(&mut req, &ctx.env).await {
        Ok((report, model)) => html_response(render::render_report(&report, model), 200),
        Err(error) => {
            worker::console_error!("analyze page failed: {error}");
            html_response(render::render_error(error.message()), error.status_code())
        }
    }
}

async fn analyze_api_route(mut req: Request, ctx: RouteContext<()>) -> Result<Response> {
    match analyze_api_response(&mut req, &ctx.env).await {
        Ok(response) => json_response(&response),
        Err(error) => {
            worker::console_error!("analyze api failed: {error}");
            error.into_response()
        }
    }
}

async fn analyze_api_response(req: &mut Request, env: &Env) -> Result<AnalysisResponse, ApiError> {
    let form = read_analysis_form(req).await?;
    if form.uploads().is_none() {
        return Err(ApiError::MissingInput(WAITING_FOR_INPUTS.to_string()));
    }

    let (report, model) = analyze_form(&form, env).await?;
    Ok(AnalysisResponse::from_report(&report, model))
}

async fn analyze_request(
    req: &mut Request,
    env: &Env,
) -> Result<(AnalysisReport, ModelChoice), ApiError> {
    let form = read_analysis_form(req).await?;
    analyze_form(&form, env).await
}

/// Waiting report until both files are present, then one full pipeline run.
async fn analyze_form(
    form: &AnalysisForm,
    env: &Env,
) -> Result<(AnalysisReport, ModelChoice), ApiError> {
    let config: ModelConfig = parse_model_config(&form.fields)?;
    let Some((document, questions)) = form.uploads() else {
        return Ok((AnalysisReport::waiting(), config.model));
    };

    let settings = BedrockSettings::from_env(env)?;
    worker::console_log!(
        "analyze model={} document_bytes={} questions_bytes={}",
        config.model.id(),
        document.len(),
        questions.len()
    );

    let pipeline = Pipeline::new(BedrockTransport::new(settings));
    let report = pipeline
        .analyze(&AnalysisInput {
            document,
            questions,
            config: &config,
        })
        .await;

    worker::console_log!("analyze outcome={:?}", report.outcome);
    Ok((report, config.model))
}

fn html_response(body: String, status: u16) -> Result<Response> {
    let mut response = Response::from_html(body)?;
    response.headers_mut().set("Cache-Control", "no-store")?;
    Ok(response.with_status(status))
}

fn json_response<T>(payload: &T) -> Result<Response>
where
    T: Serialize,
{
    let mut response = Response::from_json(payload)?;
    response.headers_mut().set("Cache-Control", "no-store")?;
    Ok(response)
}
