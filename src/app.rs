use actix_web::{web, HttpResponse};

use crate::client::JwkClient;
use crate::config::Config;
use crate::error::Error;

pub async fn main(config: Config) -> std::io::Result<actix_web::dev::Server> {
    let listener = match listenfd::ListenFd::from_env().take_tcp_listener(0)? {
        Some(listener) => listener,
        None => std::net::TcpListener::bind(config.bind.clone())?,
    };
    run(config, listener, false).await
}

pub async fn run(
    config: Config,
    listener: std::net::TcpListener,
    is_test: bool,
) -> std::io::Result<actix_web::dev::Server> {
    let client = config
        .jwk_client()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    log::info!("action=start jwks_uri={}", client.uri());

    let client = web::Data::new(client);

    let server = actix_web::HttpServer::new(move || {
        let logger = actix_web::middleware::Logger::new(
            r#"status=%s request="%r" ip=%{r}a peer=%a id=%{x-request-id}i jwk-client-action=%{x-jwk-client-action}o jwk-client-error=%{x-jwk-client-error}o runtime=%T size=%b ua="%{User-Agent}i""#,
        );
        actix_web::App::new()
            .wrap(logger)
            .app_data(client.clone())
            .service(index)
            .service(serve_key)
            .service(serve_token_key)
    });
    let server = if is_test {
        server.workers(1).disable_signals().system_exit()
    } else {
        server
    };
    let server = server.listen(listener)?.run();
    Ok(server)
}

#[actix_web::get("/")]
async fn index() -> actix_web::Result<HttpResponse> {
    Ok(HttpResponse::Ok().body("jwk-client"))
}

#[actix_web::get("/v1/keys/{kid}")]
async fn serve_key(
    client: web::Data<JwkClient>,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let kid = path.into_inner();
    let key = client.get_key(&kid).await?;

    Ok(HttpResponse::Ok()
        .insert_header(("x-jwk-client-action", "resolve-kid"))
        .json(key))
}

#[actix_web::get("/v1/token/key")]
async fn serve_token_key(
    client: web::Data<JwkClient>,
    req: actix_web::HttpRequest,
) -> Result<HttpResponse, Error> {
    let key = client.resolve_for_request(&req).await?;

    Ok(HttpResponse::Ok()
        .insert_header(("x-jwk-client-action", "resolve-token"))
        .json(key))
}
