#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = envy::prefixed("JWK_CLIENT_")
        .from_env::<jwk_client::config::Config>()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    jwk_client::app::main(config).await?.await
}
