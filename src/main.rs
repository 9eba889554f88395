use actix_web::{get, middleware::Logger, web, App, HttpResponse, HttpServer, Responder};

use edupanel_server::{
    app_state::AppState,
    config::Config,
    handlers::{gradebook_handler, session_handler},
};

#[get("/health")]
async fn health(state: web::Data<AppState>) -> impl Responder {
    match state.db.health_check().await {
        Ok(()) => HttpResponse::Ok().body("ok"),
        Err(err) => HttpResponse::ServiceUnavailable().body(err.to_string()),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let host = config.web_server_host.clone();
    let port = config.web_server_port;

    let state = AppState::new(config)
        .await
        .expect("failed to initialize application state");

    log::info!("starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(Logger::default())
            .service(health)
            .service(session_handler::start_session)
            .service(session_handler::get_session)
            .service(session_handler::record_answer)
            .service(session_handler::navigate)
            .service(session_handler::submit)
            .service(session_handler::restart)
            .service(session_handler::leave)
            .service(gradebook_handler::gradebook)
            .service(gradebook_handler::attempt_history)
            .service(gradebook_handler::quiz_results)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
