mod app;
mod ui;

use std::sync::Arc;

use adw::prelude::*;
use anyhow::Context;
use relm4::prelude::*;
use tracing_subscriber::EnvFilter;

use banter::api::{GraphQlClient, ReqwestTransport};
use banter::config::{ApiConfig, APP_ID};

use app::{App, AppInit};

const STYLE: &str = "
.message-bubble-user {
    background-color: alpha(@accent_bg_color, 0.15);
}
.message-bubble-assistant {
    background-color: alpha(@card_bg_color, 0.9);
}
.input-card {
    border-radius: 12px;
}
";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = ApiConfig::from_env().context("Failed to resolve the API configuration")?;

    let graphql = Arc::new(GraphQlClient::new(
        Arc::new(config),
        Arc::new(ReqwestTransport::new()),
    ));

    let app = adw::Application::builder().application_id(APP_ID).build();
    app.connect_startup(|_| {
        relm4::set_global_css(STYLE);
    });

    RelmApp::from_app(app).run::<App>(AppInit { graphql });
    Ok(())
}
