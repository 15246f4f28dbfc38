use crate::{
    service,
    settings::{BalanceMode, Settings},
};
use actix_web::{web, App, HttpServer};
use frame_balance::{
    coingecko, etherscan, neynar, rpc, AddressSource, BalanceSource, FrameRenderer, PriceSource,
    ProfileSource, RenderSettings,
};
use std::{net::TcpListener, sync::Arc};

pub fn new_renderer(settings: &Settings) -> Arc<FrameRenderer> {
    let timeout = settings.sources.request_timeout;

    let balances: Arc<dyn BalanceSource + Send + Sync> = match settings.sources.balance_mode {
        BalanceMode::Explorer => Arc::new(etherscan::Source::new(
            settings.sources.etherscan.url.clone(),
            settings.sources.etherscan.api_key.clone(),
            settings.sources.etherscan.token_contract.clone(),
            settings.sources.etherscan.token_decimals,
            timeout,
        )),
        BalanceMode::Contract => Arc::new(rpc::Source::new(
            settings.sources.rpc.url.clone(),
            settings.sources.rpc.token_contract.clone(),
            timeout,
        )),
    };
    let social = Arc::new(neynar::Source::new(
        settings.sources.neynar.url.clone(),
        settings.sources.neynar.api_key.clone(),
        timeout,
    ));
    let addresses: Arc<dyn AddressSource + Send + Sync> = social.clone();
    let profiles: Arc<dyn ProfileSource + Send + Sync> = social;
    let prices: Arc<dyn PriceSource + Send + Sync> = Arc::new(coingecko::Source::new(
        settings.sources.coingecko.url.clone(),
        settings.sources.coingecko.token_id.clone(),
        timeout,
    ));

    Arc::new(FrameRenderer::new(
        addresses,
        profiles,
        balances,
        prices,
        RenderSettings {
            token_symbol: settings.token.symbol.clone(),
            explorer_base_url: settings.token.explorer_base_url.clone(),
        },
    ))
}

pub async fn frame_balance(settings: Settings) -> Result<(), anyhow::Error> {
    let renderer = new_renderer(&settings);
    let listener = TcpListener::bind(settings.server.addr)?;
    tracing::info!("starting http server on addr {}", settings.server.addr);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::from(renderer.clone()))
            .configure(service::configure)
    })
    .listen(listener)?
    .run()
    .await
    .map_err(anyhow::Error::from)
}
