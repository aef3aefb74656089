use super::handler;
use crate::domain_model::UserId;
use crate::server::Server;
use std::convert::Infallible;
use std::sync::Arc;
use warp::Filter;

pub fn routes(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let identity = warp::get()
        .and(warp::path("identity"))
        .and(warp::path::param::<UserId>())
        .and(warp::path::end())
        .and(with(server.identity_service.clone()))
        .and_then(handler::get_identity);

    let resolve = warp::post()
        .and(warp::path("identity"))
        .and(warp::path("resolve"))
        .and(warp::path::end())
        .and(warp::body::json())
        .and(with(server.identity_service.clone()))
        .and_then(handler::resolve_batch);

    resolve.or(identity)
}

fn with<ServiceType>(
    service: Arc<ServiceType>,
) -> impl Filter<Extract = (Arc<ServiceType>,), Error = Infallible> + Clone
where
    ServiceType: Send + Sync + ?Sized,
{
    warp::any().map(move || service.clone())
}
