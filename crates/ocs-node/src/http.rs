//! The RPC surface of spec.md §6 as axum routes returning JSON, grounded
//! on the teacher's own `qc-16-api-gateway::router` (trimmed to a plain
//! REST shape here instead of a JSON-RPC envelope — this core has nine
//! named operations, not an open Ethereum method namespace).
//!
//! Request/response bodies reuse the domain types' own `Serialize`/
//! `Deserialize` derives directly rather than a hand-rolled DTO layer;
//! only the 32-byte ids that appear in URL path/query segments need the
//! hex helpers in `hex_param`.

use crate::error::ApiError;
use crate::hex_param::decode_hash;
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use ocs_crypto::GroupElement;
use ocs_darc::{Darc, DarcSignature};
use ocs_ledger::{Read, Write};
use ocs_service::{DecryptedKey, OcsService};
use ocs_storage::Storage;
use ocs_types::{Hash, Identity, PublicKeyBytes, Role};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared application state: the wired façade for this process's
/// `self_index`.
pub type AppState = Arc<OcsService<Storage>>;

/// Build the router exposing every operation of spec.md §6.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/skipchains", post(create_skipchain))
        .route("/chains/:chain_id/darc", post(update_darc))
        .route("/chains/:chain_id/writes", post(write_request))
        .route("/chains/:chain_id/shared-public", get(shared_public))
        .route("/reads", post(read_request).get(get_read_requests))
        .route("/decrypt-key", post(decrypt_key))
        .route("/darc-path", get(get_darc_path))
        .route("/darcs/:base_darc_id/latest", get(get_latest_darc))
        .with_state(state)
}

#[derive(Deserialize)]
struct CreateSkipchainsRequest {
    roster: Vec<PublicKeyBytes>,
    writers: Darc,
}

#[derive(Serialize)]
struct CreateSkipchainsReply {
    chain_id: Hash,
    collective_key: GroupElement,
}

async fn create_skipchain(
    State(service): State<AppState>,
    Json(req): Json<CreateSkipchainsRequest>,
) -> Result<Json<CreateSkipchainsReply>, ApiError> {
    let (chain_id, collective_key) = service.create_skipchain(req.roster, req.writers).await?;
    Ok(Json(CreateSkipchainsReply {
        chain_id,
        collective_key,
    }))
}

#[derive(Deserialize)]
struct UpdateDarcRequest {
    darc: Darc,
}

#[derive(Serialize)]
struct BlockReply {
    block: ocs_skipchain::Block,
}

async fn update_darc(
    State(service): State<AppState>,
    Path(chain_id): Path<String>,
    Json(req): Json<UpdateDarcRequest>,
) -> Result<Json<BlockReply>, ApiError> {
    let chain_id = decode_hash(&chain_id)?;
    let block = service.update_darc(chain_id, req.darc).await?;
    Ok(Json(BlockReply { block }))
}

#[derive(Deserialize)]
struct WriteRequestBody {
    write: Write,
}

async fn write_request(
    State(service): State<AppState>,
    Path(chain_id): Path<String>,
    Json(req): Json<WriteRequestBody>,
) -> Result<Json<BlockReply>, ApiError> {
    let chain_id = decode_hash(&chain_id)?;
    let block = service.write_request(chain_id, req.write).await?;
    Ok(Json(BlockReply { block }))
}

#[derive(Deserialize)]
struct ReadRequestBody {
    read: Read,
}

async fn read_request(
    State(service): State<AppState>,
    Json(req): Json<ReadRequestBody>,
) -> Result<Json<BlockReply>, ApiError> {
    let block = service.read_request(req.read).await?;
    Ok(Json(BlockReply { block }))
}

#[derive(Deserialize)]
struct ReadRequestsQuery {
    start: String,
    #[serde(default)]
    count: usize,
}

#[derive(Serialize)]
struct ReadRequestsReply {
    reads: Vec<Read>,
}

async fn get_read_requests(
    State(service): State<AppState>,
    Query(query): Query<ReadRequestsQuery>,
) -> Result<Json<ReadRequestsReply>, ApiError> {
    let start = decode_hash(&query.start)?;
    let reads = service.get_read_requests(start, query.count)?;
    Ok(Json(ReadRequestsReply { reads }))
}

#[derive(Serialize)]
struct SharedPublicReply {
    collective_key: GroupElement,
}

async fn shared_public(
    State(service): State<AppState>,
    Path(chain_id): Path<String>,
) -> Result<Json<SharedPublicReply>, ApiError> {
    let chain_id = decode_hash(&chain_id)?;
    let collective_key = service.shared_public(chain_id)?;
    Ok(Json(SharedPublicReply { collective_key }))
}

#[derive(Deserialize)]
struct DecryptKeyRequest {
    read_block_hash: String,
    ephemeral: Option<PublicKeyBytes>,
    ephemeral_signature: Option<DarcSignature>,
}

async fn decrypt_key(
    State(service): State<AppState>,
    Json(req): Json<DecryptKeyRequest>,
) -> Result<Json<DecryptedKey>, ApiError> {
    let read_block_hash = decode_hash(&req.read_block_hash)?;
    let decrypted = service
        .decrypt_key(read_block_hash, req.ephemeral, req.ephemeral_signature)
        .await?;
    Ok(Json(decrypted))
}

#[derive(Deserialize)]
struct DarcPathQuery {
    base_darc_id: String,
    identity: String,
    role: String,
}

#[derive(Serialize)]
struct DarcPathReply {
    path: Vec<Hash>,
}

async fn get_darc_path(
    State(service): State<AppState>,
    Query(query): Query<DarcPathQuery>,
) -> Result<Json<DarcPathReply>, ApiError> {
    let base_darc_id = decode_hash(&query.base_darc_id)?;
    let identity: Identity = query
        .identity
        .parse()
        .map_err(|e| ApiError(ocs_service::OcsError::BadRequest(format!("{e}"))))?;
    let role = match query.role.to_ascii_lowercase().as_str() {
        "owner" => Role::Owner,
        "user" => Role::User,
        other => {
            return Err(ApiError(ocs_service::OcsError::BadRequest(format!(
                "unknown role {other:?}"
            ))))
        }
    };
    let path = service.get_darc_path(base_darc_id, identity, role)?;
    Ok(Json(DarcPathReply { path }))
}

#[derive(Deserialize)]
struct LatestDarcQuery {
    #[serde(default)]
    known_version: u64,
}

#[derive(Serialize)]
struct LatestDarcReply {
    darcs: Vec<Darc>,
}

async fn get_latest_darc(
    State(service): State<AppState>,
    Path(base_darc_id): Path<String>,
    Query(query): Query<LatestDarcQuery>,
) -> Result<Json<LatestDarcReply>, ApiError> {
    let base_darc_id = decode_hash(&base_darc_id)?;
    let darcs = service.get_latest_darc(base_darc_id, query.known_version);
    Ok(Json(LatestDarcReply { darcs }))
}
