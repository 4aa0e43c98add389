mod me;

use std::sync::Arc;

use async_graphql::{
    Context, EmptyMutation, EmptySubscription, ErrorExtensions, Json, Object, Request, Response,
    Schema, SimpleObject,
};
use platform_api::{ApiError, ApiResult};
use platform_authz::{AccessEvaluator, OwnedResource, Principal, current};
use serde::Serialize;
use tracing::instrument;

pub use me::{MePayload, RoleEntry, role_table};

pub type SchemaType = Schema<QueryRoot, EmptyMutation, EmptySubscription>;

pub fn build_schema() -> SchemaType {
    Schema::build(QueryRoot, EmptyMutation, EmptySubscription).finish()
}

/// Principal attached to a GraphQL request; `None` for anonymous callers.
#[derive(Clone, Debug, Default)]
pub struct RequestPrincipal(pub Option<Arc<Principal>>);

/// Execute `request` with `principal` both in the context data and installed
/// as the current principal for evaluator calls.
pub async fn execute(
    schema: &SchemaType,
    request: Request,
    principal: Option<Arc<Principal>>,
) -> Response {
    let request = request.data(RequestPrincipal(principal.clone()));
    current::scope(principal, schema.execute(request)).await
}

#[derive(Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    #[instrument(name = "graphql.health", skip_all)]
    async fn health(&self) -> ApiResult<HealthPayload> {
        Ok(HealthPayload { ok: true })
    }

    #[instrument(name = "graphql.version", skip_all)]
    async fn version(&self) -> ApiResult<String> {
        Ok(env!("CARGO_PKG_VERSION").to_string())
    }

    #[instrument(name = "graphql.me", skip_all)]
    async fn me(&self, ctx: &Context<'_>) -> ApiResult<Option<MePayload>> {
        let principal = ctx
            .data_opt::<RequestPrincipal>()
            .and_then(|requester| requester.0.as_deref());
        Ok(principal.map(MePayload::from_principal))
    }

    /// True if the caller holds any of `permissions`.
    #[instrument(name = "graphql.can", skip_all)]
    async fn can(&self, permissions: Vec<String>) -> bool {
        AccessEvaluator.has_permission(&permissions, None)
    }

    #[instrument(name = "graphql.can_perform", skip(self))]
    async fn can_perform(&self, action: String, resource: String) -> bool {
        AccessEvaluator.can_perform_action(&action, &resource, None)
    }

    #[instrument(name = "graphql.can_access", skip_all)]
    async fn can_access(&self, resource: Json<OwnedResource>) -> bool {
        AccessEvaluator.can_access_resource(Some(&resource.0), None)
    }

    #[instrument(name = "graphql.role_table", skip_all)]
    async fn role_table(&self) -> async_graphql::Result<Vec<RoleEntry>> {
        if AccessEvaluator.is_admin(None) {
            Ok(role_table())
        } else {
            Err(ApiError::Forbidden("admin".into()).extend())
        }
    }
}

#[derive(Clone, Debug, SimpleObject, Serialize)]
pub struct HealthPayload {
    pub ok: bool,
}
