use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "BizBoost API",
        version = "0.1.0",
        description = "Retrieval-augmented business advice for small retailers"
    ),
    servers(
        (url = "/", description = "API root")
    )
)]
struct BaseDoc;

/// Service document with the advisor routes merged in at the API root.
pub struct ApiDoc;

impl OpenApi for ApiDoc {
    fn openapi() -> utoipa::openapi::OpenApi {
        let mut doc = BaseDoc::openapi();
        doc.merge(domain_advisor::ApiDoc::openapi());
        doc
    }
}
