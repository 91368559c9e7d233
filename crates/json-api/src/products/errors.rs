//! Errors

use salvo::http::StatusError;
use tracing::error;

use pillbox_app::domain::catalog::CatalogServiceError;

pub(crate) fn into_status_error(error: CatalogServiceError) -> StatusError {
    match error {
        CatalogServiceError::NotFound => StatusError::not_found().brief("Product not found"),
        CatalogServiceError::AlreadyExists | CatalogServiceError::InUse => {
            StatusError::conflict().brief("Catalog entry conflicts with existing data")
        }
        CatalogServiceError::InvalidReference
        | CatalogServiceError::MissingRequiredData
        | CatalogServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid catalog data")
        }
        CatalogServiceError::Sql(source) => {
            error!("catalog storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
