//! Item endpoints
//!
//! Stub handlers returning fixed descriptive text. No item is stored, and the
//! request body of `POST /items` is never read.

use crate::routing::{ParamError, PathParams};

/// `GET /items`
pub fn list_items(_params: &PathParams) -> Result<String, ParamError> {
    Ok("list of items".to_string())
}

/// `POST /items`
pub fn add_item(_params: &PathParams) -> Result<String, ParamError> {
    Ok("added item".to_string())
}

/// `GET /items/{id}`
///
/// Echoes the parsed id, so `+7` and `007` both answer `get item by 7`.
pub fn get_item(params: &PathParams) -> Result<String, ParamError> {
    let id: i64 = params.parse("id")?;
    Ok(format!("get item by {id}"))
}
