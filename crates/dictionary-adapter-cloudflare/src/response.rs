use dictionary_core::error::DictionaryError;
use dictionary_core::http::Response;
use worker::Response as CfResponse;

pub fn from_core_response(response: Response) -> Result<CfResponse, DictionaryError> {
    let (parts, body) = response.into_parts();

    let cf_response = if body.is_empty() {
        CfResponse::empty().map_err(DictionaryError::internal)?
    } else {
        CfResponse::from_bytes(body.into_bytes().to_vec()).map_err(DictionaryError::internal)?
    };

    let mut cf_response = cf_response.with_status(parts.status.as_u16());
    let headers = cf_response.headers_mut();
    for (name, value) in parts.headers.iter() {
        if let Ok(value_str) = value.to_str() {
            headers
                .set(name.as_str(), value_str)
                .map_err(DictionaryError::internal)?;
        }
    }
    Ok(cf_response)
}
