//! Translation of canonical queries and tips into the registry's vocabulary.

use desaparecidos_core::{NewInformation, PersonSearch};

pub const LISTING_PATH: &str = "/v1/pessoas/aberto";
pub const FILTER_PATH: &str = "/v1/pessoas/aberto/filtro";
pub const STATISTICS_PATH: &str = "/v1/pessoas/aberto/estatistico";
pub const TIP_QUERY_PATH: &str = "/v1/ocorrencias/informacoes-desaparecido";
pub const TIP_MULTIPART_PATH: &str = "/api/informacoes";

pub fn person_path(id: u64) -> String {
    format!("/v1/pessoas/{id}")
}

/// Listing endpoint for `query`: the filtered one as soon as any filter is set.
pub fn listing_path(query: &PersonSearch) -> &'static str {
    if query.has_filters() {
        FILTER_PATH
    } else {
        LISTING_PATH
    }
}

/// Query parameters for the listing endpoint chosen by [`listing_path`].
///
/// Filters are only sent to the filtered endpoint. Location has no
/// upstream parameter.
pub fn listing_params(query: &PersonSearch) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("pagina", query.page.to_string()),
        ("porPagina", query.size.to_string()),
    ];
    if !query.has_filters() {
        return params;
    }

    let filter = &query.filter;
    if let Some(name) = filter.name() {
        params.push(("nome", name.to_string()));
    }
    if let Some(status) = filter.status {
        params.push(("status", status.upstream_filter().to_string()));
    }
    if let Some(sex) = filter.sex {
        params.push(("sexo", sex.as_str().to_string()));
    }
    if let Some(min) = filter.min_age {
        params.push(("faixaIdadeInicial", min.to_string()));
    }
    if let Some(max) = filter.max_age {
        params.push(("faixaIdadeFinal", max.to_string()));
    }
    params
}

/// Query parameters for a tip posted with [`crate::TipTransport::QueryParams`].
///
/// The registry keys tips by occurrence; the case identifier is sent in
/// both occurrence slots. Phone and photos have no slot in this encoding.
pub fn tip_query_params(info: &NewInformation, date: &str) -> Vec<(&'static str, String)> {
    vec![
        ("ocorrenciaId", info.person_id.to_string()),
        ("informacao", info.observations.clone()),
        (
            "descricao",
            info.sighting_location.clone().unwrap_or_default(),
        ),
        ("data", date.to_string()),
        ("ocoId", info.person_id.to_string()),
    ]
}
